//! # Domain Types
//!
//! Core domain types used throughout Invo.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Directory (read by issuance, owned elsewhere)                          │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Company      │◄──│     Client      │   │  CatalogItem    │       │
//! │  │  tenant_id      │   │  company_id     │   │  company_id     │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │ Address (billing / shipping, live)    │
//! │                                                                         │
//! │  Issued (immutable once committed)                                      │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Invoice      │──►│ InvoiceLineItem │   │ InvoiceAddress  │       │
//! │  │  invoice_number │   │  line_no        │   │  kind (snapshot)│       │
//! │  │  fiscal_year    │   │  line_total     │   │  copied fields  │       │
//! │  │  total_cents    │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (invoice_number, sku) - human-readable

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (a common GST slab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// 100% expressed in basis points. Rates above this are rejected.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Enums
// =============================================================================

/// The payment status of an invoice.
///
/// Issuance always creates `Draft`. Settlement is handled elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Issued, nothing paid yet.
    Draft,
    /// Fully settled.
    Paid,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

/// Which of the two addresses of a client or company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Billing,
    Shipping,
}

impl AddressKind {
    /// Storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AddressKind::Billing => "billing",
            AddressKind::Shipping => "shipping",
        }
    }
}

// =============================================================================
// Directory
// =============================================================================

/// A company issuing invoices. Owned by exactly one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Company {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    /// GST registration number, printed on documents when present.
    pub gst_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A customer of one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: String,
    pub tenant_id: String,
    pub company_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A billable item in a company's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogItem {
    pub id: String,
    pub tenant_id: String,
    pub company_id: String,
    pub name: String,
    pub sku: Option<String>,
    /// Unit of measure ("hrs", "pcs", ...).
    pub unit: Option<String>,
    /// Default rate in cents. Invoices may bill at a different rate.
    pub price_cents: i64,
    /// Default tax rate in basis points.
    pub tax_rate_bps: u32,
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Addresses
// =============================================================================

/// The postal and contact fields shared by live addresses and snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AddressDetails {
    pub name: Option<String>,
    /// The only mandatory line.
    pub line1: String,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gst_number: Option<String>,
}

/// A live, editable address of a client or company.
///
/// One row per (owner, kind). Editing it never touches invoices already
/// issued, those carry their own [`InvoiceAddress`] copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Address {
    /// Client id or company id, depending on the table.
    pub owner_id: String,
    pub kind: AddressKind,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub details: AddressDetails,
    pub updated_at: DateTime<Utc>,
}

/// An address frozen onto an invoice at issuance.
///
/// Snapshot pattern: the row is written once inside the issuance
/// transaction and never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceAddress {
    pub id: String,
    pub invoice_id: String,
    pub kind: AddressKind,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub details: AddressDetails,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Invoice
// =============================================================================

/// An issued invoice header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: String,
    pub tenant_id: String,
    pub company_id: String,
    pub client_id: String,
    /// `INV/FY24-25/0001`, unique per company.
    pub invoice_number: String,
    /// `FY24-25`.
    pub fiscal_year: String,
    /// Numeric part of `invoice_number`.
    pub sequence_number: i64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    /// Always `subtotal_cents + tax_cents`.
    pub total_cents: i64,
    pub paid_cents: i64,
    /// Always `total_cents - paid_cents`.
    pub remaining_cents: i64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn remaining(&self) -> Money {
        Money::from_cents(self.remaining_cents)
    }

    /// Days past the due date as of `today`, zero when not yet due.
    ///
    /// Counted regardless of status: a paid invoice still reports how late
    /// its due date is, but [`Invoice::is_overdue`] is false for it.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        (today - self.due_date).num_days().max(0)
    }

    /// True when `today` is past the due date and the invoice is unpaid.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        today > self.due_date && self.status != InvoiceStatus::Paid
    }
}

/// One immutable line of an issued invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceLineItem {
    pub id: String,
    pub invoice_id: String,
    /// 1-based position in the request.
    pub line_no: i64,
    pub item_id: String,
    pub quantity: i64,
    pub rate_cents: i64,
    pub discount_cents: i64,
    pub tax_rate_bps: u32,
    pub line_tax_cents: i64,
    /// `rate × quantity - discount + line tax`.
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl InvoiceLineItem {
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Requests & Results
// =============================================================================

/// One requested line. The rate and tax rate are taken from the request,
/// not the catalog, so the same item can be billed at different prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub item_id: String,
    pub quantity: i64,
    pub rate_cents: i64,
    #[serde(default)]
    pub discount_cents: i64,
    #[serde(default)]
    pub tax_rate_bps: u32,
}

/// Everything needed to issue one invoice.
///
/// The tenant is not part of the request. It comes from the authenticated
/// caller and is passed separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueInvoiceRequest {
    pub company_id: String,
    pub client_id: String,
    /// `YYYY-MM-DD`.
    pub invoice_date: String,
    /// `YYYY-MM-DD`, not before `invoice_date`.
    pub due_date: String,
    pub items: Vec<LineItemRequest>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// What a successful issuance hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedInvoice {
    pub invoice_id: String,
    pub invoice_number: String,
    pub fiscal_year: String,
    pub sequence_number: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

/// Advisory preview of the number the next issuance would receive.
///
/// Another issuance may take it first, nothing is reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumberPreview {
    pub fiscal_year: String,
    pub next_sequence: i64,
    pub invoice_number: String,
}

/// An invoice with its lines, address snapshots and overdue status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetails {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceLineItem>,
    pub billing_address: Option<InvoiceAddress>,
    pub shipping_address: Option<InvoiceAddress>,
    pub days_overdue: i64,
    pub is_overdue: bool,
}

/// Filter for listing a tenant's invoices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceFilter {
    pub company_id: Option<String>,
    pub client_id: Option<String>,
    /// Page size, values of zero or below fall back to the default.
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl InvoiceFilter {
    pub const DEFAULT_LIMIT: i64 = 10;

    /// Page size actually used by a query.
    pub fn effective_limit(&self) -> i64 {
        if self.limit <= 0 {
            Self::DEFAULT_LIMIT
        } else {
            self.limit
        }
    }

    /// Offset actually used by a query.
    pub fn effective_offset(&self) -> i64 {
        self.offset.max(0)
    }
}

/// A list row: the header plus the client's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceSummary {
    pub id: String,
    pub company_id: String,
    pub client_id: String,
    pub client_name: String,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_cents: i64,
    pub remaining_cents: i64,
    pub status: InvoiceStatus,
}

// =============================================================================
// Document (PDF renderer input)
// =============================================================================

/// One printable line, joined with the catalog item's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DocumentLine {
    pub line_no: i64,
    pub item_name: String,
    pub unit: Option<String>,
    pub quantity: i64,
    pub rate_cents: i64,
    pub discount_cents: i64,
    pub tax_rate_bps: u32,
    pub line_tax_cents: i64,
    pub line_total_cents: i64,
}

/// The complete, immutable data a renderer needs to lay out an invoice.
///
/// Client addresses come from the invoice's snapshots, never from the live
/// client record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub company_name: String,
    pub company_gst_number: Option<String>,
    pub company_address: AddressDetails,
    pub billing_address: AddressDetails,
    pub shipping_address: Option<AddressDetails>,
    pub invoice_number: String,
    pub fiscal_year: String,
    /// First day of the invoice's fiscal year.
    pub period_start: NaiveDate,
    /// Last day of the invoice's fiscal year.
    pub period_end: NaiveDate,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub lines: Vec<DocumentLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================
