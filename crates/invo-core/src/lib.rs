//! # invo-core: Pure Business Logic for Invo
//!
//! This crate holds the invoice math and numbering rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Invo Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             HTTP / auth / PDF rendering (external)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ IssueInvoiceRequest                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          invo-db: InvoiceService (issuance transaction)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ invo-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │calculator │  │  fiscal   │  │   │
//! │  │   │  Invoice  │  │   Money   │  │ LineInput │  │FiscalYear │  │   │
//! │  │   │  Address  │  │  TaxRate  │  │  Totals   │  │ INV/FY/.. │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                         ┌───────────┐                           │   │
//! │  │                         │validation │                           │   │
//! │  │                         └───────────┘                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Invoice, line items, address snapshots, requests)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`calculator`] - Line-item and invoice total calculation
//! - [`fiscal`] - April–March fiscal years and invoice number formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Request validation
//!
//! ## Example Usage
//!
//! ```rust
//! use invo_core::calculator::{calculate_invoice, LineInput};
//! use invo_core::money::Money;
//! use invo_core::types::TaxRate;
//!
//! // 100.00 × 3 − 50.00 discount, taxed at 10%
//! let line = LineInput::new(Money::from_cents(10_000), 3, Money::from_cents(5_000), TaxRate::from_bps(1_000));
//! let calc = calculate_invoice(&[line]).unwrap();
//!
//! assert_eq!(calc.totals.subtotal.cents(), 25_000);
//! assert_eq!(calc.totals.tax.cents(), 2_500);
//! assert_eq!(calc.totals.total.cents(), 27_500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod error;
pub mod fiscal;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use fiscal::FiscalYear;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every server-generated invoice number.
pub const INVOICE_NUMBER_PREFIX: &str = "INV";

/// Zero-padding width of the sequence part of an invoice number.
///
/// Issuance and preview share this width: `INV/FY24-25/0001`.
pub const INVOICE_SEQUENCE_WIDTH: usize = 4;

/// Maximum line items on a single invoice.
pub const MAX_LINE_ITEMS: usize = 200;

/// Maximum quantity on a single line.
///
/// Keeps `rate × quantity` far away from i64 overflow for realistic rates.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000;

/// Date format accepted for `invoice_date` and `due_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
