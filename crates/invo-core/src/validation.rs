//! # Validation Module
//!
//! Input validation for invoice issuance and directory data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request shape (THIS MODULE)                                  │
//! │  └── ids present, item list non-empty and bounded                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Ownership (invo-db, read-only queries)                       │
//! │  └── company → tenant, client → company, item → company                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Amounts and dates (calculator, THIS MODULE)                  │
//! │  ├── quantity, rate, discount, tax rate ranges                         │
//! │  └── dates parse as YYYY-MM-DD, due date not before invoice date       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── CHECK constraints on totals                                       │
//! │  ├── UNIQUE (company_id, invoice_number)                               │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use invo_core::validation::{parse_date, validate_id};
//!
//! validate_id("company_id", "0b6f9c1e-company").unwrap();
//! assert!(parse_date("invoice_date", "2024-13-01").is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{AddressDetails, IssueInvoiceRequest};
use crate::{DATE_FORMAT, MAX_LINE_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_ID_LEN: usize = 64;
const MAX_NAME_LEN: usize = 200;
const MAX_NOTES_LEN: usize = 2_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity id.
///
/// ## Rules
/// - Must not be blank
/// - At most 64 characters
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a display name (company, client, catalog item).
///
/// ## Example
/// ```rust
/// use invo_core::validation::validate_name;
///
/// assert!(validate_name("Acme Consulting").is_ok());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an address before it is stored.
///
/// Only `line1` is mandatory.
pub fn validate_address(address: &AddressDetails) -> ValidationResult<()> {
    if address.line1.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "line1".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected YYYY-MM-DD ({e})"),
        }
    })
}

/// Parses both invoice dates and checks their order.
///
/// ## Returns
/// `(invoice_date, due_date)`.
pub fn parse_invoice_dates(
    invoice_date: &str,
    due_date: &str,
) -> ValidationResult<(NaiveDate, NaiveDate)> {
    let invoice = parse_date("invoice_date", invoice_date)?;
    let due = parse_date("due_date", due_date)?;

    if due < invoice {
        return Err(ValidationError::DueBeforeInvoiceDate {
            invoice_date: invoice.to_string(),
            due_date: due.to_string(),
        });
    }

    Ok((invoice, due))
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates the shape of an issuance request.
///
/// Ownership is checked next by the database layer, then amounts by the
/// calculator and dates by [`parse_invoice_dates`]. A caller without access
/// to the company learns nothing about the rest of the request.
///
/// ## User Workflow
/// ```text
/// IssueInvoiceRequest
///      │
///      ▼
/// validate_issue_request ← THIS FUNCTION
///      │
///      ├── company_id / client_id blank?  → Required
///      ├── no items?                      → EmptyInvoice
///      ├── more than 200 items?           → OutOfRange
///      ├── blank item_id?                 → Required { items[i].item_id }
///      └── notes too long?                → TooLong
/// ```
pub fn validate_issue_request(req: &IssueInvoiceRequest) -> ValidationResult<()> {
    validate_id("company_id", &req.company_id)?;
    validate_id("client_id", &req.client_id)?;

    if req.items.is_empty() {
        return Err(ValidationError::EmptyInvoice);
    }

    if req.items.len() > MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_LINE_ITEMS as i64,
        });
    }

    for (idx, item) in req.items.iter().enumerate() {
        validate_id(&format!("items[{idx}].item_id"), &item.item_id)?;
    }

    if let Some(notes) = &req.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(ValidationError::TooLong {
                field: "notes".to_string(),
                max: MAX_NOTES_LEN,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
