//! # Error Types
//!
//! Domain-specific error types for invo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  invo-core errors (this file)                                          │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  invo-db errors (separate crate)                                       │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── InvoiceError     - What callers of the issuance workflow see      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → InvoiceError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, item id, ...)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stored fiscal year label could not be parsed.
    ///
    /// ## When This Occurs
    /// - A label other than `FYyy-yy` was read back from storage
    /// - The two halves are not consecutive years (`FY24-26`)
    #[error("Invalid fiscal year label: {0}")]
    InvalidFiscalYear(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a request doesn't meet requirements. Every one
/// of them is raised before the issuance transaction opens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Invoice must contain at least one line item.
    #[error("Invoice must contain at least one item")]
    EmptyInvoice,

    /// Due date precedes the invoice date.
    #[error("due_date {due_date} is before invoice_date {invoice_date}")]
    DueBeforeInvoiceDate {
        invoice_date: String,
        due_date: String,
    },

    /// Client does not exist or belongs to another company.
    #[error("Invalid or unauthorized client: {client_id}")]
    InvalidClient { client_id: String },

    /// Catalog item does not exist or belongs to another company.
    ///
    /// ## User Workflow
    /// ```text
    /// items: [A (company 1), B (company 2)]   invoice for company 1
    ///      │
    ///      ▼
    /// A ok → B fails → InvalidItem { item_id: B }   (C, D ... never checked)
    /// ```
    #[error("Invalid or unauthorized item: {item_id}")]
    InvalidItem { item_id: String },

    /// An amount computation left the representable range.
    #[error("{field} overflows the supported amount range")]
    AmountOverflow { field: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::InvalidItem {
            item_id: "item-42".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid or unauthorized item: item-42");

        let err = CoreError::InvalidFiscalYear("2024".to_string());
        assert_eq!(err.to_string(), "Invalid fiscal year label: 2024");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "company_id".to_string(),
        };
        assert_eq!(err.to_string(), "company_id is required");

        assert_eq!(
            ValidationError::EmptyInvoice.to_string(),
            "Invoice must contain at least one item"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::EmptyInvoice;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
