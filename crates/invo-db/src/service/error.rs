//! # Invoice Service Errors
//!
//! What callers of the invoicing workflow see.
//!
//! ```text
//! ┌──────────────────────────┬───────────────────────────┬───────────────┐
//! │ Variant                  │ Raised                    │ Class         │
//! ├──────────────────────────┼───────────────────────────┼───────────────┤
//! │ Authorization            │ company not owned by      │ client        │
//! │                          │ tenant, before any tx     │               │
//! │ Validation               │ bad input or foreign      │ client        │
//! │                          │ client/item, before any tx│               │
//! │ MissingRequiredData      │ inside tx, rolls back     │ client        │
//! │ NotFound                 │ read operations           │ client        │
//! │ Transaction              │ store failure, rolls back │ server        │
//! └──────────────────────────┴───────────────────────────┴───────────────┘
//! ```
//!
//! Nothing is retried automatically.

use thiserror::Error;

use crate::error::DbError;
use invo_core::{CoreError, ValidationError};

/// Invoicing workflow errors.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The company does not exist or is owned by another tenant.
    #[error("Company {company_id} is not accessible to this tenant")]
    Authorization { company_id: String },

    /// The request was rejected before any write.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Data the invoice depends on is absent, e.g. the client has no
    /// billing address.
    #[error("Missing required data: {0}")]
    MissingRequiredData(String),

    /// The requested invoice does not exist for this tenant.
    #[error("Invoice not found: {0}")]
    NotFound(String),

    /// The store failed. Any open transaction was rolled back.
    #[error("Invoice transaction failed: {0}")]
    Transaction(#[from] DbError),
}

impl InvoiceError {
    /// True for errors caused by the request rather than the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let status = if err.is_client_error() { 400 } else { 500 };
    /// ```
    pub fn is_client_error(&self) -> bool {
        !matches!(self, InvoiceError::Transaction(_))
    }

    pub(crate) fn missing(what: impl Into<String>) -> Self {
        InvoiceError::MissingRequiredData(what.into())
    }
}

impl From<CoreError> for InvoiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => InvoiceError::Validation(v),
            other => InvoiceError::Transaction(DbError::Internal(other.to_string())),
        }
    }
}

impl From<sqlx::Error> for InvoiceError {
    fn from(err: sqlx::Error) -> Self {
        InvoiceError::Transaction(err.into())
    }
}

/// Result type for invoicing operations.
pub type InvoiceResult<T> = Result<T, InvoiceError>;
