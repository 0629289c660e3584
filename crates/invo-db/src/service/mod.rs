//! # Invoicing Service
//!
//! The issuance workflow and the tenant-scoped reads built on it.
//!
//! ## Issuance State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Validating ──► Computing ──► Sequencing ──► Persisting ──►             │
//! │  (request +      (line math,   (BEGIN,        (header,                  │
//! │   ownership)      dates, no     counter        line items)              │
//! │                   tx yet)       upsert)                                 │
//! │                                    │              │                     │
//! │            SnapshottingAddresses ◄─┴──────────────┘                     │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │                Committed                                                │
//! │                                                                         │
//! │  Any failure after BEGIN ──► RolledBack (counter increment undone)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`error`] - `InvoiceError`, the caller-facing taxonomy
//! - [`ownership`] - tenant → company → client/item checks
//! - [`snapshot`] - client address copies
//! - `issuance` - the transaction itself
//! - `lookup` - preview, get, list, document

pub mod error;
pub mod ownership;
pub mod snapshot;

mod issuance;
mod lookup;

use sqlx::SqlitePool;
use std::fmt;

use crate::repository::address::AddressRepository;
use crate::repository::counter::CounterRepository;
use crate::repository::directory::DirectoryRepository;
use crate::repository::invoice::InvoiceRepository;

pub use error::{InvoiceError, InvoiceResult};
pub use ownership::OwnershipValidator;

/// Stages of one issuance, recorded in logs when a run fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuanceStage {
    Validating,
    Computing,
    Sequencing,
    Persisting,
    SnapshottingAddresses,
    Committed,
    RolledBack,
}

impl fmt::Display for IssuanceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssuanceStage::Validating => "validating",
            IssuanceStage::Computing => "computing",
            IssuanceStage::Sequencing => "sequencing",
            IssuanceStage::Persisting => "persisting",
            IssuanceStage::SnapshottingAddresses => "snapshotting_addresses",
            IssuanceStage::Committed => "committed",
            IssuanceStage::RolledBack => "rolled_back",
        };
        f.write_str(s)
    }
}

/// Invoice issuance, preview and read-back for one database.
///
/// Cheap to clone. Each call is independent, so issuances can run as
/// separate tokio tasks against the same service.
///
/// ## Usage
/// ```rust,ignore
/// let service = db.invoicing();
/// let issued = service.issue_invoice(&tenant_id, &request).await?;
/// let details = service.get_invoice(&tenant_id, &issued.invoice_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceService {
    pool: SqlitePool,
    ownership: OwnershipValidator,
    addresses: AddressRepository,
    counters: CounterRepository,
    directory: DirectoryRepository,
    invoices: InvoiceRepository,
}

impl InvoiceService {
    /// Creates a service over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        let directory = DirectoryRepository::new(pool.clone());
        InvoiceService {
            ownership: OwnershipValidator::new(directory.clone()),
            addresses: AddressRepository::new(pool.clone()),
            counters: CounterRepository::new(pool.clone()),
            invoices: InvoiceRepository::new(pool.clone()),
            directory,
            pool,
        }
    }
}
