//! # invo-db: Database Layer for Invo
//!
//! SQLite storage, invoice number allocation and the issuance transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Invo Data Flow                                 │
//! │                                                                         │
//! │  Caller (HTTP handler, seed binary, ...)                               │
//! │       │  issue_invoice(tenant, IssueInvoiceRequest)                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     invo-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ InvoiceService│    │  Repositories │    │  Migrations  │  │   │
//! │  │   │  (service/)   │───►│ directory     │    │  (embedded)  │  │   │
//! │  │   │ ownership     │    │ address       │    │              │  │   │
//! │  │   │ issuance      │    │ counter       │    │ 001_dir.sql  │  │   │
//! │  │   │ snapshot      │    │ invoice       │    │ 002_inv.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │          │                                                      │   │
//! │  │          ▼  invo-core: calculator, fiscal, validation           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL) ── invo.db                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Environment-driven application configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`service`] - Issuance workflow and tenant-scoped reads
//!
//! ## Usage
//!
//! ```rust,ignore
//! use invo_db::{AppConfig, Database};
//!
//! let config = AppConfig::load()?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let issued = db.invoicing().issue_invoice(&tenant_id, &request).await?;
//! println!("{}", issued.invoice_number); // INV/FY24-25/0001
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::{InvoiceError, InvoiceResult, InvoiceService, IssuanceStage};

// Repository re-exports for convenience
pub use repository::address::{AddressOwner, AddressRepository};
pub use repository::counter::CounterRepository;
pub use repository::directory::DirectoryRepository;
pub use repository::invoice::InvoiceRepository;
