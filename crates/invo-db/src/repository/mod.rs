//! # Repository Module
//!
//! Database repository implementations for Invo.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  InvoiceService / seed binary                                          │
//! │       │                                                                 │
//! │       │  db.invoices().list(tenant, &filter)                           │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                     │
//! │  ├── get(&self, tenant, id)                                            │
//! │  ├── items(&self, invoice_id)                                          │
//! │  └── list(&self, tenant, filter)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Pool-backed reads are methods on the repository structs. Writes that  │
//! │  must join the issuance transaction are free functions taking          │
//! │  `&mut Transaction<'_, Sqlite>`.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`DirectoryRepository`](directory::DirectoryRepository) - Companies, clients, catalog items
//! - [`AddressRepository`](address::AddressRepository) - Live client/company addresses
//! - [`CounterRepository`](counter::CounterRepository) - Invoice number counters
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Issued invoices

pub mod address;
pub mod counter;
pub mod directory;
pub mod invoice;
