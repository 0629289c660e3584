//! Shared fixtures for invo-db integration tests.

#![allow(dead_code)]

use invo_core::{
    AddressDetails, AddressKind, IssueInvoiceRequest, LineItemRequest, Money, TaxRate,
};
use invo_db::{Database, DbConfig};
use tempfile::TempDir;

pub const TEST_TENANT_ID: &str = "tenant-a";
pub const OTHER_TENANT_ID: &str = "tenant-b";

/// A database with one company, one client and one catalog item.
pub struct TestApp {
    pub db: Database,
    pub company_id: String,
    pub client_id: String,
    pub item_id: String,
    // Keeps the file-backed database alive for the test's duration.
    _dir: Option<TempDir>,
}

impl TestApp {
    /// In-memory database with the client's billing address set.
    pub async fn spawn() -> Self {
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("Failed to open in-memory database");
        Self::seed(db, None, true).await
    }

    /// In-memory database, the client has no addresses.
    pub async fn spawn_without_billing() -> Self {
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("Failed to open in-memory database");
        Self::seed(db, None, false).await
    }

    /// File-backed database with a multi-connection pool.
    pub async fn spawn_on_disk(max_connections: u32) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = DbConfig::new(dir.path().join("invo.db")).max_connections(max_connections);
        let db = Database::new(config)
            .await
            .expect("Failed to open file database");
        Self::seed(db, Some(dir), true).await
    }

    async fn seed(db: Database, dir: Option<TempDir>, with_billing: bool) -> Self {
        let directory = db.directory();
        let company = directory
            .create_company(TEST_TENANT_ID, "Acme Services", Some("29ABCDE1234F1Z5"))
            .await
            .expect("Failed to create company");
        let client = directory
            .create_client(TEST_TENANT_ID, &company.id, "Globex", Some("ap@globex.example"))
            .await
            .expect("Failed to create client");
        let item = directory
            .create_item(
                TEST_TENANT_ID,
                &company.id,
                "Consulting",
                Money::from_cents(10_000),
                TaxRate::from_bps(1_000),
            )
            .await
            .expect("Failed to create item");

        if with_billing {
            db.addresses()
                .upsert_client_address(
                    TEST_TENANT_ID,
                    &client.id,
                    AddressKind::Billing,
                    &address("1 Main St", "Pune"),
                )
                .await
                .expect("Failed to save billing address");
        }

        TestApp {
            db,
            company_id: company.id,
            client_id: client.id,
            item_id: item.id,
            _dir: dir,
        }
    }

    /// The reference request: 3 x 100.00, 50.00 discount, 10% tax.
    pub fn request(&self, invoice_date: &str) -> IssueInvoiceRequest {
        IssueInvoiceRequest {
            company_id: self.company_id.clone(),
            client_id: self.client_id.clone(),
            invoice_date: invoice_date.to_string(),
            due_date: invoice_date.to_string(),
            items: vec![LineItemRequest {
                item_id: self.item_id.clone(),
                quantity: 3,
                rate_cents: 10_000,
                discount_cents: 5_000,
                tax_rate_bps: 1_000,
            }],
            notes: None,
        }
    }

    pub async fn set_company_billing(&self) {
        self.db
            .addresses()
            .upsert_company_address(
                TEST_TENANT_ID,
                &self.company_id,
                AddressKind::Billing,
                &address("42 Residency Road", "Bengaluru"),
            )
            .await
            .expect("Failed to save company address");
    }
}

pub fn address(line1: &str, city: &str) -> AddressDetails {
    AddressDetails {
        line1: line1.to_string(),
        city: Some(city.to_string()),
        country: Some("IN".to_string()),
        ..Default::default()
    }
}
