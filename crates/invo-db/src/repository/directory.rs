//! # Directory Repository
//!
//! Companies, clients and catalog items.
//!
//! Full CRUD for these lives in the surrounding application. This
//! repository covers what issuance needs: creation for seeding and tests,
//! lookups, and the tenant-scoped ownership checks.
//!
//! ## Ownership Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tenant ──owns──► company ──has──► client                               │
//! │                      │                                                  │
//! │                      └────has────► catalog item                         │
//! │                                                                         │
//! │  Every check carries the tenant id, so a client of another tenant's    │
//! │  company never matches even if the ids are guessed.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use invo_core::validation::validate_name;
use invo_core::{CatalogItem, Client, Company, Money, TaxRate};

/// Repository for companies, clients and catalog items.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    pool: SqlitePool,
}

impl DirectoryRepository {
    /// Creates a new DirectoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DirectoryRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Companies
    // -------------------------------------------------------------------------

    /// Creates a company owned by `tenant_id`.
    pub async fn create_company(
        &self,
        tenant_id: &str,
        name: &str,
        gst_number: Option<&str>,
    ) -> DbResult<Company> {
        validate_name(name)?;

        let company = Company {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            name: name.to_string(),
            gst_number: gst_number.map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(id = %company.id, tenant_id = %tenant_id, "Creating company");

        sqlx::query(
            r#"
            INSERT INTO companies (id, tenant_id, name, gst_number, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&company.id)
        .bind(&company.tenant_id)
        .bind(&company.name)
        .bind(&company.gst_number)
        .bind(company.created_at)
        .execute(&self.pool)
        .await?;

        Ok(company)
    }

    /// Gets a company by ID, scoped to a tenant.
    pub async fn get_company(&self, tenant_id: &str, id: &str) -> DbResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, tenant_id, name, gst_number, created_at
            FROM companies
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    /// Counts all companies (for diagnostics and seeding).
    pub async fn count_companies(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// True when `company_id` exists and is owned by `tenant_id`.
    pub async fn company_owned_by(&self, tenant_id: &str, company_id: &str) -> DbResult<bool> {
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM companies WHERE id = ?1 AND tenant_id = ?2)",
        )
        .bind(company_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(owned)
    }

    // -------------------------------------------------------------------------
    // Clients
    // -------------------------------------------------------------------------

    /// Creates a client of `company_id`.
    pub async fn create_client(
        &self,
        tenant_id: &str,
        company_id: &str,
        name: &str,
        email: Option<&str>,
    ) -> DbResult<Client> {
        validate_name(name)?;

        let client = Client {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            company_id: company_id.to_string(),
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: None,
            created_at: Utc::now(),
        };

        debug!(id = %client.id, company_id = %company_id, "Creating client");

        sqlx::query(
            r#"
            INSERT INTO clients (id, tenant_id, company_id, name, email, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&client.id)
        .bind(&client.tenant_id)
        .bind(&client.company_id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.created_at)
        .execute(&self.pool)
        .await?;

        Ok(client)
    }

    /// Gets a client by ID, scoped to a tenant.
    pub async fn get_client(&self, tenant_id: &str, id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, tenant_id, company_id, name, email, phone, created_at
            FROM clients
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// True when `client_id` belongs to `company_id` within `tenant_id`.
    pub async fn client_in_company(
        &self,
        tenant_id: &str,
        company_id: &str,
        client_id: &str,
    ) -> DbResult<bool> {
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM clients
                WHERE id = ?1 AND company_id = ?2 AND tenant_id = ?3
            )
            "#,
        )
        .bind(client_id)
        .bind(company_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }

    // -------------------------------------------------------------------------
    // Catalog items
    // -------------------------------------------------------------------------

    /// Creates a catalog item with default price and tax rate.
    pub async fn create_item(
        &self,
        tenant_id: &str,
        company_id: &str,
        name: &str,
        price: Money,
        tax_rate: TaxRate,
    ) -> DbResult<CatalogItem> {
        let item = CatalogItem {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            company_id: company_id.to_string(),
            name: name.to_string(),
            sku: None,
            unit: None,
            price_cents: price.cents(),
            tax_rate_bps: tax_rate.bps(),
            created_at: Utc::now(),
        };

        self.insert_item(&item).await?;
        Ok(item)
    }

    /// Inserts a fully specified catalog item.
    pub async fn insert_item(&self, item: &CatalogItem) -> DbResult<()> {
        validate_name(&item.name)?;
        debug!(id = %item.id, company_id = %item.company_id, "Inserting catalog item");

        sqlx::query(
            r#"
            INSERT INTO items (
                id, tenant_id, company_id, name, sku, unit,
                price_cents, tax_rate_bps, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&item.id)
        .bind(&item.tenant_id)
        .bind(&item.company_id)
        .bind(&item.name)
        .bind(&item.sku)
        .bind(&item.unit)
        .bind(item.price_cents)
        .bind(item.tax_rate_bps)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a catalog item by ID, scoped to a tenant.
    pub async fn get_item(&self, tenant_id: &str, id: &str) -> DbResult<Option<CatalogItem>> {
        let item = sqlx::query_as::<_, CatalogItem>(
            r#"
            SELECT id, tenant_id, company_id, name, sku, unit,
                   price_cents, tax_rate_bps, created_at
            FROM items
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// True when `item_id` belongs to `company_id` within `tenant_id`.
    pub async fn item_in_company(
        &self,
        tenant_id: &str,
        company_id: &str,
        item_id: &str,
    ) -> DbResult<bool> {
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM items
                WHERE id = ?1 AND company_id = ?2 AND tenant_id = ?3
            )
            "#,
        )
        .bind(item_id)
        .bind(company_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
