//! # Address Repository
//!
//! Live billing and shipping addresses of clients and companies.
//!
//! One row per (owner, kind). Saving an address of a kind that already
//! exists replaces it. Issued invoices are unaffected because issuance
//! copies the client's addresses into `invoice_addresses`.
//!
//! ```text
//!   upsert_client_address(billing, v1) ──► client_addresses  [billing: v1]
//!   issue_invoice                      ──► invoice_addresses [billing: v1]
//!   upsert_client_address(billing, v2) ──► client_addresses  [billing: v2]
//!                                          invoice_addresses [billing: v1]  (unchanged)
//! ```

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use invo_core::validation::validate_address;
use invo_core::{Address, AddressDetails, AddressKind};

/// Which directory entity an address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressOwner {
    Client,
    Company,
}

impl AddressOwner {
    fn address_table(&self) -> &'static str {
        match self {
            AddressOwner::Client => "client_addresses",
            AddressOwner::Company => "company_addresses",
        }
    }

    fn owner_table(&self) -> &'static str {
        match self {
            AddressOwner::Client => "clients",
            AddressOwner::Company => "companies",
        }
    }

    fn entity(&self) -> &'static str {
        match self {
            AddressOwner::Client => "Client",
            AddressOwner::Company => "Company",
        }
    }
}

/// Repository for live addresses.
#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: SqlitePool,
}

impl AddressRepository {
    /// Creates a new AddressRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AddressRepository { pool }
    }

    /// Saves the client's address of `kind`, replacing any previous one.
    ///
    /// ## Errors
    /// `DbError::NotFound` when the client does not exist for this tenant.
    pub async fn upsert_client_address(
        &self,
        tenant_id: &str,
        client_id: &str,
        kind: AddressKind,
        details: &AddressDetails,
    ) -> DbResult<Address> {
        self.upsert(AddressOwner::Client, tenant_id, client_id, kind, details)
            .await
    }

    /// Gets the client's address of `kind`.
    pub async fn get_client_address(
        &self,
        client_id: &str,
        kind: AddressKind,
    ) -> DbResult<Option<Address>> {
        self.get(AddressOwner::Client, client_id, kind).await
    }

    /// Saves the company's address of `kind`, replacing any previous one.
    pub async fn upsert_company_address(
        &self,
        tenant_id: &str,
        company_id: &str,
        kind: AddressKind,
        details: &AddressDetails,
    ) -> DbResult<Address> {
        self.upsert(AddressOwner::Company, tenant_id, company_id, kind, details)
            .await
    }

    /// Gets the company's address of `kind`.
    pub async fn get_company_address(
        &self,
        company_id: &str,
        kind: AddressKind,
    ) -> DbResult<Option<Address>> {
        self.get(AddressOwner::Company, company_id, kind).await
    }

    async fn upsert(
        &self,
        owner: AddressOwner,
        tenant_id: &str,
        owner_id: &str,
        kind: AddressKind,
        details: &AddressDetails,
    ) -> DbResult<Address> {
        validate_address(details)?;

        debug!(owner = owner.entity(), owner_id = %owner_id, kind = kind.as_str(), "Saving address");

        // The SELECT ... WHERE EXISTS form writes nothing when the owner is
        // missing or belongs to another tenant.
        let sql = format!(
            r#"
            INSERT INTO {table} (
                owner_id, kind, name, line1, line2, city, state,
                postal_code, country, phone, email, gst_number, updated_at
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13
            WHERE EXISTS (SELECT 1 FROM {owners} WHERE id = ?1 AND tenant_id = ?14)
            ON CONFLICT (owner_id, kind) DO UPDATE SET
                name = excluded.name,
                line1 = excluded.line1,
                line2 = excluded.line2,
                city = excluded.city,
                state = excluded.state,
                postal_code = excluded.postal_code,
                country = excluded.country,
                phone = excluded.phone,
                email = excluded.email,
                gst_number = excluded.gst_number,
                updated_at = excluded.updated_at
            "#,
            table = owner.address_table(),
            owners = owner.owner_table(),
        );

        let result = sqlx::query(&sql)
            .bind(owner_id)
            .bind(kind)
            .bind(&details.name)
            .bind(&details.line1)
            .bind(&details.line2)
            .bind(&details.city)
            .bind(&details.state)
            .bind(&details.postal_code)
            .bind(&details.country)
            .bind(&details.phone)
            .bind(&details.email)
            .bind(&details.gst_number)
            .bind(Utc::now())
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(owner.entity(), owner_id));
        }

        self.get(owner, owner_id, kind)
            .await?
            .ok_or_else(|| DbError::not_found("Address", owner_id))
    }

    async fn get(
        &self,
        owner: AddressOwner,
        owner_id: &str,
        kind: AddressKind,
    ) -> DbResult<Option<Address>> {
        let sql = format!(
            r#"
            SELECT owner_id, kind, name, line1, line2, city, state,
                   postal_code, country, phone, email, gst_number, updated_at
            FROM {table}
            WHERE owner_id = ?1 AND kind = ?2
            "#,
            table = owner.address_table(),
        );

        let address = sqlx::query_as::<_, Address>(&sql)
            .bind(owner_id)
            .bind(kind)
            .fetch_optional(&self.pool)
            .await?;

        Ok(address)
    }
}

/// Reads a live address inside an open transaction.
///
/// Used by the snapshot step of issuance so the copy is taken under the
/// same write lock as the rest of the invoice.
pub async fn fetch_address_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    owner: AddressOwner,
    owner_id: &str,
    kind: AddressKind,
) -> DbResult<Option<AddressDetails>> {
    let sql = format!(
        r#"
        SELECT name, line1, line2, city, state,
               postal_code, country, phone, email, gst_number
        FROM {table}
        WHERE owner_id = ?1 AND kind = ?2
        "#,
        table = owner.address_table(),
    );

    let details = sqlx::query_as::<_, AddressDetails>(&sql)
        .bind(owner_id)
        .bind(kind)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(details)
}

// =============================================================================
// Unit Tests
// =============================================================================
