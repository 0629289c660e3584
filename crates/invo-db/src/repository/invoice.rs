//! # Invoice Repository
//!
//! Invoice headers, line items and address snapshots.
//!
//! ## Write Path vs Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WRITE (inside the issuance transaction, free functions taking tx)     │
//! │    insert_invoice ─► insert_line_item × N ─► insert_address_snapshot   │
//! │                                                                         │
//! │  READ (pool, tenant scoped)                                             │
//! │    InvoiceRepository::get / items / address_snapshots / list /         │
//! │                       document_lines                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here updates an issued invoice. Line items and snapshots are
//! additionally protected by BEFORE UPDATE triggers.

use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::DbResult;
use invo_core::{
    AddressKind, DocumentLine, Invoice, InvoiceAddress, InvoiceFilter, InvoiceLineItem,
    InvoiceSummary,
};

const INVOICE_COLUMNS: &str = r#"
    id, tenant_id, company_id, client_id, invoice_number, fiscal_year,
    sequence_number, invoice_date, due_date, subtotal_cents, tax_cents,
    total_cents, paid_cents, remaining_cents, status, notes, created_at
"#;

/// Repository for reading issued invoices.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Gets an invoice header by ID, scoped to a tenant.
    pub async fn get(&self, tenant_id: &str, id: &str) -> DbResult<Option<Invoice>> {
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1 AND tenant_id = ?2"
        );

        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Line items of an invoice in request order.
    pub async fn items(&self, invoice_id: &str) -> DbResult<Vec<InvoiceLineItem>> {
        let items = sqlx::query_as::<_, InvoiceLineItem>(
            r#"
            SELECT id, invoice_id, line_no, item_id, quantity, rate_cents,
                   discount_cents, tax_rate_bps, line_tax_cents, line_total_cents,
                   created_at
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY line_no
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// The invoice's address snapshot of `kind`.
    pub async fn address_snapshot(
        &self,
        invoice_id: &str,
        kind: AddressKind,
    ) -> DbResult<Option<InvoiceAddress>> {
        let address = sqlx::query_as::<_, InvoiceAddress>(
            r#"
            SELECT id, invoice_id, kind, name, line1, line2, city, state,
                   postal_code, country, phone, email, gst_number, created_at
            FROM invoice_addresses
            WHERE invoice_id = ?1 AND kind = ?2
            "#,
        )
        .bind(invoice_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    /// Lines joined with catalog item names, for rendering.
    pub async fn document_lines(&self, invoice_id: &str) -> DbResult<Vec<DocumentLine>> {
        let lines = sqlx::query_as::<_, DocumentLine>(
            r#"
            SELECT ii.line_no, it.name AS item_name, it.unit, ii.quantity,
                   ii.rate_cents, ii.discount_cents, ii.tax_rate_bps,
                   ii.line_tax_cents, ii.line_total_cents
            FROM invoice_items ii
            JOIN items it ON it.id = ii.item_id
            WHERE ii.invoice_id = ?1
            ORDER BY ii.line_no
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists a tenant's invoices, newest first.
    ///
    /// ## Filtering
    /// Predicates are appended only for the filter fields that are set, and
    /// every value is bound, never interpolated.
    ///
    /// ```text
    /// filter { company_id: Some(c) }  →  ... WHERE i.tenant_id = ? AND i.company_id = ?
    /// filter { client_id: Some(k) }   →  ... WHERE i.tenant_id = ? AND i.client_id = ?
    /// ```
    pub async fn list(
        &self,
        tenant_id: &str,
        filter: &InvoiceFilter,
    ) -> DbResult<Vec<InvoiceSummary>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT i.id, i.company_id, i.client_id, c.name AS client_name,
                   i.invoice_number, i.invoice_date, i.due_date,
                   i.total_cents, i.remaining_cents, i.status
            FROM invoices i
            JOIN clients c ON c.id = i.client_id
            WHERE i.tenant_id = "#,
        );
        qb.push_bind(tenant_id.to_string());

        if let Some(company_id) = &filter.company_id {
            qb.push(" AND i.company_id = ");
            qb.push_bind(company_id.clone());
        }
        if let Some(client_id) = &filter.client_id {
            qb.push(" AND i.client_id = ");
            qb.push_bind(client_id.clone());
        }

        qb.push(" ORDER BY i.invoice_date DESC, i.sequence_number DESC LIMIT ");
        qb.push_bind(filter.effective_limit());
        qb.push(" OFFSET ");
        qb.push_bind(filter.effective_offset());

        debug!(tenant_id = %tenant_id, ?filter, "Listing invoices");

        let rows = qb
            .build_query_as::<InvoiceSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Number of invoices of a company (all fiscal years).
    pub async fn count_for_company(&self, company_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE company_id = ?1")
            .bind(company_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transactional writes
// =============================================================================

/// Inserts the invoice header.
pub async fn insert_invoice(tx: &mut Transaction<'_, Sqlite>, invoice: &Invoice) -> DbResult<()> {
    debug!(id = %invoice.id, invoice_number = %invoice.invoice_number, "Inserting invoice");

    sqlx::query(
        r#"
        INSERT INTO invoices (
            id, tenant_id, company_id, client_id, invoice_number, fiscal_year,
            sequence_number, invoice_date, due_date, subtotal_cents, tax_cents,
            total_cents, paid_cents, remaining_cents, status, notes, created_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6,
            ?7, ?8, ?9, ?10, ?11,
            ?12, ?13, ?14, ?15, ?16, ?17
        )
        "#,
    )
    .bind(&invoice.id)
    .bind(&invoice.tenant_id)
    .bind(&invoice.company_id)
    .bind(&invoice.client_id)
    .bind(&invoice.invoice_number)
    .bind(&invoice.fiscal_year)
    .bind(invoice.sequence_number)
    .bind(invoice.invoice_date)
    .bind(invoice.due_date)
    .bind(invoice.subtotal_cents)
    .bind(invoice.tax_cents)
    .bind(invoice.total_cents)
    .bind(invoice.paid_cents)
    .bind(invoice.remaining_cents)
    .bind(invoice.status)
    .bind(&invoice.notes)
    .bind(invoice.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Inserts one line item.
pub async fn insert_line_item(
    tx: &mut Transaction<'_, Sqlite>,
    item: &InvoiceLineItem,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO invoice_items (
            id, invoice_id, line_no, item_id, quantity, rate_cents,
            discount_cents, tax_rate_bps, line_tax_cents, line_total_cents,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&item.id)
    .bind(&item.invoice_id)
    .bind(item.line_no)
    .bind(&item.item_id)
    .bind(item.quantity)
    .bind(item.rate_cents)
    .bind(item.discount_cents)
    .bind(item.tax_rate_bps)
    .bind(item.line_tax_cents)
    .bind(item.line_total_cents)
    .bind(item.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Inserts one address snapshot.
pub async fn insert_address_snapshot(
    tx: &mut Transaction<'_, Sqlite>,
    address: &InvoiceAddress,
) -> DbResult<()> {
    debug!(invoice_id = %address.invoice_id, kind = address.kind.as_str(), "Inserting address snapshot");

    let d = &address.details;
    sqlx::query(
        r#"
        INSERT INTO invoice_addresses (
            id, invoice_id, kind, name, line1, line2, city, state,
            postal_code, country, phone, email, gst_number, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#,
    )
    .bind(&address.id)
    .bind(&address.invoice_id)
    .bind(address.kind)
    .bind(&d.name)
    .bind(&d.line1)
    .bind(&d.line2)
    .bind(&d.city)
    .bind(&d.state)
    .bind(&d.postal_code)
    .bind(&d.country)
    .bind(&d.phone)
    .bind(&d.email)
    .bind(&d.gst_number)
    .bind(address.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
