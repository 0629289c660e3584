//! Preview, read-back, listing and document assembly.

use chrono::{Local, NaiveDate};
use tracing::debug;

use super::InvoiceService;
use crate::service::error::{InvoiceError, InvoiceResult};
use invo_core::{
    AddressKind, FiscalYear, InvoiceDetails, InvoiceDocument, InvoiceFilter,
    InvoiceNumberPreview, InvoiceSummary,
};

impl InvoiceService {
    /// The number the next issuance for this company would receive today.
    ///
    /// Advisory only: nothing is reserved and a concurrent issuance may
    /// take it first.
    pub async fn preview_next_invoice_number(
        &self,
        tenant_id: &str,
        company_id: &str,
    ) -> InvoiceResult<InvoiceNumberPreview> {
        self.preview_next_invoice_number_on(tenant_id, company_id, Local::now().date_naive())
            .await
    }

    /// The number the next issuance dated `date` would receive.
    pub async fn preview_next_invoice_number_on(
        &self,
        tenant_id: &str,
        company_id: &str,
        date: NaiveDate,
    ) -> InvoiceResult<InvoiceNumberPreview> {
        self.ownership.check_company(tenant_id, company_id).await?;

        let fiscal_year = FiscalYear::for_date(date);
        let label = fiscal_year.label();
        let next_sequence = self
            .counters
            .last_issued(company_id, &label)
            .await?
            .map_or(1, |last| last + 1);

        Ok(InvoiceNumberPreview {
            invoice_number: fiscal_year.invoice_number(next_sequence),
            fiscal_year: label,
            next_sequence,
        })
    }

    /// An invoice with lines, address snapshots and overdue status as of today.
    pub async fn get_invoice(
        &self,
        tenant_id: &str,
        invoice_id: &str,
    ) -> InvoiceResult<InvoiceDetails> {
        self.get_invoice_as_of(tenant_id, invoice_id, Local::now().date_naive())
            .await
    }

    /// Same as [`InvoiceService::get_invoice`] with overdue status computed for `today`.
    pub async fn get_invoice_as_of(
        &self,
        tenant_id: &str,
        invoice_id: &str,
        today: NaiveDate,
    ) -> InvoiceResult<InvoiceDetails> {
        let invoice = self
            .invoices
            .get(tenant_id, invoice_id)
            .await?
            .ok_or_else(|| InvoiceError::NotFound(invoice_id.to_string()))?;

        let items = self.invoices.items(&invoice.id).await?;
        let billing_address = self
            .invoices
            .address_snapshot(&invoice.id, AddressKind::Billing)
            .await?;
        let shipping_address = self
            .invoices
            .address_snapshot(&invoice.id, AddressKind::Shipping)
            .await?;

        Ok(InvoiceDetails {
            days_overdue: invoice.days_overdue(today),
            is_overdue: invoice.is_overdue(today),
            invoice,
            items,
            billing_address,
            shipping_address,
        })
    }

    /// A page of the tenant's invoices, newest first.
    pub async fn list_invoices(
        &self,
        tenant_id: &str,
        filter: &InvoiceFilter,
    ) -> InvoiceResult<Vec<InvoiceSummary>> {
        Ok(self.invoices.list(tenant_id, filter).await?)
    }

    /// Assembles what a renderer needs to print the invoice.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown invoice or company
    /// - `MissingRequiredData` when the company has no billing address or
    ///   the invoice has no billing snapshot
    pub async fn invoice_document(
        &self,
        tenant_id: &str,
        invoice_id: &str,
    ) -> InvoiceResult<InvoiceDocument> {
        let invoice = self
            .invoices
            .get(tenant_id, invoice_id)
            .await?
            .ok_or_else(|| InvoiceError::NotFound(invoice_id.to_string()))?;

        let company = self
            .directory
            .get_company(tenant_id, &invoice.company_id)
            .await?
            .ok_or_else(|| InvoiceError::NotFound(invoice.company_id.clone()))?;

        let company_address = self
            .addresses
            .get_company_address(&company.id, AddressKind::Billing)
            .await?
            .ok_or_else(|| {
                InvoiceError::missing(format!("company {} has no billing address", company.id))
            })?;

        let billing = self
            .invoices
            .address_snapshot(&invoice.id, AddressKind::Billing)
            .await?
            .ok_or_else(|| {
                InvoiceError::missing(format!("invoice {} has no billing snapshot", invoice.id))
            })?;
        let shipping = self
            .invoices
            .address_snapshot(&invoice.id, AddressKind::Shipping)
            .await?;

        let fiscal_year: FiscalYear = invoice.fiscal_year.parse()?;
        let (period_start, period_end) = fiscal_year
            .starts_on()
            .zip(fiscal_year.ends_on())
            .ok_or_else(|| InvoiceError::missing(format!("period of {}", invoice.fiscal_year)))?;

        let lines = self.invoices.document_lines(&invoice.id).await?;

        debug!(invoice_id = %invoice.id, lines = lines.len(), "Assembled invoice document");

        Ok(InvoiceDocument {
            company_name: company.name,
            company_gst_number: company.gst_number,
            company_address: company_address.details,
            billing_address: billing.details,
            shipping_address: shipping.map(|s| s.details),
            invoice_number: invoice.invoice_number,
            fiscal_year: invoice.fiscal_year,
            period_start,
            period_end,
            invoice_date: invoice.invoice_date,
            due_date: invoice.due_date,
            subtotal_cents: invoice.subtotal_cents,
            tax_cents: invoice.tax_cents,
            total_cents: invoice.total_cents,
            notes: invoice.notes,
            lines,
        })
    }
}
