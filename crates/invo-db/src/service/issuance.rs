//! The issuance transaction.

use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{InvoiceService, IssuanceStage};
use crate::repository::counter::allocate_next_number;
use crate::repository::invoice::{insert_invoice, insert_line_item};
use crate::service::error::{InvoiceError, InvoiceResult};
use crate::service::snapshot::snapshot_client_addresses;
use invo_core::calculator::{calculate_invoice, Calculation, LineInput};
use invo_core::validation::{parse_invoice_dates, validate_issue_request};
use invo_core::{
    FiscalYear, Invoice, InvoiceLineItem, InvoiceStatus, IssueInvoiceRequest, IssuedInvoice,
};

/// Everything computed before the transaction opens.
struct Prepared<'r> {
    tenant_id: &'r str,
    request: &'r IssueInvoiceRequest,
    invoice_date: NaiveDate,
    due_date: NaiveDate,
    fiscal_year: FiscalYear,
    calculation: Calculation,
}

type StageResult<T> = Result<T, (IssuanceStage, InvoiceError)>;

fn at<E: Into<InvoiceError>>(
    stage: IssuanceStage,
) -> impl FnOnce(E) -> (IssuanceStage, InvoiceError) {
    move |e| (stage, e.into())
}

impl InvoiceService {
    /// Issues an invoice atomically.
    ///
    /// ## What This Does
    /// 1. Validates the request and the ownership chain (no writes)
    /// 2. Computes line amounts and totals, parses the dates (no writes)
    /// 3. Opens a transaction and allocates the next number for
    ///    (company, fiscal year of `invoice_date`)
    /// 4. Inserts the header as `draft` with `remaining = total`, then
    ///    the line items
    /// 5. Copies the client's billing (required) and shipping addresses
    /// 6. Commits
    ///
    /// Any failure in 3–5 rolls everything back, including the counter.
    ///
    /// ## Returns
    /// The new invoice's id, number, fiscal year, sequence and totals.
    pub async fn issue_invoice(
        &self,
        tenant_id: &str,
        request: &IssueInvoiceRequest,
    ) -> InvoiceResult<IssuedInvoice> {
        debug!(
            tenant_id = %tenant_id,
            company_id = %request.company_id,
            client_id = %request.client_id,
            items = request.items.len(),
            "Issuing invoice"
        );

        let prepared = self.prepare(tenant_id, request).await.map_err(|(stage, err)| {
            debug!(stage = %stage, error = %err, "Invoice request rejected");
            err
        })?;

        let mut tx = self.pool.begin().await?;

        match self.persist(&mut tx, &prepared).await {
            Ok(issued) => {
                if let Err(err) = tx.commit().await {
                    warn!(
                        stage = %IssuanceStage::Committed,
                        company_id = %request.company_id,
                        error = %err,
                        "Invoice commit failed"
                    );
                    return Err(err.into());
                }

                info!(
                    invoice_id = %issued.invoice_id,
                    invoice_number = %issued.invoice_number,
                    company_id = %request.company_id,
                    total_cents = issued.total_cents,
                    "Invoice issued"
                );
                Ok(issued)
            }
            Err((stage, err)) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed, connection will be discarded");
                }
                warn!(
                    stage = %stage,
                    outcome = %IssuanceStage::RolledBack,
                    company_id = %request.company_id,
                    error = %err,
                    "Invoice issuance rolled back"
                );
                Err(err)
            }
        }
    }

    /// Validating and Computing. Read-only.
    ///
    /// Ownership runs before amounts and dates are looked at, so a caller
    /// without access to the company gets `Authorization` whatever else is
    /// wrong with the request.
    async fn prepare<'r>(
        &self,
        tenant_id: &'r str,
        request: &'r IssueInvoiceRequest,
    ) -> StageResult<Prepared<'r>> {
        validate_issue_request(request).map_err(at(IssuanceStage::Validating))?;

        self.ownership
            .validate(tenant_id, &request.company_id, &request.client_id, &request.items)
            .await
            .map_err(at(IssuanceStage::Validating))?;

        let lines: Vec<LineInput> = request.items.iter().map(LineInput::from).collect();
        let calculation = calculate_invoice(&lines).map_err(at(IssuanceStage::Computing))?;
        let (invoice_date, due_date) =
            parse_invoice_dates(&request.invoice_date, &request.due_date)
                .map_err(at(IssuanceStage::Computing))?;

        Ok(Prepared {
            tenant_id,
            request,
            invoice_date,
            due_date,
            fiscal_year: FiscalYear::for_date(invoice_date),
            calculation,
        })
    }

    /// Sequencing, Persisting and SnapshottingAddresses, all inside `tx`.
    async fn persist(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        prepared: &Prepared<'_>,
    ) -> StageResult<IssuedInvoice> {
        let request = prepared.request;
        let fiscal_year = prepared.fiscal_year.label();

        // Sequencing: first write of the transaction
        let sequence = allocate_next_number(tx, &request.company_id, &fiscal_year)
            .await
            .map_err(at(IssuanceStage::Sequencing))?;
        let invoice_number = prepared.fiscal_year.invoice_number(sequence);

        // Persisting
        let now = Utc::now();
        let totals = prepared.calculation.totals;
        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            tenant_id: prepared.tenant_id.to_string(),
            company_id: request.company_id.clone(),
            client_id: request.client_id.clone(),
            invoice_number,
            fiscal_year,
            sequence_number: sequence,
            invoice_date: prepared.invoice_date,
            due_date: prepared.due_date,
            subtotal_cents: totals.subtotal.cents(),
            tax_cents: totals.tax.cents(),
            total_cents: totals.total.cents(),
            paid_cents: 0,
            remaining_cents: totals.total.cents(),
            status: InvoiceStatus::Draft,
            notes: request.notes.clone(),
            created_at: now,
        };

        insert_invoice(tx, &invoice)
            .await
            .map_err(at(IssuanceStage::Persisting))?;

        for (idx, (line, amounts)) in request
            .items
            .iter()
            .zip(&prepared.calculation.lines)
            .enumerate()
        {
            let item = InvoiceLineItem {
                id: Uuid::new_v4().to_string(),
                invoice_id: invoice.id.clone(),
                line_no: idx as i64 + 1,
                item_id: line.item_id.clone(),
                quantity: line.quantity,
                rate_cents: line.rate_cents,
                discount_cents: line.discount_cents,
                tax_rate_bps: line.tax_rate_bps,
                line_tax_cents: amounts.tax.cents(),
                line_total_cents: amounts.total.cents(),
                created_at: now,
            };

            insert_line_item(tx, &item)
                .await
                .map_err(at(IssuanceStage::Persisting))?;
        }

        // SnapshottingAddresses
        let snapshots = snapshot_client_addresses(tx, &invoice.id, &request.client_id)
            .await
            .map_err(at(IssuanceStage::SnapshottingAddresses))?;
        debug!(
            invoice_id = %invoice.id,
            billing = %snapshots.billing.id,
            shipping = snapshots.shipping.is_some(),
            "Address snapshots taken"
        );

        Ok(IssuedInvoice {
            invoice_id: invoice.id,
            invoice_number: invoice.invoice_number,
            fiscal_year: invoice.fiscal_year,
            sequence_number: invoice.sequence_number,
            subtotal_cents: invoice.subtotal_cents,
            tax_cents: invoice.tax_cents,
            total_cents: invoice.total_cents,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
