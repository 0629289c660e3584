//! Preview, read-back, listing and document integration tests.

mod common;

use chrono::NaiveDate;
use common::{address, TestApp, OTHER_TENANT_ID, TEST_TENANT_ID};
use invo_core::{AddressKind, InvoiceFilter};
use invo_db::InvoiceError;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn preview_tracks_counter_without_reserving() {
    let app = TestApp::spawn().await;
    let service = app.db.invoicing();

    let preview = service
        .preview_next_invoice_number_on(TEST_TENANT_ID, &app.company_id, date("2024-07-10"))
        .await
        .unwrap();
    assert_eq!(preview.fiscal_year, "FY24-25");
    assert_eq!(preview.next_sequence, 1);
    assert_eq!(preview.invoice_number, "INV/FY24-25/0001");

    // Previewing twice does not advance anything
    let again = service
        .preview_next_invoice_number_on(TEST_TENANT_ID, &app.company_id, date("2024-07-10"))
        .await
        .unwrap();
    assert_eq!(again.next_sequence, 1);

    let issued = service
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-07-10"))
        .await
        .unwrap();
    assert_eq!(issued.invoice_number, preview.invoice_number);

    let preview = service
        .preview_next_invoice_number_on(TEST_TENANT_ID, &app.company_id, date("2024-07-11"))
        .await
        .unwrap();
    assert_eq!(preview.invoice_number, "INV/FY24-25/0002");

    // A different fiscal year starts from one
    let preview = service
        .preview_next_invoice_number_on(TEST_TENANT_ID, &app.company_id, date("2025-04-01"))
        .await
        .unwrap();
    assert_eq!(preview.invoice_number, "INV/FY25-26/0001");
}

#[tokio::test]
async fn preview_requires_company_ownership() {
    let app = TestApp::spawn().await;

    let err = app
        .db
        .invoicing()
        .preview_next_invoice_number(OTHER_TENANT_ID, &app.company_id)
        .await
        .unwrap_err();

    assert!(matches!(err, InvoiceError::Authorization { .. }));
}

#[tokio::test]
async fn get_invoice_reports_overdue_days() {
    let app = TestApp::spawn().await;
    let service = app.db.invoicing();
    let mut request = app.request("2024-04-01");
    request.due_date = "2024-04-30".to_string();
    let issued = service.issue_invoice(TEST_TENANT_ID, &request).await.unwrap();

    let on_time = service
        .get_invoice_as_of(TEST_TENANT_ID, &issued.invoice_id, date("2024-04-30"))
        .await
        .unwrap();
    assert_eq!(on_time.days_overdue, 0);
    assert!(!on_time.is_overdue);

    let late = service
        .get_invoice_as_of(TEST_TENANT_ID, &issued.invoice_id, date("2024-05-10"))
        .await
        .unwrap();
    assert_eq!(late.days_overdue, 10);
    assert!(late.is_overdue);
    assert_eq!(late.items.len(), 1);
    assert!(late.billing_address.is_some());
    assert!(late.shipping_address.is_none());
    assert_eq!(late.invoice.invoice_number, issued.invoice_number);
}

#[tokio::test]
async fn get_invoice_is_tenant_scoped() {
    let app = TestApp::spawn().await;
    let issued = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-04-01"))
        .await
        .unwrap();

    let err = app
        .db
        .invoicing()
        .get_invoice(OTHER_TENANT_ID, &issued.invoice_id)
        .await
        .unwrap_err();
    assert!(matches!(err, InvoiceError::NotFound(_)));

    let err = app
        .db
        .invoicing()
        .get_invoice(TEST_TENANT_ID, "no-such-invoice")
        .await
        .unwrap_err();
    assert!(matches!(err, InvoiceError::NotFound(_)));
}

#[tokio::test]
async fn snapshot_survives_live_address_changes() {
    let app = TestApp::spawn().await;
    let addresses = app.db.addresses();
    addresses
        .upsert_client_address(
            TEST_TENANT_ID,
            &app.client_id,
            AddressKind::Shipping,
            &address("Dock 4", "Nashik"),
        )
        .await
        .unwrap();

    let issued = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-04-01"))
        .await
        .unwrap();

    addresses
        .upsert_client_address(
            TEST_TENANT_ID,
            &app.client_id,
            AddressKind::Billing,
            &address("99 New Road", "Chennai"),
        )
        .await
        .unwrap();

    let details = app
        .db
        .invoicing()
        .get_invoice(TEST_TENANT_ID, &issued.invoice_id)
        .await
        .unwrap();
    let billing = details.billing_address.expect("Missing billing snapshot");
    assert_eq!(billing.details.line1, "1 Main St");
    assert_eq!(billing.details.city.as_deref(), Some("Pune"));
    let shipping = details.shipping_address.expect("Missing shipping snapshot");
    assert_eq!(shipping.details.line1, "Dock 4");

    let live = addresses
        .get_client_address(&app.client_id, AddressKind::Billing)
        .await
        .unwrap()
        .expect("Missing live address");
    assert_eq!(live.details.line1, "99 New Road");
}

#[tokio::test]
async fn list_filters_and_paginates_newest_first() {
    let app = TestApp::spawn().await;
    let service = app.db.invoicing();

    for day in ["2024-04-01", "2024-04-02", "2024-04-03", "2024-04-04", "2024-04-05"] {
        service
            .issue_invoice(TEST_TENANT_ID, &app.request(day))
            .await
            .unwrap();
    }

    let all = service
        .list_invoices(TEST_TENANT_ID, &InvoiceFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].invoice_number, "INV/FY24-25/0005");
    assert_eq!(all[4].invoice_number, "INV/FY24-25/0001");
    assert_eq!(all[0].client_name, "Globex");

    let page = service
        .list_invoices(
            TEST_TENANT_ID,
            &InvoiceFilter {
                company_id: Some(app.company_id.clone()),
                limit: 2,
                offset: 2,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let numbers: Vec<_> = page.iter().map(|s| s.invoice_number.as_str()).collect();
    assert_eq!(numbers, vec!["INV/FY24-25/0003", "INV/FY24-25/0002"]);

    let by_other_client = service
        .list_invoices(
            TEST_TENANT_ID,
            &InvoiceFilter {
                client_id: Some("someone-else".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(by_other_client.is_empty());

    let foreign = service
        .list_invoices(OTHER_TENANT_ID, &InvoiceFilter::default())
        .await
        .unwrap();
    assert!(foreign.is_empty());
}

#[tokio::test]
async fn document_requires_company_billing_address() {
    let app = TestApp::spawn().await;
    let issued = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-04-01"))
        .await
        .unwrap();

    let err = app
        .db
        .invoicing()
        .invoice_document(TEST_TENANT_ID, &issued.invoice_id)
        .await
        .unwrap_err();
    assert!(matches!(err, InvoiceError::MissingRequiredData(_)));

    app.set_company_billing().await;

    let document = app
        .db
        .invoicing()
        .invoice_document(TEST_TENANT_ID, &issued.invoice_id)
        .await
        .unwrap();

    assert_eq!(document.company_name, "Acme Services");
    assert_eq!(document.company_gst_number.as_deref(), Some("29ABCDE1234F1Z5"));
    assert_eq!(document.company_address.line1, "42 Residency Road");
    assert_eq!(document.billing_address.line1, "1 Main St");
    assert!(document.shipping_address.is_none());
    assert_eq!(document.invoice_number, "INV/FY24-25/0001");
    assert_eq!(document.period_start, date("2024-04-01"));
    assert_eq!(document.period_end, date("2025-03-31"));
    assert_eq!(document.total_cents, 27_500);

    assert_eq!(document.lines.len(), 1);
    let line = &document.lines[0];
    assert_eq!(line.line_no, 1);
    assert_eq!(line.item_name, "Consulting");
    assert_eq!(line.quantity, 3);
    assert_eq!(line.line_total_cents, 27_500);
}
