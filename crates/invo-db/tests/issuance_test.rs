//! Issuance integration tests: numbering, atomicity and ownership.

mod common;

use std::collections::BTreeSet;

use common::{TestApp, OTHER_TENANT_ID, TEST_TENANT_ID};
use invo_core::{InvoiceStatus, LineItemRequest, ValidationError};
use invo_db::{DbError, InvoiceError};

#[tokio::test]
async fn issue_persists_header_lines_and_billing_snapshot() {
    let app = TestApp::spawn().await;
    let issued = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-04-01"))
        .await
        .expect("Failed to issue invoice");

    assert_eq!(issued.invoice_number, "INV/FY24-25/0001");

    let invoice = app
        .db
        .invoices()
        .get(TEST_TENANT_ID, &issued.invoice_id)
        .await
        .unwrap()
        .expect("Missing invoice");
    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert_eq!(invoice.subtotal_cents, 25_000);
    assert_eq!(invoice.tax_cents, 2_500);
    assert_eq!(invoice.total_cents, 27_500);
    assert_eq!(invoice.paid_cents, 0);
    assert_eq!(invoice.remaining_cents, 27_500);

    let items = app.db.invoices().items(&issued.invoice_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].line_no, 1);
    assert_eq!(items[0].line_tax_cents, 2_500);
    assert_eq!(items[0].line_total_cents, 27_500);

    let billing = app
        .db
        .invoices()
        .address_snapshot(&issued.invoice_id, invo_core::AddressKind::Billing)
        .await
        .unwrap()
        .expect("Missing billing snapshot");
    assert_eq!(billing.details.line1, "1 Main St");

    let shipping = app
        .db
        .invoices()
        .address_snapshot(&issued.invoice_id, invo_core::AddressKind::Shipping)
        .await
        .unwrap();
    assert!(shipping.is_none());
}

#[tokio::test]
async fn numbers_are_sequential_within_a_fiscal_year() {
    let app = TestApp::spawn().await;
    let service = app.db.invoicing();

    let mut numbers = Vec::new();
    for date in ["2024-04-01", "2024-09-15", "2025-03-31"] {
        let issued = service
            .issue_invoice(TEST_TENANT_ID, &app.request(date))
            .await
            .unwrap();
        numbers.push(issued.invoice_number);
    }

    assert_eq!(
        numbers,
        vec!["INV/FY24-25/0001", "INV/FY24-25/0002", "INV/FY24-25/0003"]
    );
}

#[tokio::test]
async fn fiscal_year_boundary_restarts_numbering() {
    let app = TestApp::spawn().await;
    let service = app.db.invoicing();

    let march = service
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-03-31"))
        .await
        .unwrap();
    let april = service
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-04-01"))
        .await
        .unwrap();

    assert_eq!(march.invoice_number, "INV/FY23-24/0001");
    assert_eq!(march.fiscal_year, "FY23-24");
    assert_eq!(april.invoice_number, "INV/FY24-25/0001");
    assert_eq!(april.fiscal_year, "FY24-25");
}

#[tokio::test]
async fn companies_number_independently() {
    let app = TestApp::spawn().await;
    let directory = app.db.directory();
    let other = directory
        .create_company(TEST_TENANT_ID, "Initech", None)
        .await
        .unwrap();
    let client = directory
        .create_client(TEST_TENANT_ID, &other.id, "Hooli", None)
        .await
        .unwrap();
    let item = directory
        .create_item(
            TEST_TENANT_ID,
            &other.id,
            "Audit",
            invo_core::Money::from_cents(5_000),
            invo_core::TaxRate::zero(),
        )
        .await
        .unwrap();
    app.db
        .addresses()
        .upsert_client_address(
            TEST_TENANT_ID,
            &client.id,
            invo_core::AddressKind::Billing,
            &common::address("9 Elm St", "Mumbai"),
        )
        .await
        .unwrap();

    let service = app.db.invoicing();
    service
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-05-01"))
        .await
        .unwrap();

    let mut request = app.request("2024-05-01");
    request.company_id = other.id.clone();
    request.client_id = client.id;
    request.items[0].item_id = item.id;
    let issued = service.issue_invoice(TEST_TENANT_ID, &request).await.unwrap();

    assert_eq!(issued.invoice_number, "INV/FY24-25/0001");
}

#[tokio::test]
async fn concurrent_issuance_yields_unique_gapless_numbers() {
    const TASKS: i64 = 24;

    let app = TestApp::spawn_on_disk(8).await;
    let service = app.db.invoicing();

    let mut handles = Vec::new();
    for _ in 0..TASKS {
        let service = service.clone();
        let request = app.request("2024-06-01");
        handles.push(tokio::spawn(async move {
            service.issue_invoice(TEST_TENANT_ID, &request).await
        }));
    }

    let mut sequences = BTreeSet::new();
    let mut numbers = BTreeSet::new();
    for handle in handles {
        let issued = handle.await.unwrap().expect("Concurrent issuance failed");
        sequences.insert(issued.sequence_number);
        numbers.insert(issued.invoice_number);
    }

    assert_eq!(sequences, (1..=TASKS).collect::<BTreeSet<_>>());
    assert_eq!(numbers.len(), TASKS as usize);
    assert_eq!(
        app.db
            .counters()
            .last_issued(&app.company_id, "FY24-25")
            .await
            .unwrap(),
        Some(TASKS)
    );
}

#[tokio::test]
async fn missing_billing_address_leaves_no_trace() {
    let app = TestApp::spawn_without_billing().await;

    let err = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-04-01"))
        .await
        .unwrap_err();

    assert!(matches!(err, InvoiceError::MissingRequiredData(_)));
    assert!(err.is_client_error());
    assert_eq!(
        app.db
            .counters()
            .last_issued(&app.company_id, "FY24-25")
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        app.db.invoices().count_for_company(&app.company_id).await.unwrap(),
        0
    );

    // Fix the data and the first number is still available
    app.db
        .addresses()
        .upsert_client_address(
            TEST_TENANT_ID,
            &app.client_id,
            invo_core::AddressKind::Billing,
            &common::address("1 Main St", "Pune"),
        )
        .await
        .unwrap();
    let issued = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-04-01"))
        .await
        .unwrap();
    assert_eq!(issued.invoice_number, "INV/FY24-25/0001");
}

#[tokio::test]
async fn foreign_tenant_is_not_authorized() {
    let app = TestApp::spawn().await;

    let err = app
        .db
        .invoicing()
        .issue_invoice(OTHER_TENANT_ID, &app.request("2024-04-01"))
        .await
        .unwrap_err();

    assert!(matches!(err, InvoiceError::Authorization { .. }));
    assert!(err.is_client_error());
    assert_eq!(
        app.db.invoices().count_for_company(&app.company_id).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn foreign_tenant_with_bad_dates_is_still_unauthorized() {
    let app = TestApp::spawn().await;
    let mut request = app.request("2024-04-01");
    request.due_date = "garbage".to_string();
    request.items[0].discount_cents = 1_000_000;

    let err = app
        .db
        .invoicing()
        .issue_invoice(OTHER_TENANT_ID, &request)
        .await
        .unwrap_err();

    assert!(matches!(err, InvoiceError::Authorization { .. }));
}

#[tokio::test]
async fn item_from_another_company_is_rejected() {
    let app = TestApp::spawn().await;
    let other = app
        .db
        .directory()
        .create_company(TEST_TENANT_ID, "Initech", None)
        .await
        .unwrap();
    let foreign_item = app
        .db
        .directory()
        .create_item(
            TEST_TENANT_ID,
            &other.id,
            "Audit",
            invo_core::Money::from_cents(5_000),
            invo_core::TaxRate::zero(),
        )
        .await
        .unwrap();

    let mut request = app.request("2024-04-01");
    request.items.push(LineItemRequest {
        item_id: foreign_item.id.clone(),
        quantity: 1,
        rate_cents: 5_000,
        discount_cents: 0,
        tax_rate_bps: 0,
    });

    let err = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &request)
        .await
        .unwrap_err();

    match err {
        InvoiceError::Validation(ValidationError::InvalidItem { item_id }) => {
            assert_eq!(item_id, foreign_item.id)
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_dates_are_rejected_before_any_write() {
    let app = TestApp::spawn().await;
    let mut request = app.request("2024-04-01");
    request.due_date = "2024-03-01".to_string();

    let err = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &request)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvoiceError::Validation(ValidationError::DueBeforeInvoiceDate { .. })
    ));

    request.due_date = "01/04/2024".to_string();
    let err = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &request)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvoiceError::Validation(ValidationError::InvalidFormat { .. })
    ));
}

#[tokio::test]
async fn empty_invoice_is_rejected() {
    let app = TestApp::spawn().await;
    let mut request = app.request("2024-04-01");
    request.items.clear();

    let err = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InvoiceError::Validation(ValidationError::EmptyInvoice)
    ));
}

#[tokio::test]
async fn issued_rows_cannot_be_edited() {
    let app = TestApp::spawn().await;
    let issued = app
        .db
        .invoicing()
        .issue_invoice(TEST_TENANT_ID, &app.request("2024-04-01"))
        .await
        .unwrap();

    let result = sqlx::query("UPDATE invoice_items SET quantity = 99 WHERE invoice_id = ?1")
        .bind(&issued.invoice_id)
        .execute(app.db.pool())
        .await;
    let err: DbError = result.unwrap_err().into();
    assert!(matches!(err, DbError::ConstraintViolation(_)));

    let result = sqlx::query("UPDATE invoice_addresses SET line1 = 'x' WHERE invoice_id = ?1")
        .bind(&issued.invoice_id)
        .execute(app.db.pool())
        .await;
    let err: DbError = result.unwrap_err().into();
    assert!(matches!(err, DbError::ConstraintViolation(_)));
}
