//! # Seed Data Generator
//!
//! Populates the database with a demo tenant and issues invoices against it.
//!
//! ## Usage
//! ```bash
//! # One company, one client, a small catalog and 10 invoices (default)
//! cargo run -p invo-db --bin seed
//!
//! # Issue more invoices, concurrently
//! cargo run -p invo-db --bin seed -- --invoices 50
//!
//! # Specify database path
//! cargo run -p invo-db --bin seed -- --db ./data/invo.db
//! ```
//!
//! Invoices are issued from separate tokio tasks, so the output doubles as a
//! smoke test for number allocation: every run yields a gapless
//! `INV/FY..-../0001..N` sequence for the demo company.

use anyhow::Context;
use chrono::{Duration, Local};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use invo_core::{
    AddressDetails, AddressKind, IssueInvoiceRequest, IssuedInvoice, LineItemRequest, Money,
    TaxRate, DATE_FORMAT,
};
use invo_db::{AppConfig, Database};

const DEMO_TENANT_ID: &str = "demo-tenant";

/// Catalog: name, price in cents, tax rate in basis points.
const CATALOG: &[(&str, i64, u32)] = &[
    ("Consulting (hour)", 150_000, 1_800),
    ("Website hosting (month)", 49_900, 1_800),
    ("Domain renewal", 89_900, 1_800),
    ("Printed manual", 35_000, 500),
    ("Training workshop", 1_200_000, 1_800),
    ("Support retainer", 500_000, 0),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("loading configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut invoices: usize = 10;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--invoices" | "-n" => {
                if i + 1 < args.len() {
                    invoices = args[i + 1]
                        .parse()
                        .with_context(|| format!("invalid invoice count: {}", args[i + 1]))?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Invo Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --invoices <N>  Number of invoices to issue (default: 10)");
                println!(
                    "  -d, --db <PATH>     Database file path (default: {})",
                    config.database_path
                );
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    info!(database = %config.database_path, invoices, "Seeding database");

    let db = Database::new(config.db_config())
        .await
        .context("opening database")?;

    // Directory
    let directory = db.directory();
    let company = directory
        .create_company(DEMO_TENANT_ID, "Acme Services Pvt Ltd", Some("29ABCDE1234F1Z5"))
        .await?;
    db.addresses()
        .upsert_company_address(
            DEMO_TENANT_ID,
            &company.id,
            AddressKind::Billing,
            &AddressDetails {
                name: Some("Acme Services Pvt Ltd".to_string()),
                line1: "42 Residency Road".to_string(),
                city: Some("Bengaluru".to_string()),
                state: Some("Karnataka".to_string()),
                postal_code: Some("560025".to_string()),
                country: Some("IN".to_string()),
                gst_number: company.gst_number.clone(),
                ..Default::default()
            },
        )
        .await?;

    let client = directory
        .create_client(
            DEMO_TENANT_ID,
            &company.id,
            "Globex Retail",
            Some("accounts@globex.example"),
        )
        .await?;
    let addresses = db.addresses();
    addresses
        .upsert_client_address(
            DEMO_TENANT_ID,
            &client.id,
            AddressKind::Billing,
            &AddressDetails {
                name: Some("Globex Retail".to_string()),
                line1: "7 MG Road".to_string(),
                city: Some("Pune".to_string()),
                state: Some("Maharashtra".to_string()),
                postal_code: Some("411001".to_string()),
                country: Some("IN".to_string()),
                ..Default::default()
            },
        )
        .await?;
    addresses
        .upsert_client_address(
            DEMO_TENANT_ID,
            &client.id,
            AddressKind::Shipping,
            &AddressDetails {
                name: Some("Globex Warehouse".to_string()),
                line1: "Plot 9, MIDC".to_string(),
                city: Some("Pune".to_string()),
                postal_code: Some("411026".to_string()),
                country: Some("IN".to_string()),
                ..Default::default()
            },
        )
        .await?;

    let mut items = Vec::with_capacity(CATALOG.len());
    for (name, price_cents, tax_bps) in CATALOG {
        let item = directory
            .create_item(
                DEMO_TENANT_ID,
                &company.id,
                name,
                Money::from_cents(*price_cents),
                TaxRate::from_bps(*tax_bps),
            )
            .await?;
        items.push(item);
    }

    info!(company_id = %company.id, client_id = %client.id, items = items.len(), "Directory ready");

    // Issue invoices concurrently
    let today = Local::now().date_naive();
    let invoice_date = today.format(DATE_FORMAT).to_string();
    let due_date = (today + Duration::days(30)).format(DATE_FORMAT).to_string();

    let service = db.invoicing();
    let start = std::time::Instant::now();
    let mut handles = Vec::with_capacity(invoices);

    for n in 0..invoices {
        let lines = (0..=n % 3)
            .map(|offset| {
                let item = &items[(n + offset) % items.len()];
                LineItemRequest {
                    item_id: item.id.clone(),
                    quantity: 1 + (n as i64 % 4),
                    rate_cents: item.price_cents,
                    discount_cents: if n % 5 == 0 { 1_000 } else { 0 },
                    tax_rate_bps: item.tax_rate_bps,
                }
            })
            .collect();

        let request = IssueInvoiceRequest {
            company_id: company.id.clone(),
            client_id: client.id.clone(),
            invoice_date: invoice_date.clone(),
            due_date: due_date.clone(),
            items: lines,
            notes: Some(format!("Seed invoice #{}", n + 1)),
        };

        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.issue_invoice(DEMO_TENANT_ID, &request).await
        }));
    }

    let mut issued: Vec<IssuedInvoice> = Vec::with_capacity(invoices);
    for handle in handles {
        issued.push(handle.await.context("issuance task panicked")??);
    }
    issued.sort_by_key(|invoice| invoice.sequence_number);

    info!(count = issued.len(), elapsed = ?start.elapsed(), "Invoices issued");

    println!("{}", serde_json::to_string_pretty(&issued)?);

    db.close().await;
    Ok(())
}
