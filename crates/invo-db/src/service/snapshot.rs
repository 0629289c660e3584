//! # Address Snapshot Resolver
//!
//! Copies the client's live addresses onto the invoice inside the issuance
//! transaction. Billing is mandatory, shipping is copied when present.

use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use crate::repository::address::{fetch_address_in_tx, AddressOwner};
use crate::repository::invoice::insert_address_snapshot;
use crate::service::error::{InvoiceError, InvoiceResult};
use invo_core::{AddressKind, InvoiceAddress};

/// Snapshots taken for one invoice.
#[derive(Debug, Clone)]
pub struct AddressSnapshots {
    pub billing: InvoiceAddress,
    pub shipping: Option<InvoiceAddress>,
}

/// Reads the client's addresses and writes invoice-scoped copies.
///
/// ## Errors
/// `MissingRequiredData` when the client has no billing address. The caller
/// rolls the whole transaction back, counter increment included.
pub async fn snapshot_client_addresses(
    tx: &mut Transaction<'_, Sqlite>,
    invoice_id: &str,
    client_id: &str,
) -> InvoiceResult<AddressSnapshots> {
    let billing = fetch_address_in_tx(tx, AddressOwner::Client, client_id, AddressKind::Billing)
        .await?
        .ok_or_else(|| {
            InvoiceError::missing(format!("client {client_id} has no billing address"))
        })?;

    let billing = copy(tx, invoice_id, AddressKind::Billing, billing).await?;

    let shipping =
        match fetch_address_in_tx(tx, AddressOwner::Client, client_id, AddressKind::Shipping)
            .await?
        {
            Some(details) => Some(copy(tx, invoice_id, AddressKind::Shipping, details).await?),
            None => None,
        };

    Ok(AddressSnapshots { billing, shipping })
}

async fn copy(
    tx: &mut Transaction<'_, Sqlite>,
    invoice_id: &str,
    kind: AddressKind,
    details: invo_core::AddressDetails,
) -> InvoiceResult<InvoiceAddress> {
    let snapshot = InvoiceAddress {
        id: Uuid::new_v4().to_string(),
        invoice_id: invoice_id.to_string(),
        kind,
        details,
        created_at: Utc::now(),
    };

    insert_address_snapshot(tx, &snapshot).await?;
    Ok(snapshot)
}
