//! # Ownership Validator
//!
//! Read-only checks run before the issuance transaction opens.
//!
//! ```text
//!   company owned by tenant?          no → Authorization
//!        │ yes
//!   client in company (and tenant)?   no → Validation(InvalidClient)
//!        │ yes
//!   item 1 in company?                no → Validation(InvalidItem{1})   stop
//!   item 2 in company?                no → Validation(InvalidItem{2})   stop
//!   ...
//! ```
//!
//! The first failure wins, remaining items are not checked. Read failures
//! surface as `InvoiceError::Transaction`.

use tracing::debug;

use crate::repository::directory::DirectoryRepository;
use crate::service::error::{InvoiceError, InvoiceResult};
use invo_core::{LineItemRequest, ValidationError};

/// Checks the tenant → company → client/item chain.
#[derive(Debug, Clone)]
pub struct OwnershipValidator {
    directory: DirectoryRepository,
}

impl OwnershipValidator {
    pub fn new(directory: DirectoryRepository) -> Self {
        OwnershipValidator { directory }
    }

    /// Authorization check only.
    pub async fn check_company(&self, tenant_id: &str, company_id: &str) -> InvoiceResult<()> {
        if !self.directory.company_owned_by(tenant_id, company_id).await? {
            debug!(tenant_id = %tenant_id, company_id = %company_id, "Company not owned by tenant");
            return Err(InvoiceError::Authorization {
                company_id: company_id.to_string(),
            });
        }
        Ok(())
    }

    /// Full chain for an issuance request.
    pub async fn validate(
        &self,
        tenant_id: &str,
        company_id: &str,
        client_id: &str,
        items: &[LineItemRequest],
    ) -> InvoiceResult<()> {
        self.check_company(tenant_id, company_id).await?;

        if !self
            .directory
            .client_in_company(tenant_id, company_id, client_id)
            .await?
        {
            return Err(ValidationError::InvalidClient {
                client_id: client_id.to_string(),
            }
            .into());
        }

        for item in items {
            let item_id = item.item_id.as_str();
            if !self
                .directory
                .item_in_company(tenant_id, company_id, item_id)
                .await?
            {
                return Err(ValidationError::InvalidItem {
                    item_id: item_id.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}
