//! # Invoice Number Counter
//!
//! One row per (company, fiscal year) holding the last number handed out.
//!
//! ## Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    INSERT ... VALUES (company, fy, 1)                                  │
//! │    ON CONFLICT DO UPDATE SET next_number = next_number + 1             │
//! │    RETURNING next_number            ← first write, takes the lock      │
//! │    ... header, lines, snapshots ...                                    │
//! │  COMMIT   → number is final                                            │
//! │  ROLLBACK → increment undone, the number is handed out again           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A single statement reads and increments, there is no read-then-write
//! window. Concurrent issuances for the same company queue on the SQLite
//! write lock, so numbers stay unique and gapless.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::DbResult;

/// Read-side access to invoice number counters.
#[derive(Debug, Clone)]
pub struct CounterRepository {
    pool: SqlitePool,
}

impl CounterRepository {
    /// Creates a new CounterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CounterRepository { pool }
    }

    /// Last number handed out for (company, fiscal year), if any.
    pub async fn last_issued(&self, company_id: &str, fiscal_year: &str) -> DbResult<Option<i64>> {
        let last: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT next_number
            FROM invoice_counters
            WHERE company_id = ?1 AND fiscal_year = ?2
            "#,
        )
        .bind(company_id)
        .bind(fiscal_year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(last)
    }
}

/// Allocates the next invoice number inside the issuance transaction.
///
/// Returns 1 for the first invoice of a (company, fiscal year).
pub async fn allocate_next_number(
    tx: &mut Transaction<'_, Sqlite>,
    company_id: &str,
    fiscal_year: &str,
) -> DbResult<i64> {
    let next: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO invoice_counters (company_id, fiscal_year, next_number, updated_at)
        VALUES (?1, ?2, 1, ?3)
        ON CONFLICT (company_id, fiscal_year) DO UPDATE SET
            next_number = invoice_counters.next_number + 1,
            updated_at = excluded.updated_at
        RETURNING next_number
        "#,
    )
    .bind(company_id)
    .bind(fiscal_year)
    .bind(Utc::now())
    .fetch_one(&mut **tx)
    .await?;

    debug!(company_id = %company_id, fiscal_year = %fiscal_year, next, "Allocated invoice number");
    Ok(next)
}

// =============================================================================
// Unit Tests
// =============================================================================
