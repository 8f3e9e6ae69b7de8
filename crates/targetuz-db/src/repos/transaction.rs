//! Transaction (ledger) repository
//!
//! Read side of the append-only ledger. Inserts happen exclusively inside
//! settlement transactions, never through a standalone call.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use targetuz_types::{PaymentProvider, TransactionType};

use crate::{DbResult, DbTransaction};

pub struct TransactionRepo {
    pool: PgPool,
}

impl TransactionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Entries for a wallet, newest first
    pub async fn list_by_wallet(
        &self,
        wallet_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<DbTransaction>> {
        let entries = sqlx::query_as::<_, DbTransaction>(
            r#"
            SELECT id, wallet_id, user_id, order_id, amount, tx_type, status, provider, note, created_at
            FROM transactions
            WHERE wallet_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(wallet_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Entries referencing an order, oldest first (reconciliation order)
    pub async fn list_by_order(&self, order_id: Uuid) -> DbResult<Vec<DbTransaction>> {
        let entries = sqlx::query_as::<_, DbTransaction>(
            r#"
            SELECT id, wallet_id, user_id, order_id, amount, tx_type, status, provider, note, created_at
            FROM transactions
            WHERE order_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

/// Parameters for one ledger insert inside a settlement transaction
pub(crate) struct NewEntry<'a> {
    pub wallet_id: Uuid,
    pub user_id: Uuid,
    pub order_id: Option<Uuid>,
    pub amount: rust_decimal::Decimal,
    pub tx_type: TransactionType,
    pub provider: Option<PaymentProvider>,
    pub note: &'a str,
}

/// Append one ledger entry inside an open transaction
pub(crate) async fn insert_entry_tx(conn: &mut PgConnection, entry: NewEntry<'_>) -> DbResult<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO transactions (wallet_id, user_id, order_id, amount, tx_type, status, provider, note)
        VALUES ($1, $2, $3, $4, $5, 'success', $6, $7)
        RETURNING id
        "#,
    )
    .bind(entry.wallet_id)
    .bind(entry.user_id)
    .bind(entry.order_id)
    .bind(entry.amount)
    .bind(entry.tx_type.as_str())
    .bind(entry.provider.map(|p| p.as_str()))
    .bind(entry.note)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}
