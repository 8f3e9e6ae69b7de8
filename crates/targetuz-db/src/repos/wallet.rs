//! Wallet repository
//!
//! Balances change only inside a transaction that also appends the matching
//! ledger entry; the helpers here take an open connection so the settlement
//! operations compose them into one atomic unit.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{DbResult, DbWallet};

pub struct WalletRepo {
    pool: PgPool,
}

impl WalletRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the wallet for a user, creating a zero-balance one if absent
    pub async fn ensure(&self, user_id: Uuid) -> DbResult<DbWallet> {
        let mut tx = self.pool.begin().await?;
        let wallet = ensure_wallet_tx(&mut *tx, user_id).await?;
        tx.commit().await?;
        Ok(wallet)
    }

    /// Find a wallet by owning user
    pub async fn find_by_user(&self, user_id: Uuid) -> DbResult<Option<DbWallet>> {
        let wallet = sqlx::query_as::<_, DbWallet>(
            "SELECT id, user_id, balance, created_at, updated_at FROM wallets WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(wallet)
    }

    /// Current balance for a user, zero if no wallet exists yet
    pub async fn balance(&self, user_id: Uuid) -> DbResult<Decimal> {
        Ok(self
            .find_by_user(user_id)
            .await?
            .map(|w| w.balance)
            .unwrap_or(Decimal::ZERO))
    }
}

/// Upsert-fetch a wallet inside an open transaction
///
/// The no-op conflict update makes Postgres return the existing row, so two
/// racing calls converge on the same wallet instead of erroring.
pub(crate) async fn ensure_wallet_tx(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> DbResult<DbWallet> {
    let wallet = sqlx::query_as::<_, DbWallet>(
        r#"
        INSERT INTO wallets (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING id, user_id, balance, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(wallet)
}

/// Re-read a wallet row with a row-level lock inside an open transaction
pub(crate) async fn lock_wallet_tx(conn: &mut PgConnection, user_id: Uuid) -> DbResult<DbWallet> {
    let wallet = sqlx::query_as::<_, DbWallet>(
        r#"
        SELECT id, user_id, balance, created_at, updated_at
        FROM wallets
        WHERE user_id = $1
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(wallet)
}

/// Apply a signed balance delta inside an open transaction
///
/// The caller has already checked the balance under the row lock; the
/// `balance >= 0` constraint is the final backstop.
pub(crate) async fn apply_balance_delta_tx(
    conn: &mut PgConnection,
    wallet_id: Uuid,
    delta: Decimal,
) -> DbResult<Decimal> {
    let (balance,): (Decimal,) = sqlx::query_as(
        r#"
        UPDATE wallets
        SET balance = balance + $2, updated_at = NOW()
        WHERE id = $1
        RETURNING balance
        "#,
    )
    .bind(wallet_id)
    .bind(delta)
    .fetch_one(&mut *conn)
    .await?;

    Ok(balance)
}
