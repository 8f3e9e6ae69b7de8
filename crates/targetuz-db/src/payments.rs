//! Durable settlement operations
//!
//! Each operation is a single PostgreSQL transaction. The order row is
//! locked first (`SELECT ... FOR UPDATE`), then the wallet rows it touches,
//! so concurrent operations on the same order serialize at the database and
//! a failure anywhere rolls the whole unit back.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use targetuz_settlement::{
    check_funding_request, CompletionOutcome, PlatformAccountResolver, ReleaseAttempt,
    ReleaseOutcome, SettlementEngine, TopUpReceipt,
};
use targetuz_types::{
    round_money, Actor, CommissionSplit, Order, OrderStatus, PaymentProvider, PaymentStatus,
    Result, TargetUzError, TransactionType,
};

use crate::models::DbOrder;
use crate::repos::order::lock_order_tx;
use crate::repos::transaction::{insert_entry_tx, NewEntry};
use crate::repos::user::resolve_platform_account_tx;
use crate::repos::wallet::{apply_balance_delta_tx, ensure_wallet_tx, lock_wallet_tx};

fn storage_err(e: sqlx::Error) -> TargetUzError {
    TargetUzError::storage(e.to_string())
}

/// Settlement engine backed by PostgreSQL
pub struct PaymentsRepo {
    pool: PgPool,
}

impl PaymentsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlatformAccountResolver for PaymentsRepo {
    async fn resolve_platform_account(&self) -> Result<Uuid> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        let id = resolve_platform_account_tx(&mut *tx).await?;
        tx.commit().await.map_err(storage_err)?;
        Ok(id)
    }
}

#[async_trait]
impl SettlementEngine for PaymentsRepo {
    async fn top_up(
        &self,
        user_id: Uuid,
        amount: Decimal,
        provider: PaymentProvider,
    ) -> Result<TopUpReceipt> {
        check_funding_request(amount, provider)?;
        let amount = round_money(amount);

        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        ensure_wallet_tx(&mut *tx, user_id).await?;
        let wallet = lock_wallet_tx(&mut *tx, user_id).await?;
        let balance = apply_balance_delta_tx(&mut *tx, wallet.id, amount).await?;
        insert_entry_tx(
            &mut *tx,
            NewEntry {
                wallet_id: wallet.id,
                user_id,
                order_id: None,
                amount,
                tx_type: TransactionType::TopUp,
                provider: Some(provider),
                note: "wallet top-up",
            },
        )
        .await?;

        tx.commit().await.map_err(storage_err)?;

        info!(user_id = %user_id, amount = %amount, provider = %provider, "Wallet topped up");
        Ok(TopUpReceipt {
            user_id,
            wallet_id: wallet.id,
            balance,
        })
    }

    async fn hold_escrow(
        &self,
        order_id: Uuid,
        client_id: Uuid,
        amount: Decimal,
        provider: PaymentProvider,
    ) -> Result<Order> {
        check_funding_request(amount, provider)?;
        let amount = round_money(amount);

        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let order = lock_order_tx(&mut *tx, order_id)
            .await?
            .ok_or_else(|| TargetUzError::order_not_found(order_id))?
            .into_domain()?;

        if order.client_id != client_id {
            return Err(TargetUzError::unauthorized(format!(
                "user {client_id} may not pay for order {order_id}"
            )));
        }
        if order.payment_status == PaymentStatus::Escrowed {
            return Err(TargetUzError::AlreadyEscrowed {
                order_id: order_id.to_string(),
            });
        }

        ensure_wallet_tx(&mut *tx, client_id).await?;
        let wallet = lock_wallet_tx(&mut *tx, client_id).await?;
        if wallet.balance < amount {
            return Err(TargetUzError::InsufficientFunds {
                user_id: client_id.to_string(),
                requested: amount.to_string(),
                available: wallet.balance.to_string(),
            });
        }

        apply_balance_delta_tx(&mut *tx, wallet.id, -amount).await?;
        insert_entry_tx(
            &mut *tx,
            NewEntry {
                wallet_id: wallet.id,
                user_id: client_id,
                order_id: Some(order_id),
                amount,
                tx_type: TransactionType::EscrowHold,
                provider: Some(provider),
                note: "held in escrow for the order",
            },
        )
        .await?;

        let updated = sqlx::query_as::<_, DbOrder>(
            r#"
            UPDATE orders
            SET payment_status = 'escrowed', payment_provider = $2, escrow_amount = $3
            WHERE id = $1
            RETURNING id, client_id, specialist_id, title, description, budget, commission_rate,
                      status, payment_status, escrow_amount, payment_provider, completed_at, created_at
            "#,
        )
        .bind(order_id)
        .bind(provider.as_str())
        .bind(amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;

        info!(
            order_id = %order_id,
            client_id = %client_id,
            amount = %amount,
            provider = %provider,
            "Escrow held"
        );
        Ok(updated.into_domain()?)
    }

    async fn release_escrow(&self, order_id: Uuid) -> Result<ReleaseOutcome> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let order = lock_order_tx(&mut *tx, order_id)
            .await?
            .ok_or_else(|| TargetUzError::order_not_found(order_id))?
            .into_domain()?;

        if order.payment_status != PaymentStatus::Escrowed {
            return Err(TargetUzError::NothingToRelease {
                order_id: order_id.to_string(),
            });
        }
        if order.escrow_amount <= Decimal::ZERO {
            return Err(TargetUzError::InvalidEscrowAmount {
                order_id: order_id.to_string(),
            });
        }

        let split = CommissionSplit::compute(order.escrow_amount, order.commission_rate);

        ensure_wallet_tx(&mut *tx, order.specialist_id).await?;
        let specialist_wallet = lock_wallet_tx(&mut *tx, order.specialist_id).await?;
        apply_balance_delta_tx(&mut *tx, specialist_wallet.id, split.specialist_income).await?;
        insert_entry_tx(
            &mut *tx,
            NewEntry {
                wallet_id: specialist_wallet.id,
                user_id: order.specialist_id,
                order_id: Some(order_id),
                amount: split.specialist_income,
                tx_type: TransactionType::EscrowRelease,
                provider: order.payment_provider,
                note: "released to specialist on completion",
            },
        )
        .await?;

        // a sub-tiyin escrow rounds to a zero commission; skip the platform
        // leg rather than record a zero-amount entry
        if split.commission > Decimal::ZERO {
            let platform_id = resolve_platform_account_tx(&mut *tx).await?;
            ensure_wallet_tx(&mut *tx, platform_id).await?;
            let platform_wallet = lock_wallet_tx(&mut *tx, platform_id).await?;
            apply_balance_delta_tx(&mut *tx, platform_wallet.id, split.commission).await?;
            insert_entry_tx(
                &mut *tx,
                NewEntry {
                    wallet_id: platform_wallet.id,
                    user_id: platform_id,
                    order_id: Some(order_id),
                    amount: split.commission,
                    tx_type: TransactionType::Commission,
                    provider: order.payment_provider,
                    note: &format!("{}% platform commission", split.rate),
                },
            )
            .await?;
        }

        let updated = sqlx::query_as::<_, DbOrder>(
            r#"
            UPDATE orders
            SET payment_status = 'released', escrow_amount = 0
            WHERE id = $1
            RETURNING id, client_id, specialist_id, title, description, budget, commission_rate,
                      status, payment_status, escrow_amount, payment_provider, completed_at, created_at
            "#,
        )
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;

        info!(
            order_id = %order_id,
            specialist_id = %order.specialist_id,
            specialist_income = %split.specialist_income,
            commission = %split.commission,
            rate = %split.rate,
            "Escrow released"
        );
        Ok(ReleaseOutcome {
            order: updated.into_domain()?,
            commission: split.commission,
            specialist_income: split.specialist_income,
        })
    }

    async fn transition_order(
        &self,
        order_id: Uuid,
        actor: Actor,
        target: OrderStatus,
    ) -> Result<Order> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let order = lock_order_tx(&mut *tx, order_id)
            .await?
            .ok_or_else(|| TargetUzError::order_not_found(order_id))?
            .into_domain()?;

        order.guard_transition(actor, target)?;

        let updated = if target == OrderStatus::Completed {
            sqlx::query_as::<_, DbOrder>(
                r#"
                UPDATE orders
                SET status = $2, completed_at = NOW()
                WHERE id = $1
                RETURNING id, client_id, specialist_id, title, description, budget, commission_rate,
                          status, payment_status, escrow_amount, payment_provider, completed_at, created_at
                "#,
            )
        } else {
            sqlx::query_as::<_, DbOrder>(
                r#"
                UPDATE orders
                SET status = $2
                WHERE id = $1
                RETURNING id, client_id, specialist_id, title, description, budget, commission_rate,
                          status, payment_status, escrow_amount, payment_provider, completed_at, created_at
                "#,
            )
        }
        .bind(order_id)
        .bind(target.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;

        info!(
            order_id = %order_id,
            actor_id = %actor.id,
            status = target.as_str(),
            "Order transitioned"
        );
        Ok(updated.into_domain()?)
    }

    async fn complete_order(&self, order_id: Uuid, actor: Actor) -> Result<CompletionOutcome> {
        let order = self
            .transition_order(order_id, actor, OrderStatus::Completed)
            .await?;

        if order.payment_status != PaymentStatus::Escrowed {
            return Ok(CompletionOutcome {
                order,
                settlement: ReleaseAttempt::NoFundsHeld,
            });
        }

        match self.release_escrow(order_id).await {
            Ok(outcome) => Ok(CompletionOutcome {
                order: outcome.order.clone(),
                settlement: ReleaseAttempt::Settled(outcome),
            }),
            Err(error) => {
                // completion stays committed; the caller retries the release
                info!(order_id = %order_id, error = %error, "Release deferred after completion");
                Ok(CompletionOutcome {
                    order,
                    settlement: ReleaseAttempt::Deferred { error },
                })
            }
        }
    }
}
