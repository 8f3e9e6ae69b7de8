//! In-memory settlement engine
//!
//! Backs the engine contract with [`WalletLedger`] and an order map. A
//! single operation gate serializes settlement calls, so each one is an
//! atomic, isolated unit of work and operations on the same order are
//! linearizable.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use targetuz_ledger::{EntryContext, WalletLedger};
use targetuz_types::{
    round_money, Actor, CommissionSplit, NewOrder, Order, OrderStatus, PaymentProvider,
    PaymentStatus, Result, TargetUzError, TransactionType, COMMISSION_RATE_DEFAULT,
};

use crate::{
    check_funding_request, CompletionOutcome, PlatformAccountResolver, ReleaseAttempt,
    ReleaseOutcome, SettlementEngine, TopUpReceipt,
};

/// In-memory platform account registry
///
/// Provisions the commission-receiving account on first use and hands the
/// same account back forever after.
#[derive(Clone, Default)]
pub struct InMemoryPlatformAccounts {
    account: Arc<Mutex<Option<Uuid>>>,
}

impl InMemoryPlatformAccounts {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlatformAccountResolver for InMemoryPlatformAccounts {
    async fn resolve_platform_account(&self) -> Result<Uuid> {
        let mut account = self.account.lock().await;
        if let Some(id) = *account {
            return Ok(id);
        }
        let id = Uuid::new_v4();
        *account = Some(id);
        info!(platform_account = %id, "Provisioned platform commission account");
        Ok(id)
    }
}

/// Settlement engine over the in-memory ledger
#[derive(Clone)]
pub struct InMemorySettlement {
    ledger: WalletLedger,
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    platform: Arc<dyn PlatformAccountResolver>,
    /// Serializes settlement operations into atomic units
    gate: Arc<Mutex<()>>,
}

impl InMemorySettlement {
    pub fn new(platform: Arc<dyn PlatformAccountResolver>) -> Self {
        Self {
            ledger: WalletLedger::new(),
            orders: Arc::new(RwLock::new(HashMap::new())),
            platform,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// The ledger backing this engine, for balance and history queries
    pub fn ledger(&self) -> &WalletLedger {
        &self.ledger
    }

    /// Register a new engagement between a client and a specialist
    pub async fn create_order(&self, new_order: NewOrder) -> Result<Order> {
        new_order.validate()?;
        let order = Order {
            id: Uuid::new_v4(),
            client_id: new_order.client_id,
            specialist_id: new_order.specialist_id,
            title: new_order.title,
            description: new_order.description,
            budget: new_order.budget,
            commission_rate: COMMISSION_RATE_DEFAULT,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            escrow_amount: Decimal::ZERO,
            payment_provider: None,
            completed_at: None,
            created_at: Utc::now(),
        };
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order)
    }

    /// Fetch an order by id
    pub async fn get_order(&self, order_id: Uuid) -> Result<Order> {
        self.orders
            .read()
            .await
            .get(&order_id)
            .cloned()
            .ok_or_else(|| TargetUzError::order_not_found(order_id))
    }

    async fn store_order(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }

    /// Hold logic; the caller holds the operation gate
    async fn hold_escrow_inner(
        &self,
        order_id: Uuid,
        client_id: Uuid,
        amount: Decimal,
        provider: PaymentProvider,
    ) -> Result<Order> {
        let mut order = self.get_order(order_id).await?;

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

        self.ledger.ensure_wallet(client_id).await;
        self.ledger
            .debit(
                client_id,
                amount,
                TransactionType::EscrowHold,
                EntryContext::for_order(order_id, "held in escrow for the order")
                    .with_provider(Some(provider)),
            )
            .await?;

        order.payment_status = PaymentStatus::Escrowed;
        order.payment_provider = Some(provider);
        order.escrow_amount = round_money(amount);
        self.store_order(order.clone()).await;

        info!(
            order_id = %order_id,
            client_id = %client_id,
            amount = %order.escrow_amount,
            provider = %provider,
            "Escrow held"
        );
        Ok(order)
    }

    /// Release logic; the caller holds the operation gate
    async fn release_escrow_inner(&self, order_id: Uuid) -> Result<ReleaseOutcome> {
        let mut order = self.get_order(order_id).await?;

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

        self.ledger.ensure_wallet(order.specialist_id).await;
        self.ledger
            .credit(
                order.specialist_id,
                split.specialist_income,
                TransactionType::EscrowRelease,
                EntryContext::for_order(order_id, "released to specialist on completion")
                    .with_provider(order.payment_provider),
            )
            .await?;

        // a sub-tiyin escrow rounds to a zero commission; skip the platform
        // leg rather than record a zero-amount entry
        if split.commission > Decimal::ZERO {
            let platform_id = self.platform.resolve_platform_account().await?;
            self.ledger.ensure_wallet(platform_id).await;
            self.ledger
                .credit(
                    platform_id,
                    split.commission,
                    TransactionType::Commission,
                    EntryContext::for_order(
                        order_id,
                        format!("{}% platform commission", split.rate),
                    )
                    .with_provider(order.payment_provider),
                )
                .await?;
        }

        order.payment_status = PaymentStatus::Released;
        order.escrow_amount = Decimal::ZERO;
        self.store_order(order.clone()).await;

        info!(
            order_id = %order_id,
            specialist_id = %order.specialist_id,
            specialist_income = %split.specialist_income,
            commission = %split.commission,
            rate = %split.rate,
            "Escrow released"
        );
        Ok(ReleaseOutcome {
            order,
            commission: split.commission,
            specialist_income: split.specialist_income,
        })
    }

    /// Transition logic; the caller holds the operation gate
    async fn transition_inner(
        &self,
        order_id: Uuid,
        actor: Actor,
        target: OrderStatus,
    ) -> Result<Order> {
        let mut order = self.get_order(order_id).await?;
        order.guard_transition(actor, target)?;

        order.status = target;
        if target == OrderStatus::Completed {
            order.completed_at = Some(Utc::now());
        }
        self.store_order(order.clone()).await;

        info!(
            order_id = %order_id,
            actor_id = %actor.id,
            status = target.as_str(),
            "Order transitioned"
        );
        Ok(order)
    }
}

#[async_trait]
impl SettlementEngine for InMemorySettlement {
    async fn top_up(
        &self,
        user_id: Uuid,
        amount: Decimal,
        provider: PaymentProvider,
    ) -> Result<TopUpReceipt> {
        check_funding_request(amount, provider)?;
        let _gate = self.gate.lock().await;

        let wallet = self.ledger.ensure_wallet(user_id).await;
        let (balance, _) = self
            .ledger
            .credit(
                user_id,
                amount,
                TransactionType::TopUp,
                EntryContext::new("wallet top-up").with_provider(Some(provider)),
            )
            .await?;

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
        let _gate = self.gate.lock().await;
        self.hold_escrow_inner(order_id, client_id, amount, provider)
            .await
    }

    async fn release_escrow(&self, order_id: Uuid) -> Result<ReleaseOutcome> {
        let _gate = self.gate.lock().await;
        self.release_escrow_inner(order_id).await
    }

    async fn transition_order(
        &self,
        order_id: Uuid,
        actor: Actor,
        target: OrderStatus,
    ) -> Result<Order> {
        let _gate = self.gate.lock().await;
        self.transition_inner(order_id, actor, target).await
    }

    async fn complete_order(&self, order_id: Uuid, actor: Actor) -> Result<CompletionOutcome> {
        let _gate = self.gate.lock().await;

        let order = self
            .transition_inner(order_id, actor, OrderStatus::Completed)
            .await?;

        if order.payment_status != PaymentStatus::Escrowed {
            return Ok(CompletionOutcome {
                order,
                settlement: ReleaseAttempt::NoFundsHeld,
            });
        }

        match self.release_escrow_inner(order_id).await {
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use targetuz_types::Role;

    fn engine() -> InMemorySettlement {
        InMemorySettlement::new(Arc::new(InMemoryPlatformAccounts::new()))
    }

    fn new_order(client_id: Uuid, specialist_id: Uuid, budget: Decimal) -> NewOrder {
        NewOrder {
            client_id,
            specialist_id,
            title: "Instagram lead campaign".to_string(),
            description: "Full-funnel targeting setup with weekly performance reports".to_string(),
            budget,
        }
    }

    async fn funded_order(
        engine: &InMemorySettlement,
        budget: Decimal,
    ) -> (Order, Uuid, Uuid) {
        let client = Uuid::new_v4();
        let specialist = Uuid::new_v4();
        let order = engine
            .create_order(new_order(client, specialist, budget))
            .await
            .unwrap();
        engine
            .top_up(client, budget, PaymentProvider::Payme)
            .await
            .unwrap();
        (order, client, specialist)
    }

    #[tokio::test]
    async fn top_up_fresh_wallet() {
        let engine = engine();
        let user = Uuid::new_v4();

        let receipt = engine
            .top_up(user, dec!(500_000), PaymentProvider::Payme)
            .await
            .unwrap();
        assert_eq!(receipt.balance, dec!(500_000));

        let entries = engine.ledger().entries_for_user(user).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tx_type, TransactionType::TopUp);
        assert_eq!(entries[0].amount, dec!(500_000));
    }

    #[tokio::test]
    async fn top_up_rejects_bad_requests() {
        let engine = engine();
        let user = Uuid::new_v4();

        assert!(matches!(
            engine.top_up(user, Decimal::ZERO, PaymentProvider::Payme).await,
            Err(TargetUzError::InvalidAmount { .. })
        ));
        assert!(matches!(
            engine.top_up(user, dec!(10_000), PaymentProvider::Stripe).await,
            Err(TargetUzError::InvalidInput { .. })
        ));
        assert_eq!(engine.ledger().entry_count().await, 0);
    }

    #[tokio::test]
    async fn hold_escrow_moves_funds_against_the_order() {
        let engine = engine();
        let (order, client, _) = funded_order(&engine, dec!(300_000)).await;

        let held = engine
            .hold_escrow(order.id, client, dec!(300_000), PaymentProvider::Click)
            .await
            .unwrap();

        assert_eq!(held.payment_status, PaymentStatus::Escrowed);
        assert_eq!(held.escrow_amount, dec!(300_000));
        assert_eq!(held.payment_provider, Some(PaymentProvider::Click));
        assert_eq!(engine.ledger().balance(client).await, Decimal::ZERO);

        let order_entries = engine.ledger().entries_for_order(order.id).await;
        assert_eq!(order_entries.len(), 1);
        assert_eq!(
            order_entries[0].tx_type,
            TransactionType::EscrowHold
        );
    }

    #[tokio::test]
    async fn hold_escrow_requires_the_ordering_client() {
        let engine = engine();
        let (order, _, _) = funded_order(&engine, dec!(200_000)).await;

        let stranger = Uuid::new_v4();
        let result = engine
            .hold_escrow(order.id, stranger, dec!(200_000), PaymentProvider::Payme)
            .await;
        assert!(matches!(result, Err(TargetUzError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn hold_escrow_unknown_order() {
        let engine = engine();
        let result = engine
            .hold_escrow(
                Uuid::new_v4(),
                Uuid::new_v4(),
                dec!(100_000),
                PaymentProvider::Payme,
            )
            .await;
        assert!(matches!(result, Err(TargetUzError::OrderNotFound { .. })));
    }

    #[tokio::test]
    async fn second_hold_fails_and_debits_once() {
        let engine = engine();
        let (order, client, _) = funded_order(&engine, dec!(200_000)).await;
        engine
            .top_up(client, dec!(200_000), PaymentProvider::Payme)
            .await
            .unwrap();

        engine
            .hold_escrow(order.id, client, dec!(200_000), PaymentProvider::Payme)
            .await
            .unwrap();
        let second = engine
            .hold_escrow(order.id, client, dec!(200_000), PaymentProvider::Payme)
            .await;

        assert!(matches!(second, Err(TargetUzError::AlreadyEscrowed { .. })));
        // one debit: 400k funded, 200k held
        assert_eq!(engine.ledger().balance(client).await, dec!(200_000));
        assert_eq!(engine.ledger().entries_for_order(order.id).await.len(), 1);
    }

    #[tokio::test]
    async fn hold_escrow_insufficient_funds_has_no_effect() {
        let engine = engine();
        let client = Uuid::new_v4();
        let specialist = Uuid::new_v4();
        let order = engine
            .create_order(new_order(client, specialist, dec!(500_000)))
            .await
            .unwrap();
        engine
            .top_up(client, dec!(100_000), PaymentProvider::Payme)
            .await
            .unwrap();

        let result = engine
            .hold_escrow(order.id, client, dec!(500_000), PaymentProvider::Payme)
            .await;
        assert!(matches!(
            result,
            Err(TargetUzError::InsufficientFunds { .. })
        ));

        let unchanged = engine.get_order(order.id).await.unwrap();
        assert_eq!(unchanged.payment_status, PaymentStatus::Unpaid);
        assert_eq!(unchanged.escrow_amount, Decimal::ZERO);
        assert_eq!(engine.ledger().balance(client).await, dec!(100_000));
    }

    #[tokio::test]
    async fn release_splits_escrow_between_specialist_and_platform() {
        let engine = engine();
        let (order, client, specialist) = funded_order(&engine, dec!(3_000_000)).await;
        engine
            .hold_escrow(order.id, client, dec!(3_000_000), PaymentProvider::Payme)
            .await
            .unwrap();

        let outcome = engine.release_escrow(order.id).await.unwrap();

        assert_eq!(outcome.specialist_income, dec!(2_640_000));
        assert_eq!(outcome.commission, dec!(360_000));
        assert_eq!(outcome.order.payment_status, PaymentStatus::Released);
        assert_eq!(outcome.order.escrow_amount, Decimal::ZERO);

        assert_eq!(engine.ledger().balance(specialist).await, dec!(2_640_000));
        let platform = engine
            .platform
            .resolve_platform_account()
            .await
            .unwrap();
        assert_eq!(engine.ledger().balance(platform).await, dec!(360_000));

        // hold + release + commission
        let order_entries = engine.ledger().entries_for_order(order.id).await;
        assert_eq!(order_entries.len(), 3);
        let commission_entry = order_entries
            .iter()
            .find(|e| e.tx_type == TransactionType::Commission)
            .unwrap();
        assert!(commission_entry.note.contains("12%"));
    }

    #[tokio::test]
    async fn second_release_fails_and_credits_once() {
        let engine = engine();
        let (order, client, specialist) = funded_order(&engine, dec!(1_000_000)).await;
        engine
            .hold_escrow(order.id, client, dec!(1_000_000), PaymentProvider::Click)
            .await
            .unwrap();

        engine.release_escrow(order.id).await.unwrap();
        let second = engine.release_escrow(order.id).await;

        assert!(matches!(
            second,
            Err(TargetUzError::NothingToRelease { .. })
        ));
        assert_eq!(engine.ledger().balance(specialist).await, dec!(880_000));
    }

    #[tokio::test]
    async fn release_on_unpaid_order_changes_nothing() {
        let engine = engine();
        let (order, _, specialist) = funded_order(&engine, dec!(400_000)).await;

        let result = engine.release_escrow(order.id).await;
        assert!(matches!(
            result,
            Err(TargetUzError::NothingToRelease { .. })
        ));
        assert_eq!(engine.ledger().balance(specialist).await, Decimal::ZERO);
        assert_eq!(engine.ledger().entries_for_order(order.id).await.len(), 0);
    }

    #[tokio::test]
    async fn concurrent_holds_debit_exactly_once() {
        let engine = engine();
        // funds cover only one hold
        let (order, client, _) = funded_order(&engine, dec!(250_000)).await;

        let a = {
            let engine = engine.clone();
            let order_id = order.id;
            tokio::spawn(async move {
                engine
                    .hold_escrow(order_id, client, dec!(250_000), PaymentProvider::Payme)
                    .await
            })
        };
        let b = {
            let engine = engine.clone();
            let order_id = order.id;
            tokio::spawn(async move {
                engine
                    .hold_escrow(order_id, client, dec!(250_000), PaymentProvider::Payme)
                    .await
            })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        for r in results.iter().filter(|r| r.is_err()) {
            assert!(matches!(
                r,
                Err(TargetUzError::AlreadyEscrowed { .. })
                    | Err(TargetUzError::InsufficientFunds { .. })
            ));
        }
        assert_eq!(engine.ledger().balance(client).await, Decimal::ZERO);
        assert_eq!(engine.ledger().entries_for_order(order.id).await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_releases_credit_exactly_once() {
        let engine = engine();
        let (order, client, specialist) = funded_order(&engine, dec!(1_000_000)).await;
        engine
            .hold_escrow(order.id, client, dec!(1_000_000), PaymentProvider::Payme)
            .await
            .unwrap();

        let a = {
            let engine = engine.clone();
            let order_id = order.id;
            tokio::spawn(async move { engine.release_escrow(order_id).await })
        };
        let b = {
            let engine = engine.clone();
            let order_id = order.id;
            tokio::spawn(async move { engine.release_escrow(order_id).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert_eq!(engine.ledger().balance(specialist).await, dec!(880_000));
    }

    #[tokio::test]
    async fn completion_settles_held_funds() {
        let engine = engine();
        let (order, client, specialist) = funded_order(&engine, dec!(500_000)).await;

        engine
            .transition_order(
                order.id,
                Actor::new(specialist, Role::Specialist),
                OrderStatus::Accepted,
            )
            .await
            .unwrap();
        engine
            .hold_escrow(order.id, client, dec!(500_000), PaymentProvider::Payme)
            .await
            .unwrap();

        let outcome = engine
            .complete_order(order.id, Actor::new(client, Role::Client))
            .await
            .unwrap();

        assert_eq!(outcome.order.status, OrderStatus::Completed);
        assert!(outcome.order.completed_at.is_some());
        let release = match outcome.settlement {
            ReleaseAttempt::Settled(release) => release,
            other => panic!("expected settled escrow, got {other:?}"),
        };
        assert_eq!(release.order.payment_status, PaymentStatus::Released);
        assert_eq!(engine.ledger().balance(specialist).await, dec!(440_000));
    }

    #[tokio::test]
    async fn completion_without_escrow_moves_no_money() {
        let engine = engine();
        let (order, client, specialist) = funded_order(&engine, dec!(500_000)).await;

        engine
            .transition_order(
                order.id,
                Actor::new(specialist, Role::Specialist),
                OrderStatus::Accepted,
            )
            .await
            .unwrap();

        let outcome = engine
            .complete_order(order.id, Actor::new(client, Role::Client))
            .await
            .unwrap();
        assert!(matches!(outcome.settlement, ReleaseAttempt::NoFundsHeld));
        assert_eq!(engine.ledger().balance(specialist).await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn completion_requires_prior_acceptance() {
        let engine = engine();
        let (order, client, _) = funded_order(&engine, dec!(500_000)).await;

        let result = engine
            .complete_order(order.id, Actor::new(client, Role::Client))
            .await;
        assert!(matches!(
            result,
            Err(TargetUzError::IllegalTransition { .. })
        ));
    }

    #[tokio::test]
    async fn failed_release_defers_but_keeps_completion() {
        struct BrokenResolver;

        #[async_trait]
        impl PlatformAccountResolver for BrokenResolver {
            async fn resolve_platform_account(&self) -> Result<Uuid> {
                Err(TargetUzError::storage("platform account table unreachable"))
            }
        }

        let engine = InMemorySettlement::new(Arc::new(BrokenResolver));
        let client = Uuid::new_v4();
        let specialist = Uuid::new_v4();
        let order = engine
            .create_order(new_order(client, specialist, dec!(500_000)))
            .await
            .unwrap();
        engine
            .top_up(client, dec!(500_000), PaymentProvider::Payme)
            .await
            .unwrap();
        engine
            .transition_order(
                order.id,
                Actor::new(specialist, Role::Specialist),
                OrderStatus::Accepted,
            )
            .await
            .unwrap();
        engine
            .hold_escrow(order.id, client, dec!(500_000), PaymentProvider::Payme)
            .await
            .unwrap();

        let outcome = engine
            .complete_order(order.id, Actor::new(client, Role::Client))
            .await
            .unwrap();

        assert_eq!(outcome.order.status, OrderStatus::Completed);
        assert!(matches!(
            outcome.settlement,
            ReleaseAttempt::Deferred { .. }
        ));
    }

    #[tokio::test]
    async fn lifecycle_guards_apply_through_the_engine() {
        let engine = engine();
        let (order, _, specialist) = funded_order(&engine, dec!(200_000)).await;

        // a stranger cannot accept
        let stranger = Actor::new(Uuid::new_v4(), Role::Specialist);
        assert!(matches!(
            engine
                .transition_order(order.id, stranger, OrderStatus::Accepted)
                .await,
            Err(TargetUzError::Unauthorized { .. })
        ));

        // the specialist can decline from pending
        let declined = engine
            .transition_order(
                order.id,
                Actor::new(specialist, Role::Specialist),
                OrderStatus::Cancelled,
            )
            .await
            .unwrap();
        assert_eq!(declined.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn every_wallet_reconciles_after_a_full_flow() {
        let engine = engine();
        let (order, client, specialist) = funded_order(&engine, dec!(2_500_000)).await;

        engine
            .transition_order(
                order.id,
                Actor::new(specialist, Role::Specialist),
                OrderStatus::Accepted,
            )
            .await
            .unwrap();
        engine
            .hold_escrow(order.id, client, dec!(2_500_000), PaymentProvider::Click)
            .await
            .unwrap();
        engine
            .complete_order(order.id, Actor::new(client, Role::Client))
            .await
            .unwrap();

        let platform = engine.platform.resolve_platform_account().await.unwrap();
        for user in [client, specialist, platform] {
            engine.ledger().reconcile(user).await.unwrap();
        }
        assert_eq!(engine.ledger().balance(client).await, Decimal::ZERO);
        assert_eq!(engine.ledger().balance(specialist).await, dec!(2_200_000));
        assert_eq!(engine.ledger().balance(platform).await, dec!(300_000));
    }

    #[tokio::test]
    async fn platform_account_is_provisioned_once() {
        let accounts = InMemoryPlatformAccounts::new();
        let first = accounts.resolve_platform_account().await.unwrap();
        let second = accounts.resolve_platform_account().await.unwrap();
        assert_eq!(first, second);
    }
}
