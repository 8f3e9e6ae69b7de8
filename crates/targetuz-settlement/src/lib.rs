//! TargetUZ Settlement - the sole authority for moving money in and out of
//! escrow
//!
//! The engine mediates three wallets per engagement: the client's, the
//! specialist's, and the platform's. Funds leave the client at hold time,
//! sit against the order, and settle to specialist plus platform at release
//! time. Every operation is atomic: it either fully applies (balance change,
//! ledger entry, order update together) or leaves no observable effect.

pub mod memory;

pub use memory::{InMemoryPlatformAccounts, InMemorySettlement};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use targetuz_types::{
    Actor, Order, OrderStatus, PaymentProvider, Result, TargetUzError,
};

/// Outcome of a wallet top-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopUpReceipt {
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    /// Balance after the credit was applied
    pub balance: Decimal,
}

/// Outcome of releasing escrowed funds
///
/// Callers use these figures for display and notification only; the split
/// is never recomputed outside the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseOutcome {
    pub order: Order,
    pub commission: Decimal,
    pub specialist_income: Decimal,
}

/// What happened to escrowed funds when an order was completed
#[derive(Debug, Clone)]
pub enum ReleaseAttempt {
    /// Nothing was escrowed, so completion moved no money
    NoFundsHeld,
    /// Escrowed funds settled to specialist and platform
    Settled(ReleaseOutcome),
    /// Completion committed but settlement failed; the caller retries
    /// `release_escrow` once the cause clears
    Deferred { error: TargetUzError },
}

/// Outcome of completing an order
///
/// Completion and settlement are two steps. The order here always reflects
/// the committed completion; `settlement` says whether the follow-up
/// release happened, was unnecessary, or must be retried.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub order: Order,
    pub settlement: ReleaseAttempt,
}

/// Locates the ledger account that receives commission revenue
///
/// Implementations must be idempotent: repeated calls return the same
/// account and never provision duplicates.
#[async_trait]
pub trait PlatformAccountResolver: Send + Sync {
    /// Id of the user whose wallet collects platform commission,
    /// provisioning it on first use
    async fn resolve_platform_account(&self) -> Result<Uuid>;
}

/// The escrow settlement engine contract
///
/// Implementations guarantee that each operation runs as a single atomic,
/// isolated unit of work, and that operations touching the same order are
/// linearizable: of two concurrent holds exactly one succeeds, of two
/// concurrent releases exactly one succeeds.
#[async_trait]
pub trait SettlementEngine: Send + Sync {
    /// Credit a user's wallet from an external provider
    async fn top_up(
        &self,
        user_id: Uuid,
        amount: Decimal,
        provider: PaymentProvider,
    ) -> Result<TopUpReceipt>;

    /// Debit the client and hold the amount against the order
    async fn hold_escrow(
        &self,
        order_id: Uuid,
        client_id: Uuid,
        amount: Decimal,
        provider: PaymentProvider,
    ) -> Result<Order>;

    /// Settle held funds to the specialist and the platform
    async fn release_escrow(&self, order_id: Uuid) -> Result<ReleaseOutcome>;

    /// Drive an order's lifecycle status, enforcing actor and state guards
    async fn transition_order(
        &self,
        order_id: Uuid,
        actor: Actor,
        target: OrderStatus,
    ) -> Result<Order>;

    /// Complete an order, then settle its escrow if any is held
    ///
    /// The two steps commit independently: a failed release leaves the
    /// order completed with payment still escrowed, reported in the
    /// outcome rather than rolled back.
    async fn complete_order(&self, order_id: Uuid, actor: Actor) -> Result<CompletionOutcome>;
}

/// Reject funding requests before any store access
pub fn check_funding_request(amount: Decimal, provider: PaymentProvider) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(TargetUzError::invalid_amount(
            "amount must be greater than zero",
        ));
    }
    if !provider.is_wallet_funding() {
        return Err(TargetUzError::invalid_input(
            "provider",
            format!("{provider} is not accepted for wallet funding"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn funding_checks() {
        assert!(check_funding_request(dec!(10_000), PaymentProvider::Payme).is_ok());
        assert!(check_funding_request(dec!(10_000), PaymentProvider::Click).is_ok());

        assert!(matches!(
            check_funding_request(Decimal::ZERO, PaymentProvider::Payme),
            Err(TargetUzError::InvalidAmount { .. })
        ));
        assert!(matches!(
            check_funding_request(dec!(-5), PaymentProvider::Click),
            Err(TargetUzError::InvalidAmount { .. })
        ));
        assert!(matches!(
            check_funding_request(dec!(10_000), PaymentProvider::Stripe),
            Err(TargetUzError::InvalidInput { .. })
        ));
    }
}
