//! TargetUZ Ledger - wallet store and append-only transaction log
//!
//! The ledger is:
//! - Wallet-keyed by owning user id
//! - Append-only (entries are never mutated or deleted)
//! - Direction-typed (every entry credits or debits exactly one wallet)
//!
//! # Invariants
//!
//! 1. No negative balances
//! 2. Every balance change appends exactly one entry
//! 3. A wallet's balance equals its credits minus its debits

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use targetuz_types::{
    round_money, EntryDirection, PaymentProvider, Result, TargetUzError, Transaction,
    TransactionStatus, TransactionType,
};

/// Durable per-user balance record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            balance: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Context attached to a ledger entry at record time
#[derive(Debug, Clone)]
pub struct EntryContext {
    pub order_id: Option<Uuid>,
    pub provider: Option<PaymentProvider>,
    pub note: String,
}

impl EntryContext {
    pub fn new(note: impl Into<String>) -> Self {
        Self {
            order_id: None,
            provider: None,
            note: note.into(),
        }
    }

    pub fn for_order(order_id: Uuid, note: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id),
            provider: None,
            note: note.into(),
        }
    }

    pub fn with_provider(mut self, provider: Option<PaymentProvider>) -> Self {
        self.provider = provider;
        self
    }
}

/// In-memory wallet store plus append-only ledger
///
/// Thread-safe; both maps sit behind write locks that are taken together so
/// a balance change and its entry are never observable apart.
#[derive(Clone)]
pub struct WalletLedger {
    /// Wallets keyed by owning user
    wallets: Arc<RwLock<HashMap<Uuid, Wallet>>>,
    /// All entries (append-only)
    entries: Arc<RwLock<Vec<Transaction>>>,
}

impl WalletLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self {
            wallets: Arc::new(RwLock::new(HashMap::new())),
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Return the wallet for `user_id`, creating a zero-balance one if absent
    ///
    /// Safe to call concurrently for the same user: creation happens under
    /// the write lock, so two racing calls observe one wallet.
    pub async fn ensure_wallet(&self, user_id: Uuid) -> Wallet {
        let mut wallets = self.wallets.write().await;
        wallets
            .entry(user_id)
            .or_insert_with(|| Wallet::new(user_id))
            .clone()
    }

    /// Current balance for a user, zero if no wallet exists yet
    pub async fn balance(&self, user_id: Uuid) -> Decimal {
        let wallets = self.wallets.read().await;
        wallets
            .get(&user_id)
            .map(|w| w.balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// Credit a wallet and append the matching entry
    ///
    /// Returns the new balance and the entry id.
    pub async fn credit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        tx_type: TransactionType,
        context: EntryContext,
    ) -> Result<(Decimal, Uuid)> {
        debug_assert_eq!(tx_type.direction(), EntryDirection::Credit);
        let amount = checked_amount(amount)?;

        let mut wallets = self.wallets.write().await;
        let mut entries = self.entries.write().await;

        let wallet = wallets
            .entry(user_id)
            .or_insert_with(|| Wallet::new(user_id));
        wallet.balance += amount;
        wallet.updated_at = Utc::now();

        let entry_id = append_entry(&mut entries, wallet, user_id, amount, tx_type, context);
        Ok((wallet.balance, entry_id))
    }

    /// Debit a wallet and append the matching entry
    ///
    /// Fails if the balance would go negative; nothing is written in that
    /// case.
    pub async fn debit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        tx_type: TransactionType,
        context: EntryContext,
    ) -> Result<(Decimal, Uuid)> {
        debug_assert_eq!(tx_type.direction(), EntryDirection::Debit);
        let amount = checked_amount(amount)?;

        let mut wallets = self.wallets.write().await;
        let mut entries = self.entries.write().await;

        let wallet = wallets
            .get_mut(&user_id)
            .ok_or_else(|| TargetUzError::InsufficientFunds {
                user_id: user_id.to_string(),
                requested: amount.to_string(),
                available: Decimal::ZERO.to_string(),
            })?;

        if wallet.balance < amount {
            return Err(TargetUzError::InsufficientFunds {
                user_id: user_id.to_string(),
                requested: amount.to_string(),
                available: wallet.balance.to_string(),
            });
        }

        wallet.balance -= amount;
        wallet.updated_at = Utc::now();

        let entry_id = append_entry(&mut entries, wallet, user_id, amount, tx_type, context);
        Ok((wallet.balance, entry_id))
    }

    /// All entries touching a user's wallet, oldest first
    pub async fn entries_for_user(&self, user_id: Uuid) -> Vec<Transaction> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }

    /// All entries referencing an order, oldest first
    pub async fn entries_for_order(&self, order_id: Uuid) -> Vec<Transaction> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter(|e| e.order_id == Some(order_id))
            .cloned()
            .collect()
    }

    /// Total number of recorded entries
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Verify the reconciliation invariant for one wallet
    ///
    /// The balance must equal the signed sum of every entry that touched
    /// the wallet. A mismatch means a balance change escaped the ledger.
    pub async fn reconcile(&self, user_id: Uuid) -> Result<Decimal> {
        let wallets = self.wallets.read().await;
        let entries = self.entries.read().await;

        let balance = wallets
            .get(&user_id)
            .map(|w| w.balance)
            .unwrap_or(Decimal::ZERO);
        let net: Decimal = entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.signed_amount())
            .sum();

        if balance != net {
            return Err(TargetUzError::internal(format!(
                "wallet of user {user_id} out of balance: ledger net {net}, balance {balance}"
            )));
        }
        Ok(balance)
    }
}

impl Default for WalletLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn checked_amount(amount: Decimal) -> Result<Decimal> {
    let amount = round_money(amount);
    if amount <= Decimal::ZERO {
        return Err(TargetUzError::invalid_amount(
            "amount must be greater than zero",
        ));
    }
    Ok(amount)
}

fn append_entry(
    entries: &mut Vec<Transaction>,
    wallet: &Wallet,
    user_id: Uuid,
    amount: Decimal,
    tx_type: TransactionType,
    context: EntryContext,
) -> Uuid {
    let entry = Transaction {
        id: Uuid::new_v4(),
        wallet_id: wallet.id,
        user_id,
        order_id: context.order_id,
        amount,
        tx_type,
        status: TransactionStatus::Success,
        provider: context.provider,
        note: context.note,
        created_at: Utc::now(),
    };
    let entry_id = entry.id;
    entries.push(entry);
    entry_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn credit_and_balance() {
        let ledger = WalletLedger::new();
        let user = Uuid::new_v4();

        assert_eq!(ledger.balance(user).await, Decimal::ZERO);

        let (balance, _) = ledger
            .credit(
                user,
                dec!(500_000),
                TransactionType::TopUp,
                EntryContext::new("wallet top-up").with_provider(Some(PaymentProvider::Payme)),
            )
            .await
            .unwrap();

        assert_eq!(balance, dec!(500_000));
        assert_eq!(ledger.balance(user).await, dec!(500_000));

        let entries = ledger.entries_for_user(user).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tx_type, TransactionType::TopUp);
        assert_eq!(entries[0].amount, dec!(500_000));
        assert_eq!(entries[0].provider, Some(PaymentProvider::Payme));
    }

    #[tokio::test]
    async fn debit_reduces_balance() {
        let ledger = WalletLedger::new();
        let user = Uuid::new_v4();
        let order = Uuid::new_v4();

        ledger
            .credit(
                user,
                dec!(1_000),
                TransactionType::TopUp,
                EntryContext::new("wallet top-up"),
            )
            .await
            .unwrap();

        let (balance, _) = ledger
            .debit(
                user,
                dec!(400),
                TransactionType::EscrowHold,
                EntryContext::for_order(order, "held in escrow"),
            )
            .await
            .unwrap();

        assert_eq!(balance, dec!(600));
        assert_eq!(ledger.entries_for_order(order).await.len(), 1);
    }

    #[tokio::test]
    async fn no_negative_balance() {
        let ledger = WalletLedger::new();
        let user = Uuid::new_v4();

        ledger
            .credit(
                user,
                dec!(100),
                TransactionType::TopUp,
                EntryContext::new("wallet top-up"),
            )
            .await
            .unwrap();

        let result = ledger
            .debit(
                user,
                dec!(200),
                TransactionType::EscrowHold,
                EntryContext::new("held in escrow"),
            )
            .await;

        assert!(matches!(
            result,
            Err(TargetUzError::InsufficientFunds { .. })
        ));
        // the failed debit must leave no trace
        assert_eq!(ledger.balance(user).await, dec!(100));
        assert_eq!(ledger.entries_for_user(user).await.len(), 1);
    }

    #[tokio::test]
    async fn debit_without_wallet_fails() {
        let ledger = WalletLedger::new();
        let result = ledger
            .debit(
                Uuid::new_v4(),
                dec!(50),
                TransactionType::EscrowHold,
                EntryContext::new("held in escrow"),
            )
            .await;
        assert!(matches!(
            result,
            Err(TargetUzError::InsufficientFunds { .. })
        ));
    }

    #[tokio::test]
    async fn zero_and_negative_amounts_rejected() {
        let ledger = WalletLedger::new();
        let user = Uuid::new_v4();

        for amount in [Decimal::ZERO, dec!(-10)] {
            let result = ledger
                .credit(
                    user,
                    amount,
                    TransactionType::TopUp,
                    EntryContext::new("wallet top-up"),
                )
                .await;
            assert!(matches!(result, Err(TargetUzError::InvalidAmount { .. })));
        }
    }

    #[tokio::test]
    async fn ensure_wallet_is_stable_across_calls() {
        let ledger = WalletLedger::new();
        let user = Uuid::new_v4();

        let first = ledger.ensure_wallet(user).await;
        let second = ledger.ensure_wallet(user).await;
        assert_eq!(first.id, second.id);
        assert_eq!(first.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn balance_reconciles_against_entries() {
        let ledger = WalletLedger::new();
        let user = Uuid::new_v4();
        let order = Uuid::new_v4();

        ledger
            .credit(
                user,
                dec!(750_000),
                TransactionType::TopUp,
                EntryContext::new("wallet top-up"),
            )
            .await
            .unwrap();
        ledger
            .debit(
                user,
                dec!(300_000),
                TransactionType::EscrowHold,
                EntryContext::for_order(order, "held in escrow"),
            )
            .await
            .unwrap();
        ledger
            .credit(
                user,
                dec!(44_000),
                TransactionType::EscrowRelease,
                EntryContext::for_order(order, "released on completion"),
            )
            .await
            .unwrap();

        let balance = ledger.reconcile(user).await.unwrap();
        assert_eq!(balance, dec!(494_000));
    }

    #[tokio::test]
    async fn amounts_are_rounded_to_two_digits() {
        let ledger = WalletLedger::new();
        let user = Uuid::new_v4();

        let (balance, _) = ledger
            .credit(
                user,
                dec!(100.005),
                TransactionType::TopUp,
                EntryContext::new("wallet top-up"),
            )
            .await
            .unwrap();
        assert_eq!(balance, dec!(100.01));
    }
}
