//! Ledger transaction types
//!
//! A transaction is the immutable record of one balance-affecting event.
//! Amounts are always positive; the direction a wallet moves is implied by
//! the transaction type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// External payment system a wallet movement was funded through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    Payme,
    Click,
    Stripe,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payme => "payme",
            Self::Click => "click",
            Self::Stripe => "stripe",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "payme" => Some(Self::Payme),
            "click" => Some(Self::Click),
            "stripe" => Some(Self::Stripe),
            _ => None,
        }
    }

    /// Providers accepted for wallet funding (top-up and escrow holds)
    ///
    /// Stripe rows exist historically but new funding goes through the
    /// local providers only.
    pub fn is_wallet_funding(&self) -> bool {
        matches!(self, Self::Payme | Self::Click)
    }
}

impl std::fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which way a transaction moves its wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryDirection {
    /// Balance increases
    Credit,
    /// Balance decreases
    Debit,
}

/// Kind of balance-affecting event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Client funded their wallet from an external provider
    TopUp,
    /// Client funds debited and held against an order
    EscrowHold,
    /// Held funds paid out to the specialist
    EscrowRelease,
    /// Platform's cut of a released escrow
    Commission,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopUp => "top_up",
            Self::EscrowHold => "escrow_hold",
            Self::EscrowRelease => "escrow_release",
            Self::Commission => "commission",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "top_up" => Some(Self::TopUp),
            "escrow_hold" => Some(Self::EscrowHold),
            "escrow_release" => Some(Self::EscrowRelease),
            "commission" => Some(Self::Commission),
            _ => None,
        }
    }

    /// Direction the owning wallet moves for this type
    pub fn direction(&self) -> EntryDirection {
        match self {
            Self::EscrowHold => EntryDirection::Debit,
            Self::TopUp | Self::EscrowRelease | Self::Commission => EntryDirection::Credit,
        }
    }
}

/// Outcome recorded on a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Immutable record of one balance-affecting event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub user_id: Uuid,
    /// Absent for top-ups, which are not tied to an order
    pub order_id: Option<Uuid>,
    /// Always positive; see [`TransactionType::direction`]
    pub amount: Decimal,
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    pub provider: Option<PaymentProvider>,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Signed effect of this entry on its wallet's balance
    pub fn signed_amount(&self) -> Decimal {
        match self.tx_type.direction() {
            EntryDirection::Credit => self.amount,
            EntryDirection::Debit => -self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn directions_by_type() {
        assert_eq!(TransactionType::TopUp.direction(), EntryDirection::Credit);
        assert_eq!(
            TransactionType::EscrowHold.direction(),
            EntryDirection::Debit
        );
        assert_eq!(
            TransactionType::EscrowRelease.direction(),
            EntryDirection::Credit
        );
        assert_eq!(
            TransactionType::Commission.direction(),
            EntryDirection::Credit
        );
    }

    #[test]
    fn signed_amount_follows_direction() {
        let mut tx = Transaction {
            id: Uuid::new_v4(),
            wallet_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            order_id: None,
            amount: dec!(250_000),
            tx_type: TransactionType::TopUp,
            status: TransactionStatus::Success,
            provider: Some(PaymentProvider::Payme),
            note: "wallet top-up".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(tx.signed_amount(), dec!(250_000));

        tx.tx_type = TransactionType::EscrowHold;
        assert_eq!(tx.signed_amount(), dec!(-250_000));
    }

    #[test]
    fn provider_codecs() {
        for p in [
            PaymentProvider::Payme,
            PaymentProvider::Click,
            PaymentProvider::Stripe,
        ] {
            assert_eq!(PaymentProvider::parse(p.as_str()), Some(p));
        }
        assert!(PaymentProvider::Payme.is_wallet_funding());
        assert!(PaymentProvider::Click.is_wallet_funding());
        assert!(!PaymentProvider::Stripe.is_wallet_funding());
    }

    #[test]
    fn type_codecs_round_trip() {
        for t in [
            TransactionType::TopUp,
            TransactionType::EscrowHold,
            TransactionType::EscrowRelease,
            TransactionType::Commission,
        ] {
            assert_eq!(TransactionType::parse(t.as_str()), Some(t));
        }
    }
}
