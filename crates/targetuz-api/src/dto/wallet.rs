//! Wallet DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use targetuz_types::{PaymentProvider, Transaction};

use crate::error::ApiError;

/// Minimum wallet top-up, in so'm
pub const TOPUP_MIN: u64 = 10_000;
/// Maximum wallet top-up, in so'm
pub const TOPUP_MAX: u64 = 1_000_000_000;

#[derive(Debug, Clone, Deserialize)]
pub struct TopUpRequest {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub provider: PaymentProvider,
}

impl TopUpRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.amount < Decimal::from(TOPUP_MIN) {
            return Err(ApiError::bad_request(format!(
                "Minimum top-up is {TOPUP_MIN} so'm"
            )));
        }
        if self.amount > Decimal::from(TOPUP_MAX) {
            return Err(ApiError::bad_request("Top-up exceeds the maximum limit"));
        }
        if !self.provider.is_wallet_funding() {
            return Err(ApiError::bad_request("Choose Payme or Click"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopUpResponse {
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    pub user_id: Uuid,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One ledger entry as presented to callers
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub user_id: Uuid,
    pub order_id: Option<Uuid>,
    pub amount: Decimal,
    pub tx_type: &'static str,
    pub status: &'static str,
    pub provider: Option<&'static str>,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionRecord {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            wallet_id: tx.wallet_id,
            user_id: tx.user_id,
            order_id: tx.order_id,
            amount: tx.amount,
            tx_type: tx.tx_type.as_str(),
            status: tx.status.as_str(),
            provider: tx.provider.map(|p| p.as_str()),
            note: tx.note,
            created_at: tx.created_at,
        }
    }
}
