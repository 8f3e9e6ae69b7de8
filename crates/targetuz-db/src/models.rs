//! Database models - mapped from PostgreSQL tables
//!
//! Rows carry enums as text; the conversion into domain types lives here so
//! a corrupt row surfaces as an explicit error instead of a bad branch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use targetuz_types::{
    Order, OrderStatus, PaymentProvider, PaymentStatus, Role, Transaction, TransactionStatus,
    TransactionType,
};

use crate::error::DbError;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl DbUser {
    pub fn role(&self) -> Result<Role, DbError> {
        Role::parse(&self.role)
            .ok_or_else(|| DbError::Corrupt(format!("user {} role '{}'", self.id, self.role)))
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbWallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbOrder {
    pub id: Uuid,
    pub client_id: Uuid,
    pub specialist_id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: Decimal,
    pub commission_rate: Decimal,
    pub status: String,
    pub payment_status: String,
    pub escrow_amount: Decimal,
    pub payment_provider: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DbOrder {
    /// Decode the row into the domain order
    pub fn into_domain(self) -> Result<Order, DbError> {
        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| DbError::Corrupt(format!("order {} status '{}'", self.id, self.status)))?;
        let payment_status = PaymentStatus::parse(&self.payment_status).ok_or_else(|| {
            DbError::Corrupt(format!(
                "order {} payment_status '{}'",
                self.id, self.payment_status
            ))
        })?;
        let payment_provider = match self.payment_provider.as_deref() {
            None => None,
            Some(p) => Some(PaymentProvider::parse(p).ok_or_else(|| {
                DbError::Corrupt(format!("order {} payment_provider '{p}'", self.id))
            })?),
        };
        Ok(Order {
            id: self.id,
            client_id: self.client_id,
            specialist_id: self.specialist_id,
            title: self.title,
            description: self.description,
            budget: self.budget,
            commission_rate: self.commission_rate,
            status,
            payment_status,
            escrow_amount: self.escrow_amount,
            payment_provider,
            completed_at: self.completed_at,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbTransaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub user_id: Uuid,
    pub order_id: Option<Uuid>,
    pub amount: Decimal,
    pub tx_type: String,
    pub status: String,
    pub provider: Option<String>,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl DbTransaction {
    /// Decode the row into the domain ledger entry
    pub fn into_domain(self) -> Result<Transaction, DbError> {
        let tx_type = TransactionType::parse(&self.tx_type).ok_or_else(|| {
            DbError::Corrupt(format!("transaction {} type '{}'", self.id, self.tx_type))
        })?;
        let status = TransactionStatus::parse(&self.status).ok_or_else(|| {
            DbError::Corrupt(format!("transaction {} status '{}'", self.id, self.status))
        })?;
        let provider = match self.provider.as_deref() {
            None => None,
            Some(p) => Some(PaymentProvider::parse(p).ok_or_else(|| {
                DbError::Corrupt(format!("transaction {} provider '{p}'", self.id))
            })?),
        };
        Ok(Transaction {
            id: self.id,
            wallet_id: self.wallet_id,
            user_id: self.user_id,
            order_id: self.order_id,
            amount: self.amount,
            tx_type,
            status,
            provider,
            note: self.note,
            created_at: self.created_at,
        })
    }
}
