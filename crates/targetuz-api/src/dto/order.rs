//! Order and payment DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use targetuz_settlement::{CompletionOutcome, ReleaseAttempt, ReleaseOutcome};
use targetuz_types::{Actor, NewOrder, Order, PaymentProvider, Role};

use crate::error::{ApiError, ErrorResponse};

/// Minimum escrow hold, in so'm
pub const HOLD_MIN: u64 = 10_000;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub client_id: Uuid,
    pub specialist_id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: Decimal,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        Self {
            client_id: req.client_id,
            specialist_id: req.specialist_id,
            title: req.title,
            description: req.description,
            budget: req.budget,
        }
    }
}

/// The identity driving a lifecycle transition
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ActorPayload {
    pub actor_id: Uuid,
    pub actor_role: Role,
}

impl From<ActorPayload> for Actor {
    fn from(payload: ActorPayload) -> Self {
        Actor::new(payload.actor_id, payload.actor_role)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListOrdersQuery {
    pub user_id: Uuid,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub specialist_id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: Decimal,
    pub commission_rate: Decimal,
    pub status: &'static str,
    pub payment_status: &'static str,
    pub escrow_amount: Decimal,
    pub payment_provider: Option<&'static str>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            client_id: order.client_id,
            specialist_id: order.specialist_id,
            title: order.title,
            description: order.description,
            budget: order.budget,
            commission_rate: order.commission_rate,
            status: order.status.as_str(),
            payment_status: order.payment_status.as_str(),
            escrow_amount: order.escrow_amount,
            payment_provider: order.payment_provider.map(|p| p.as_str()),
            completed_at: order.completed_at,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HoldEscrowRequest {
    pub order_id: Uuid,
    pub client_id: Uuid,
    pub amount: Decimal,
    pub provider: PaymentProvider,
}

impl HoldEscrowRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.amount < Decimal::from(HOLD_MIN) {
            return Err(ApiError::bad_request(format!(
                "Payment must be at least {HOLD_MIN} so'm"
            )));
        }
        if !self.provider.is_wallet_funding() {
            return Err(ApiError::bad_request("Choose Payme or Click"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseEscrowRequest {
    pub order_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleaseResponse {
    pub order: OrderResponse,
    pub commission: Decimal,
    pub specialist_income: Decimal,
}

impl From<ReleaseOutcome> for ReleaseResponse {
    fn from(outcome: ReleaseOutcome) -> Self {
        Self {
            order: outcome.order.into(),
            commission: outcome.commission,
            specialist_income: outcome.specialist_income,
        }
    }
}

/// What happened to escrowed funds when the order completed
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SettlementResult {
    /// Nothing was escrowed
    NoFundsHeld,
    /// Funds settled to specialist and platform
    Settled {
        commission: Decimal,
        specialist_income: Decimal,
    },
    /// Completion committed, settlement pending a release retry
    Deferred { error: ErrorResponse },
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionResponse {
    pub order: OrderResponse,
    pub settlement: SettlementResult,
}

impl From<CompletionOutcome> for CompletionResponse {
    fn from(outcome: CompletionOutcome) -> Self {
        let settlement = match outcome.settlement {
            ReleaseAttempt::NoFundsHeld => SettlementResult::NoFundsHeld,
            ReleaseAttempt::Settled(release) => SettlementResult::Settled {
                commission: release.commission,
                specialist_income: release.specialist_income,
            },
            ReleaseAttempt::Deferred { error } => {
                let api_error: ApiError = error.into();
                SettlementResult::Deferred {
                    error: ErrorResponse::from(&api_error),
                }
            }
        };
        Self {
            order: outcome.order.into(),
            settlement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn hold_request_bounds() {
        let mut req = HoldEscrowRequest {
            order_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            amount: dec!(100_000),
            provider: PaymentProvider::Payme,
        };
        assert!(req.validate().is_ok());

        req.amount = dec!(9_000);
        assert!(req.validate().is_err());

        req.amount = dec!(100_000);
        req.provider = PaymentProvider::Stripe;
        assert!(req.validate().is_err());
    }

    #[test]
    fn settlement_result_serializes_with_state_tag() {
        let settled = SettlementResult::Settled {
            commission: dec!(360_000),
            specialist_income: dec!(2_640_000),
        };
        let json = serde_json::to_value(&settled).unwrap();
        assert_eq!(json["state"], "settled");
        assert_eq!(json["commission"], serde_json::json!("360000"));
    }
}
