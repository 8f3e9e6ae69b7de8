//! Order lifecycle types and transition guards
//!
//! An order is one engagement between a client and a specialist. Its
//! lifecycle is a small state machine; which escrow operations are legal
//! depends on where in the lifecycle the order sits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TargetUzError};
use crate::transaction::PaymentProvider;

/// Platform role of an acting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Specialist,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Specialist => "specialist",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "client" => Some(Self::Client),
            "specialist" => Some(Self::Specialist),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// The identity on whose behalf an operation runs
///
/// Every settlement and lifecycle call receives the actor explicitly;
/// nothing in the core reads ambient session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted by the client, awaiting the specialist's answer
    Pending,
    /// Specialist took the engagement
    Accepted,
    /// Work delivered and confirmed
    Completed,
    /// Declined or withdrawn
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Check whether the lifecycle permits moving to `next`
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, OrderStatus::Accepted)
                | (Self::Pending, OrderStatus::Cancelled)
                | (Self::Accepted, OrderStatus::Completed)
        )
    }
}

/// Payment status of an order, independent of its lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No funds held yet
    Unpaid,
    /// Client funds debited and held against this order
    Escrowed,
    /// Held funds settled to specialist and platform
    Released,
    /// Held funds returned to the client
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Escrowed => "escrowed",
            Self::Released => "released",
            Self::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unpaid" => Some(Self::Unpaid),
            "escrowed" => Some(Self::Escrowed),
            "released" => Some(Self::Released),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }
}

/// One engagement between a client and a specialist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    pub specialist_id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: Decimal,
    /// Commission rate in percent, stamped at creation
    pub commission_rate: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Amount currently held; zero unless payment_status is Escrowed
    pub escrow_amount: Decimal,
    pub payment_provider: Option<PaymentProvider>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether the given actor may drive this order to `target`
    ///
    /// Accept/cancel is the specialist's call (or an admin's); completion
    /// may come from either side of the engagement or an admin.
    fn actor_may_transition(&self, actor: Actor, target: OrderStatus) -> bool {
        if actor.is_admin() {
            return true;
        }
        match target {
            OrderStatus::Accepted | OrderStatus::Cancelled => actor.id == self.specialist_id,
            OrderStatus::Completed => {
                actor.id == self.client_id || actor.id == self.specialist_id
            }
            OrderStatus::Pending => false,
        }
    }

    /// Validate a lifecycle transition without applying it
    ///
    /// Authorization is checked before legality so a stranger probing an
    /// order learns nothing about its current state.
    pub fn guard_transition(&self, actor: Actor, target: OrderStatus) -> Result<()> {
        if !self.actor_may_transition(actor, target) {
            return Err(TargetUzError::unauthorized(format!(
                "user {} may not move order {} to {}",
                actor.id,
                self.id,
                target.as_str()
            )));
        }
        if !self.status.can_transition_to(target) {
            return Err(TargetUzError::IllegalTransition {
                order_id: self.id.to_string(),
                from: self.status.as_str(),
                to: target.as_str(),
            });
        }
        Ok(())
    }
}

/// Bounds enforced on new orders, mirrored by the public request forms
pub const ORDER_TITLE_MIN: usize = 8;
pub const ORDER_TITLE_MAX: usize = 120;
pub const ORDER_DESCRIPTION_MIN: usize = 30;
pub const ORDER_DESCRIPTION_MAX: usize = 2000;

/// Minimum budget for a new order, in so'm
pub const ORDER_BUDGET_MIN: u64 = 100_000;
/// Maximum budget for a new order, in so'm
pub const ORDER_BUDGET_MAX: u64 = 500_000_000;

/// Parameters for creating an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub client_id: Uuid,
    pub specialist_id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: Decimal,
}

impl NewOrder {
    /// Reject malformed orders before anything touches the store
    pub fn validate(&self) -> Result<()> {
        if self.client_id == self.specialist_id {
            return Err(TargetUzError::invalid_input(
                "specialist_id",
                "a client cannot order from themselves",
            ));
        }
        let title_len = self.title.chars().count();
        if !(ORDER_TITLE_MIN..=ORDER_TITLE_MAX).contains(&title_len) {
            return Err(TargetUzError::invalid_input(
                "title",
                format!("must be {ORDER_TITLE_MIN}-{ORDER_TITLE_MAX} characters"),
            ));
        }
        let description_len = self.description.chars().count();
        if !(ORDER_DESCRIPTION_MIN..=ORDER_DESCRIPTION_MAX).contains(&description_len) {
            return Err(TargetUzError::invalid_input(
                "description",
                format!("must be {ORDER_DESCRIPTION_MIN}-{ORDER_DESCRIPTION_MAX} characters"),
            ));
        }
        if self.budget < Decimal::from(ORDER_BUDGET_MIN)
            || self.budget > Decimal::from(ORDER_BUDGET_MAX)
        {
            return Err(TargetUzError::invalid_input(
                "budget",
                format!("must be between {ORDER_BUDGET_MIN} and {ORDER_BUDGET_MAX} so'm"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            specialist_id: Uuid::new_v4(),
            title: "Instagram lead campaign".to_string(),
            description: "x".repeat(40),
            budget: dec!(500_000),
            commission_rate: dec!(12),
            status,
            payment_status: PaymentStatus::Unpaid,
            escrow_amount: Decimal::ZERO,
            payment_provider: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn lifecycle_edges() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Accepted));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Accepted.can_transition_to(OrderStatus::Completed));

        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Accepted.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Accepted));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn specialist_accepts_pending_order() {
        let o = order(OrderStatus::Pending);
        let specialist = Actor::new(o.specialist_id, Role::Specialist);
        assert!(o.guard_transition(specialist, OrderStatus::Accepted).is_ok());
    }

    #[test]
    fn client_cannot_accept_own_order() {
        let o = order(OrderStatus::Pending);
        let client = Actor::new(o.client_id, Role::Client);
        let err = o
            .guard_transition(client, OrderStatus::Accepted)
            .unwrap_err();
        assert!(matches!(err, TargetUzError::Unauthorized { .. }));
    }

    #[test]
    fn completion_requires_acceptance_first() {
        let o = order(OrderStatus::Pending);
        let client = Actor::new(o.client_id, Role::Client);
        let err = o
            .guard_transition(client, OrderStatus::Completed)
            .unwrap_err();
        assert!(matches!(err, TargetUzError::IllegalTransition { .. }));
    }

    #[test]
    fn admin_may_drive_any_legal_transition() {
        let o = order(OrderStatus::Accepted);
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        assert!(o.guard_transition(admin, OrderStatus::Completed).is_ok());

        // legality still applies to admins
        let done = order(OrderStatus::Completed);
        assert!(done
            .guard_transition(admin, OrderStatus::Completed)
            .is_err());
    }

    #[test]
    fn stranger_probing_is_rejected_as_unauthorized() {
        let o = order(OrderStatus::Completed);
        let stranger = Actor::new(Uuid::new_v4(), Role::Specialist);
        let err = o
            .guard_transition(stranger, OrderStatus::Completed)
            .unwrap_err();
        assert!(matches!(err, TargetUzError::Unauthorized { .. }));
    }

    #[test]
    fn new_order_validation() {
        let good = NewOrder {
            client_id: Uuid::new_v4(),
            specialist_id: Uuid::new_v4(),
            title: "Meta Ads funnel setup".to_string(),
            description: "Full funnel for a beauty salon, two ad sets and weekly reports"
                .to_string(),
            budget: dec!(350_000),
        };
        assert!(good.validate().is_ok());

        let mut self_order = good.clone();
        self_order.specialist_id = self_order.client_id;
        assert!(self_order.validate().is_err());

        let mut short_title = good.clone();
        short_title.title = "Ads".to_string();
        assert!(short_title.validate().is_err());

        let mut tiny_budget = good;
        tiny_budget.budget = dec!(5_000);
        assert!(tiny_budget.validate().is_err());
    }

    #[test]
    fn status_codecs_round_trip() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        }
        for p in [
            PaymentStatus::Unpaid,
            PaymentStatus::Escrowed,
            PaymentStatus::Released,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(PaymentStatus::parse(p.as_str()), Some(p));
        }
        assert_eq!(OrderStatus::parse("unknown"), None);
    }
}
