//! Error types for the TargetUZ platform
//!
//! Every failure is explicit and carries a display-ready reason; callers
//! render the message and branch on the kind (or its `error_code`).

use thiserror::Error;

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, TargetUzError>;

/// Platform error taxonomy
#[derive(Debug, Clone, Error)]
pub enum TargetUzError {
    // ========================================================================
    // Not-found errors
    // ========================================================================

    /// Order does not exist
    #[error("Order {order_id} not found")]
    OrderNotFound { order_id: String },

    /// Wallet does not exist
    #[error("Wallet {wallet_id} not found")]
    WalletNotFound { wallet_id: String },

    /// User does not exist
    #[error("User {user_id} not found")]
    UserNotFound { user_id: String },

    // ========================================================================
    // Validation errors
    // ========================================================================

    /// Amount failed validation before any store access
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// A field failed validation before any store access
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    // ========================================================================
    // Authorization errors
    // ========================================================================

    /// Actor lacks ownership or role for the operation
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    // ========================================================================
    // State-conflict errors
    // ========================================================================

    /// Funds are already held for this order
    #[error("Order {order_id} already has funds in escrow")]
    AlreadyEscrowed { order_id: String },

    /// No held funds exist to release
    #[error("Order {order_id} has no escrowed funds to release")]
    NothingToRelease { order_id: String },

    /// The order's held amount is not a positive value
    #[error("Order {order_id} carries an invalid escrow amount")]
    InvalidEscrowAmount { order_id: String },

    /// The requested lifecycle transition is not legal from the current state
    #[error("Order {order_id} cannot move from {from} to {to}")]
    IllegalTransition {
        order_id: String,
        from: &'static str,
        to: &'static str,
    },

    // ========================================================================
    // Resource errors
    // ========================================================================

    /// Debit would push the wallet balance below zero
    #[error("Insufficient funds in wallet of user {user_id}: requested {requested}, available {available}")]
    InsufficientFunds {
        user_id: String,
        requested: String,
        available: String,
    },

    // ========================================================================
    // General errors
    // ========================================================================

    /// Durable store failed; the operation was rolled back
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TargetUzError {
    /// Create an order-not-found error
    pub fn order_not_found(order_id: impl ToString) -> Self {
        Self::OrderNotFound {
            order_id: order_id.to_string(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid amount error
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// State-conflict errors leave the store untouched; the caller should
    /// re-read current state and reconcile its view
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyEscrowed { .. }
                | Self::NothingToRelease { .. }
                | Self::InvalidEscrowAmount { .. }
                | Self::IllegalTransition { .. }
        )
    }

    /// Get a stable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::OrderNotFound { .. } => "ORDER_NOT_FOUND",
            Self::WalletNotFound { .. } => "WALLET_NOT_FOUND",
            Self::UserNotFound { .. } => "USER_NOT_FOUND",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::AlreadyEscrowed { .. } => "ALREADY_ESCROWED",
            Self::NothingToRelease { .. } => "NOTHING_TO_RELEASE",
            Self::InvalidEscrowAmount { .. } => "INVALID_ESCROW_AMOUNT",
            Self::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::Storage { .. } => "STORAGE_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
