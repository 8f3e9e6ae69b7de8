//! TargetUZ Types - Canonical domain types for the marketplace platform
//!
//! This crate contains all foundational types for TargetUZ with zero
//! dependencies on other targetuz crates. It defines the complete type
//! system for:
//!
//! - Monetary amounts and commission arithmetic (fixed-point, 2 digits)
//! - Order lifecycle and payment states
//! - Ledger transaction types and payment providers
//! - The error taxonomy shared by every layer
//!
//! # Accounting Invariants
//!
//! These types support the core settlement invariants:
//!
//! 1. No negative balances
//! 2. Every balance change has a matching ledger entry
//! 3. Commission plus specialist income always equals the escrowed amount
//! 4. Money moves only through atomic settlement operations

pub mod error;
pub mod money;
pub mod order;
pub mod transaction;

pub use error::*;
pub use money::*;
pub use order::*;
pub use transaction::*;
