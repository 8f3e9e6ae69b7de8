//! Request handlers

pub mod health;
pub mod order;
pub mod payment;
pub mod user;
pub mod wallet;
