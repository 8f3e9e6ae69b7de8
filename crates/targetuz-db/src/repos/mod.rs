//! Repository implementations

pub(crate) mod order;
pub(crate) mod transaction;
pub(crate) mod user;
pub(crate) mod wallet;

pub use order::OrderRepo;
pub use transaction::TransactionRepo;
pub use user::UserRepo;
pub use wallet::WalletRepo;
