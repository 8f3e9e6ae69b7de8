//! Application state shared across handlers

use std::sync::Arc;

use targetuz_db::Database;
use targetuz_settlement::SettlementEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connections (reads and order CRUD)
    pub db: Arc<Database>,
    /// Settlement engine (every money movement goes through here)
    pub engine: Arc<dyn SettlementEngine>,
}

impl AppState {
    pub fn new(db: Arc<Database>, engine: Arc<dyn SettlementEngine>) -> Self {
        Self { db, engine }
    }
}
