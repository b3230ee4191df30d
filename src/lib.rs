// src/lib.rs

use sea_orm::DatabaseConnection;
use services::ledger::LedgerService;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub ledger: LedgerService,
}

pub mod entities {
    pub mod prelude;
    pub mod product_metadata;
}

pub mod services {
    pub mod ledger;
    pub mod qr;
    pub mod reconciliation;
    pub mod resolution;
    pub mod store;
    pub mod transfer;

    #[cfg(test)]
    pub mod testing;
}

pub mod models;
pub mod handlers;
