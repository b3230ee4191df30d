use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;

use supplychain_backend::entities::product_metadata;
use supplychain_backend::services::ledger::LedgerService;
use supplychain_backend::{handlers, AppState};

/// Ledger client pointing at an unreachable local endpoint. Construction is
/// parse-only, so routes that never reach the ledger can be exercised
/// without a node.
pub fn test_ledger() -> LedgerService {
    LedgerService::new(
        "http://127.0.0.1:8545",
        "0x0165878A594ca255338adfa4d48449f69242Eb8F",
        None,
    )
    .expect("test ledger configuration should parse")
}

pub fn test_router(db: DatabaseConnection) -> Router {
    let state = AppState {
        db,
        ledger: test_ledger(),
    };

    Router::new()
        .route("/api/products", post(handlers::product::store_product))
        .route(
            "/api/products/transaction/{transaction_hash}",
            get(handlers::product::get_by_transaction),
        )
        .route(
            "/api/products/owner/{address}",
            get(handlers::product::get_by_owner),
        )
        .route("/api/chain/products", post(handlers::chain::create_product))
        .route("/api/scan/resolve", post(handlers::chain::resolve_scan))
        .route("/api/chain/transfer", post(handlers::chain::transfer))
        .with_state(state)
}

#[allow(dead_code)]
pub fn stored_row(id: i32, hash: &str, batch_id: &str, manufacturer: &str) -> product_metadata::Model {
    product_metadata::Model {
        id,
        transaction_hash: hash.to_string(),
        manufacturer: manufacturer.to_string(),
        name: "Air Jordan".to_string(),
        batch_id: batch_id.to_string(),
        wholesaler: "0xW".to_string(),
        retailer: "0xR".to_string(),
        description: Some("First batch".to_string()),
        created_at: "2026-01-01T00:00:00Z".to_string(),
        qr_code: "data:image/png;base64,dGVzdA==".to_string(),
        product_id: None,
        stored_at: None,
    }
}
