use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use supplychain_backend::services::ledger::LedgerService;
use supplychain_backend::{handlers, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,supplychain_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    // Ledger RPC client; the private key is optional and only gates the
    // state-changing endpoints.
    let rpc_url = env::var("RPC_URL").expect("RPC_URL must be set");
    let contract_address = env::var("CONTRACT_ADDRESS").expect("CONTRACT_ADDRESS must be set");
    let private_key = env::var("LEDGER_PRIVATE_KEY").ok();
    let ledger = LedgerService::new(&rpc_url, &contract_address, private_key.as_deref())
        .expect("Invalid ledger configuration");
    ledger
        .check_connection()
        .await
        .expect("Failed to reach ledger RPC");

    let state = AppState { db, ledger };

    // Build router
    let app = Router::new()
        .route("/", get(health))
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
        .route(
            "/api/chain/products/{address}",
            get(handlers::chain::get_products),
        )
        .route(
            "/api/chain/products/{address}/status-summary",
            get(handlers::chain::get_status_summary),
        )
        .route(
            "/api/chain/product/{id}",
            get(handlers::chain::get_product),
        )
        .route("/api/scan/resolve", post(handlers::chain::resolve_scan))
        .route("/api/chain/transfer", post(handlers::chain::transfer))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

async fn health() -> &'static str {
    "Supply chain backend up"
}
