//! Reconciliation and ledger HTTP surface
//!
//! Status mapping keeps the error taxonomy distinguishable for the UI:
//! 400 missing input, 403 unauthorized, 404 does not exist, 422 identity
//! unresolved, 502 ledger/store transport or revert, 503 signer missing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::models::chain::{
    ChainProductsResponse, CreateProductRequest, CreateProductResponse, ResolveResponse,
    ScanPayload, StatusSummaryResponse, TransferRequest, TransferResponse,
};
use crate::models::merged::MergedProductView;
use crate::models::product::ErrorResponse;
use crate::services::ledger::{LedgerError, ProductLedger};
use crate::services::reconciliation::{reconcile_products, status_summary};
use crate::services::resolution::{resolve_product_id, Resolution};
use crate::services::store::{DbMetadataStore, MetadataStore};
use crate::services::transfer::{next_recipient, TransferError};
use crate::AppState;

fn ledger_error(e: LedgerError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        LedgerError::SignerUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        LedgerError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

// GET /api/chain/products/{address}
pub async fn get_products(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ChainProductsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let store = DbMetadataStore::new(&state.db);
    let products = reconcile_products(&state.ledger, &store, &address)
        .await
        .map_err(ledger_error)?;

    Ok(Json(ChainProductsResponse {
        count: products.len(),
        products,
    }))
}

// GET /api/chain/products/{address}/status-summary
pub async fn get_status_summary(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<StatusSummaryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let store = DbMetadataStore::new(&state.db);
    let products = reconcile_products(&state.ledger, &store, &address)
        .await
        .map_err(ledger_error)?;

    Ok(Json(StatusSummaryResponse {
        total: products.len(),
        counts: status_summary(&products),
    }))
}

// GET /api/chain/product/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MergedProductView>, (StatusCode, Json<ErrorResponse>)> {
    let product = state.ledger.product(id).await.map_err(ledger_error)?;

    if !product.exists {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Product {} not found on ledger", id),
            }),
        ));
    }

    let metadata = match DbMetadataStore::new(&state.db)
        .find_by_batch_id(&product.batch_id)
        .await
    {
        Ok(row) => row,
        Err(e) => {
            warn!(product_id = id, error = %e, "Metadata store unreachable for detail view");
            None
        }
    };

    Ok(Json(MergedProductView::merge(product, metadata.as_ref())))
}

// POST /api/scan/resolve
pub async fn resolve_scan(
    State(state): State<AppState>,
    Json(payload): Json<ScanPayload>,
) -> Result<Json<ResolveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let store = DbMetadataStore::new(&state.db);
    let resolution = resolve_product_id(&state.ledger, &store, &payload)
        .await
        .map_err(ledger_error)?;

    Ok(Json(ResolveResponse {
        resolved: matches!(resolution, Resolution::Resolved(_)),
        product_id: resolution.product_id(),
    }))
}

// POST /api/chain/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<CreateProductResponse>), (StatusCode, Json<ErrorResponse>)> {
    let required = [
        (&payload.name, "name"),
        (&payload.batch_id, "batchId"),
        (&payload.wholesaler, "wholesaler"),
        (&payload.retailer, "retailer"),
    ];
    for (value, field) in required {
        if value.is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("{} is required", field),
                }),
            ));
        }
    }

    let transaction_hash = state
        .ledger
        .create_product(
            &payload.name,
            &payload.batch_id,
            &payload.wholesaler,
            &payload.retailer,
        )
        .await
        .map_err(ledger_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            success: true,
            transaction_hash,
        }),
    ))
}

// POST /api/chain/transfer
pub async fn transfer(
    State(state): State<AppState>,
    Json(payload): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, (StatusCode, Json<ErrorResponse>)> {
    if payload.caller.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "caller is required".to_string(),
            }),
        ));
    }

    // A transfer is never attempted with an unresolved id
    let store = DbMetadataStore::new(&state.db);
    let scan = ScanPayload {
        id: payload.product_id,
        transaction_hash: payload.transaction_hash.clone(),
        ..Default::default()
    };
    let id = match resolve_product_id(&state.ledger, &store, &scan)
        .await
        .map_err(ledger_error)?
    {
        Resolution::Resolved(id) => id,
        Resolution::Unresolved => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: "Cannot resolve product identity".to_string(),
                }),
            ));
        }
    };

    let product = state.ledger.product(id).await.map_err(ledger_error)?;
    if !product.exists {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Product {} not found on ledger", id),
            }),
        ));
    }

    let metadata = match store.find_by_batch_id(&product.batch_id).await {
        Ok(row) => row,
        Err(e) => {
            warn!(product_id = id, error = %e, "Metadata store unreachable during transfer");
            None
        }
    };
    let view = MergedProductView::merge(product, metadata.as_ref());

    let recipient = next_recipient(&view, &payload.caller, payload.consumer_address.as_deref())
        .map_err(|e| {
            let status = match e {
                TransferError::MissingConsumerAddress => StatusCode::BAD_REQUEST,
                TransferError::NotCurrentOwner | TransferError::Unauthorized => {
                    StatusCode::FORBIDDEN
                }
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })?;

    let transaction_hash = state
        .ledger
        .transfer_ownership(id, &recipient)
        .await
        .map_err(ledger_error)?;

    info!(product_id = id, recipient = %recipient, "Transfer submitted");

    Ok(Json(TransferResponse {
        success: true,
        transaction_hash,
        recipient,
    }))
}
