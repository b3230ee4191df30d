//! Metadata store HTTP surface

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, Set};
use tracing::info;

use crate::entities::product_metadata;
use crate::models::product::{
    ErrorResponse, OwnerProductsResponse, ProductLookupResponse, StoreProductRequest,
    StoreProductResponse,
};
use crate::services::qr::{self, QrPayload};
use crate::services::store::{DbMetadataStore, MetadataStore};
use crate::AppState;

// POST /api/products
pub async fn store_product(
    State(state): State<AppState>,
    Json(payload): Json<StoreProductRequest>,
) -> Result<(StatusCode, Json<StoreProductResponse>), (StatusCode, Json<ErrorResponse>)> {
    // Missing input is surfaced before the QR render or any database call
    let required = [
        (&payload.transaction_hash, "transactionHash"),
        (&payload.manufacturer, "manufacturer"),
        (&payload.name, "name"),
        (&payload.batch_id, "batchId"),
        (&payload.wholesaler, "wholesaler"),
        (&payload.retailer, "retailer"),
        (&payload.created_at, "createdAt"),
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

    let qr_code = qr::encode_label(&QrPayload {
        transaction_hash: payload.transaction_hash.clone(),
        batch_id: payload.batch_id.clone(),
        manufacturer: payload.manufacturer.clone(),
    })
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("QR generation failed: {}", e),
            }),
        )
    })?;

    let record = product_metadata::ActiveModel {
        transaction_hash: Set(payload.transaction_hash),
        manufacturer: Set(payload.manufacturer),
        name: Set(payload.name),
        batch_id: Set(payload.batch_id),
        wholesaler: Set(payload.wholesaler),
        retailer: Set(payload.retailer),
        description: Set(payload.description),
        created_at: Set(payload.created_at),
        qr_code: Set(qr_code),
        product_id: Set(payload.product_id),
        ..Default::default()
    };

    let stored = record.insert(&state.db).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Database error: {}", e),
            }),
        )
    })?;

    info!(
        transaction_hash = %stored.transaction_hash,
        batch_id = %stored.batch_id,
        "Product metadata stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(StoreProductResponse {
            success: true,
            message: "Product stored successfully".to_string(),
            data: stored,
        }),
    ))
}

// GET /api/products/transaction/{transaction_hash}
pub async fn get_by_transaction(
    State(state): State<AppState>,
    Path(transaction_hash): Path<String>,
) -> Result<Json<ProductLookupResponse>, (StatusCode, Json<ErrorResponse>)> {
    let product = DbMetadataStore::new(&state.db)
        .find_by_transaction_hash(&transaction_hash)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Database error: {}", e),
                }),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Product not found".to_string(),
                }),
            )
        })?;

    Ok(Json(ProductLookupResponse {
        success: true,
        product,
    }))
}

// GET /api/products/owner/{address}
pub async fn get_by_owner(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<OwnerProductsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let data = DbMetadataStore::new(&state.db)
        .find_by_manufacturer(&address)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Database error: {}", e),
                }),
            )
        })?;

    Ok(Json(OwnerProductsResponse {
        success: true,
        count: data.len(),
        data,
    }))
}
