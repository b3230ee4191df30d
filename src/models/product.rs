use serde::{Deserialize, Serialize};

use crate::entities::product_metadata;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProductRequest {
    pub transaction_hash: String,
    pub manufacturer: String,
    pub name: String,
    pub batch_id: String,
    pub wholesaler: String,
    pub retailer: String,
    pub description: Option<String>,
    pub created_at: String,
    /// On-chain id when the caller already knows it
    pub product_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProductResponse {
    pub success: bool,
    pub message: String,
    pub data: product_metadata::Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductLookupResponse {
    pub success: bool,
    pub product: product_metadata::Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerProductsResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<product_metadata::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
