use serde::{Deserialize, Serialize};

use crate::models::merged::MergedProductView;

/// Decoded scan payload. QR labels encode `{transactionHash, batchId,
/// manufacturer}`; older labels may also embed the numeric `id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanPayload {
    pub id: Option<u64>,
    pub transaction_hash: Option<String>,
    pub batch_id: Option<String>,
    pub manufacturer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub resolved: bool,
    pub product_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainProductsResponse {
    pub count: usize,
    pub products: Vec<MergedProductView>,
}

/// Per-status bucket for the dashboard chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: u8,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummaryResponse {
    pub total: usize,
    pub counts: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub batch_id: String,
    pub wholesaler: String,
    pub retailer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductResponse {
    pub success: bool,
    pub transaction_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Resolved numeric id, when the caller already has it
    pub product_id: Option<u64>,
    /// Creation transaction hash from the scanned label, for resolution
    pub transaction_hash: Option<String>,
    /// Wallet address of the party requesting the transfer
    pub caller: String,
    /// Required when the caller is the assigned retailer
    pub consumer_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub success: bool,
    pub transaction_hash: String,
    pub recipient: String,
}
