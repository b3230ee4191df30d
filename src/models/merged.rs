//! Read-time join of a ledger record with its off-chain metadata row
//!
//! Never persisted; recomputed on every fetch. The ledger wins for identity
//! and state fields, the metadata row wins for descriptive fields.

use serde::{Deserialize, Serialize};

use crate::entities::product_metadata;
use crate::services::ledger::OnChainProduct;

/// Sentinel for products whose creation transaction was never written to the
/// metadata store.
pub const TRANSACTION_NOT_RECORDED: &str = "Not stored in DB";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedProductView {
    pub id: u64,
    pub name: String,
    pub batch_id: String,
    pub manufacturer: String,
    pub assigned_wholesaler: String,
    pub assigned_retailer: String,
    pub current_owner: String,
    pub status: u8,
    pub status_label: String,
    pub timestamp: u64,
    pub transaction_hash: String,
    pub description: Option<String>,
    pub qr_code: Option<String>,
    pub created_at: Option<String>,
}

impl MergedProductView {
    /// Build the merged view. `id`, `status`, `currentOwner`, `timestamp` and
    /// the role addresses always come from the ledger record; `description`,
    /// `qrCode` and the display-only `createdAt` only exist in metadata.
    pub fn merge(product: OnChainProduct, metadata: Option<&product_metadata::Model>) -> Self {
        let name = if product.name.is_empty() {
            metadata.map(|m| m.name.clone()).unwrap_or_default()
        } else {
            product.name
        };

        MergedProductView {
            id: product.id,
            name,
            batch_id: product.batch_id,
            manufacturer: product.manufacturer,
            assigned_wholesaler: product.assigned_wholesaler,
            assigned_retailer: product.assigned_retailer,
            current_owner: product.current_owner,
            status: product.status.code(),
            status_label: product.status.label().to_string(),
            timestamp: product.timestamp,
            transaction_hash: metadata
                .map(|m| m.transaction_hash.clone())
                .unwrap_or_else(|| TRANSACTION_NOT_RECORDED.to_string()),
            description: metadata.and_then(|m| m.description.clone()),
            qr_code: metadata.map(|m| m.qr_code.clone()),
            created_at: metadata.map(|m| m.created_at.clone()),
        }
    }
}
