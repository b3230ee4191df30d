//! SeaORM Entity for off-chain product metadata
//!
//! One row per on-chain product creation. Written once by the store endpoint
//! right after the ledger write succeeds; never updated or deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "product_metadata")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Hash of the ledger transaction that created the product (0x format, 66 chars)
    pub transaction_hash: String,
    /// Manufacturer wallet address (0x format, 42 chars)
    pub manufacturer: String,
    /// Product name duplicated from creation-time input
    pub name: String,
    /// Manufacturer-assigned batch identifier; join key toward the on-chain record
    pub batch_id: String,
    /// Assigned wholesaler address duplicated from creation-time input
    pub wholesaler: String,
    /// Assigned retailer address duplicated from creation-time input
    pub retailer: String,
    /// Free-text description
    pub description: Option<String>,
    /// Client-supplied timestamp string. Untrusted: display only, never an
    /// ordering or audit source (the ledger timestamp is the trustworthy one).
    pub created_at: String,
    /// QR label as a base64 PNG data URI
    pub qr_code: String,
    /// On-chain product id when the writer knew it at store time
    pub product_id: Option<i64>,
    /// Server-side insertion time
    pub stored_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
