//! Metadata store read capability
//!
//! Read surface over the `product_metadata` collection as consumed by the
//! reconciliation and resolution cores. Rows are returned in insertion
//! (primary key) order, so a first-match join on batch id is deterministic
//! when duplicate batch ids exist.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::{prelude::*, product_metadata};

#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn find_by_transaction_hash(
        &self,
        hash: &str,
    ) -> Result<Option<product_metadata::Model>, DbErr>;

    async fn find_by_manufacturer(
        &self,
        address: &str,
    ) -> Result<Vec<product_metadata::Model>, DbErr>;

    async fn find_by_batch_id(
        &self,
        batch_id: &str,
    ) -> Result<Option<product_metadata::Model>, DbErr>;
}

/// SeaORM-backed store
pub struct DbMetadataStore<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DbMetadataStore<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetadataStore for DbMetadataStore<'_> {
    async fn find_by_transaction_hash(
        &self,
        hash: &str,
    ) -> Result<Option<product_metadata::Model>, DbErr> {
        ProductMetadata::find()
            .filter(product_metadata::Column::TransactionHash.eq(hash))
            .order_by_asc(product_metadata::Column::Id)
            .one(self.db)
            .await
    }

    async fn find_by_manufacturer(
        &self,
        address: &str,
    ) -> Result<Vec<product_metadata::Model>, DbErr> {
        ProductMetadata::find()
            .filter(product_metadata::Column::Manufacturer.eq(address))
            .order_by_asc(product_metadata::Column::Id)
            .all(self.db)
            .await
    }

    async fn find_by_batch_id(
        &self,
        batch_id: &str,
    ) -> Result<Option<product_metadata::Model>, DbErr> {
        ProductMetadata::find()
            .filter(product_metadata::Column::BatchId.eq(batch_id))
            .order_by_asc(product_metadata::Column::Id)
            .one(self.db)
            .await
    }
}
