//! In-memory fakes for the ledger and metadata store capabilities

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sea_orm::DbErr;

use crate::entities::product_metadata;
use crate::services::ledger::{LedgerError, OnChainProduct, ProductLedger, ProductStatus};
use crate::services::store::MetadataStore;

pub fn product(id: u64, batch_id: &str, owner: &str) -> OnChainProduct {
    OnChainProduct {
        id,
        name: format!("Product {}", id),
        batch_id: batch_id.to_string(),
        manufacturer: owner.to_string(),
        assigned_wholesaler: "0xWHOLESALER".to_string(),
        assigned_retailer: "0xRETAILER".to_string(),
        current_owner: owner.to_string(),
        status: ProductStatus::Created,
        timestamp: 1_700_000_000 + id,
        exists: true,
    }
}

pub fn metadata_row(hash: &str, batch_id: &str, manufacturer: &str) -> product_metadata::Model {
    product_metadata::Model {
        id: 1,
        transaction_hash: hash.to_string(),
        manufacturer: manufacturer.to_string(),
        name: "Stored product".to_string(),
        batch_id: batch_id.to_string(),
        wholesaler: "0xWHOLESALER".to_string(),
        retailer: "0xRETAILER".to_string(),
        description: None,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        qr_code: "data:image/png;base64,dGVzdA==".to_string(),
        product_id: None,
        stored_at: None,
    }
}

#[derive(Default)]
pub struct FakeLedger {
    products: HashMap<u64, OnChainProduct>,
    owned: HashMap<String, Vec<u64>>,
    created: HashMap<String, Vec<u64>>,
    by_batch: HashMap<String, u64>,
    failing: HashSet<u64>,
    call_count: AtomicUsize,
}

impl FakeLedger {
    pub fn insert(&mut self, p: OnChainProduct) {
        self.by_batch.insert(p.batch_id.clone(), p.id);
        self.products.insert(p.id, p);
    }

    pub fn set_owned(&mut self, owner: &str, ids: Vec<u64>) {
        self.owned.insert(owner.to_string(), ids);
    }

    pub fn set_created(&mut self, creator: &str, ids: Vec<u64>) {
        self.created.insert(creator.to_string(), ids);
    }

    /// Register a batch id without a full record, e.g. for resolution tests.
    pub fn set_batch(&mut self, batch_id: &str, id: u64) {
        self.by_batch.insert(batch_id.to_string(), id);
    }

    pub fn fail_product(&mut self, id: u64) {
        self.failing.insert(id);
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.call_count.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductLedger for FakeLedger {
    async fn product(&self, id: u64) -> Result<OnChainProduct, LedgerError> {
        self.tick();
        if self.failing.contains(&id) {
            return Err(LedgerError::ContractCallError(format!(
                "getProduct({}) failed: injected",
                id
            )));
        }
        // The contract returns a zero-valued record with exists=false for
        // unknown ids rather than reverting.
        Ok(self.products.get(&id).cloned().unwrap_or(OnChainProduct {
            id,
            name: String::new(),
            batch_id: String::new(),
            manufacturer: String::new(),
            assigned_wholesaler: String::new(),
            assigned_retailer: String::new(),
            current_owner: String::new(),
            status: ProductStatus::Created,
            timestamp: 0,
            exists: false,
        }))
    }

    async fn product_id_by_batch(&self, batch_id: &str) -> Result<u64, LedgerError> {
        self.tick();
        Ok(self.by_batch.get(batch_id).copied().unwrap_or(0))
    }

    async fn products_by_owner(&self, owner: &str) -> Result<Vec<u64>, LedgerError> {
        self.tick();
        Ok(self.owned.get(owner).cloned().unwrap_or_default())
    }

    async fn products_created_by(&self, creator: &str) -> Result<Vec<u64>, LedgerError> {
        self.tick();
        Ok(self.created.get(creator).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeStore {
    rows: Vec<product_metadata::Model>,
    fail: bool,
    call_count: AtomicUsize,
}

impl FakeStore {
    pub fn failing() -> Self {
        FakeStore {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_row(
        hash: &str,
        batch_id: &str,
        manufacturer: &str,
        description: Option<&str>,
    ) -> Self {
        let mut row = metadata_row(hash, batch_id, manufacturer);
        row.description = description.map(str::to_string);
        FakeStore {
            rows: vec![row],
            ..Default::default()
        }
    }

    pub fn push(&mut self, row: product_metadata::Model) {
        self.rows.push(row);
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn guard(&self) -> Result<(), DbErr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(DbErr::Custom("injected store failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MetadataStore for FakeStore {
    async fn find_by_transaction_hash(
        &self,
        hash: &str,
    ) -> Result<Option<product_metadata::Model>, DbErr> {
        self.guard()?;
        Ok(self
            .rows
            .iter()
            .find(|m| m.transaction_hash == hash)
            .cloned())
    }

    async fn find_by_manufacturer(
        &self,
        address: &str,
    ) -> Result<Vec<product_metadata::Model>, DbErr> {
        self.guard()?;
        Ok(self
            .rows
            .iter()
            .filter(|m| m.manufacturer == address)
            .cloned()
            .collect())
    }

    async fn find_by_batch_id(
        &self,
        batch_id: &str,
    ) -> Result<Option<product_metadata::Model>, DbErr> {
        self.guard()?;
        Ok(self.rows.iter().find(|m| m.batch_id == batch_id).cloned())
    }
}
