//! Supply-chain ledger RPC client
//!
//! Wraps the external SupplyChain contract: read calls (by id, by owner, by
//! creator, by batch) and the two state-changing calls (create, transfer).
//! The contract owns the status state machine; this client only decodes it.

use alloy::{
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    signers::local::PrivateKeySigner,
    sol,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use std::str::FromStr;
use tracing::{debug, info};

// Contract interface, matching the deployed SupplyChain ABI
sol! {
    #[sol(rpc)]
    interface ISupplyChain {
        struct Product {
            uint256 id;
            string name;
            string batchId;
            address manufacturer;
            address assignedWholesaler;
            address assignedRetailer;
            address currentOwner;
            uint8 status;
            uint256 timestamp;
            bool exists;
        }

        function createProduct(string _name, string _batchId, address _wholesaler, address _retailer) external;
        function transferOwnership(uint256 _id, address _newOwner) external;
        function getProduct(uint256 _id) external view returns (Product memory);
        function getProductIdByBatchId(string _batchId) external view returns (uint256);
        function getProductsByOwner(address _owner) external view returns (uint256[] memory);
        function getProductsCreatedBy(address _creator) external view returns (uint256[] memory);
    }
}

/// Product lifecycle status as stored on chain (uint8, 0-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Created,
    InTransit,
    InWarehouse,
    Delivered,
}

impl ProductStatus {
    pub fn code(self) -> u8 {
        match self {
            ProductStatus::Created => 0,
            ProductStatus::InTransit => 1,
            ProductStatus::InWarehouse => 2,
            ProductStatus::Delivered => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProductStatus::Created => "Created",
            ProductStatus::InTransit => "In Transit",
            ProductStatus::InWarehouse => "In Warehouse",
            ProductStatus::Delivered => "Delivered",
        }
    }
}

impl TryFrom<u8> for ProductStatus {
    type Error = LedgerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ProductStatus::Created),
            1 => Ok(ProductStatus::InTransit),
            2 => Ok(ProductStatus::InWarehouse),
            3 => Ok(ProductStatus::Delivered),
            other => Err(LedgerError::ValueOutOfRange(format!(
                "unknown product status {}",
                other
            ))),
        }
    }
}

/// On-chain product record, narrowed to host integer types
#[derive(Debug, Clone)]
pub struct OnChainProduct {
    pub id: u64,
    pub name: String,
    pub batch_id: String,
    pub manufacturer: String,
    pub assigned_wholesaler: String,
    pub assigned_retailer: String,
    pub current_owner: String,
    pub status: ProductStatus,
    pub timestamp: u64,
    pub exists: bool,
}

impl TryFrom<ISupplyChain::Product> for OnChainProduct {
    type Error = LedgerError;

    fn try_from(p: ISupplyChain::Product) -> Result<Self, Self::Error> {
        Ok(OnChainProduct {
            id: narrow_u64(p.id, "id")?,
            name: p.name,
            batch_id: p.batchId,
            manufacturer: p.manufacturer.to_string(),
            assigned_wholesaler: p.assignedWholesaler.to_string(),
            assigned_retailer: p.assignedRetailer.to_string(),
            current_owner: p.currentOwner.to_string(),
            status: ProductStatus::try_from(p.status)?,
            timestamp: narrow_u64(p.timestamp, "timestamp")?,
            exists: p.exists,
        })
    }
}

// Ledger integers are uint256 on the wire. The contract's counters stay far
// below u64 for this domain, so an overflow is a decoding bug and must fail
// loudly instead of truncating.
fn narrow_u64(value: U256, field: &'static str) -> Result<u64, LedgerError> {
    u64::try_from(value).map_err(|_| {
        LedgerError::ValueOutOfRange(format!("{} {} exceeds u64 range", field, value))
    })
}

/// Error types for ledger calls
#[derive(Debug)]
pub enum LedgerError {
    InvalidAddress(String),
    ProviderError(String),
    ContractCallError(String),
    ValueOutOfRange(String),
    SignerUnavailable,
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            LedgerError::ProviderError(msg) => write!(f, "Provider error: {}", msg),
            LedgerError::ContractCallError(msg) => write!(f, "Contract call error: {}", msg),
            LedgerError::ValueOutOfRange(msg) => write!(f, "Value out of range: {}", msg),
            LedgerError::SignerUnavailable => {
                write!(f, "No ledger signer configured for state-changing calls")
            }
        }
    }
}

impl std::error::Error for LedgerError {}

/// Read capability surface of the ledger, as consumed by the core.
///
/// The core takes this trait rather than [`LedgerService`] directly so the
/// reconciliation and resolution paths are testable against in-memory fakes.
#[async_trait]
pub trait ProductLedger: Send + Sync {
    async fn product(&self, id: u64) -> Result<OnChainProduct, LedgerError>;
    /// Returns the ledger's not-found sentinel `0` when no product carries
    /// the batch id. Ids start at 1 by construction of the creation counter.
    async fn product_id_by_batch(&self, batch_id: &str) -> Result<u64, LedgerError>;
    async fn products_by_owner(&self, owner: &str) -> Result<Vec<u64>, LedgerError>;
    async fn products_created_by(&self, creator: &str) -> Result<Vec<u64>, LedgerError>;
}

/// RPC-backed ledger client
#[derive(Clone)]
pub struct LedgerService {
    provider: RootProvider<Http<Client>>,
    contract_address: Address,
    rpc_url: String,
    signer: Option<PrivateKeySigner>,
}

impl LedgerService {
    /// Create a new LedgerService.
    ///
    /// Parses configuration only; no RPC round-trip happens here. Call
    /// [`LedgerService::check_connection`] at startup to verify the endpoint.
    pub fn new(
        rpc_url: &str,
        contract_address: &str,
        private_key: Option<&str>,
    ) -> Result<Self, LedgerError> {
        let provider = ProviderBuilder::new().on_http(rpc_url.parse().map_err(|e| {
            LedgerError::ProviderError(format!("Invalid RPC URL: {}", e))
        })?);

        let contract_address = Address::from_str(contract_address).map_err(|e| {
            LedgerError::InvalidAddress(format!("Invalid contract address: {}", e))
        })?;

        let signer = match private_key {
            Some(key) => Some(key.parse::<PrivateKeySigner>().map_err(|e| {
                LedgerError::InvalidAddress(format!("Invalid ledger private key: {}", e))
            })?),
            None => None,
        };

        Ok(Self {
            provider,
            contract_address,
            rpc_url: rpc_url.to_string(),
            signer,
        })
    }

    /// Verify the RPC endpoint responds, returning its chain id.
    pub async fn check_connection(&self) -> Result<u64, LedgerError> {
        let chain_id = self.provider.get_chain_id().await.map_err(|e| {
            LedgerError::ProviderError(format!("Connection failed: {}", e))
        })?;

        info!(
            chain_id = chain_id,
            contract = %self.contract_address,
            signer = self.signer.is_some(),
            "Ledger RPC reachable"
        );

        Ok(chain_id)
    }

    /// Submit `createProduct` and wait for the receipt.
    ///
    /// Requires a configured signer; fails with a revert condition surfaced
    /// as `ContractCallError` when the contract rejects the call.
    pub async fn create_product(
        &self,
        name: &str,
        batch_id: &str,
        wholesaler: &str,
        retailer: &str,
    ) -> Result<String, LedgerError> {
        let wholesaler = Address::from_str(wholesaler).map_err(|e| {
            LedgerError::InvalidAddress(format!("Invalid wholesaler address: {}", e))
        })?;
        let retailer = Address::from_str(retailer).map_err(|e| {
            LedgerError::InvalidAddress(format!("Invalid retailer address: {}", e))
        })?;

        let signer = self.signer.clone().ok_or(LedgerError::SignerUnavailable)?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(EthereumWallet::from(signer))
            .on_http(self.rpc_url.parse().map_err(|e| {
                LedgerError::ProviderError(format!("Invalid RPC URL: {}", e))
            })?);
        let contract = ISupplyChain::new(self.contract_address, &provider);

        let pending = contract
            .createProduct(name.to_string(), batch_id.to_string(), wholesaler, retailer)
            .send()
            .await
            .map_err(|e| {
                LedgerError::ContractCallError(format!("createProduct failed: {}", e))
            })?;

        let receipt = pending.get_receipt().await.map_err(|e| {
            LedgerError::ProviderError(format!("createProduct receipt failed: {}", e))
        })?;

        let tx_hash = receipt.transaction_hash.to_string();
        info!(batch_id = %batch_id, tx_hash = %tx_hash, "Product created on ledger");
        Ok(tx_hash)
    }

    /// Submit `transferOwnership` and wait for the receipt.
    pub async fn transfer_ownership(
        &self,
        id: u64,
        new_owner: &str,
    ) -> Result<String, LedgerError> {
        let new_owner = Address::from_str(new_owner).map_err(|e| {
            LedgerError::InvalidAddress(format!("Invalid recipient address: {}", e))
        })?;

        let signer = self.signer.clone().ok_or(LedgerError::SignerUnavailable)?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(EthereumWallet::from(signer))
            .on_http(self.rpc_url.parse().map_err(|e| {
                LedgerError::ProviderError(format!("Invalid RPC URL: {}", e))
            })?);
        let contract = ISupplyChain::new(self.contract_address, &provider);

        let pending = contract
            .transferOwnership(U256::from(id), new_owner)
            .send()
            .await
            .map_err(|e| {
                LedgerError::ContractCallError(format!("transferOwnership failed: {}", e))
            })?;

        let receipt = pending.get_receipt().await.map_err(|e| {
            LedgerError::ProviderError(format!("transferOwnership receipt failed: {}", e))
        })?;

        let tx_hash = receipt.transaction_hash.to_string();
        info!(product_id = id, recipient = %new_owner, tx_hash = %tx_hash, "Ownership transferred");
        Ok(tx_hash)
    }
}

#[async_trait]
impl ProductLedger for LedgerService {
    async fn product(&self, id: u64) -> Result<OnChainProduct, LedgerError> {
        let contract = ISupplyChain::new(self.contract_address, &self.provider);
        let result = contract
            .getProduct(U256::from(id))
            .call()
            .await
            .map_err(|e| {
                LedgerError::ContractCallError(format!("getProduct({}) failed: {}", id, e))
            })?;

        OnChainProduct::try_from(result._0)
    }

    async fn product_id_by_batch(&self, batch_id: &str) -> Result<u64, LedgerError> {
        let contract = ISupplyChain::new(self.contract_address, &self.provider);
        let result = contract
            .getProductIdByBatchId(batch_id.to_string())
            .call()
            .await
            .map_err(|e| {
                LedgerError::ContractCallError(format!(
                    "getProductIdByBatchId({}) failed: {}",
                    batch_id, e
                ))
            })?;

        let id = narrow_u64(result._0, "id")?;
        debug!(batch_id = %batch_id, id = id, "Resolved batch id on ledger");
        Ok(id)
    }

    async fn products_by_owner(&self, owner: &str) -> Result<Vec<u64>, LedgerError> {
        let owner = Address::from_str(owner).map_err(|e| {
            LedgerError::InvalidAddress(format!("Invalid owner address: {}", e))
        })?;

        let contract = ISupplyChain::new(self.contract_address, &self.provider);
        let result = contract.getProductsByOwner(owner).call().await.map_err(|e| {
            LedgerError::ContractCallError(format!("getProductsByOwner failed: {}", e))
        })?;

        result._0.into_iter().map(|id| narrow_u64(id, "id")).collect()
    }

    async fn products_created_by(&self, creator: &str) -> Result<Vec<u64>, LedgerError> {
        let creator = Address::from_str(creator).map_err(|e| {
            LedgerError::InvalidAddress(format!("Invalid creator address: {}", e))
        })?;

        let contract = ISupplyChain::new(self.contract_address, &self.provider);
        let result = contract
            .getProductsCreatedBy(creator)
            .call()
            .await
            .map_err(|e| {
                LedgerError::ContractCallError(format!("getProductsCreatedBy failed: {}", e))
            })?;

        result._0.into_iter().map(|id| narrow_u64(id, "id")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for code in 0u8..4 {
            let status = ProductStatus::try_from(code).unwrap();
            assert_eq!(status.code(), code);
        }
        assert!(ProductStatus::try_from(4).is_err());
    }

    #[test]
    fn narrowing_rejects_values_beyond_u64() {
        assert_eq!(narrow_u64(U256::from(42u64), "id").unwrap(), 42);
        assert_eq!(narrow_u64(U256::from(u64::MAX), "id").unwrap(), u64::MAX);

        let too_big = U256::from(u64::MAX) + U256::from(1u64);
        assert!(matches!(
            narrow_u64(too_big, "id"),
            Err(LedgerError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn decodes_contract_product() {
        let raw = ISupplyChain::Product {
            id: U256::from(7u64),
            name: "Air Jordan".to_string(),
            batchId: "BATCH-2025-001".to_string(),
            manufacturer: Address::ZERO,
            assignedWholesaler: Address::ZERO,
            assignedRetailer: Address::ZERO,
            currentOwner: Address::ZERO,
            status: 1,
            timestamp: U256::from(1_700_000_000u64),
            exists: true,
        };

        let product = OnChainProduct::try_from(raw).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.status, ProductStatus::InTransit);
        assert_eq!(product.timestamp, 1_700_000_000);
        assert!(product.exists);
    }
}
