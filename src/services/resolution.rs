//! Product identity resolution for scanned labels
//!
//! A scanned payload carries the creation transaction hash but not always the
//! numeric product id. Resolution walks a fallback chain, each step attempted
//! only when the prior one yielded nothing:
//!
//! 1. the id embedded in the payload itself,
//! 2. the id recorded on the metadata row for the transaction hash,
//! 3. the ledger's batch-id index, fed with the metadata row's batch id.
//!
//! The ledger's not-found sentinel is the integer zero; ids start at 1, so a
//! returned zero is always `Unresolved`, never a valid id.

use tracing::warn;

use crate::models::chain::ScanPayload;
use crate::services::ledger::{LedgerError, ProductLedger};
use crate::services::store::MetadataStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved(u64),
    Unresolved,
}

impl Resolution {
    pub fn product_id(self) -> Option<u64> {
        match self {
            Resolution::Resolved(id) => Some(id),
            Resolution::Unresolved => None,
        }
    }
}

/// Resolve the numeric product id for a decoded scan payload.
///
/// A ledger failure is surfaced; a store failure is absorbed (the record
/// stays usable read-only, so resolution reports `Unresolved` rather than
/// failing). Callers must refuse mutating operations on `Unresolved`.
pub async fn resolve_product_id<L, S>(
    ledger: &L,
    store: &S,
    payload: &ScanPayload,
) -> Result<Resolution, LedgerError>
where
    L: ProductLedger + ?Sized,
    S: MetadataStore + ?Sized,
{
    // Step 1: id embedded in the label
    if let Some(id) = payload.id {
        if id > 0 {
            return Ok(Resolution::Resolved(id));
        }
    }

    // Step 2: metadata record for the creation transaction
    let Some(hash) = payload.transaction_hash.as_deref() else {
        return Ok(Resolution::Unresolved);
    };

    let record = match store.find_by_transaction_hash(hash).await {
        Ok(record) => record,
        Err(e) => {
            warn!(transaction_hash = hash, error = %e, "Metadata store unreachable during resolution");
            None
        }
    };

    let Some(record) = record else {
        return Ok(Resolution::Unresolved);
    };

    if let Some(id) = record.product_id {
        if id > 0 {
            return Ok(Resolution::Resolved(id as u64));
        }
    }

    // Step 3: ledger batch-id index, zero meaning not found
    if record.batch_id.is_empty() {
        return Ok(Resolution::Unresolved);
    }

    let id = ledger.product_id_by_batch(&record.batch_id).await?;
    if id > 0 {
        Ok(Resolution::Resolved(id))
    } else {
        Ok(Resolution::Unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{metadata_row, FakeLedger, FakeStore};

    fn payload(id: Option<u64>, hash: Option<&str>) -> ScanPayload {
        ScanPayload {
            id,
            transaction_hash: hash.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn embedded_id_short_circuits_all_lookups() {
        let ledger = FakeLedger::default();
        let store = FakeStore::default();

        let resolution = resolve_product_id(&ledger, &store, &payload(Some(7), Some("0xabc")))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Resolved(7));
        assert_eq!(ledger.calls(), 0);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn zero_embedded_id_is_not_a_resolution() {
        let ledger = FakeLedger::default();
        let store = FakeStore::default();

        let resolution = resolve_product_id(&ledger, &store, &payload(Some(0), None))
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn metadata_record_id_wins_over_ledger_lookup() {
        let ledger = FakeLedger::default();
        let mut store = FakeStore::default();
        let mut row = metadata_row("0xabc", "B1", "0xAAA");
        row.product_id = Some(9);
        store.push(row);

        let resolution = resolve_product_id(&ledger, &store, &payload(None, Some("0xabc")))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Resolved(9));
        assert_eq!(ledger.calls(), 0);
    }

    #[tokio::test]
    async fn batch_id_falls_through_to_the_ledger() {
        let mut ledger = FakeLedger::default();
        ledger.set_batch("B1", 42);
        let mut store = FakeStore::default();
        store.push(metadata_row("0xabc", "B1", "0xAAA"));

        let resolution = resolve_product_id(&ledger, &store, &payload(None, Some("0xabc")))
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Resolved(42));
    }

    #[tokio::test]
    async fn ledger_zero_sentinel_means_unresolved() {
        let ledger = FakeLedger::default();
        let mut store = FakeStore::default();
        store.push(metadata_row("0xabc", "B1", "0xAAA"));

        let resolution = resolve_product_id(&ledger, &store, &payload(None, Some("0xabc")))
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn missing_metadata_record_is_unresolved() {
        let ledger = FakeLedger::default();
        let store = FakeStore::default();

        let resolution = resolve_product_id(&ledger, &store, &payload(None, Some("0xabc")))
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn store_failure_is_absorbed_as_unresolved() {
        let ledger = FakeLedger::default();
        let store = FakeStore::failing();

        let resolution = resolve_product_id(&ledger, &store, &payload(None, Some("0xabc")))
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
    }
}
