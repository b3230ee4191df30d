//! Reconciliation of on-chain product state with off-chain metadata
//!
//! The ledger is authoritative for existence, ownership and status; the
//! metadata store is authoritative for descriptive content. A ledger failure
//! aborts the whole call. A store failure degrades to empty metadata, since
//! the descriptive fields are non-essential.

use futures_util::future::try_join_all;
use tracing::{debug, warn};

use crate::models::chain::StatusCount;
use crate::models::merged::MergedProductView;
use crate::services::ledger::{LedgerError, ProductLedger, ProductStatus};
use crate::services::store::MetadataStore;

/// Produce one merged view per distinct product id associated with the
/// identity, as current owner or as original creator, newest first.
///
/// An empty identity (no wallet connected) yields an empty result, never an
/// error. No partial result is returned: the first failing ledger fetch
/// fails the whole call.
pub async fn reconcile_products<L, S>(
    ledger: &L,
    store: &S,
    identity: &str,
) -> Result<Vec<MergedProductView>, LedgerError>
where
    L: ProductLedger + ?Sized,
    S: MetadataStore + ?Sized,
{
    if identity.is_empty() {
        return Ok(Vec::new());
    }

    // Owned and created id sets are independent reads
    let (owned, created) = tokio::try_join!(
        ledger.products_by_owner(identity),
        ledger.products_created_by(identity)
    )?;

    // Union, deduplicated: created-then-still-owned products appear once.
    // Descending id puts the newest products first, and fetching in that
    // order keeps the result order independent of completion order.
    let mut ids: Vec<u64> = owned;
    ids.extend(created);
    ids.sort_unstable_by(|a, b| b.cmp(a));
    ids.dedup();

    debug!(identity, products = ids.len(), "Reconciling products");

    // Fan out the detail fetches; all must land before the merge
    let products = try_join_all(ids.iter().map(|id| ledger.product(*id))).await?;

    // Single bulk metadata fetch, scoped to the identity as manufacturer
    let metadata = match store.find_by_manufacturer(identity).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(identity, error = %e, "Metadata store unreachable, merging without metadata");
            Vec::new()
        }
    };

    Ok(products
        .into_iter()
        .map(|product| {
            let row = metadata.iter().find(|m| m.batch_id == product.batch_id);
            MergedProductView::merge(product, row)
        })
        .collect())
}

/// Bucket a reconciled set by status for the dashboard chart. Every status
/// appears, zero counts included.
pub fn status_summary(views: &[MergedProductView]) -> Vec<StatusCount> {
    [
        ProductStatus::Created,
        ProductStatus::InTransit,
        ProductStatus::InWarehouse,
        ProductStatus::Delivered,
    ]
    .into_iter()
    .map(|status| StatusCount {
        status: status.code(),
        label: status.label().to_string(),
        count: views.iter().filter(|v| v.status == status.code()).count(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::merged::TRANSACTION_NOT_RECORDED;
    use crate::services::testing::{product, FakeLedger, FakeStore};

    #[tokio::test]
    async fn empty_identity_is_inapplicable_not_an_error() {
        let ledger = FakeLedger::default();
        let store = FakeStore::default();

        let views = reconcile_products(&ledger, &store, "").await.unwrap();
        assert!(views.is_empty());
        assert_eq!(ledger.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_identity_yields_empty_result_even_with_store_down() {
        let ledger = FakeLedger::default();
        let store = FakeStore::failing();

        let views = reconcile_products(&ledger, &store, "0xAAA").await.unwrap();
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn owned_and_created_sets_are_deduplicated() {
        let mut ledger = FakeLedger::default();
        ledger.insert(product(3, "B3", "0xAAA"));
        ledger.insert(product(5, "B5", "0xAAA"));
        ledger.set_owned("0xAAA", vec![3, 5]);
        ledger.set_created("0xAAA", vec![3]);
        let store = FakeStore::default();

        let views = reconcile_products(&ledger, &store, "0xAAA").await.unwrap();
        let ids: Vec<u64> = views.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![5, 3]);
    }

    #[tokio::test]
    async fn results_are_ordered_by_descending_id() {
        let mut ledger = FakeLedger::default();
        for id in [2, 9, 4, 7] {
            ledger.insert(product(id, &format!("B{}", id), "0xAAA"));
        }
        ledger.set_owned("0xAAA", vec![2, 9]);
        ledger.set_created("0xAAA", vec![4, 7]);
        let store = FakeStore::default();

        let views = reconcile_products(&ledger, &store, "0xAAA").await.unwrap();
        let ids: Vec<u64> = views.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![9, 7, 4, 2]);
    }

    #[tokio::test]
    async fn missing_metadata_falls_back_to_sentinels() {
        let mut ledger = FakeLedger::default();
        ledger.insert(product(1, "B1", "0xAAA"));
        ledger.set_created("0xAAA", vec![1]);
        // A row for a different batch must not match
        let store = FakeStore::with_row("0xdead", "OTHER-BATCH", "0xAAA", None);

        let views = reconcile_products(&ledger, &store, "0xAAA").await.unwrap();
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.qr_code, None);
        assert_eq!(view.transaction_hash, TRANSACTION_NOT_RECORDED);
        assert_eq!(view.status, 0);
        assert_eq!(view.id, 1);
        assert_eq!(view.current_owner, "0xAAA");
    }

    #[tokio::test]
    async fn matching_batch_row_supplies_descriptive_fields() {
        let mut ledger = FakeLedger::default();
        ledger.insert(product(1, "B1", "0xAAA"));
        ledger.set_created("0xAAA", vec![1]);
        let store = FakeStore::with_row("0xabc", "B1", "0xAAA", Some("organic cotton"));

        let views = reconcile_products(&ledger, &store, "0xAAA").await.unwrap();
        let view = &views[0];
        assert_eq!(view.transaction_hash, "0xabc");
        assert_eq!(view.description.as_deref(), Some("organic cotton"));
        assert!(view.qr_code.is_some());
    }

    #[tokio::test]
    async fn store_failure_degrades_instead_of_failing() {
        let mut ledger = FakeLedger::default();
        ledger.insert(product(1, "B1", "0xAAA"));
        ledger.set_owned("0xAAA", vec![1]);
        let store = FakeStore::failing();

        let views = reconcile_products(&ledger, &store, "0xAAA").await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].transaction_hash, TRANSACTION_NOT_RECORDED);
    }

    #[tokio::test]
    async fn one_failing_detail_fetch_fails_the_whole_call() {
        let mut ledger = FakeLedger::default();
        ledger.insert(product(1, "B1", "0xAAA"));
        ledger.insert(product(2, "B2", "0xAAA"));
        ledger.set_owned("0xAAA", vec![1, 2]);
        ledger.fail_product(2);
        let store = FakeStore::default();

        let result = reconcile_products(&ledger, &store, "0xAAA").await;
        assert!(matches!(result, Err(LedgerError::ContractCallError(_))));
    }

    #[test]
    fn status_summary_includes_zero_buckets() {
        let mut ledger_product = product(1, "B1", "0xAAA");
        ledger_product.status = ProductStatus::Delivered;
        let views = vec![
            MergedProductView::merge(ledger_product, None),
            MergedProductView::merge(product(2, "B2", "0xAAA"), None),
            MergedProductView::merge(product(3, "B3", "0xAAA"), None),
        ];

        let summary = status_summary(&views);
        assert_eq!(summary.len(), 4);
        assert_eq!(summary[0].count, 2); // Created
        assert_eq!(summary[1].count, 0); // In Transit
        assert_eq!(summary[3].count, 1); // Delivered
        assert_eq!(summary[3].label, "Delivered");
    }
}
