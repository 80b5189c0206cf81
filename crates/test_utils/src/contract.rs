//! Transaction store contract suite
//!
//! Behavior every `TransactionStore` must share, whatever its backend. Each
//! case expects an empty store; [`run_store_contract`] asks the factory for a
//! fresh one per case.
//!
//! ```rust,ignore
//! run_store_contract(|| async { Arc::new(InMemoryTransactionStore::new()) as Arc<dyn TransactionStore> }).await;
//! ```

use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use core_kernel::{MonthPeriod, PortError, TransactionId};
use domain_ledger::TransactionStore;

use crate::assertions::{
    assert_empty_summary, assert_listing_ordered, assert_same_ids, assert_summary_totals,
};
use crate::builders::TestTransactionBuilder;
use crate::fixtures::{AmountFixtures, TemporalFixtures};

/// Runs every contract case, each against a fresh empty store
pub async fn run_store_contract<F, Fut>(mut fresh: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Arc<dyn TransactionStore>>,
{
    created_transaction_is_listed_unchanged(fresh().await.as_ref()).await;
    list_bounds_are_inclusive(fresh().await.as_ref()).await;
    list_orders_by_occurrence_then_creation_then_id(fresh().await.as_ref()).await;
    list_without_matches_is_empty(fresh().await.as_ref()).await;
    delete_removes_and_unknown_is_not_found(fresh().await.as_ref()).await;
    duplicate_id_is_rejected(fresh().await.as_ref()).await;
    monthly_summary_totals_one_month(fresh().await.as_ref()).await;
    month_bounds_are_half_open(fresh().await.as_ref()).await;
    empty_month_is_zero(fresh().await.as_ref()).await;
    health_check_is_operational(fresh().await.as_ref()).await;
}

pub async fn created_transaction_is_listed_unchanged(store: &dyn TransactionStore) {
    let tx = TestTransactionBuilder::expense(4_250)
        .with_category("food")
        .with_description("market")
        .build();

    store.create(&tx).await.unwrap();

    let listed = store.list_by_period(tx.occurred_at, tx.occurred_at).await.unwrap();
    assert_eq!(listed, vec![tx]);
}

pub async fn list_bounds_are_inclusive(store: &dyn TransactionStore) {
    let t0 = TemporalFixtures::payday();
    let t1 = t0 + Duration::hours(1);
    let t2 = t0 + Duration::hours(2);
    let first = TestTransactionBuilder::income(1).at(t0).build();
    let middle = TestTransactionBuilder::income(2).at(t1).build();
    let last = TestTransactionBuilder::income(3).at(t2).build();
    for tx in [&last, &first, &middle] {
        store.create(tx).await.unwrap();
    }

    let all = store.list_by_period(t0, t2).await.unwrap();
    assert_same_ids(&all, &[&first, &middle, &last]);

    let inner = store
        .list_by_period(t0 + Duration::seconds(1), t2 - Duration::seconds(1))
        .await
        .unwrap();
    assert_same_ids(&inner, &[&middle]);
}

pub async fn list_orders_by_occurrence_then_creation_then_id(store: &dyn TransactionStore) {
    let at = TemporalFixtures::payday();
    let earlier = TestTransactionBuilder::expense(1)
        .at(at - Duration::minutes(30))
        .created_at(at + Duration::minutes(30))
        .build();
    let created_late = TestTransactionBuilder::income(2)
        .at(at)
        .created_at(at + Duration::minutes(5))
        .build();
    let created_early = TestTransactionBuilder::income(3)
        .at(at)
        .created_at(at + Duration::minutes(1))
        .build();

    // Identical instants; only the id separates them
    let mut ids = [TransactionId::new(), TransactionId::new()];
    ids.sort();
    let twin_low = TestTransactionBuilder::income(4)
        .with_id(ids[0])
        .at(at + Duration::hours(1))
        .build();
    let twin_high = TestTransactionBuilder::income(5)
        .with_id(ids[1])
        .at(at + Duration::hours(1))
        .build();

    for tx in [&twin_high, &created_late, &twin_low, &earlier, &created_early] {
        store.create(tx).await.unwrap();
    }

    let listed = store
        .list_by_period(at - Duration::hours(1), at + Duration::hours(2))
        .await
        .unwrap();

    assert_listing_ordered(&listed);
    assert_same_ids(
        &listed,
        &[&earlier, &created_early, &created_late, &twin_low, &twin_high],
    );
}

pub async fn list_without_matches_is_empty(store: &dyn TransactionStore) {
    store
        .create(&TestTransactionBuilder::income(10).build())
        .await
        .unwrap();

    let listed = store
        .list_by_period(TemporalFixtures::december_start(), TemporalFixtures::december_start())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

pub async fn delete_removes_and_unknown_is_not_found(store: &dyn TransactionStore) {
    let keep = TestTransactionBuilder::income(1).build();
    let remove = TestTransactionBuilder::expense(2).build();
    store.create(&keep).await.unwrap();
    store.create(&remove).await.unwrap();

    store.delete(remove.id).await.unwrap();

    let at = TemporalFixtures::payday();
    assert_same_ids(&store.list_by_period(at, at).await.unwrap(), &[&keep]);

    let err = store.delete(remove.id).await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got {:?}", err);
    let err = store.delete(TransactionId::new()).await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got {:?}", err);
}

pub async fn duplicate_id_is_rejected(store: &dyn TransactionStore) {
    let tx = TestTransactionBuilder::income(7).build();
    store.create(&tx).await.unwrap();

    let err = store.create(&tx).await.unwrap_err();
    assert!(matches!(err, PortError::Conflict { .. }), "expected Conflict, got {:?}", err);

    let at = tx.occurred_at;
    assert_eq!(store.list_by_period(at, at).await.unwrap().len(), 1);
}

pub async fn monthly_summary_totals_one_month(store: &dyn TransactionStore) {
    let salary = TestTransactionBuilder::income(AmountFixtures::SALARY_CENTS)
        .with_category("salary")
        .at(TemporalFixtures::payday())
        .build();
    let rent = TestTransactionBuilder::expense(AmountFixtures::RENT_CENTS)
        .with_category("rent")
        .at(TemporalFixtures::rent_day())
        .build();
    let october = TestTransactionBuilder::income(999)
        .at(TemporalFixtures::november_start() - Duration::seconds(1))
        .build();
    for tx in [&salary, &rent, &october] {
        store.create(tx).await.unwrap();
    }

    let summary = store
        .monthly_summary(TemporalFixtures::november_2025())
        .await
        .unwrap();

    assert_eq!((summary.year, summary.month), (2025, 11));
    assert_summary_totals(
        &summary,
        AmountFixtures::SALARY_CENTS,
        AmountFixtures::RENT_CENTS,
        2,
    );
    assert_eq!(summary.net.value(), AmountFixtures::NET_CENTS);
    assert_eq!(summary.first_tx, Some(salary.occurred_at));
    assert_eq!(summary.last_tx, Some(rent.occurred_at));
}

pub async fn month_bounds_are_half_open(store: &dyn TransactionStore) {
    let opening = TestTransactionBuilder::income(100)
        .at(TemporalFixtures::november_start())
        .build();
    let next_month = TestTransactionBuilder::expense(40)
        .at(TemporalFixtures::december_start())
        .build();
    store.create(&opening).await.unwrap();
    store.create(&next_month).await.unwrap();

    let november = store
        .monthly_summary(TemporalFixtures::november_2025())
        .await
        .unwrap();
    assert_summary_totals(&november, 100, 0, 1);
    assert_eq!(november.first_tx, Some(opening.occurred_at));

    let december = store
        .monthly_summary(MonthPeriod::new(2025, 12).unwrap())
        .await
        .unwrap();
    assert_summary_totals(&december, 0, 40, 1);
}

pub async fn empty_month_is_zero(store: &dyn TransactionStore) {
    store
        .create(&TestTransactionBuilder::income(5).build())
        .await
        .unwrap();

    let summary = store
        .monthly_summary(TemporalFixtures::october_2025())
        .await
        .unwrap();
    assert_empty_summary(&summary);
}

pub async fn health_check_is_operational(store: &dyn TransactionStore) {
    let health = store.health_check().await;
    assert!(health.status.is_operational(), "store unhealthy: {:?}", health);
}
