//! Integration tests for checkmate-store
//!
//! These tests verify the record lifecycle, not-found handling and
//! concurrent access through the connection pool.

use checkmate_domain::{CheckStatus, ClaimStore, FactCheckId, Resolution, Verdict};
use checkmate_store::{PoolConfig, SqliteStore, StoreError};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn test_store_initialization() {
    let store = SqliteStore::in_memory();
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_create_assigns_distinct_ids() {
    let store = SqliteStore::in_memory().unwrap();

    let a = store.create("First claim").unwrap();
    let b = store.create("Second claim").unwrap();

    assert_ne!(a, b);
    assert!(b > a, "Ids should increase");
}

#[test]
fn test_update_completes_record() {
    let store = SqliteStore::in_memory().unwrap();
    let id = store.create("The Earth is round.").unwrap();
    let before = store.get_by_id(id).unwrap().unwrap();

    let resolution = Resolution::completed(Verdict::True, "Confirmed by multiple sources.")
        .with_source_url("https://www.nasa.gov/earth");
    store.update(id, &resolution).unwrap();

    let record = store.get_by_id(id).unwrap().unwrap();
    assert_eq!(record.status, CheckStatus::Completed);
    assert_eq!(record.result.as_deref(), Some("true"));
    assert_eq!(record.analysis.as_deref(), Some("Confirmed by multiple sources."));
    assert_eq!(record.source_url.as_deref(), Some("https://www.nasa.gov/earth"));
    assert_eq!(record.claim, before.claim);
    assert_eq!(record.created_at, before.created_at);
    assert!(record.updated_at >= before.updated_at);
}

#[test]
fn test_update_error_record() {
    let store = SqliteStore::in_memory().unwrap();
    let id = store.create("Some claim").unwrap();

    store
        .update(id, &Resolution::failed("Model request failed: connection refused"))
        .unwrap();

    let record = store.get_by_id(id).unwrap().unwrap();
    assert_eq!(record.status, CheckStatus::Error);
    assert_eq!(record.result.as_deref(), Some("error"));
    assert!(record.analysis.unwrap().contains("connection refused"));
    assert!(record.source_url.is_none());
}

#[test]
fn test_update_nonexistent_reports_not_found() {
    let store = SqliteStore::in_memory().unwrap();
    let missing = FactCheckId::from_value(999);

    let result = store.update(missing, &Resolution::completed(Verdict::False, "x"));
    match result {
        Err(StoreError::NotFound(id)) => assert_eq!(id, missing),
        other => panic!("Expected NotFound, got {:?}", other),
    }

    assert!(store.get_by_id(missing).unwrap().is_none());
    assert!(store.list_recent(10).unwrap().is_empty(), "No row should be created");
}

#[test]
fn test_terminal_status_is_final() {
    let store = SqliteStore::in_memory().unwrap();
    let id = store.create("Claim").unwrap();

    store
        .update(id, &Resolution::completed(Verdict::PartiallyTrue, "first"))
        .unwrap();

    let second = store.update(id, &Resolution::failed("second"));
    assert!(matches!(second, Err(StoreError::InvalidTransition(_))));

    let record = store.get_by_id(id).unwrap().unwrap();
    assert_eq!(record.status, CheckStatus::Completed);
    assert_eq!(record.result.as_deref(), Some("partially-true"));
    assert_eq!(record.analysis.as_deref(), Some("first"));
}

#[test]
fn test_get_missing_returns_none() {
    let store = SqliteStore::in_memory().unwrap();
    assert!(store.get_by_id(FactCheckId::from_value(1)).unwrap().is_none());
}

#[test]
fn test_list_recent_orders_newest_first() {
    let store = SqliteStore::in_memory().unwrap();
    let ids: Vec<_> = (0..5)
        .map(|i| store.create(&format!("Claim {}", i)).unwrap())
        .collect();

    let recent = store.list_recent(3).unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].id, ids[4]);
    assert_eq!(recent[1].id, ids[3]);
    assert_eq!(recent[2].id, ids[2]);
}

#[test]
fn test_persistence_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkmate.db");

    let id = {
        let store = SqliteStore::new(&path).unwrap();
        let id = store.create("Water boils at 100C at sea level.").unwrap();
        store
            .update(id, &Resolution::completed(Verdict::True, "Standard pressure."))
            .unwrap();
        id
    };

    let reopened = SqliteStore::new(&path).unwrap();
    let record = reopened.get_by_id(id).unwrap().unwrap();
    assert_eq!(record.status, CheckStatus::Completed);
    assert_eq!(record.analysis.as_deref(), Some("Standard pressure."));
}

#[test]
fn test_concurrent_sessions_share_pool() {
    let dir = tempfile::tempdir().unwrap();
    let config = PoolConfig {
        max_size: 3,
        ..Default::default()
    };
    let store = Arc::new(SqliteStore::with_pool_config(dir.path().join("pool.db"), config).unwrap());

    let handles: Vec<_> = (0..6)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut ids = Vec::new();
                for n in 0..10 {
                    let id = store.create(&format!("worker {} claim {}", worker, n)).unwrap();
                    store
                        .update(id, &Resolution::completed(Verdict::Unclear, "checked"))
                        .unwrap();
                    ids.push(id);
                }
                ids
            })
        })
        .collect();

    let mut all_ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(all_ids.insert(id), "Duplicate id {}", id);
        }
    }
    assert_eq!(all_ids.len(), 60);

    let records = store.list_recent(100).unwrap();
    assert_eq!(records.len(), 60);
    assert!(records.iter().all(|r| r.status == CheckStatus::Completed));

    assert!(store.pool().status().open <= 3);
    let held: Vec<_> = (0..3).map(|_| store.pool().acquire().unwrap()).collect();
    assert_eq!(held.len(), 3, "Every connection should be back in the pool");
}

#[test]
fn test_identical_claims_create_independent_records() {
    let store = SqliteStore::in_memory().unwrap();
    let a = store.create("Same claim").unwrap();
    let b = store.create("Same claim").unwrap();
    assert_ne!(a, b);
    assert_eq!(store.list_recent(10).unwrap().len(), 2);
}
