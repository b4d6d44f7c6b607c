// SPDX-License-Identifier: Apache-2.0

use synergene_model::DrugCombination;
use synergene_store::query::{count_combinations, sample_combinations};
use synergene_store::{
    CombinationStore, MemoryStore, SqliteCombinationStore, StoreErrorCode, SQLITE_SCHEMA_VERSION,
};
use tempfile::tempdir;

fn combo(a: &str, b: &str, line: &str) -> DrugCombination {
    DrugCombination {
        drug_a: a.to_string(),
        drug_b: b.to_string(),
        cell_line: line.to_string(),
        min_conc_a: 1.0,
        max_conc_a: 2.0,
        min_conc_b: 0.05,
        max_conc_b: 0.1,
    }
}

#[test]
fn open_creates_schema_and_records_version() {
    let tmp = tempdir().expect("tempdir");
    let store = SqliteCombinationStore::open(&tmp.path().join("db.sqlite")).expect("open");
    assert_eq!(store.schema_version().expect("version"), SQLITE_SCHEMA_VERSION);
    assert_eq!(count_combinations(store.connection()).expect("count"), 0);
}

#[test]
fn insert_then_delete_all_reports_removed_rows() {
    let tmp = tempdir().expect("tempdir");
    let mut store = SqliteCombinationStore::open(&tmp.path().join("db.sqlite")).expect("open");
    store.ping().expect("ping");
    store.insert(&combo("A", "B", "L1")).expect("insert");
    store.insert(&combo("B", "A", "L1")).expect("insert");

    let rows = sample_combinations(store.connection(), 10).expect("sample");
    assert_eq!(rows, vec![combo("A", "B", "L1"), combo("B", "A", "L1")]);

    assert_eq!(store.delete_all().expect("delete"), 2);
    assert_eq!(count_combinations(store.connection()).expect("count"), 0);
}

#[test]
fn rows_survive_reconnect_and_reopen() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("db.sqlite");
    {
        let mut store = SqliteCombinationStore::open(&path).expect("open");
        store.insert(&combo("A", "B", "L1")).expect("insert");
        store.reconnect().expect("reconnect");
        store.ping().expect("ping after reconnect");
        store.insert(&combo("C", "D", "L2")).expect("insert after reconnect");
    }
    let store = SqliteCombinationStore::open(&path).expect("reopen");
    assert_eq!(count_combinations(store.connection()).expect("count"), 2);
}

#[test]
fn open_in_missing_directory_fails_as_connection_error() {
    let tmp = tempdir().expect("tempdir");
    let err = match SqliteCombinationStore::open(&tmp.path().join("nope").join("db.sqlite")) {
        Ok(_) => panic!("opening inside a missing directory must fail"),
        Err(err) => err,
    };
    assert_eq!(err.code, StoreErrorCode::Connection);
}

#[test]
fn memory_store_mirrors_sqlite_contract() {
    let mut store = MemoryStore::new();
    store.insert(&combo("A", "B", "L1")).expect("insert");
    assert_eq!(store.len(), 1);
    assert_eq!(store.delete_all().expect("delete"), 1);
    assert!(store.is_empty());
}
