// SPDX-License-Identifier: Apache-2.0

use synergene_model::DrugCombination;
use synergene_store::query::{
    available_drugs, cell_lines_for_pair, concentration_ranges, find_combination, partner_drugs,
};
use synergene_store::{CombinationStore, SqliteCombinationStore};
use tempfile::{tempdir, TempDir};

fn combo(a: &str, b: &str, line: &str, conc_a: (f64, f64), conc_b: (f64, f64)) -> DrugCombination {
    DrugCombination {
        drug_a: a.to_string(),
        drug_b: b.to_string(),
        cell_line: line.to_string(),
        min_conc_a: conc_a.0,
        max_conc_a: conc_a.1,
        min_conc_b: conc_b.0,
        max_conc_b: conc_b.1,
    }
}

fn seeded_store() -> (TempDir, SqliteCombinationStore) {
    let tmp = tempdir().expect("tempdir");
    let mut store = SqliteCombinationStore::open(&tmp.path().join("db.sqlite")).expect("open");
    for rec in [
        combo("Cisplatin", "Paclitaxel", "MCF7", (1.0, 2.0), (0.05, 0.1)),
        combo("Paclitaxel", "Cisplatin", "A549", (0.5, 4.0), (0.2, 0.8)),
        combo("Cisplatin", "Gemcitabine", "MCF7", (1.0, 1.0), (3.0, 9.0)),
        combo("Olaparib", "Paclitaxel", "HeLa", (0.1, 0.3), (0.1, 0.3)),
    ] {
        store.insert(&rec).expect("insert");
    }
    (tmp, store)
}

#[test]
fn available_drugs_unions_both_columns() {
    let (_tmp, store) = seeded_store();
    let drugs = available_drugs(store.connection()).expect("drugs");
    assert_eq!(drugs, vec!["Cisplatin", "Gemcitabine", "Olaparib", "Paclitaxel"]);
}

#[test]
fn partner_drugs_are_deduplicated_across_positions() {
    let (_tmp, store) = seeded_store();
    let partners = partner_drugs(store.connection(), "Cisplatin").expect("partners");
    assert_eq!(partners, vec!["Gemcitabine", "Paclitaxel"]);
    let none = partner_drugs(store.connection(), "Unknown").expect("partners");
    assert!(none.is_empty());
}

#[test]
fn cell_lines_match_the_pair_in_either_order() {
    let (_tmp, store) = seeded_store();
    let lines = cell_lines_for_pair(store.connection(), "Cisplatin", "Paclitaxel").expect("lines");
    assert_eq!(lines, vec!["A549", "MCF7"]);
    let reversed =
        cell_lines_for_pair(store.connection(), "Paclitaxel", "Cisplatin").expect("lines");
    assert_eq!(reversed, lines);
}

#[test]
fn ranges_are_oriented_to_the_requested_drug_order() {
    let (_tmp, store) = seeded_store();
    let forward = concentration_ranges(store.connection(), "Cisplatin", "Paclitaxel", "MCF7")
        .expect("query")
        .expect("found");
    assert_eq!(forward.min_conc_a, 1.0);
    assert_eq!(forward.max_conc_b, 0.1);

    let reversed = concentration_ranges(store.connection(), "Paclitaxel", "Cisplatin", "MCF7")
        .expect("query")
        .expect("found");
    assert_eq!(reversed.min_conc_a, 0.05);
    assert_eq!(reversed.max_conc_a, 0.1);
    assert_eq!(reversed.min_conc_b, 1.0);
    assert_eq!(reversed.max_conc_b, 2.0);
}

#[test]
fn missing_combination_is_none() {
    let (_tmp, store) = seeded_store();
    assert!(find_combination(store.connection(), "Cisplatin", "Olaparib", "MCF7")
        .expect("query")
        .is_none());
    assert!(
        concentration_ranges(store.connection(), "Cisplatin", "Paclitaxel", "HeLa")
            .expect("query")
            .is_none()
    );
}
