// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use proptest::test_runner::Config;
use synergene_model::{CombinationAggregate, RawRow};

fn mk_row(a: f64, b: f64) -> RawRow {
    RawRow {
        drug_a: "A".to_string(),
        drug_b: "B".to_string(),
        cell_line: "L1".to_string(),
        concentration_a: a,
        concentration_b: b,
    }
}

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn folded_ranges_equal_true_extrema(
        values in prop::collection::vec((0.0_f64..1.0e6, 0.0_f64..1.0e6), 1..64)
    ) {
        let rows: Vec<RawRow> = values.iter().map(|(a, b)| mk_row(*a, *b)).collect();
        let mut agg = CombinationAggregate::seed(&rows[0]);
        for r in &rows[1..] {
            agg.fold(r);
        }
        let min_a = values.iter().map(|v| v.0).fold(f64::INFINITY, f64::min);
        let max_a = values.iter().map(|v| v.0).fold(f64::NEG_INFINITY, f64::max);
        let min_b = values.iter().map(|v| v.1).fold(f64::INFINITY, f64::min);
        let max_b = values.iter().map(|v| v.1).fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(agg.concentration_a.min, min_a);
        prop_assert_eq!(agg.concentration_a.max, max_a);
        prop_assert_eq!(agg.concentration_b.min, min_b);
        prop_assert_eq!(agg.concentration_b.max, max_b);
        prop_assert!(agg.concentration_a.min <= agg.concentration_a.max);
        prop_assert_eq!(agg.row_count, values.len() as u64);
    }
}
