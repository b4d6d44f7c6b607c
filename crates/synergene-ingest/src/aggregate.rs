// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use synergene_model::{CombinationAggregate, CombinationKey, DrugCombination, RawRow};
use tracing::{info, warn};

use crate::logging::{self, IngestLog, IngestStage};
use crate::source::SourceRecord;
use crate::IngestError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadStats {
    pub rows_read: u64,
    pub rows_folded: u64,
    pub rows_skipped: u64,
    pub rows_rejected: u64,
}

/// Min/max concentration summary per combination key.
///
/// Keys are kept sorted, so [`Aggregator::into_records`] is deterministic for a given input.
#[derive(Debug, Default, Clone)]
pub struct Aggregator {
    combinations: BTreeMap<CombinationKey, CombinationAggregate>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold(&mut self, row: &RawRow) {
        self.combinations
            .entry(row.key())
            .and_modify(|agg| agg.fold(row))
            .or_insert_with(|| CombinationAggregate::seed(row));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &CombinationKey) -> Option<&CombinationAggregate> {
        self.combinations.get(key)
    }

    #[must_use]
    pub fn into_records(self) -> Vec<DrugCombination> {
        self.combinations
            .values()
            .map(DrugCombination::from)
            .collect()
    }
}

/// Drains `rows` into a fresh [`Aggregator`]. Only read failures abort the fold.
pub fn aggregate_rows<I>(
    rows: I,
    progress_every: u64,
    log: &mut IngestLog,
) -> Result<(Aggregator, ReadStats), IngestError>
where
    I: IntoIterator<Item = Result<SourceRecord, IngestError>>,
{
    let mut aggregator = Aggregator::new();
    let mut stats = ReadStats::default();

    for record in rows {
        stats.rows_read += 1;
        match record? {
            SourceRecord::Row(row) => {
                aggregator.fold(&row);
                stats.rows_folded += 1;
            }
            SourceRecord::Placeholder { .. } => stats.rows_skipped += 1,
            SourceRecord::Rejected { line, reason } => {
                warn!(line, %reason, "rejected csv row");
                stats.rows_rejected += 1;
            }
        }
        if progress_every > 0 && stats.rows_read % progress_every == 0 {
            info!(rows = stats.rows_read, "processed rows");
        }
    }

    info!(
        rows = stats.rows_read,
        skipped = stats.rows_skipped,
        rejected = stats.rows_rejected,
        "csv processing complete"
    );
    log.emit(
        IngestStage::Aggregate,
        "load.aggregate.complete",
        logging::fields([
            ("rows_read", stats.rows_read.to_string()),
            ("rows_skipped", stats.rows_skipped.to_string()),
            ("rows_rejected", stats.rows_rejected.to_string()),
            ("combinations", aggregator.len().to_string()),
        ]),
    );
    Ok((aggregator, stats))
}

#[cfg(test)]
mod tests {
    use super::{aggregate_rows, Aggregator};
    use crate::logging::IngestLog;
    use crate::source::SourceRecord;
    use crate::{IngestError, IngestErrorCode};
    use synergene_model::{CombinationKey, RawRow};

    fn row(a: &str, b: &str, line: &str, ca: f64, cb: f64) -> RawRow {
        RawRow {
            drug_a: a.to_string(),
            drug_b: b.to_string(),
            cell_line: line.to_string(),
            concentration_a: ca,
            concentration_b: cb,
        }
    }

    #[test]
    fn reversed_drug_order_produces_separate_aggregates() {
        let mut agg = Aggregator::new();
        agg.fold(&row("X", "Y", "L1", 1.0, 2.0));
        agg.fold(&row("Y", "X", "L1", 3.0, 4.0));
        assert_eq!(agg.len(), 2);
        let xy = agg.get(&CombinationKey::new("X", "Y", "L1")).expect("xy");
        assert_eq!(xy.concentration_a.max, 1.0);
    }

    #[test]
    fn records_come_out_sorted_by_key() {
        let mut agg = Aggregator::new();
        agg.fold(&row("C", "A", "L1", 1.0, 1.0));
        agg.fold(&row("A", "B", "L2", 1.0, 1.0));
        agg.fold(&row("A", "B", "L1", 1.0, 1.0));
        let keys: Vec<String> = agg.into_records().iter().map(|r| r.key().joined()).collect();
        assert_eq!(keys, vec!["A-B-L1", "A-B-L2", "C-A-L1"]);
    }

    #[test]
    fn stats_count_every_classification() {
        let input = vec![
            Ok(SourceRecord::Row(row("A", "B", "L1", 1.0, 0.1))),
            Ok(SourceRecord::Placeholder { line: 3 }),
            Ok(SourceRecord::Rejected {
                line: 4,
                reason: "invalid concentration".to_string(),
            }),
            Ok(SourceRecord::Row(row("A", "B", "L1", 2.0, 0.05))),
        ];
        let mut log = IngestLog::default();
        let (agg, stats) = aggregate_rows(input, 2, &mut log).expect("aggregate");
        assert_eq!(stats.rows_read, 4);
        assert_eq!(stats.rows_folded, 2);
        assert_eq!(stats.rows_skipped, 1);
        assert_eq!(stats.rows_rejected, 1);
        assert_eq!(agg.len(), 1);
        assert_eq!(log.events().len(), 1);
    }

    #[test]
    fn read_errors_abort_the_fold() {
        let input = vec![
            Ok(SourceRecord::Row(row("A", "B", "L1", 1.0, 0.1))),
            Err(IngestError::new(IngestErrorCode::Io, "disk gone")),
        ];
        let err = aggregate_rows(input, 10, &mut IngestLog::default()).expect_err("io error");
        assert_eq!(err.code, IngestErrorCode::Io);
    }
}
