// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::range::ConcentrationRange;

/// One usable line of the synergy CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub drug_a: String,
    pub drug_b: String,
    pub cell_line: String,
    pub concentration_a: f64,
    pub concentration_b: f64,
}

impl RawRow {
    #[must_use]
    pub fn key(&self) -> CombinationKey {
        CombinationKey::new(&self.drug_a, &self.drug_b, &self.cell_line)
    }

    /// Control rows carry no dose information and are dropped by the reader.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.concentration_a == 0.0 && self.concentration_b == 0.0
    }
}

/// Identity of an aggregate. Drug order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombinationKey {
    pub drug_a: String,
    pub drug_b: String,
    pub cell_line: String,
}

impl CombinationKey {
    #[must_use]
    pub fn new(drug_a: &str, drug_b: &str, cell_line: &str) -> Self {
        Self {
            drug_a: drug_a.to_string(),
            drug_b: drug_b.to_string(),
            cell_line: cell_line.to_string(),
        }
    }

    /// `drugA-drugB-cellLine`, for log lines only; it is not unique when names contain `-`.
    #[must_use]
    pub fn joined(&self) -> String {
        format!("{}-{}-{}", self.drug_a, self.drug_b, self.cell_line)
    }
}

impl Display for CombinationKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{} in {}", self.drug_a, self.drug_b, self.cell_line)
    }
}

/// Running min/max summary for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationAggregate {
    pub key: CombinationKey,
    pub concentration_a: ConcentrationRange,
    pub concentration_b: ConcentrationRange,
    pub row_count: u64,
}

impl CombinationAggregate {
    #[must_use]
    pub fn seed(row: &RawRow) -> Self {
        Self {
            key: row.key(),
            concentration_a: ConcentrationRange::point(row.concentration_a),
            concentration_b: ConcentrationRange::point(row.concentration_b),
            row_count: 1,
        }
    }

    pub fn fold(&mut self, row: &RawRow) {
        self.concentration_a.extend(row.concentration_a);
        self.concentration_b.extend(row.concentration_b);
        self.row_count += 1;
    }
}

/// Row of the `drug_combination` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugCombination {
    pub drug_a: String,
    pub drug_b: String,
    pub cell_line: String,
    pub min_conc_a: f64,
    pub max_conc_a: f64,
    pub min_conc_b: f64,
    pub max_conc_b: f64,
}

impl DrugCombination {
    #[must_use]
    pub fn key(&self) -> CombinationKey {
        CombinationKey::new(&self.drug_a, &self.drug_b, &self.cell_line)
    }

    /// Ranges as seen from `first_drug`: swapped when it is stored as `drug_b`.
    #[must_use]
    pub fn ranges_for(&self, first_drug: &str) -> ConcentrationRanges {
        if self.drug_a == first_drug {
            ConcentrationRanges {
                min_conc_a: self.min_conc_a,
                max_conc_a: self.max_conc_a,
                min_conc_b: self.min_conc_b,
                max_conc_b: self.max_conc_b,
            }
        } else {
            ConcentrationRanges {
                min_conc_a: self.min_conc_b,
                max_conc_a: self.max_conc_b,
                min_conc_b: self.min_conc_a,
                max_conc_b: self.max_conc_a,
            }
        }
    }
}

impl From<&CombinationAggregate> for DrugCombination {
    fn from(agg: &CombinationAggregate) -> Self {
        Self {
            drug_a: agg.key.drug_a.clone(),
            drug_b: agg.key.drug_b.clone(),
            cell_line: agg.key.cell_line.clone(),
            min_conc_a: agg.concentration_a.min,
            max_conc_a: agg.concentration_a.max,
            min_conc_b: agg.concentration_b.min,
            max_conc_b: agg.concentration_b.max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationRanges {
    pub min_conc_a: f64,
    pub max_conc_a: f64,
    pub min_conc_b: f64,
    pub max_conc_b: f64,
}
