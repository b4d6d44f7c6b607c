// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Closed interval of observed concentrations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationRange {
    pub min: f64,
    pub max: f64,
}

impl ConcentrationRange {
    #[must_use]
    pub fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn extend(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}
