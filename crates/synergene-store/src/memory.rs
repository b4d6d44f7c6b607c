// SPDX-License-Identifier: Apache-2.0

use synergene_model::DrugCombination;

use crate::{CombinationStore, StoreError};

/// Holds rows in a `Vec`. Backs `--dry-run` and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rows: Vec<DrugCombination>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(&self) -> &[DrugCombination] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl CombinationStore for MemoryStore {
    fn ping(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn reconnect(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn delete_all(&mut self) -> Result<u64, StoreError> {
        let removed = self.rows.len() as u64;
        self.rows.clear();
        Ok(removed)
    }

    fn insert(&mut self, record: &DrugCombination) -> Result<(), StoreError> {
        self.rows.push(record.clone());
        Ok(())
    }
}
