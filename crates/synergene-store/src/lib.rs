// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod error;
mod memory;
pub mod query;
mod retry;
mod sqlite;

use synergene_model::DrugCombination;

pub use error::{StoreError, StoreErrorCode};
pub use memory::MemoryStore;
pub use retry::RetryPolicy;
pub use sqlite::{SqliteCombinationStore, SQLITE_SCHEMA_VERSION};

pub const CRATE_NAME: &str = "synergene-store";

/// Destination of the `drug_combination` rows written by the loader.
///
/// Every call is independent; no transaction spans more than one call.
pub trait CombinationStore {
    /// Trivial round trip used to check the connection before a write.
    fn ping(&mut self) -> Result<(), StoreError>;

    /// Drops the current connection and opens a fresh one.
    fn reconnect(&mut self) -> Result<(), StoreError>;

    /// Removes every row and returns how many were removed.
    fn delete_all(&mut self) -> Result<u64, StoreError>;

    fn insert(&mut self, record: &DrugCombination) -> Result<(), StoreError>;
}

