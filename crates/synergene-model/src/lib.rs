// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Drug combination records shared by the loader, the store and the CLI.

mod combination;
mod range;

pub use combination::{
    CombinationAggregate, CombinationKey, ConcentrationRanges, DrugCombination, RawRow,
};
pub use range::ConcentrationRange;

pub const CRATE_NAME: &str = "synergene-model";
