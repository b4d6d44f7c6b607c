// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod env;
mod error;

pub use env::{env_bool, env_path, env_u64, env_usize, parse_bool};
pub use error::{ExitCode, MachineError};

pub const CRATE_NAME: &str = "synergene-core";

pub const ENV_SYNERGENE_INPUT: &str = "SYNERGENE_INPUT";
pub const ENV_SYNERGENE_DB: &str = "SYNERGENE_DB";
pub const ENV_SYNERGENE_BATCH_SIZE: &str = "SYNERGENE_BATCH_SIZE";
pub const ENV_SYNERGENE_RETRY_ATTEMPTS: &str = "SYNERGENE_RETRY_ATTEMPTS";
pub const ENV_SYNERGENE_RETRY_DELAY_MS: &str = "SYNERGENE_RETRY_DELAY_MS";
pub const ENV_SYNERGENE_BATCH_PAUSE_MS: &str = "SYNERGENE_BATCH_PAUSE_MS";
pub const ENV_SYNERGENE_PROGRESS_EVERY: &str = "SYNERGENE_PROGRESS_EVERY";
pub const ENV_SYNERGENE_LOG_JSON: &str = "SYNERGENE_LOG_JSON";
