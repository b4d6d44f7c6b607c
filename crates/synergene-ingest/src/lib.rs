// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod aggregate;
mod load;
mod logging;
mod source;

use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;
use synergene_core::ExitCode;
use synergene_store::{CombinationStore, RetryPolicy};
use tracing::info;

pub use aggregate::{aggregate_rows, Aggregator, ReadStats};
pub use load::{clear_destination, load_records, LoadOutcome, LoadPolicy};
pub use logging::{IngestEvent, IngestLog, IngestStage};
pub use source::{SourceRecord, SynergySource, REQUIRED_COLUMNS};

pub const CRATE_NAME: &str = "synergene-ingest";

pub const DEFAULT_INPUT_FILE: &str = "all_synergy_per_concentration.csv";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_RETRY_ATTEMPTS: usize = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_BATCH_PAUSE_MS: u64 = 500;
pub const DEFAULT_PROGRESS_EVERY: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestErrorCode {
    MissingInput,
    InvalidHeader,
    InvalidConfig,
    Io,
    ClearFailed,
}

impl IngestErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingInput => "missing_input",
            Self::InvalidHeader => "invalid_header",
            Self::InvalidConfig => "invalid_config",
            Self::Io => "io_error",
            Self::ClearFailed => "clear_failed",
        }
    }

    #[must_use]
    pub const fn exit_code(self) -> ExitCode {
        match self {
            Self::MissingInput | Self::InvalidHeader | Self::InvalidConfig => ExitCode::Validation,
            Self::ClearFailed => ExitCode::DependencyFailure,
            Self::Io => ExitCode::Internal,
        }
    }
}

/// Setup failure that aborts a load. Per-record write failures never surface here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestError {
    pub code: IngestErrorCode,
    pub message: String,
}

impl IngestError {
    #[must_use]
    pub fn new(code: IngestErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for IngestError {}

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub input_path: PathBuf,
    pub batch_size: usize,
    pub retry: RetryPolicy,
    pub batch_pause: Duration,
    pub progress_every: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            batch_size: DEFAULT_BATCH_SIZE,
            retry: RetryPolicy {
                max_attempts: DEFAULT_RETRY_ATTEMPTS,
                backoff_ms: DEFAULT_RETRY_DELAY_MS,
            },
            batch_pause: Duration::from_millis(DEFAULT_BATCH_PAUSE_MS),
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

impl IngestOptions {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.batch_size == 0 {
            return Err(IngestError::new(
                IngestErrorCode::InvalidConfig,
                "batch size must be > 0",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(IngestError::new(
                IngestErrorCode::InvalidConfig,
                "retry attempts must be > 0",
            ));
        }
        if self.progress_every == 0 {
            return Err(IngestError::new(
                IngestErrorCode::InvalidConfig,
                "progress interval must be > 0",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn load_policy(&self) -> LoadPolicy {
        LoadPolicy {
            batch_size: self.batch_size,
            retry: self.retry.clone(),
            batch_pause: self.batch_pause,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub input_path: PathBuf,
    pub read: ReadStats,
    pub combinations: u64,
    pub cleared_rows: u64,
    pub load: LoadOutcome,
}

pub fn load_synergy_data<S: CombinationStore>(
    opts: &IngestOptions,
    store: &mut S,
) -> Result<LoadReport, IngestError> {
    load_synergy_data_with_events(opts, store).map(|(report, _)| report)
}

/// Rebuilds the destination table from the CSV at `opts.input_path`.
///
/// The store is untouched unless the input opens with a valid header; after that
/// the table is cleared and every aggregate is written with the configured retry.
pub fn load_synergy_data_with_events<S: CombinationStore>(
    opts: &IngestOptions,
    store: &mut S,
) -> Result<(LoadReport, Vec<IngestEvent>), IngestError> {
    let mut log = IngestLog::default();
    opts.validate()?;
    log.emit(
        IngestStage::Prepare,
        "load.start",
        logging::fields([("input", opts.input_path.display().to_string())]),
    );

    let source = SynergySource::open(&opts.input_path)?;
    info!(input = %opts.input_path.display(), "loading drug combination data from csv");
    log.emit(IngestStage::Read, "load.read.begin", Default::default());

    let (aggregator, read) = aggregate_rows(source, opts.progress_every, &mut log)?;
    let combinations = aggregator.len() as u64;
    info!(combinations, "found unique drug combinations");

    let cleared_rows = clear_destination(store, &opts.retry, &mut log)?;
    let records = aggregator.into_records();
    let outcome = load_records(store, &records, &opts.load_policy(), &mut log);

    info!(
        succeeded = outcome.succeeded,
        failed = outcome.failed,
        total = combinations,
        "data loading completed"
    );
    log.emit(
        IngestStage::Finalize,
        "load.complete",
        logging::fields([
            ("attempted", outcome.attempted.to_string()),
            ("succeeded", outcome.succeeded.to_string()),
            ("failed", outcome.failed.to_string()),
        ]),
    );

    let report = LoadReport {
        input_path: opts.input_path.clone(),
        read,
        combinations,
        cleared_rows,
        load: outcome,
    };
    Ok((report, log.events().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::{IngestErrorCode, IngestOptions};
    use synergene_core::ExitCode;

    #[test]
    fn defaults_match_documented_constants() {
        let opts = IngestOptions::default();
        assert_eq!(opts.batch_size, 100);
        assert_eq!(opts.retry.max_attempts, 3);
        assert_eq!(opts.retry.backoff_ms, 1000);
        assert_eq!(opts.batch_pause.as_millis(), 500);
        assert_eq!(opts.progress_every, 10_000);
        opts.validate().expect("defaults are valid");
    }

    #[test]
    fn zero_sized_settings_are_rejected() {
        let opts = IngestOptions {
            batch_size: 0,
            ..IngestOptions::default()
        };
        let err = opts.validate().expect_err("zero batch size");
        assert_eq!(err.code, IngestErrorCode::InvalidConfig);

        let mut opts = IngestOptions::default();
        opts.retry.max_attempts = 0;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn setup_errors_map_to_exit_codes() {
        assert_eq!(IngestErrorCode::MissingInput.exit_code(), ExitCode::Validation);
        assert_eq!(
            IngestErrorCode::ClearFailed.exit_code(),
            ExitCode::DependencyFailure
        );
    }
}
