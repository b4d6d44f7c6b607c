// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::thread;
use std::time::Duration;
use synergene_model::{CombinationKey, DrugCombination};
use synergene_store::{CombinationStore, RetryPolicy, StoreError};
use tracing::{error, info, warn};

use crate::logging::{self, IngestLog, IngestStage};
use crate::{IngestError, IngestErrorCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPolicy {
    pub batch_size: usize,
    pub retry: RetryPolicy,
    /// Pause between consecutive batches; none after the last one.
    pub batch_pause: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadOutcome {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub batches: u64,
    pub failed_keys: Vec<CombinationKey>,
}

/// Empties the destination. A failure here is fatal for the run.
pub fn clear_destination<S: CombinationStore>(
    store: &mut S,
    retry: &RetryPolicy,
    log: &mut IngestLog,
) -> Result<u64, IngestError> {
    info!("clearing existing drug combinations");
    ensure_connection(store, retry.delay()).map_err(|e| {
        IngestError::new(
            IngestErrorCode::ClearFailed,
            format!("store unavailable before clear: {e}"),
        )
    })?;
    let removed = store.delete_all().map_err(|e| {
        IngestError::new(
            IngestErrorCode::ClearFailed,
            format!("error clearing existing data: {e}"),
        )
    })?;
    info!(removed, "existing data cleared");
    log.emit(
        IngestStage::Clear,
        "load.clear.complete",
        logging::fields([("removed", removed.to_string())]),
    );
    Ok(removed)
}

/// Writes `records` in batches. Records that exhaust their retries are counted, not raised.
pub fn load_records<S: CombinationStore>(
    store: &mut S,
    records: &[DrugCombination],
    policy: &LoadPolicy,
    log: &mut IngestLog,
) -> LoadOutcome {
    let batch_size = policy.batch_size.max(1);
    let total = records.len() as u64;
    let total_batches = records.len().div_ceil(batch_size);
    let mut outcome = LoadOutcome::default();

    for (idx, batch) in records.chunks(batch_size).enumerate() {
        let batch_number = idx + 1;
        info!(
            batch = batch_number,
            total_batches,
            size = batch.len(),
            "saving batch"
        );

        for record in batch {
            outcome.attempted += 1;
            match persist_with_retry(store, record, &policy.retry) {
                Ok(_) => outcome.succeeded += 1,
                Err(err) => {
                    error!(
                        combination = %record.key(),
                        attempts = policy.retry.max_attempts,
                        error = %err,
                        "failed to save combination"
                    );
                    outcome.failed += 1;
                    outcome.failed_keys.push(record.key());
                }
            }
        }

        outcome.batches += 1;
        let processed = outcome.succeeded + outcome.failed;
        info!(batch = batch_number, processed, total, "batch completed");
        log.emit(
            IngestStage::Persist,
            "load.batch.complete",
            logging::fields([
                ("batch", batch_number.to_string()),
                ("processed", processed.to_string()),
                ("total", total.to_string()),
            ]),
        );

        if batch_number < total_batches && !policy.batch_pause.is_zero() {
            thread::sleep(policy.batch_pause);
        }
    }

    outcome
}

/// Returns the number of attempts used on success.
fn persist_with_retry<S: CombinationStore>(
    store: &mut S,
    record: &DrugCombination,
    retry: &RetryPolicy,
) -> Result<usize, StoreError> {
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let result = ensure_connection(store, retry.delay()).and_then(|()| store.insert(record));
        match result {
            Ok(()) => return Ok(attempt),
            Err(err) if attempt >= max_attempts => return Err(err),
            Err(err) => {
                warn!(
                    combination = %record.key(),
                    attempt,
                    retries_left = max_attempts - attempt,
                    error = %err,
                    "retrying combination"
                );
                let delay = retry.delay();
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
        }
    }
}

/// Pings the store; on failure waits `pause`, then reopens the connection once.
fn ensure_connection<S: CombinationStore>(
    store: &mut S,
    pause: Duration,
) -> Result<(), StoreError> {
    if let Err(err) = store.ping() {
        warn!(
            error = %err,
            pause_ms = pause.as_millis() as u64,
            "store connection lost, reconnecting"
        );
        if !pause.is_zero() {
            thread::sleep(pause);
        }
        store.reconnect()?;
    }
    Ok(())
}
