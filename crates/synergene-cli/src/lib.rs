// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod commands;

use clap::{error::ErrorKind, Parser};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;
use std::time::Duration;
use synergene_core::{
    env_bool, env_path, env_u64, env_usize, ExitCode, MachineError, ENV_SYNERGENE_BATCH_PAUSE_MS,
    ENV_SYNERGENE_BATCH_SIZE, ENV_SYNERGENE_DB, ENV_SYNERGENE_INPUT, ENV_SYNERGENE_LOG_JSON,
    ENV_SYNERGENE_PROGRESS_EVERY, ENV_SYNERGENE_RETRY_ATTEMPTS, ENV_SYNERGENE_RETRY_DELAY_MS,
};
use synergene_ingest::{
    load_synergy_data, IngestError, IngestErrorCode, IngestOptions, LoadReport,
    DEFAULT_BATCH_PAUSE_MS, DEFAULT_BATCH_SIZE, DEFAULT_INPUT_FILE, DEFAULT_PROGRESS_EVERY,
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS,
};
use synergene_store::{query, MemoryStore, RetryPolicy, SqliteCombinationStore, StoreError};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::Commands;

pub const DEFAULT_DB_FILE: &str = "synergene.sqlite";

#[derive(Parser)]
#[command(name = "synergene")]
#[command(version)]
#[command(about = "SynerGene drug combination loader")]
#[command(
    after_help = "Environment:\n  SYNERGENE_INPUT, SYNERGENE_DB, SYNERGENE_BATCH_SIZE, SYNERGENE_RETRY_ATTEMPTS,\n  SYNERGENE_RETRY_DELAY_MS, SYNERGENE_BATCH_PAUSE_MS, SYNERGENE_PROGRESS_EVERY\n  RUST_LOG            Log filter (default: info)\n  SYNERGENE_LOG_JSON  Emit logs as JSON on stderr"
)]
struct Cli {
    /// Print machine-readable JSON on stdout.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    /// SQLite database holding the drug_combination table.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy)]
struct OutputMode {
    json: bool,
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool(ENV_SYNERGENE_LOG_JSON, false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    let output_mode = OutputMode { json: cli.json };
    let command = cli.command.ok_or_else(|| CliError {
        exit_code: ExitCode::Usage,
        machine: MachineError::new("usage_error", "missing command; see --help"),
    })?;
    init_tracing();

    let db = cli
        .db
        .unwrap_or_else(|| env_path(ENV_SYNERGENE_DB, DEFAULT_DB_FILE));

    match command {
        Commands::Load {
            input,
            batch_size,
            retry_attempts,
            retry_delay_ms,
            batch_pause_ms,
            progress_every,
            dry_run,
        } => {
            let opts = IngestOptions {
                input_path: input
                    .unwrap_or_else(|| env_path(ENV_SYNERGENE_INPUT, DEFAULT_INPUT_FILE)),
                batch_size: batch_size
                    .unwrap_or_else(|| env_usize(ENV_SYNERGENE_BATCH_SIZE, DEFAULT_BATCH_SIZE)),
                retry: RetryPolicy {
                    max_attempts: retry_attempts.unwrap_or_else(|| {
                        env_usize(ENV_SYNERGENE_RETRY_ATTEMPTS, DEFAULT_RETRY_ATTEMPTS)
                    }),
                    backoff_ms: retry_delay_ms.unwrap_or_else(|| {
                        env_u64(ENV_SYNERGENE_RETRY_DELAY_MS, DEFAULT_RETRY_DELAY_MS)
                    }),
                },
                batch_pause: Duration::from_millis(batch_pause_ms.unwrap_or_else(|| {
                    env_u64(ENV_SYNERGENE_BATCH_PAUSE_MS, DEFAULT_BATCH_PAUSE_MS)
                })),
                progress_every: progress_every.unwrap_or_else(|| {
                    env_u64(ENV_SYNERGENE_PROGRESS_EVERY, DEFAULT_PROGRESS_EVERY)
                }),
            };
            run_load(&opts, &db, dry_run, output_mode)
        }
        Commands::InspectDb { sample_rows } => inspect_db(&db, sample_rows, output_mode),
        Commands::Drugs => {
            let store = open_store(&db)?;
            let drugs = query::available_drugs(store.connection()).map_err(CliError::store)?;
            emit_list("drugs", &drugs, output_mode)
        }
        Commands::Partners { drug } => {
            let store = open_store(&db)?;
            let partners =
                query::partner_drugs(store.connection(), &drug).map_err(CliError::store)?;
            emit_list("partners", &partners, output_mode)
        }
        Commands::CellLines { drug1, drug2 } => {
            let store = open_store(&db)?;
            let lines = query::cell_lines_for_pair(store.connection(), &drug1, &drug2)
                .map_err(CliError::store)?;
            emit_list("cell_lines", &lines, output_mode)
        }
        Commands::Ranges {
            drug1,
            drug2,
            cell_line,
        } => {
            let store = open_store(&db)?;
            let ranges =
                query::concentration_ranges(store.connection(), &drug1, &drug2, &cell_line)
                    .map_err(CliError::store)?
                    .ok_or_else(|| CliError {
                        exit_code: ExitCode::Validation,
                        machine: MachineError::new("not_found", "drug combination not found")
                            .with_detail("drug1", &drug1)
                            .with_detail("drug2", &drug2)
                            .with_detail("cell_line", &cell_line),
                    })?;
            if output_mode.json {
                emit_json(&ranges)
            } else {
                println!("min_conc_a={}", ranges.min_conc_a);
                println!("max_conc_a={}", ranges.max_conc_a);
                println!("min_conc_b={}", ranges.min_conc_b);
                println!("max_conc_b={}", ranges.max_conc_b);
                Ok(())
            }
        }
    }
}

fn open_store(db: &Path) -> Result<SqliteCombinationStore, CliError> {
    SqliteCombinationStore::open(db).map_err(|e| {
        let mut err = CliError::store(e);
        err.machine = err.machine.with_detail("db", &db.display().to_string());
        err
    })
}

fn run_load(
    opts: &IngestOptions,
    db: &Path,
    dry_run: bool,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let report = if dry_run {
        info!("dry run: writing aggregates to memory only");
        let mut store = MemoryStore::new();
        load_synergy_data(opts, &mut store).map_err(CliError::ingest)?
    } else {
        // Opening creates the database file, so a missing input must be caught first.
        if !opts.input_path.is_file() {
            return Err(CliError::ingest(IngestError::new(
                IngestErrorCode::MissingInput,
                format!("input file not found: {}", opts.input_path.display()),
            )));
        }
        let mut store = open_store(db)?;
        load_synergy_data(opts, &mut store).map_err(CliError::ingest)?
    };
    if report.load.failed > 0 {
        warn!(failed = report.load.failed, "some combinations were not saved");
    }
    emit_report(&report, db, dry_run, output_mode)
}

fn emit_report(
    report: &LoadReport,
    db: &Path,
    dry_run: bool,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    if output_mode.json {
        return emit_json(&json!({
            "db": db.display().to_string(),
            "dry_run": dry_run,
            "report": report,
        }));
    }
    println!("input={}", report.input_path.display());
    println!("db={}", db.display());
    println!("dry_run={dry_run}");
    println!("rows_read={}", report.read.rows_read);
    println!("rows_skipped={}", report.read.rows_skipped);
    println!("rows_rejected={}", report.read.rows_rejected);
    println!("combinations={}", report.combinations);
    println!("attempted={}", report.load.attempted);
    println!("succeeded={}", report.load.succeeded);
    println!("failed={}", report.load.failed);
    for key in &report.load.failed_keys {
        println!("failed_key={}", key.joined());
    }
    Ok(())
}

fn inspect_db(db: &Path, sample_rows: usize, output_mode: OutputMode) -> Result<(), CliError> {
    if !db.is_file() {
        return Err(CliError {
            exit_code: ExitCode::Validation,
            machine: MachineError::new("not_found", "database file not found")
                .with_detail("db", &db.display().to_string()),
        });
    }
    let store = open_store(db)?;
    let schema_version = store.schema_version().map_err(CliError::store)?;
    let count = query::count_combinations(store.connection()).map_err(CliError::store)?;
    let rows =
        query::sample_combinations(store.connection(), sample_rows).map_err(CliError::store)?;

    if output_mode.json {
        return emit_json(&json!({
            "schema_version": schema_version,
            "combination_count": count,
            "sample_rows": rows,
        }));
    }
    println!("schema_version={schema_version}");
    println!("combination_count={count}");
    println!(
        "sample_rows={}",
        serde_json::to_string(&rows).map_err(|e| CliError::internal(e.to_string()))?
    );
    Ok(())
}

fn emit_list(name: &str, values: &[String], output_mode: OutputMode) -> Result<(), CliError> {
    if output_mode.json {
        return emit_json(&json!({ name: values }));
    }
    for value in values {
        println!("{value}");
    }
    Ok(())
}

fn emit_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let raw = serde_json::to_string(value).map_err(|e| CliError::internal(e.to_string()))?;
    println!("{raw}");
    Ok(())
}

#[derive(Debug)]
struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }

    fn store(err: StoreError) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new("dependency_failure", &err.message)
                .with_detail("store_code", err.code.as_str()),
        }
    }

    fn ingest(err: IngestError) -> Self {
        Self {
            exit_code: err.code.exit_code(),
            machine: MachineError::new(err.code.as_str(), &err.message),
        }
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine);
    }
}
