// SPDX-License-Identifier: Apache-2.0

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Rebuild the drug_combination table from the synergy CSV.
    Load {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        retry_attempts: Option<usize>,
        #[arg(long)]
        retry_delay_ms: Option<u64>,
        #[arg(long)]
        batch_pause_ms: Option<u64>,
        #[arg(long)]
        progress_every: Option<u64>,
        /// Aggregate and "load" into memory without touching the database.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print schema version, row count and a few rows.
    InspectDb {
        #[arg(long, default_value_t = 5)]
        sample_rows: usize,
    },
    /// List every drug present in a combination.
    Drugs,
    /// List drugs combined with the given drug.
    Partners {
        #[arg(long)]
        drug: String,
    },
    /// List cell lines tested with a drug pair.
    CellLines {
        #[arg(long)]
        drug1: String,
        #[arg(long)]
        drug2: String,
    },
    /// Concentration ranges for a pair in a cell line, in the given drug order.
    Ranges {
        #[arg(long)]
        drug1: String,
        #[arg(long)]
        drug2: String,
        #[arg(long)]
        cell_line: String,
    },
}
