// SPDX-License-Identifier: Apache-2.0

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::fs::File;
use std::path::{Path, PathBuf};
use synergene_model::RawRow;

use crate::{IngestError, IngestErrorCode};

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Drug_A",
    "Drug_B",
    "Cell_Line",
    "concentration_a",
    "concentration_b",
];

/// One data line of the input, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    Row(RawRow),
    /// Both concentrations are exactly zero.
    Placeholder { line: u64 },
    Rejected { line: u64, reason: String },
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    drug_a: usize,
    drug_b: usize,
    cell_line: usize,
    concentration_a: usize,
    concentration_b: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| {
                    IngestError::new(
                        IngestErrorCode::InvalidHeader,
                        format!("{} is missing required column {name}", path.display()),
                    )
                })
        };
        Ok(Self {
            drug_a: find(REQUIRED_COLUMNS[0])?,
            drug_b: find(REQUIRED_COLUMNS[1])?,
            cell_line: find(REQUIRED_COLUMNS[2])?,
            concentration_a: find(REQUIRED_COLUMNS[3])?,
            concentration_b: find(REQUIRED_COLUMNS[4])?,
        })
    }

    fn decode(&self, record: &StringRecord) -> SourceRecord {
        let line = record.position().map_or(0, csv::Position::line);
        match self.decode_row(record) {
            Ok(row) if row.is_placeholder() => SourceRecord::Placeholder { line },
            Ok(row) => SourceRecord::Row(row),
            Err(reason) => SourceRecord::Rejected { line, reason },
        }
    }

    fn decode_row(&self, record: &StringRecord) -> Result<RawRow, String> {
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .ok_or_else(|| format!("missing field {name}"))
        };
        Ok(RawRow {
            drug_a: field(self.drug_a, "Drug_A")?.to_string(),
            drug_b: field(self.drug_b, "Drug_B")?.to_string(),
            cell_line: field(self.cell_line, "Cell_Line")?.to_string(),
            concentration_a: parse_concentration(field(self.concentration_a, "concentration_a")?)?,
            concentration_b: parse_concentration(field(self.concentration_b, "concentration_b")?)?,
        })
    }
}

fn parse_concentration(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid concentration: {raw:?}"))?;
    if !value.is_finite() {
        return Err(format!("non-finite concentration: {raw:?}"));
    }
    Ok(value)
}

/// Streams classified records from a synergy CSV; one record is buffered at a time.
pub struct SynergySource {
    path: PathBuf,
    columns: ColumnIndex,
    records: StringRecordsIntoIter<File>,
}

impl SynergySource {
    pub fn open(path: &Path) -> Result<Self, IngestError> {
        if !path.is_file() {
            return Err(IngestError::new(
                IngestErrorCode::MissingInput,
                format!("CSV file not found at: {}", path.display()),
            ));
        }
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| IngestError::new(IngestErrorCode::Io, e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| IngestError::new(IngestErrorCode::InvalidHeader, e.to_string()))?
            .clone();
        let columns = ColumnIndex::resolve(&headers, path)?;
        Ok(Self {
            path: path.to_path_buf(),
            columns,
            records: reader.into_records(),
        })
    }
}

impl Iterator for SynergySource {
    type Item = Result<SourceRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.records.next()?;
        Some(match next {
            Ok(record) => Ok(self.columns.decode(&record)),
            Err(err) if err.is_io_error() => Err(IngestError::new(
                IngestErrorCode::Io,
                format!("reading {}: {err}", self.path.display()),
            )),
            Err(err) => Ok(SourceRecord::Rejected {
                line: err.position().map_or(0, csv::Position::line),
                reason: err.to_string(),
            }),
        })
    }
}
