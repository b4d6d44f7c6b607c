// SPDX-License-Identifier: Apache-2.0

//! Read-side lookups over `drug_combination`, as used by the combination pickers.

use rusqlite::{params, Connection, OptionalExtension, Row};
use synergene_model::{ConcentrationRanges, DrugCombination};

use crate::StoreError;

pub fn count_combinations(conn: &Connection) -> Result<u64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM drug_combination", [], |r| r.get(0))?;
    Ok(count as u64)
}

pub fn sample_combinations(
    conn: &Connection,
    limit: usize,
) -> Result<Vec<DrugCombination>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT drug_a, drug_b, cell_line, min_conc_a, max_conc_a, min_conc_b, max_conc_b
         FROM drug_combination ORDER BY drug_a, drug_b, cell_line LIMIT ?1",
    )?;
    let rows = stmt
        .query_map(params![limit as i64], decode_combination)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Every drug that appears on either side of a combination, sorted.
pub fn available_drugs(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT drug_a FROM drug_combination
         UNION
         SELECT drug_b FROM drug_combination
         ORDER BY 1",
    )?;
    let drugs = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(drugs)
}

/// Drugs combined with `drug` in either position, sorted and deduplicated.
pub fn partner_drugs(conn: &Connection, drug: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT drug_b FROM drug_combination WHERE drug_a = ?1
         UNION
         SELECT drug_a FROM drug_combination WHERE drug_b = ?1
         ORDER BY 1",
    )?;
    let drugs = stmt
        .query_map(params![drug], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(drugs)
}

/// Cell lines tested with the pair in either order, sorted and deduplicated.
pub fn cell_lines_for_pair(
    conn: &Connection,
    drug1: &str,
    drug2: &str,
) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT cell_line FROM drug_combination
         WHERE (drug_a = ?1 AND drug_b = ?2) OR (drug_a = ?2 AND drug_b = ?1)
         ORDER BY cell_line",
    )?;
    let lines = stmt
        .query_map(params![drug1, drug2], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}

/// First stored row for the pair in either order.
pub fn find_combination(
    conn: &Connection,
    drug1: &str,
    drug2: &str,
    cell_line: &str,
) -> Result<Option<DrugCombination>, StoreError> {
    let found = conn
        .query_row(
            "SELECT drug_a, drug_b, cell_line, min_conc_a, max_conc_a, min_conc_b, max_conc_b
             FROM drug_combination
             WHERE cell_line = ?3
               AND ((drug_a = ?1 AND drug_b = ?2) OR (drug_a = ?2 AND drug_b = ?1))
             ORDER BY id
             LIMIT 1",
            params![drug1, drug2, cell_line],
            decode_combination,
        )
        .optional()?;
    Ok(found)
}

/// Concentration ranges oriented so that `drug1` is reported as drug A.
pub fn concentration_ranges(
    conn: &Connection,
    drug1: &str,
    drug2: &str,
    cell_line: &str,
) -> Result<Option<ConcentrationRanges>, StoreError> {
    Ok(find_combination(conn, drug1, drug2, cell_line)?.map(|c| c.ranges_for(drug1)))
}

fn decode_combination(row: &Row<'_>) -> rusqlite::Result<DrugCombination> {
    Ok(DrugCombination {
        drug_a: row.get(0)?,
        drug_b: row.get(1)?,
        cell_line: row.get(2)?,
        min_conc_a: row.get(3)?,
        max_conc_a: row.get(4)?,
        min_conc_b: row.get(5)?,
        max_conc_b: row.get(6)?,
    })
}
