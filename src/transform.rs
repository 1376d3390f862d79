//! Column transforms applied just before chart handoff.

use tracing::debug;

use crate::error::{TableError, TableResult};
use crate::table::{Table, Value};

/// Replace each named column's values with `ln(1 + x)` in a new table.
///
/// Rescales heavy-tailed usage values for a log-axis scatter or histogram;
/// `0` stays `0`, nulls pass through. All named values must be
/// non-negative (usage data invariant). Not idempotent — apply at most once
/// per column, after any sorting or aggregation.
pub fn log1p_columns(table: &Table, columns: &[&str]) -> TableResult<Table> {
    let indices: Vec<usize> = columns
        .iter()
        .map(|c| table.column_index(c))
        .collect::<TableResult<_>>()?;

    let mut rows = table.rows().to_vec();
    for row in &mut rows {
        for (&idx, column) in indices.iter().zip(columns) {
            row[idx] = match &row[idx] {
                Value::Number(n) => Value::Number(n.ln_1p()),
                Value::Null => Value::Null,
                other => {
                    return Err(TableError::CellType {
                        column: (*column).to_string(),
                        expected: "number",
                        found: other.kind(),
                    });
                }
            };
        }
    }

    debug!(rows = rows.len(), columns = columns.len(), "applied log1p");

    Table::from_rows(table.columns().to_vec(), rows)
}
