//! Grouped top-N leaderboards with podium rank markers.
//!
//! Rows are grouped by a tuple of categorical columns, the value column is
//! reduced per group, and the result is stable-sorted descending and cut to
//! the top N. The first three rows get gold/silver/bronze markers — a
//! presentation decoration applied after sorting, never part of it.
//!
//! Two storage-reporting aggregation strategies exist side by side and are
//! deliberately distinct:
//!
//! - [`leaderboard`] with [`Aggregate::Sum`] or [`Aggregate::Mean`] reduces
//!   all raw rows of a group in one stage.
//! - [`daily_average_leaderboard`] first sums each group's rows per calendar
//!   day, then averages those daily totals. With an uneven number of rows
//!   per day the two disagree, and callers pick by name.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::{TableError, TableResult};
use crate::table::{Table, Value};

/// Single-stage reduction applied to a group's value cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Sum,
    Mean,
}

/// Podium marker for the top three rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Marker for a zero-based position; `None` past the podium.
    pub fn for_position(position: usize) -> Option<Medal> {
        match position {
            0 => Some(Medal::Gold),
            1 => Some(Medal::Silver),
            2 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Medal::Gold => "🥇 1st",
            Medal::Silver => "🥈 2nd",
            Medal::Bronze => "🥉 3rd",
        }
    }
}

/// One leaderboard entry: the group key cells, the raw aggregated value,
/// and presentation decorations.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub key: Vec<Value>,
    /// Raw aggregate; ordering always uses this, never `display`.
    pub value: f64,
    pub medal: Option<Medal>,
    /// Pretty-printed value, attached by [`Leaderboard::with_display`].
    pub display: Option<String>,
}

/// A sorted, truncated, ranked view of grouped aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    group_columns: Vec<String>,
    rows: Vec<LeaderboardRow>,
}

impl Leaderboard {
    pub fn group_columns(&self) -> &[String] {
        &self.group_columns
    }

    pub fn rows(&self) -> &[LeaderboardRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Attach a pretty-printed value to every row. Display-only; the sort
    /// order is already fixed on the raw values.
    pub fn with_display<F>(mut self, format: F) -> Self
    where
        F: Fn(f64) -> String,
    {
        for row in &mut self.rows {
            row.display = Some(format(row.value));
        }
        self
    }

    /// Re-shape into a table for a dataframe-style widget: a rank column,
    /// the group columns, and the value (pretty-printed when attached).
    pub fn to_table(&self, value_column: &str) -> Table {
        let mut columns = vec!["RANK".to_string()];
        columns.extend(self.group_columns.iter().cloned());
        columns.push(value_column.to_string());

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let rank = match row.medal {
                    Some(medal) => Value::Text(medal.label().to_string()),
                    None => Value::Null,
                };
                let value = match &row.display {
                    Some(display) => Value::Text(display.clone()),
                    None => Value::Number(row.value),
                };
                let mut cells = vec![rank];
                cells.extend(row.key.iter().cloned());
                cells.push(value);
                cells
            })
            .collect();
        Table::from_parts(columns, rows)
    }
}

/// Hashable rendering of a group key; the original cells are kept alongside
/// for the output rows.
fn group_key(row: &[Value], indices: &[usize], column_names: &[&str]) -> TableResult<Vec<String>> {
    indices
        .iter()
        .zip(column_names)
        .map(|(&idx, column)| match &row[idx] {
            Value::Text(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            other => Err(TableError::CellType {
                column: (*column).to_string(),
                expected: "text",
                found: other.kind(),
            }),
        })
        .collect()
}

fn key_cells(row: &[Value], indices: &[usize]) -> Vec<Value> {
    indices.iter().map(|&idx| row[idx].clone()).collect()
}

/// Sort descending on the raw value (stable, so input order breaks ties),
/// truncate to `top_n`, and decorate the podium.
fn finish(
    group_columns: &[&str],
    mut rows: Vec<LeaderboardRow>,
    top_n: usize,
) -> Leaderboard {
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    rows.truncate(top_n);
    for (position, row) in rows.iter_mut().enumerate() {
        row.medal = Medal::for_position(position);
    }
    Leaderboard {
        group_columns: group_columns.iter().map(|c| (*c).to_string()).collect(),
        rows,
    }
}

/// Build a top-N leaderboard by single-stage aggregation.
///
/// Groups `table` by the full `group_columns` tuple, reduces `value_column`
/// with `agg`, sorts descending by the reduced value, and keeps the first
/// `top_n` rows. Fewer groups than `top_n` is fine; the podium still
/// decorates the first `min(3, len)` rows.
pub fn leaderboard(
    table: &Table,
    group_columns: &[&str],
    value_column: &str,
    agg: Aggregate,
    top_n: usize,
) -> TableResult<Leaderboard> {
    if group_columns.is_empty() {
        return Err(TableError::EmptyGroupKey);
    }
    let indices: Vec<usize> = group_columns
        .iter()
        .map(|c| table.column_index(c))
        .collect::<TableResult<_>>()?;
    let values = table.numbers(value_column)?;

    // (first-seen key cells, running sum, row count) per group.
    let mut groups: IndexMap<Vec<String>, (Vec<Value>, f64, usize)> = IndexMap::new();
    for (row, value) in table.rows().iter().zip(&values) {
        let key = group_key(row, &indices, group_columns)?;
        let entry = groups
            .entry(key)
            .or_insert_with(|| (key_cells(row, &indices), 0.0, 0));
        entry.1 += value;
        entry.2 += 1;
    }

    debug!(
        rows = table.len(),
        groups = groups.len(),
        ?agg,
        "grouped usage table"
    );

    let rows = groups
        .into_values()
        .map(|(key, sum, count)| {
            let value = match agg {
                Aggregate::Sum => sum,
                Aggregate::Mean => sum / count as f64,
            };
            LeaderboardRow {
                key,
                value,
                medal: None,
                display: None,
            }
        })
        .collect();

    Ok(finish(group_columns, rows, top_n))
}

/// Build a top-N leaderboard by average of per-day sums.
///
/// Two-stage aggregation: each group's rows are first summed per calendar
/// day of `timestamp_column`, then those daily totals are averaged. Days on
/// which a group has no rows do not enter the average. This is not the same
/// as [`Aggregate::Mean`] over raw rows whenever row counts differ across
/// days.
pub fn daily_average_leaderboard(
    table: &Table,
    group_columns: &[&str],
    value_column: &str,
    timestamp_column: &str,
    top_n: usize,
) -> TableResult<Leaderboard> {
    if group_columns.is_empty() {
        return Err(TableError::EmptyGroupKey);
    }
    let indices: Vec<usize> = group_columns
        .iter()
        .map(|c| table.column_index(c))
        .collect::<TableResult<_>>()?;
    let values = table.numbers(value_column)?;
    let timestamps = table.timestamps(timestamp_column)?;

    // Per group: first-seen key cells and one running sum per day.
    let mut groups: IndexMap<Vec<String>, (Vec<Value>, IndexMap<chrono::NaiveDate, f64>)> =
        IndexMap::new();
    for ((row, value), ts) in table.rows().iter().zip(&values).zip(&timestamps) {
        let key = group_key(row, &indices, group_columns)?;
        let entry = groups
            .entry(key)
            .or_insert_with(|| (key_cells(row, &indices), IndexMap::new()));
        *entry.1.entry(ts.date()).or_insert(0.0) += value;
    }

    debug!(
        rows = table.len(),
        groups = groups.len(),
        "grouped usage table by day"
    );

    let rows = groups
        .into_values()
        .map(|(key, daily)| {
            let days = daily.len();
            let value = if days == 0 {
                0.0
            } else {
                daily.values().sum::<f64>() / days as f64
            };
            LeaderboardRow {
                key,
                value,
                medal: None,
                display: None,
            }
        })
        .collect();

    Ok(finish(group_columns, rows, top_n))
}

/// Top-`n` raw rows by a numeric column, stable-sorted descending.
///
/// For drill-downs over ungrouped rows, like the longest individual
/// queries; use [`Medal::for_position`] to decorate the result.
pub fn top_rows(table: &Table, sort_column: &str, n: usize) -> TableResult<Table> {
    let values = table.numbers(sort_column)?;
    let mut order: Vec<usize> = (0..table.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    order.truncate(n);

    let rows = order
        .into_iter()
        .map(|idx| table.rows()[idx].clone())
        .collect();
    Table::from_rows(table.columns().to_vec(), rows)
}
