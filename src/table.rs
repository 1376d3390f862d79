//! In-memory tabular data as returned by a warehouse query collaborator.
//!
//! A [`Table`] is a small row-oriented result set with named-column access.
//! Usage result sets are at most a few thousand rows, so every operation
//! copies into a fresh table rather than mutating in place; callers on
//! independent page renders never share state.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};

/// A single cell.
///
/// Serde is untagged on both sides so tables load directly from the JSON
/// row-objects a warehouse driver returns and serialize cleanly for the
/// chart collaborator. Timestamps must use the `T` separator
/// (`2024-01-01T10:30:00`); bare dates (`2024-01-01`) become [`Value::Date`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Number(f64),
    Text(String),
    Null,
}

impl Value {
    /// Human-readable kind name for error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Timestamp(_) => "timestamp",
            Value::Date(_) => "date",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Null => "null",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Timestamp view: dates are midnight of that day.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

/// A named-column result set.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a table from column names and pre-built rows.
    ///
    /// Fails if any row's arity does not match the column count.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> TableResult<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Constructor for internal conversions that build rows with the right
    /// arity by construction.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Load a table from JSON row-objects, in the given column order.
    ///
    /// Keys missing from a record become [`Value::Null`]. Extra keys are
    /// ignored, matching how a driver's row set is wider than any one page
    /// needs.
    pub fn from_json_records<S: AsRef<str>>(
        columns: impl IntoIterator<Item = S>,
        records: &[serde_json::Value],
    ) -> TableResult<Self> {
        let columns: Vec<String> = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let object = record.as_object().ok_or(TableError::NotAnObject)?;
            let mut row = Vec::with_capacity(columns.len());
            for column in &columns {
                match object.get(column) {
                    Some(cell) => row.push(serde_json::from_value(cell.clone())?),
                    None => row.push(Value::Null),
                }
            }
            rows.push(row);
        }
        Table::from_rows(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, checking arity against the column set.
    pub fn push_row(&mut self, row: Vec<Value>) -> TableResult<()> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowArity {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Index of a named column, or an error for a column this table lacks.
    pub fn column_index(&self, name: &str) -> TableResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Numeric view of a column. Nulls count as zero; any other non-numeric
    /// cell is a programming error upstream and fails loudly.
    pub fn numbers(&self, column: &str) -> TableResult<Vec<f64>> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .map(|row| match &row[idx] {
                Value::Number(n) => Ok(*n),
                Value::Null => Ok(0.0),
                other => Err(TableError::CellType {
                    column: column.to_string(),
                    expected: "number",
                    found: other.kind(),
                }),
            })
            .collect()
    }

    /// Timestamp view of a column; date cells are midnight of that day.
    pub fn timestamps(&self, column: &str) -> TableResult<Vec<NaiveDateTime>> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .map(|row| {
                row[idx].as_timestamp().ok_or_else(|| TableError::CellType {
                    column: column.to_string(),
                    expected: "timestamp",
                    found: row[idx].kind(),
                })
            })
            .collect()
    }

    /// Sum of a numeric column. Zero for an empty table.
    pub fn column_sum(&self, column: &str) -> TableResult<f64> {
        Ok(self.numbers(column)?.iter().sum())
    }

    /// Mean of a numeric column. Zero for an empty table; the host page
    /// treats "no rows" as a no-consumption state, not an error.
    pub fn column_mean(&self, column: &str) -> TableResult<f64> {
        let values = self.numbers(column)?;
        if values.is_empty() {
            return Ok(0.0);
        }
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Distinct text values of a categorical column in first-seen order,
    /// suitable for a filter widget's option list. Nulls are skipped.
    pub fn unique_text(&self, column: &str) -> TableResult<Vec<String>> {
        let idx = self.column_index(column)?;
        let mut seen = Vec::new();
        for row in &self.rows {
            match &row[idx] {
                Value::Text(s) => {
                    if !seen.iter().any(|v| v == s) {
                        seen.push(s.clone());
                    }
                }
                Value::Null => {}
                other => {
                    return Err(TableError::CellType {
                        column: column.to_string(),
                        expected: "text",
                        found: other.kind(),
                    });
                }
            }
        }
        Ok(seen)
    }

    /// Keep rows whose categorical cell matches one of `values`.
    ///
    /// Nulls and non-text cells never match; this mirrors a membership
    /// filter over a selection widget's choices.
    pub fn filter_isin(&self, column: &str, values: &[&str]) -> TableResult<Table> {
        let idx = self.column_index(column)?;
        let rows = self
            .rows
            .iter()
            .filter(|row| match &row[idx] {
                Value::Text(s) => values.iter().any(|v| v == s),
                _ => false,
            })
            .cloned()
            .collect();
        Table::from_rows(self.columns.clone(), rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::from_rows(
            ["SERVICE_TYPE", "CREDITS_USED"],
            vec![
                vec!["WAREHOUSE_METERING".into(), 10.0.into()],
                vec!["PIPE".into(), 2.5.into()],
                vec!["WAREHOUSE_METERING".into(), 7.5.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn column_sum_and_mean() {
        let t = sample();
        assert_eq!(t.column_sum("CREDITS_USED").unwrap(), 20.0);
        let mean = t.column_mean("CREDITS_USED").unwrap();
        assert!((mean - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_table_sums_to_zero() {
        let t = Table::new(["CREDITS_USED"]);
        assert_eq!(t.column_sum("CREDITS_USED").unwrap(), 0.0);
        assert_eq!(t.column_mean("CREDITS_USED").unwrap(), 0.0);
    }

    #[test]
    fn unknown_column_fails_loudly() {
        let t = sample();
        assert!(matches!(
            t.column_sum("BYTES"),
            Err(TableError::UnknownColumn(_))
        ));
    }

    #[test]
    fn unique_preserves_first_seen_order() {
        let t = sample();
        assert_eq!(
            t.unique_text("SERVICE_TYPE").unwrap(),
            vec!["WAREHOUSE_METERING", "PIPE"]
        );
    }

    #[test]
    fn filter_isin_keeps_matching_rows() {
        let t = sample();
        let filtered = t.filter_isin("SERVICE_TYPE", &["PIPE"]).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.column_sum("CREDITS_USED").unwrap(), 2.5);
    }

    #[test]
    fn arity_mismatch_rejected() {
        let mut t = Table::new(["A", "B"]);
        assert!(matches!(
            t.push_row(vec![1.0.into()]),
            Err(TableError::RowArity {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn json_records_round_trip_cell_kinds() {
        let records = vec![
            json!({
                "START_TIME": "2024-03-01T10:30:00",
                "USAGE_DATE": "2024-03-01",
                "CREDITS_USED": 12.5,
                "NAME": "ETL_WH",
                "COMMENT": null
            }),
        ];
        let t = Table::from_json_records(
            ["START_TIME", "USAGE_DATE", "CREDITS_USED", "NAME", "COMMENT"],
            &records,
        )
        .unwrap();

        let row = &t.rows()[0];
        assert!(matches!(row[0], Value::Timestamp(_)));
        assert!(matches!(row[1], Value::Date(_)));
        assert_eq!(row[2], Value::Number(12.5));
        assert_eq!(row[3], Value::Text("ETL_WH".to_string()));
        assert_eq!(row[4], Value::Null);
    }

    #[test]
    fn missing_json_key_becomes_null() {
        let records = vec![json!({"A": 1.0})];
        let t = Table::from_json_records(["A", "B"], &records).unwrap();
        assert_eq!(t.rows()[0][1], Value::Null);
    }
}
