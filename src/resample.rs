//! Date-range resampling of sparse usage rows into dense period series.
//!
//! Warehouse usage tables only contain rows for periods with activity, but a
//! time chart needs a continuous x-axis. [`resample`] builds the full set of
//! period boundaries over `[date_from, date_to]`, sums the value column into
//! the period each row's timestamp falls in, and fills every period with no
//! rows with zero.
//!
//! # Edge behavior
//!
//! - An empty input table produces an all-zero series spanning the full
//!   range, never an empty one.
//! - `date_from > date_to` produces an empty series without error; the
//!   host decides how to present an inverted selection.
//! - Rows whose timestamp falls outside the range are ignored.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use tracing::debug;

use crate::error::TableResult;
use crate::table::{Table, Value};

/// Bucket width for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Hour,
}

impl Granularity {
    /// Floor a timestamp to the start of its period.
    fn floor(self, ts: NaiveDateTime) -> NaiveDateTime {
        let midnight = ts.date().and_time(NaiveTime::MIN);
        match self {
            Granularity::Day => midnight,
            Granularity::Hour => midnight + Duration::hours(i64::from(ts.hour())),
        }
    }

    fn step(self) -> Duration {
        match self {
            Granularity::Day => Duration::days(1),
            Granularity::Hour => Duration::hours(1),
        }
    }

    /// Last period start covering `date_to`. A day range at hourly
    /// granularity runs through 23:00 of the final day.
    fn range_end(self, date_to: NaiveDate) -> NaiveDateTime {
        let midnight = date_to.and_time(NaiveTime::MIN);
        match self {
            Granularity::Day => midnight,
            Granularity::Hour => midnight + Duration::hours(23),
        }
    }
}

/// One period of a resampled series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketPoint {
    pub period_start: NaiveDateTime,
    pub value: f64,
}

/// A contiguous, gap-free series of per-period sums.
#[derive(Debug, Clone, Serialize)]
pub struct BucketedSeries {
    granularity: Granularity,
    points: Vec<BucketPoint>,
}

impl BucketedSeries {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn points(&self) -> &[BucketPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum over all periods.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// True when no period carries any usage — the host page's
    /// "no consumption" state.
    pub fn is_all_zero(&self) -> bool {
        self.points.iter().all(|p| p.value == 0.0)
    }

    /// Re-shape into a two-column table for the chart collaborator.
    pub fn to_table(&self, timestamp_column: &str, value_column: &str) -> Table {
        let rows = self
            .points
            .iter()
            .map(|p| vec![Value::Timestamp(p.period_start), Value::Number(p.value)])
            .collect();
        Table::from_parts(
            vec![timestamp_column.to_string(), value_column.to_string()],
            rows,
        )
    }
}

/// Resample `table` over `[date_from, date_to]` at the given granularity.
///
/// Rows are bucketed by flooring `timestamp_column` to the period start and
/// summing `value_column` per bucket; every period in range appears exactly
/// once, zero-valued when no row fell into it.
pub fn resample(
    table: &Table,
    date_from: NaiveDate,
    date_to: NaiveDate,
    timestamp_column: &str,
    value_column: &str,
    granularity: Granularity,
) -> TableResult<BucketedSeries> {
    if date_from > date_to {
        return Ok(BucketedSeries {
            granularity,
            points: Vec::new(),
        });
    }

    let timestamps = table.timestamps(timestamp_column)?;
    let values = table.numbers(value_column)?;

    let mut sums: HashMap<NaiveDateTime, f64> = HashMap::new();
    for (ts, value) in timestamps.iter().zip(&values) {
        *sums.entry(granularity.floor(*ts)).or_insert(0.0) += value;
    }

    let end = granularity.range_end(date_to);
    let mut points = Vec::new();
    let mut cursor = date_from.and_time(NaiveTime::MIN);
    while cursor <= end {
        let value = sums.get(&cursor).copied().unwrap_or(0.0);
        points.push(BucketPoint {
            period_start: cursor,
            value,
        });
        cursor += granularity.step();
    }

    debug!(
        rows = table.len(),
        buckets = points.len(),
        ?granularity,
        "resampled usage table"
    );

    Ok(BucketedSeries {
        granularity,
        points,
    })
}

/// Resample over the table's own timestamp extent.
///
/// Convenience for charts that cover "whatever the query returned" rather
/// than a user-picked range. An empty table has no extent and yields an
/// empty series; use [`resample`] when a full zero-filled range is needed.
pub fn resample_over_extent(
    table: &Table,
    timestamp_column: &str,
    value_column: &str,
    granularity: Granularity,
) -> TableResult<BucketedSeries> {
    let timestamps = table.timestamps(timestamp_column)?;
    let (Some(first), Some(last)) = (timestamps.iter().min(), timestamps.iter().max()) else {
        return Ok(BucketedSeries {
            granularity,
            points: Vec::new(),
        });
    };
    resample(
        table,
        first.date(),
        last.date(),
        timestamp_column,
        value_column,
        granularity,
    )
}
