//! Data-shaping core for warehouse usage dashboards.
//!
//! A usage dashboard fetches small, pre-aggregated result tables from a
//! cloud data warehouse (compute credits, storage bytes, data transfer,
//! query history) and charts them over a user-picked date range. The
//! warehouse does the heavy accounting; this crate does the re-shaping in
//! between fetch and render:
//!
//! - [`resample`] turns sparse, irregularly-timed rows into a dense
//!   per-day or per-hour series with zero-filled gaps, so charts get a
//!   continuous x-axis even with no data.
//! - [`leaderboard`] and [`daily_average_leaderboard`] build sorted,
//!   truncated top-N views of grouped aggregates with podium markers.
//! - [`format_bytes`], [`format_credits`], and [`format_duration_secs`]
//!   pretty-print raw magnitudes for display.
//! - [`log1p_columns`] rescales heavy-tailed columns for log-axis charts.
//!
//! Everything operates on an in-memory [`Table`] and returns new values;
//! there is no I/O, no shared state, and no persistence. The warehouse
//! driver, the page layout, and the chart renderer are external
//! collaborators.

pub mod error;
pub mod format;
pub mod leaderboard;
pub mod resample;
pub mod table;
pub mod theme;
pub mod transform;

pub use error::{TableError, TableResult};
pub use format::{format_bytes, format_credits, format_duration_secs};
pub use leaderboard::{
    Aggregate, Leaderboard, LeaderboardRow, Medal, daily_average_leaderboard, leaderboard,
    top_rows,
};
pub use resample::{BucketPoint, BucketedSeries, Granularity, resample, resample_over_extent};
pub use table::{Table, Value};
pub use theme::Theme;
pub use transform::log1p_columns;
