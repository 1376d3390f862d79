//! End-to-end pipeline tests: JSON row set in, chart-ready tables out,
//! the way a dashboard page wires the pieces together.

use chrono::NaiveDate;
use serde_json::json;
use usage_insights::{
    Aggregate, Granularity, Table, Value, format_bytes, format_credits, leaderboard,
    log1p_columns, resample,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

/// The compute-insights page flow: load driver rows, filter by service
/// type, headline total, resample over the picked week, group into a
/// top-10 leaderboard with pretty-printed credits.
#[test]
fn compute_insights_page_flow() {
    let records = vec![
        json!({"START_TIME": "2024-03-01T08:00:00", "NAME": "ETL_WH", "SERVICE_TYPE": "WAREHOUSE_METERING", "CREDITS_USED": 120.0}),
        json!({"START_TIME": "2024-03-01T19:30:00", "NAME": "BI_WH", "SERVICE_TYPE": "WAREHOUSE_METERING", "CREDITS_USED": 40.0}),
        json!({"START_TIME": "2024-03-03T11:00:00", "NAME": "LOADER", "SERVICE_TYPE": "PIPE", "CREDITS_USED": 15.0}),
        json!({"START_TIME": "2024-03-06T23:00:00", "NAME": "ETL_WH", "SERVICE_TYPE": "WAREHOUSE_METERING", "CREDITS_USED": 60.0}),
    ];
    let table = Table::from_json_records(
        ["START_TIME", "NAME", "SERVICE_TYPE", "CREDITS_USED"],
        &records,
    )
    .unwrap();

    // Filter widget: only metering rows.
    let filtered = table
        .filter_isin("SERVICE_TYPE", &["WAREHOUSE_METERING"])
        .unwrap();
    assert_eq!(filtered.len(), 3);

    // Headline figure.
    let consumption = filtered.column_sum("CREDITS_USED").unwrap() as u64;
    assert_eq!(format_credits(consumption), "220 credits");

    // Rows on 2 of 7 days: dense series, 5 zero buckets, totals preserved.
    let series = resample(
        &filtered,
        date(1),
        date(7),
        "START_TIME",
        "CREDITS_USED",
        Granularity::Day,
    )
    .unwrap();
    assert_eq!(series.len(), 7);
    let zeros = series.points().iter().filter(|p| p.value == 0.0).count();
    assert_eq!(zeros, 5);
    assert_eq!(series.total(), 220.0);

    // Top-10 leaderboard, formatted for the dataframe widget.
    let board = leaderboard(
        &filtered,
        &["NAME", "SERVICE_TYPE"],
        "CREDITS_USED",
        Aggregate::Sum,
        10,
    )
    .unwrap()
    .with_display(|v| format_credits(v as u64));

    assert_eq!(board.len(), 2);
    assert_eq!(board.rows()[0].value, 180.0);
    assert_eq!(board.rows()[0].display.as_deref(), Some("180 credits"));

    let widget = board.to_table("CREDITS_USED");
    assert_eq!(widget.columns(), ["RANK", "NAME", "SERVICE_TYPE", "CREDITS_USED"]);
}

/// No rows at all is a normal state: full-range zero series, empty
/// leaderboard, and the host renders "no data" off the results.
#[test]
fn empty_result_set_stays_well_formed() {
    let table = Table::new(["START_TIME", "NAME", "CREDITS_USED"]);

    let series = resample(
        &table,
        date(1),
        date(7),
        "START_TIME",
        "CREDITS_USED",
        Granularity::Day,
    )
    .unwrap();
    assert_eq!(series.len(), 7);
    assert!(series.is_all_zero());

    let board = leaderboard(&table, &["NAME"], "CREDITS_USED", Aggregate::Sum, 10).unwrap();
    assert!(board.is_empty());
}

/// The query-optimization scatter: log1p both axes without disturbing the
/// identity column, then chart.
#[test]
fn scatter_rescaling_flow() {
    let records = vec![
        json!({"QUERY_TEXT": "copy into t", "EXECUTION_MINUTES": 0.0, "NUMBER_OF_QUERIES": 9.0}),
        json!({"QUERY_TEXT": "select 1", "EXECUTION_MINUTES": 63.0, "NUMBER_OF_QUERIES": 1.0}),
    ];
    let table = Table::from_json_records(
        ["QUERY_TEXT", "EXECUTION_MINUTES", "NUMBER_OF_QUERIES"],
        &records,
    )
    .unwrap();

    let rescaled = log1p_columns(&table, &["EXECUTION_MINUTES", "NUMBER_OF_QUERIES"]).unwrap();
    assert_eq!(rescaled.rows()[0][1], Value::Number(0.0));
    assert_eq!(rescaled.rows()[1][1], Value::Number(64.0_f64.ln()));
    assert_eq!(
        rescaled.rows()[0][0],
        Value::Text("copy into t".to_string())
    );
}

/// Storage headline: average bytes per day over the resampled series,
/// pretty-printed.
#[test]
fn storage_daily_average_headline() {
    let records = vec![
        json!({"USAGE_DATE": "2024-03-01", "DATABASE_BYTES": 2_147_483_648.0}),
        json!({"USAGE_DATE": "2024-03-03", "DATABASE_BYTES": 1_073_741_824.0}),
    ];
    let table = Table::from_json_records(["USAGE_DATE", "DATABASE_BYTES"], &records).unwrap();

    let series = resample(
        &table,
        date(1),
        date(3),
        "USAGE_DATE",
        "DATABASE_BYTES",
        Granularity::Day,
    )
    .unwrap();

    let per_day = series.total() / series.len() as f64;
    assert_eq!(format_bytes(per_day as u64), "1.0 GB");
}
