//! Pretty-printing of raw usage magnitudes for display.
//!
//! Pure, total over non-negative input; negative usage never occurs
//! upstream. Formatted strings are display-only and must never feed back
//! into sorting or aggregation.

use crate::theme::Theme;

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with the largest 1024-based unit keeping the
/// magnitude in `[1, 1024)`. Scaled units get one decimal place; plain
/// bytes stay integral.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0usize;
    while size >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", BYTE_UNITS[unit])
    }
}

/// Format a credit total as a thousands-separated integer with the credit
/// label from the default [`Theme`]. No unit scaling.
pub fn format_credits(credits: u64) -> String {
    format!(
        "{} {}",
        thousands_separated(credits),
        Theme::DEFAULT.credits_label
    )
}

/// Format a duration in whole seconds: `42s`, `3m 12s`, `2h 05m`.
pub fn format_duration_secs(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    }
}

fn thousands_separated(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (index, ch) in raw.chars().rev().enumerate() {
        if index > 0 && index % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
