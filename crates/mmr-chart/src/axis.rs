// File: crates/mmr-chart/src/axis.rs
// Summary: Axis and tooltip label formatting (dates, ratings, signed deltas).

use chrono::{DateTime, Utc};

/// Month tick label, e.g. `Nov '25`.
pub fn month_label(t: DateTime<Utc>) -> String {
    t.format("%b '%y").to_string()
}

/// Long date for tooltips, e.g. `Mon, Dec 1, 2025`.
pub fn tooltip_date(t: DateTime<Utc>) -> String {
    t.format("%a, %b %-d, %Y").to_string()
}

/// Short date, e.g. `Dec 1, 2025`.
pub fn short_date(t: DateTime<Utc>) -> String {
    t.format("%b %-d, %Y").to_string()
}

/// Integer with `,` thousands separators: `1234567` -> `1,234,567`.
pub fn group_thousands(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rating rounded for display, with separators.
pub fn rating_label(value: f64) -> String {
    group_thousands(value.round() as i64)
}

/// Signed distance, `+12` / `-40` / `+0`.
pub fn signed_delta(delta: i64) -> String {
    if delta >= 0 { format!("+{delta}") } else { delta.to_string() }
}
