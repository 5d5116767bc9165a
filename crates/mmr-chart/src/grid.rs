// File: crates/mmr-chart/src/grid.rs
// Summary: Grid/tick layout helpers (fixed value steps, calendar month boundaries).

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Upper bound on ticks per axis; wider ranges coarsen the step.
pub const MAX_TICKS: f64 = 1000.0;

/// Multiples of `step` inside `[min, max]`, ascending. When the range would
/// need more than [`MAX_TICKS`], the step doubles until it fits (ticks stay
/// multiples of the requested step).
pub fn value_ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !step.is_finite() || !min.is_finite() || !max.is_finite() || max < min {
        return Vec::new();
    }
    let mut step = step;
    while (max - min) / step > MAX_TICKS {
        step *= 2.0;
    }
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// First-of-month instants (UTC midnight) strictly inside `(start, end)`.
pub fn month_starts(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut out = Vec::new();
    let d = start.date_naive();
    let Some(mut cursor) = next_month(d.year(), d.month()) else { return out; };
    loop {
        let Some(t) = cursor.and_hms_opt(0, 0, 0).map(|n| n.and_utc()) else { break; };
        if t >= end {
            break;
        }
        if t > start {
            out.push(t);
        }
        match next_month(cursor.year(), cursor.month()) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    out
}

fn next_month(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn value_ticks_cover_range() {
        assert_eq!(value_ticks(612.0, 790.0, 50.0), vec![650.0, 700.0, 750.0]);
        assert_eq!(value_ticks(600.0, 700.0, 100.0), vec![600.0, 700.0]);
        assert!(value_ticks(0.0, 10.0, 0.0).is_empty());
    }

    #[test]
    fn value_ticks_stay_bounded_for_huge_ranges() {
        let ticks = value_ticks(0.0, 1e12, 50.0);
        assert!(!ticks.is_empty());
        assert!(ticks.len() as f64 <= MAX_TICKS + 2.0, "{} ticks", ticks.len());
        assert!(ticks.windows(2).all(|w| w[1] > w[0]));
        assert!(ticks.iter().all(|t| (t / 50.0).fract() == 0.0));

        let wide = value_ticks(-f64::MAX / 4.0, f64::MAX / 4.0, 50.0);
        assert!(wide.len() as f64 <= MAX_TICKS + 2.0);
    }

    #[test]
    fn month_starts_skip_partial_first_month() {
        let start = Utc.with_ymd_and_hms(2025, 10, 14, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 1, 20, 0, 0, 0).unwrap();
        let months: Vec<_> = month_starts(start, end).iter().map(|t| (t.year(), t.month())).collect();
        assert_eq!(months, vec![(2025, 11), (2025, 12), (2026, 1)]);
    }
}
