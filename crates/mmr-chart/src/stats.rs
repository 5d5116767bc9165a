// File: crates/mmr-chart/src/stats.rs
// Summary: Current-rating stats bar (rank, rating, distance to GC1, freshness).

use chrono::{DateTime, Utc};

use crate::axis::{group_thousands, rating_label, short_date, signed_delta};
use crate::series::Dataset;

#[derive(Clone, Debug, PartialEq)]
pub struct StatsBar {
    pub rank: String,
    pub division: String,
    pub rating: String,
    pub matches: String,
    pub to_reference: String,
    /// `true` when the current rating is at or above the reference threshold.
    pub at_or_above: bool,
    pub playlist: String,
    /// `Last updated: ...`, absent when the feed has no timestamp.
    pub last_updated: Option<String>,
}

impl StatsBar {
    pub fn from_dataset(dataset: &Dataset, now: DateTime<Utc>) -> Self {
        let s = &dataset.summary;
        let delta = (s.value - dataset.reference_threshold).round() as i64;
        Self {
            rank: s.category_label.clone(),
            division: s.sub_bucket.clone(),
            rating: rating_label(s.value),
            matches: group_thousands(s.observations.min(i64::MAX as u64) as i64),
            to_reference: signed_delta(delta),
            at_or_above: delta >= 0,
            playlist: dataset.profile.playlist.clone(),
            last_updated: s.last_updated.map(|t| format!("Last updated: {}", time_ago(now, t))),
        }
    }
}

impl std::fmt::Display for StatsBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.playlist.is_empty() {
            writeln!(f, "[{}]", self.playlist)?;
        }
        writeln!(f, "Rank:     {} {}", self.rank, self.division)?;
        writeln!(f, "Rating:   {}", self.rating)?;
        writeln!(f, "Matches:  {}", self.matches)?;
        writeln!(f, "To GC1:   {}", self.to_reference)?;
        if let Some(updated) = &self.last_updated {
            writeln!(f, "{updated}")?;
        }
        Ok(())
    }
}

fn plural(n: i64, unit: &str) -> String {
    format!("{n} {unit}{} ago", if n == 1 { "" } else { "s" })
}

/// Human readable age: `just now`, `N minutes ago`, `N hours ago`,
/// `N days ago` (under a week), otherwise the short date.
pub fn time_ago(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let mins = (now - then).num_minutes();
    let hours = mins.div_euclid(60);
    let days = hours.div_euclid(24);
    if mins < 1 {
        "just now".to_string()
    } else if mins < 60 {
        plural(mins, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else {
        short_date(then)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 12, 10, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now, now - Duration::seconds(30)), "just now");
        assert_eq!(time_ago(now, now + Duration::minutes(5)), "just now");
        assert_eq!(time_ago(now, now - Duration::minutes(1)), "1 minute ago");
        assert_eq!(time_ago(now, now - Duration::minutes(59)), "59 minutes ago");
        assert_eq!(time_ago(now, now - Duration::hours(2)), "2 hours ago");
        assert_eq!(time_ago(now, now - Duration::days(1)), "1 day ago");
        assert_eq!(time_ago(now, now - Duration::days(8)), "Dec 2, 2025");
    }
}
