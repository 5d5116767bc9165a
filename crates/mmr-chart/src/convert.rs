// File: crates/mmr-chart/src/convert.rs
// Summary: Converts raw tracker player-history payloads into the chart feed format.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::error::{ChartError, Result};
use crate::feed::{parse_instant, Division, Feed, FeedBand, FeedCurrent, FeedPoint, FeedProfile, FeedThresholds};
use crate::interpolate::RankLadder;

const FALLBACK_BAND_CSS: &str = "rgba(100, 100, 100, 0.25)";

/// Who the history belongs to and which playlist to extract.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertOptions {
    pub playlist_id: u32,
    pub playlist: String,
    pub platform: String,
    pub username: String,
    /// Bands are emitted for `[min - margin, max + margin]`.
    pub band_margin: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            playlist_id: 28,
            playlist: "Rumble".to_string(),
            platform: "epic".to_string(),
            username: String::new(),
            band_margin: 50.0,
        }
    }
}

/// Tracker responses come keyed by playlist id (`{"data": {"28": [...]}}`) or
/// as a list of playlists (`{"data": [{"attributes": {"playlistId": 28}, "data": [...]}]}`).
/// The requested playlist wins; otherwise the first one with entries is used.
fn playlist_entries<'a>(payload: &'a Value, playlist_id: u32) -> Option<&'a [Value]> {
    let non_empty = |v: &'a Value| v.as_array().filter(|a| !a.is_empty()).map(Vec::as_slice);
    match payload.get("data")? {
        Value::Object(map) => map.get(&playlist_id.to_string()).and_then(non_empty).or_else(|| {
            map.iter().find_map(|(key, v)| {
                let entries = non_empty(v)?;
                log::info!("playlist {playlist_id} missing, using playlist {key}");
                Some(entries)
            })
        }),
        Value::Array(playlists) => {
            let wanted = playlists.iter().find(|p| {
                p.pointer("/attributes/playlistId").and_then(Value::as_u64) == Some(playlist_id as u64)
            });
            match wanted {
                Some(p) => p.get("data").and_then(non_empty),
                None => playlists.iter().find_map(|p| {
                    let entries = p.get("data").and_then(non_empty)?;
                    log::info!(
                        "playlist {playlist_id} missing, using playlist {}",
                        p.pointer("/attributes/playlistId").unwrap_or(&Value::Null)
                    );
                    Some(entries)
                }),
            }
        }
        _ => None,
    }
}

/// Build a feed from a tracker payload. `now` becomes `lastUpdated`.
pub fn convert(payload: &Value, ladder: &RankLadder, opts: &ConvertOptions, now: DateTime<Utc>) -> Result<Feed> {
    let entries = playlist_entries(payload, opts.playlist_id)
        .ok_or_else(|| ChartError::Parse("no playlist data found".to_string()))?;

    let mut points: Vec<(DateTime<Utc>, FeedPoint)> = Vec::with_capacity(entries.len());
    for entry in entries {
        let rating = entry.get("rating").and_then(Value::as_f64).filter(|v| v.is_finite());
        let date = entry.get("collectDate").and_then(Value::as_str).filter(|s| !s.is_empty());
        let (Some(mmr), Some(date)) = (rating, date) else { continue };
        let Some(at) = parse_instant(date) else {
            log::warn!("skipping entry with unparsable collectDate {date:?}");
            continue;
        };
        let bucket = ladder
            .bucket(mmr)
            .ok_or_else(|| ChartError::Parse("rank ladder is empty".to_string()))?;
        points.push((
            at,
            FeedPoint { date: date.to_string(), mmr, rank: bucket.tier, division: Division::Number(bucket.division) },
        ));
    }
    points.sort_by_key(|(at, _)| *at);
    let data_points: Vec<FeedPoint> = points.into_iter().map(|(_, p)| p).collect();

    let Some(latest) = data_points.last() else {
        return Err(ChartError::Parse("no data points".to_string()));
    };
    let current = ladder
        .bucket(latest.mmr)
        .ok_or_else(|| ChartError::Parse("rank ladder is empty".to_string()))?;

    let (lo, hi) = data_points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.mmr), hi.max(p.mmr)));
    let rank_bands = bands_covering(ladder, lo - opts.band_margin, hi + opts.band_margin);

    let tier_min = |name: &str, default: f64| ladder.tiers.iter().find(|t| t.name == name).map_or(default, |t| t.min);

    log::info!("converted {} data points, current {} {}", data_points.len(), current.tier, current.division_label());

    Ok(Feed {
        profile: Some(FeedProfile {
            platform: opts.platform.clone(),
            platform_username: opts.username.clone(),
            playlist: opts.playlist.clone(),
            playlist_id: Some(opts.playlist_id),
        }),
        current_rating: FeedCurrent {
            mmr: latest.mmr,
            rank: current.tier.clone(),
            division: Division::Text(current.division_label()),
            matches: data_points.len() as u64,
        },
        rank_thresholds: Some(FeedThresholds {
            gc1: Some(tier_min("Grand Champion I", 1435.0)),
            gc2: Some(tier_min("Grand Champion II", 1535.0)),
            gc3: Some(tier_min("Grand Champion III", 1635.0)),
            ssl: Some(tier_min("Supersonic Legend", 1862.0)),
            comment: Some(format!("{} thresholds", opts.playlist)),
        }),
        rank_bands,
        data_points,
        last_updated: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    })
}

/// One band per tier overlapping `[lo, hi]`, ascending.
pub fn bands_covering(ladder: &RankLadder, lo: f64, hi: f64) -> Vec<FeedBand> {
    let mut out: Vec<FeedBand> = Vec::new();
    for (i, tier) in ladder.tiers.iter().enumerate() {
        let next = ladder.tiers.get(i + 1).map_or(tier.min + ladder.top_tier_span, |t| t.min);
        if next < lo || tier.min > hi || out.iter().any(|b| b.name == tier.name) {
            continue;
        }
        out.push(FeedBand {
            name: tier.name.clone(),
            min_mmr: tier.min,
            max_mmr: next,
            color: ladder.family_color(&tier.name).unwrap_or(FALLBACK_BAND_CSS).to_string(),
        });
    }
    out
}
