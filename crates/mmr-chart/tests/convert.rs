// File: crates/mmr-chart/tests/convert.rs
// Purpose: Tracker payload conversion for both response shapes.

mod common;

use chrono::{TimeZone, Utc};
use common::plain_config;
use mmr_chart::convert::{bands_covering, convert, ConvertOptions};
use mmr_chart::feed::Division;
use mmr_chart::{parse_feed, ChartError, RankLadder};
use serde_json::json;

fn entries() -> serde_json::Value {
    json!([
        {"rating": 1300, "collectDate": "2025-11-02T10:00:00+00:00"},
        {"rating": 1180, "collectDate": "2025-10-01T10:00:00+00:00"},
        {"rating": null, "collectDate": "2025-10-05T10:00:00+00:00"},
        {"rating": 1440, "collectDate": "2025-12-01T10:00:00+00:00"},
        {"rating": 1250}
    ])
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 2, 8, 0, 0).unwrap()
}

#[test]
fn keyed_by_playlist_id() {
    let payload = json!({ "data": { "13": [{"rating": 900, "collectDate": "2025-10-01"}], "28": entries() } });
    let feed = convert(&payload, &RankLadder::default(), &ConvertOptions::default(), now()).unwrap();

    let values: Vec<f64> = feed.data_points.iter().map(|p| p.mmr).collect();
    assert_eq!(values, vec![1180.0, 1300.0, 1440.0]);
    assert_eq!(feed.data_points[0].rank, "Champion III");
    assert_eq!(feed.data_points[0].division, Division::Number(1));
    assert_eq!(feed.current_rating.rank, "Grand Champion I");
    assert_eq!(feed.current_rating.division, Division::Text("Division 1".to_string()));
    assert_eq!(feed.current_rating.matches, 3);
    assert_eq!(feed.last_updated.as_deref(), Some("2025-12-02T08:00:00.000Z"));
    assert_eq!(feed.rank_thresholds.as_ref().and_then(|t| t.gc1), Some(1435.0));
}

#[test]
fn list_of_playlists_with_attributes() {
    let payload = json!({ "data": [
        { "attributes": { "playlistId": 11 }, "data": [{"rating": 500, "collectDate": "2025-10-01"}] },
        { "attributes": { "playlistId": 28 }, "data": entries() }
    ]});
    let feed = convert(&payload, &RankLadder::default(), &ConvertOptions::default(), now()).unwrap();
    assert_eq!(feed.data_points.len(), 3);
    assert_eq!(feed.profile.as_ref().and_then(|p| p.playlist_id), Some(28));
}

#[test]
fn falls_back_to_first_playlist_with_entries() {
    let payload = json!({ "data": [
        { "attributes": { "playlistId": 10 }, "data": [] },
        { "attributes": { "playlistId": 11 }, "data": [{"rating": 500, "collectDate": "2025-10-01"}] }
    ]});
    let feed = convert(&payload, &RankLadder::default(), &ConvertOptions::default(), now()).unwrap();
    assert_eq!(feed.data_points.len(), 1);
    assert_eq!(feed.data_points[0].rank, "Gold III");
}

#[test]
fn bands_cover_margin_around_data() {
    let ladder = RankLadder::default();
    let names: Vec<String> = bands_covering(&ladder, 1180.0 - 50.0, 1440.0 + 50.0).into_iter().map(|b| b.name).collect();
    assert_eq!(names, vec!["Champion II", "Champion III", "Grand Champion I"]);

    let top = bands_covering(&ladder, 1900.0, 2000.0);
    assert_eq!(top.len(), 1);
    assert_eq!((top[0].min_mmr, top[0].max_mmr), (1862.0, 2062.0));
    assert_eq!(top[0].color, "rgba(251, 163, 177, 0.25)");
}

#[test]
fn converted_feed_loads_as_chart_data() {
    let payload = json!({ "data": { "28": entries() } });
    let feed = convert(&payload, &RankLadder::default(), &ConvertOptions::default(), now()).unwrap();
    let body = serde_json::to_string(&feed).unwrap();
    let data = parse_feed(&body, &plain_config()).unwrap();
    assert_eq!(data.samples.len(), 3);
    assert_eq!(data.bands.len(), 3);
    assert_eq!(data.summary.sub_bucket, "Division 1");
}

#[test]
fn payload_without_entries_is_rejected() {
    let ladder = RankLadder::default();
    let opts = ConvertOptions::default();
    for payload in [json!({}), json!({"data": {}}), json!({"data": {"28": [{"rating": null}]}})] {
        let err = convert(&payload, &ladder, &opts, now()).unwrap_err();
        assert!(matches!(err, ChartError::Parse(_)));
    }
}
