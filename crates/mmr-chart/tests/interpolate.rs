// File: crates/mmr-chart/tests/interpolate.rs
// Purpose: Interpolator edge clamping, snapping and the linear formula.

mod common;

use chrono::Duration;
use common::{dataset, day};
use mmr_chart::{Interpolator, RankLadder, SampleSet};

fn snap() -> Duration {
    Duration::hours(12)
}

#[test]
fn snaps_near_samples_and_interpolates_between() {
    // t0 = day 0, t1 = day 2, t2 = day 4
    let data = dataset(&[(day(0), 700.0), (day(2), 800.0), (day(4), 900.0)]);
    let ladder = RankLadder::default();
    let interp = Interpolator::new(&data.samples, &ladder, snap());

    let near = interp.value_at(day(2) + Duration::hours(6));
    assert_eq!(near.timestamp, day(2));
    assert_eq!(near.value, 800.0);
    assert!(near.exact);

    let mid = interp.value_at(day(3));
    assert_eq!(mid.value, 850.0);
    assert!(!mid.exact);
    assert_eq!(mid.timestamp, day(3));
    // 850 sits in Diamond I (776..856), last quarter
    assert_eq!(mid.category_label, "Diamond I");
    assert_eq!(mid.sub_bucket, "Division 4");
}

#[test]
fn clamps_to_first_and_last_sample() {
    let data = dataset(&[(day(1), 1000.0), (day(5), 1100.0)]);
    let ladder = RankLadder::default();
    let interp = Interpolator::new(&data.samples, &ladder, snap());

    let before = interp.value_at(day(-30));
    assert_eq!((before.timestamp, before.value, before.exact), (day(1), 1000.0, true));
    let after = interp.value_at(day(90));
    assert_eq!((after.timestamp, after.value, after.exact), (day(5), 1100.0, true));
    assert_eq!(interp.value_at(day(1)).value, 1000.0);
    assert_eq!(interp.value_at(day(5)).value, 1100.0);
}

#[test]
fn linear_formula_between_distant_samples() {
    let (a, b) = (1200.0, 1300.0);
    let data = dataset(&[(day(0), a), (day(10), b)]);
    let ladder = RankLadder::default();
    let interp = Interpolator::new(&data.samples, &ladder, snap());
    for hours in [13_i64, 36, 100, 200, 226] {
        let t = day(0) + Duration::hours(hours);
        let r = interp.value_at(t);
        let expected = a + (hours as f64 / 240.0) * (b - a);
        assert!((r.value - expected).abs() < 1e-9, "at +{hours}h: {} vs {expected}", r.value);
        assert!(!r.exact);
    }
}

#[test]
fn snap_threshold_is_strict() {
    let data = dataset(&[(day(0), 700.0), (day(2), 800.0)]);
    let ladder = RankLadder::default();
    let interp = Interpolator::new(&data.samples, &ladder, snap());
    let inside = interp.value_at(day(0) + Duration::hours(12) - Duration::milliseconds(1));
    assert!(inside.exact);
    let boundary = interp.value_at(day(0) + Duration::hours(12));
    assert!(!boundary.exact);
    assert_eq!(boundary.value, 725.0);
}

#[test]
fn empty_samples_read_unknown() {
    let empty = SampleSet::default();
    let ladder = RankLadder::default();
    let r = Interpolator::new(&empty, &ladder, snap()).value_at(day(3));
    assert_eq!(r.value, 0.0);
    assert_eq!(r.category_label, "Unknown");
    assert_eq!(r.sub_bucket, "Unknown");
    assert!(!r.exact);
}

#[test]
fn duplicate_timestamps_keep_feed_order() {
    let data = dataset(&[(day(1), 900.0), (day(0), 700.0), (day(1), 950.0)]);
    let values: Vec<f64> = data.samples.iter().map(|s| s.value).collect();
    assert_eq!(values, vec![700.0, 900.0, 950.0]);
}
