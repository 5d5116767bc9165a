// File: crates/mmr-chart/tests/scale.rs
// Purpose: Scale engine round-trips, value-domain fallback and the measurability precondition.

mod common;

use common::{daily, day};
use mmr_chart::scale::ScaleInputs;
use mmr_chart::{compute_scales, ChartError, Insets, Size, ViewWindow};

#[test]
fn maps_window_onto_plot_and_back() {
    let data = daily(30);
    let window = ViewWindow::new(day(0), day(30)).unwrap();
    let insets = Insets::default();
    let s = compute_scales(&ScaleInputs {
        window,
        size: Size::new(960.0, 420.0),
        insets: &insets,
        visible: data.samples.in_range(window.start, window.end),
        all: data.samples.as_slice(),
        value_padding: 50.0,
    })
    .unwrap();

    assert_eq!(s.time.to_px(day(0)), 60.0);
    assert_eq!(s.time.to_px(day(30)), 940.0);
    assert_eq!(s.value.to_px(1200.0 - 50.0), 380.0);
    assert_eq!(s.value.to_px(1260.0 + 50.0), 20.0);

    for px in [60.0_f32, 123.5, 500.0, 939.0] {
        let t = s.time.from_px(px);
        assert!((s.time.to_px(t) - px).abs() < 0.01, "x round-trip at {px}");
    }
    for v in [1150.0, 1234.5, 1310.0] {
        assert!((s.value.from_px(s.value.to_px(v)) - v).abs() < 1e-3, "y round-trip at {v}");
    }
}

#[test]
fn value_domain_follows_visible_samples() {
    let data = daily(30);
    let window = ViewWindow::new(day(10), day(12)).unwrap();
    let insets = Insets::default();
    let s = compute_scales(&ScaleInputs {
        window,
        size: Size::new(960.0, 420.0),
        insets: &insets,
        visible: data.samples.in_range(window.start, window.end),
        all: data.samples.as_slice(),
        value_padding: 50.0,
    })
    .unwrap();
    assert_eq!((s.value.vmin, s.value.vmax), (1220.0 - 50.0, 1224.0 + 50.0));
}

#[test]
fn empty_window_falls_back_to_full_set() {
    let data = common::dataset(&[(day(0), 1000.0), (day(20), 1100.0)]);
    let window = ViewWindow::new(day(5), day(6)).unwrap();
    let insets = Insets::default();
    let visible = data.samples.in_range(window.start, window.end);
    assert!(visible.is_empty());
    let s = compute_scales(&ScaleInputs {
        window,
        size: Size::new(960.0, 420.0),
        insets: &insets,
        visible,
        all: data.samples.as_slice(),
        value_padding: 50.0,
    })
    .unwrap();
    assert_eq!((s.value.vmin, s.value.vmax), (950.0, 1150.0));
}

#[test]
fn flat_series_without_padding_stays_finite() {
    let data = common::dataset(&[(day(0), 1000.0), (day(3), 1000.0)]);
    let window = ViewWindow::new(day(0), day(3)).unwrap();
    let insets = Insets::default();
    let s = compute_scales(&ScaleInputs {
        window,
        size: Size::new(400.0, 300.0),
        insets: &insets,
        visible: data.samples.as_slice(),
        all: data.samples.as_slice(),
        value_padding: 0.0,
    })
    .unwrap();
    assert!(s.value.to_px(1000.0).is_finite());
}

#[test]
fn unmeasurable_container_is_a_precondition_error() {
    let data = daily(5);
    let window = ViewWindow::new(day(0), day(5)).unwrap();
    let insets = Insets::default();
    for size in [Size::new(0.0, 420.0), Size::new(70.0, 420.0), Size::new(960.0, 50.0)] {
        let err = compute_scales(&ScaleInputs {
            window,
            size,
            insets: &insets,
            visible: data.samples.as_slice(),
            all: data.samples.as_slice(),
            value_padding: 50.0,
        })
        .unwrap_err();
        assert!(matches!(err, ChartError::RenderPrecondition { .. }), "{size:?}");
    }
}
