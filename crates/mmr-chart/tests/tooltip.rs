// File: crates/mmr-chart/tests/tooltip.rs
// Purpose: Hover/pin tooltip behaviour driven through the chart context.

mod common;

use chrono::Duration;
use common::{dataset, day, plain_config};
use mmr_chart::tooltip::TooltipState;
use mmr_chart::{Chart, Size, TooltipContent};

fn chart() -> Chart {
    let data = dataset(&[(day(0), 1400.0), (day(4), 1440.0), (day(8), 1420.0)]);
    Chart::new(data, plain_config())
}

#[test]
fn hover_reads_interpolated_value_at_cursor() {
    let mut ch = chart();
    let s = *ch.scales().unwrap();
    let x = s.time.to_px(day(2));
    ch.on_pointer_move(x, 200.0);

    let reading = ch.tooltip().reading().expect("visible");
    assert!(!reading.exact);
    assert!((reading.value - 1420.0).abs() < 0.5);
    let placement = ch.tooltip().placement().unwrap();
    assert_eq!(placement.anchor.0, x);
    assert!((placement.anchor.1 - s.value.to_px(reading.value)).abs() < 1e-3);
    assert_eq!(placement.guide_bottom, s.plot.bottom);

    let content = ch.tooltip().content(1435.0).unwrap();
    assert!(content.estimated);
    assert_eq!(content.delta, -15);
    assert_eq!(content.delta_label, "-15");
    assert!(content.lines().iter().any(|l| l == "(Estimated from interpolation)"));
}

#[test]
fn leaving_plot_horizontally_hides() {
    let mut ch = chart();
    ch.on_pointer_move(500.0, 200.0);
    assert!(ch.tooltip().is_visible());
    ch.on_pointer_move(30.0, 200.0);
    assert!(!ch.tooltip().is_visible());
    ch.on_pointer_move(500.0, 200.0);
    ch.on_pointer_leave();
    assert!(!ch.tooltip().is_visible());
}

#[test]
fn click_on_point_pins_exact_sample_until_next_move() {
    let mut ch = chart();
    let p = ch.scene().unwrap().points()[1];
    assert_eq!(ch.on_click(p.x + 1.0, p.y - 1.0), Some(1));
    match ch.tooltip().state() {
        TooltipState::Pinned { index, reading, .. } => {
            assert_eq!(*index, 1);
            assert!(reading.exact);
            assert_eq!(reading.value, 1440.0);
        }
        other => panic!("expected pinned, got {other:?}"),
    }
    let content = ch.tooltip().content(1435.0).unwrap();
    assert!(!content.estimated);
    assert_eq!(content.delta_label, "+5");
    assert_eq!(content.date, "Sun, Oct 5, 2025");

    ch.on_pointer_move(p.x + 40.0, p.y);
    assert!(matches!(ch.tooltip().state(), TooltipState::Hover { .. }));
}

#[test]
fn click_on_empty_space_pins_nothing() {
    let mut ch = chart();
    assert_eq!(ch.on_click(500.0, 30.0), None);
    assert!(!ch.tooltip().is_visible());
}

#[test]
fn hover_near_sample_snaps_to_it() {
    let mut ch = chart();
    let x = ch.scales().unwrap().time.to_px(day(4) + Duration::hours(3));
    ch.on_pointer_move(x, 100.0);
    let r = ch.tooltip().reading().unwrap();
    assert!(r.exact);
    assert_eq!(r.value, 1440.0);
}

#[test]
fn tooltip_box_flips_near_right_edge() {
    let mut ch = chart();
    ch.on_pointer_move(930.0, 200.0);
    let b = ch.tooltip().placement().unwrap().bounds;
    assert_eq!(b.right, 930.0 - 20.0);
    ch.resize(Size::new(960.0, 420.0)).unwrap();
    assert!(!ch.tooltip().is_visible());
}

#[test]
fn content_formats_large_ratings() {
    let reading = mmr_chart::Reading {
        timestamp: day(61),
        value: 1862.4,
        category_label: "Supersonic Legend".to_string(),
        sub_bucket: "Division 1".to_string(),
        exact: true,
    };
    let c = TooltipContent::from_reading(&reading, 1435.0);
    assert_eq!(c.rating, "1,862");
    assert_eq!(c.delta_label, "+427");
    assert!(c.is_above_reference());
    assert_eq!(c.date, "Mon, Dec 1, 2025");
}
