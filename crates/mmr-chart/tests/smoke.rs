// File: crates/mmr-chart/tests/smoke.rs
// Purpose: End-to-end render smoke tests (PNG file, PNG bytes, RGBA buffer, SVG) from the fixture feed.

mod common;

use common::{fixture_dataset, plain_config};
use mmr_chart::{svg, Chart, RenderOptions};

#[test]
fn render_smoke_png() {
    let cfg = plain_config();
    let chart = Chart::new(fixture_dataset(&cfg), cfg);

    let opts = RenderOptions::default();
    let out = std::path::PathBuf::from("target/test_out/smoke.png");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();

    chart.render_to_png(&opts, &out).expect("render should succeed");
    let meta = std::fs::metadata(&out).expect("output exists");
    assert!(meta.len() > 0, "png should be non-empty");

    // Also verify in-memory API works
    let bytes = chart.render_to_png_bytes(&opts).expect("render bytes");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
    let decoded = image::load_from_memory(&bytes).expect("decodes").to_rgba8();
    assert_eq!(decoded.dimensions(), (960, 420));
}

#[test]
fn render_rgba8_buffer() {
    let cfg = plain_config();
    let chart = Chart::new(fixture_dataset(&cfg), cfg);

    let opts = RenderOptions { width: 640, height: 320, draw_labels: false, ..RenderOptions::default() };
    let (px, w, h, stride) = chart.render_to_rgba8(&opts).expect("rgba render");
    assert_eq!((w, h), (640, 320));
    assert_eq!(w as usize * h as usize * 4, px.len());
    assert_eq!(stride, (w as usize) * 4);

    // Top-left pixel is opaque background.
    let bg = chart.theme().background;
    assert_eq!(&px[0..4], &[bg.r(), bg.g(), bg.b(), 255]);
}

#[test]
fn render_fails_for_unmeasurable_surface() {
    let cfg = plain_config();
    let chart = Chart::new(fixture_dataset(&cfg), cfg);
    let opts = RenderOptions { width: 40, height: 40, ..RenderOptions::default() };
    assert!(chart.render_to_png_bytes(&opts).is_err());
}

#[test]
fn svg_export_keeps_element_classes() {
    let cfg = plain_config();
    let mut chart = Chart::new(fixture_dataset(&cfg), cfg);
    chart.on_wheel(500.0, 200.0, -1.0);
    let doc = svg::to_svg(&chart.frame().expect("frame"));
    assert!(doc.starts_with("<svg"));
    assert!(doc.trim_end().ends_with("</svg>"));
    for class in ["bands-group", "mmr-rank-band", "mmr-grid-line", "mmr-line", "mmr-data-point", "mmr-axis-label", "mmr-reset-zoom"] {
        assert!(doc.contains(class), "missing {class}");
    }
    assert!(doc.contains(r#"data-index="#));
}
