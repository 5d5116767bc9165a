// File: crates/mmr-chart/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders the fixture chart (full range and a zoomed window) to PNG bytes, labels off.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot files.
// - Else, if a snapshot exists, compares decoded pixels for exact match.
// - Else, logs a note and returns (skips) without failing to ease first run.

mod common;

use common::{fixture_dataset, plain_config};
use mmr_chart::{Chart, RenderOptions};

fn bless_mode() -> bool {
    std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

fn write_or_compare(name: &str, bytes: &[u8]) {
    let snap_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let path = snap_dir.join(name);

    if bless_mode() {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&path, bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", path.display(), bytes.len());
        return;
    }

    if path.exists() {
        let want = std::fs::read(&path).expect("read snapshot");
        // Compare decoded pixel buffers to avoid PNG encoder variance
        let got_img = image::load_from_memory(bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "rendered pixels differ from golden snapshot: {}", path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", path.display());
    }
}

fn opts() -> RenderOptions {
    RenderOptions { draw_labels: false, ..RenderOptions::default() }
}

#[test]
fn golden_full_range() {
    let cfg = plain_config();
    let chart = Chart::new(fixture_dataset(&cfg), cfg);
    let bytes = chart.render_to_png_bytes(&opts()).expect("render");
    write_or_compare("full_range.png", &bytes);
}

#[test]
fn golden_zoomed_window() {
    let cfg = plain_config();
    let mut chart = Chart::new(fixture_dataset(&cfg), cfg);
    for _ in 0..6 {
        chart.on_wheel(600.0, 200.0, -1.0);
    }
    let bytes = chart.render_to_png_bytes(&opts()).expect("render");
    write_or_compare("zoomed_window.png", &bytes);
}
