// File: crates/mmr-chart/src/svg.rs
// Summary: SVG document export of a scene (one <g> per layer, element classes kept for styling).

use std::fmt::Write as _;

use skia_safe as skia;

use crate::scene::{Item, Layer, Primitive, Scene, Stroke, TextAnchor};
use crate::theme::css_rgba;

fn group_class(layer: Layer) -> &'static str {
    match layer {
        Layer::Bands => "bands-group",
        Layer::Grid => "grid-group",
        Layer::MarkerBackground | Layer::MarkerForeground => "controller-marker-group",
        Layer::Line => "line-group",
        Layer::Points => "points-group",
        Layer::Axes => "axis-group",
        Layer::Overlay => "overlay-group",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn num(v: f32) -> String {
    let r = (v * 100.0).round() / 100.0;
    if r == r.trunc() { format!("{}", r as i64) } else { format!("{r}") }
}

fn paint_attrs(fill: Option<skia::Color>, stroke: Option<&Stroke>) -> String {
    let mut s = String::new();
    match fill {
        Some(c) => { let _ = write!(s, r#" fill="{}""#, css_rgba(c)); }
        None => s.push_str(r#" fill="none""#),
    }
    if let Some(st) = stroke {
        let _ = write!(s, r#" stroke="{}" stroke-width="{}""#, css_rgba(st.color), num(st.width));
        if let Some([on, off]) = st.dash {
            let _ = write!(s, r#" stroke-dasharray="{},{}""#, num(on), num(off));
        }
    }
    s
}

fn write_item(out: &mut String, item: &Item, clip_id: &str) {
    let class = item.class;
    let _ = match &item.primitive {
        Primitive::Rect { rect, fill, stroke, corner_radius } => writeln!(
            out,
            r#"    <rect class="{class}" x="{}" y="{}" width="{}" height="{}" rx="{}"{}/>"#,
            num(rect.left),
            num(rect.top),
            num(rect.width()),
            num(rect.height()),
            num(*corner_radius),
            paint_attrs(Some(*fill), stroke.as_ref())
        ),
        Primitive::Line { from, to, stroke } => writeln!(
            out,
            r#"    <line class="{class}" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            num(from.0),
            num(from.1),
            num(to.0),
            num(to.1),
            paint_attrs(None, Some(stroke))
        ),
        Primitive::Polyline { points, stroke, .. } => {
            let mut d = String::new();
            for (i, (x, y)) in points.iter().enumerate() {
                let _ = write!(d, "{}{} {}", if i == 0 { "M " } else { " L " }, num(*x), num(*y));
            }
            writeln!(
                out,
                r#"    <path class="{class}" d="{d}" clip-path="url(#{clip_id})" stroke-linejoin="round"{}/>"#,
                paint_attrs(None, Some(stroke))
            )
        }
        Primitive::Circle { center, radius, fill, stroke } => writeln!(
            out,
            r#"    <circle class="{class}" cx="{}" cy="{}" r="{}"{}/>"#,
            num(center.0),
            num(center.1),
            num(*radius),
            paint_attrs(Some(*fill), stroke.as_ref())
        ),
        Primitive::Text { at, text, size, color, anchor } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            writeln!(
                out,
                r#"    <text class="{class}" x="{}" y="{}" font-size="{}" text-anchor="{anchor}" fill="{}">{}</text>"#,
                num(at.0),
                num(at.1),
                num(*size),
                css_rgba(*color),
                escape(text)
            )
        }
        Primitive::Image { rect, path, .. } => writeln!(
            out,
            r#"    <image class="{class}" x="{}" y="{}" width="{}" height="{}" href="{}"/>"#,
            num(rect.left),
            num(rect.top),
            num(rect.width()),
            num(rect.height()),
            escape(&path.to_string_lossy())
        ),
    };
}

/// Standalone SVG document for a scene. Data points carry `data-index`.
pub fn to_svg(scene: &Scene) -> String {
    let (w, h) = (num(scene.size.width), num(scene.size.height));
    let p = scene.plot;
    let clip_id = "mmr-plot-clip";
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="mmr-chart-svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(
        out,
        r#"  <defs><clipPath id="{clip_id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
        num(p.left),
        num(p.top),
        num(p.width()),
        num(p.height())
    );
    let _ = writeln!(out, r#"  <rect width="100%" height="100%" fill="{}"/>"#, css_rgba(scene.background));

    let mut points = scene.points().iter();
    let mut current: Option<Layer> = None;
    for item in scene.items() {
        if current != Some(item.layer) {
            if current.is_some() {
                out.push_str("  </g>\n");
            }
            let _ = writeln!(out, r#"  <g class="{}">"#, group_class(item.layer));
            current = Some(item.layer);
        }
        if item.class == "mmr-data-point" {
            if let (Primitive::Circle { center, radius, fill, stroke }, Some(hit)) = (&item.primitive, points.next()) {
                let _ = writeln!(
                    out,
                    r#"    <circle class="mmr-data-point" cx="{}" cy="{}" r="{}" data-index="{}"{}/>"#,
                    num(center.0),
                    num(center.1),
                    num(*radius),
                    hit.index,
                    paint_attrs(Some(*fill), stroke.as_ref())
                );
                continue;
            }
        }
        write_item(&mut out, item, clip_id);
    }
    if current.is_some() {
        out.push_str("  </g>\n");
    }
    out.push_str("</svg>\n");
    out
}
