// File: crates/mmr-chart/src/theme.rs
// Summary: Dark/Light theming for chart rendering colors, plus CSS color parsing for feed bands.

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub grid: skia::Color,
    pub axis_label: skia::Color,
    pub band_label: skia::Color,
    pub line_stroke: skia::Color,
    pub line_glow: skia::Color,
    pub point_fill: skia::Color,
    pub point_stroke: skia::Color,
    pub marker_stroke: skia::Color,
    pub cursor: skia::Color,
    pub tooltip_background: skia::Color,
    pub tooltip_border: skia::Color,
    pub tooltip_text: skia::Color,
    pub positive: skia::Color,
    pub negative: skia::Color,
    pub control_background: skia::Color,
    pub control_text: skia::Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 14, 14, 18),
            grid: skia::Color::from_argb(13, 255, 255, 255),
            axis_label: skia::Color::from_argb(128, 255, 255, 255),
            band_label: skia::Color::from_argb(90, 255, 255, 255),
            line_stroke: skia::Color::from_argb(255, 0xf5, 0x9e, 0x0b),
            line_glow: skia::Color::from_argb(38, 245, 158, 11),
            point_fill: skia::Color::from_argb(255, 0xf5, 0x9e, 0x0b),
            point_stroke: skia::Color::from_argb(255, 14, 14, 18),
            marker_stroke: skia::Color::from_argb(255, 255, 255, 255),
            cursor: skia::Color::from_argb(90, 245, 158, 11),
            tooltip_background: skia::Color::from_argb(235, 24, 24, 30),
            tooltip_border: skia::Color::from_argb(80, 245, 158, 11),
            tooltip_text: skia::Color::from_argb(255, 235, 235, 245),
            positive: skia::Color::from_argb(255, 34, 197, 94),
            negative: skia::Color::from_argb(255, 239, 68, 68),
            control_background: skia::Color::from_argb(200, 40, 40, 48),
            control_text: skia::Color::from_argb(255, 235, 235, 245),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 250, 250, 252),
            grid: skia::Color::from_argb(20, 0, 0, 0),
            axis_label: skia::Color::from_argb(150, 20, 20, 30),
            band_label: skia::Color::from_argb(110, 20, 20, 30),
            line_stroke: skia::Color::from_argb(255, 0xd9, 0x77, 0x06),
            line_glow: skia::Color::from_argb(38, 217, 119, 6),
            point_fill: skia::Color::from_argb(255, 0xd9, 0x77, 0x06),
            point_stroke: skia::Color::from_argb(255, 250, 250, 252),
            marker_stroke: skia::Color::from_argb(255, 255, 255, 255),
            cursor: skia::Color::from_argb(110, 217, 119, 6),
            tooltip_background: skia::Color::from_argb(240, 255, 255, 255),
            tooltip_border: skia::Color::from_argb(90, 217, 119, 6),
            tooltip_text: skia::Color::from_argb(255, 20, 20, 30),
            positive: skia::Color::from_argb(255, 22, 163, 74),
            negative: skia::Color::from_argb(255, 220, 38, 38),
            control_background: skia::Color::from_argb(220, 230, 230, 235),
            control_text: skia::Color::from_argb(255, 20, 20, 30),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::dark(), Theme::light()]
}

/// Find a theme by its `name`, falling back to dark.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::dark()
}

/// Neutral band color used when a feed color cannot be parsed.
pub const FALLBACK_BAND: skia::Color = skia::Color::new(0x4064_6464);

/// Parse the CSS color forms found in feeds and configs:
/// `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
pub fn parse_css_color(input: &str) -> Option<skia::Color> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    let (body, with_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest.strip_suffix(')')?, true)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest.strip_suffix(')')?, false)
    } else {
        return None;
    };
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let channel = |p: &str| -> Option<u8> {
        let v: f32 = p.parse().ok()?;
        v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
    };
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = if with_alpha {
        let v: f32 = parts[3].parse().ok()?;
        if !v.is_finite() { return None; }
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };
    Some(skia::Color::from_argb(a, r, g, b))
}

fn parse_hex(hex: &str) -> Option<skia::Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(skia::Color::from_argb(255, nib(0)?, nib(1)?, nib(2)?))
        }
        6 => Some(skia::Color::from_argb(255, byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(skia::Color::from_argb(byte(6)?, byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

/// CSS `rgba()` form of a color, used by the SVG exporter.
pub fn css_rgba(c: skia::Color) -> String {
    let alpha = c.a() as f32 / 255.0;
    format!("rgba({}, {}, {}, {})", c.r(), c.g(), c.b(), (alpha * 1000.0).round() / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feed_band_colors() {
        let c = parse_css_color("rgba(139, 90, 43, 0.25)").unwrap();
        assert_eq!((c.r(), c.g(), c.b()), (139, 90, 43));
        assert_eq!(c.a(), 64);

        let hex = parse_css_color("#ff69b4").unwrap();
        assert_eq!((hex.a(), hex.r(), hex.g(), hex.b()), (255, 0xff, 0x69, 0xb4));

        assert_eq!(parse_css_color("#fff").map(|c| c.r()), Some(255));
        assert!(parse_css_color("hsl(10, 20%, 30%)").is_none());
        assert!(parse_css_color("rgba(1, 2, 3)").is_none());
    }

    #[test]
    fn unknown_theme_falls_back_to_dark() {
        assert_eq!(find("LIGHT").name, "light");
        assert_eq!(find("sepia").name, "dark");
    }
}
