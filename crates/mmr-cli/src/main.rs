// File: crates/mmr-cli/src/main.rs
// Summary: `mmr-chart` binary; renders the progression chart to PNG/SVG (optionally replaying gestures),
// inspects interpolated readings, prints the stats bar and converts raw tracker history into a feed.

mod logger;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use mmr_chart::convert::{convert, ConvertOptions};
use mmr_chart::feed::parse_instant;
use mmr_chart::{svg, theme, Chart, ChartConfig, FeedSource, Size, StatsBar, TooltipContent};

/// Rating progression chart tools.
#[derive(Parser, Debug)]
#[command(name = "mmr-chart")]
#[command(version)]
struct Cli {
    /// Chart config (JSON); defaults apply for missing fields
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Also append log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the chart to a PNG or SVG file
    Render(RenderArgs),
    /// Print the reading at a date
    Inspect {
        /// Feed file or http(s) URL
        feed: String,
        /// `YYYY-MM-DD` or RFC 3339
        #[arg(long)]
        at: String,
    },
    /// Print the current-rating stats bar
    Stats {
        /// Feed file or http(s) URL
        feed: String,
    },
    /// Convert a tracker history payload into a chart feed
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Feed file or http(s) URL
    feed: String,

    /// Output path; `.svg` writes SVG, anything else PNG
    #[arg(short, long, default_value = "target/out/mmr-chart.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 960)]
    width: u32,

    #[arg(long, default_value_t = 420)]
    height: u32,

    /// Theme preset (overrides the config)
    #[arg(long)]
    theme: Option<String>,

    /// Skip text (deterministic output across font setups)
    #[arg(long)]
    no_labels: bool,

    /// Wheel step at `X:DELTA` (negative delta zooms in); repeatable
    #[arg(long = "zoom", value_name = "X:DELTA", value_parser = parse_pair)]
    zooms: Vec<(f32, f32)>,

    /// Horizontal drag from `X1:X2`; repeatable
    #[arg(long = "pan", value_name = "X1:X2", value_parser = parse_pair)]
    pans: Vec<(f32, f32)>,

    /// Hover at plot x to show the tooltip
    #[arg(long)]
    hover: Option<f32>,

    /// Click at `X,Y` (pins a point or hits the reset control)
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    click: Option<(f32, f32)>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Raw tracker payload (JSON)
    payload: PathBuf,

    /// Where to write the feed
    #[arg(short, long, default_value = "data/mmr-data.json")]
    output: PathBuf,

    #[arg(long, default_value_t = 28)]
    playlist_id: u32,

    #[arg(long, default_value = "Rumble")]
    playlist: String,

    #[arg(long, default_value = "epic")]
    platform: String,

    #[arg(long, default_value = "")]
    username: String,
}

fn parse_pair(raw: &str) -> std::result::Result<(f32, f32), String> {
    let (a, b) = raw.split_once(':').ok_or_else(|| format!("expected A:B, got '{raw}'"))?;
    let a = a.trim().parse::<f32>().map_err(|e| format!("'{a}': {e}"))?;
    let b = b.trim().parse::<f32>().map_err(|e| format!("'{b}': {e}"))?;
    Ok((a, b))
}

fn parse_point(raw: &str) -> std::result::Result<(f32, f32), String> {
    let (x, y) = raw.split_once(',').ok_or_else(|| format!("expected X,Y, got '{raw}'"))?;
    let x = x.trim().parse::<f32>().map_err(|e| format!("'{x}': {e}"))?;
    let y = y.trim().parse::<f32>().map_err(|e| format!("'{y}': {e}"))?;
    Ok((x, y))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::setup(&cli.log_level, cli.log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => ChartConfig::load(path).with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => ChartConfig::default(),
    };

    match cli.command {
        Command::Render(args) => render(args, config),
        Command::Inspect { feed, at } => inspect(&feed, &at, config),
        Command::Stats { feed } => {
            let chart = open(&feed, config)?;
            print!("{}", StatsBar::from_dataset(chart.dataset(), Utc::now()));
            Ok(())
        }
        Command::Convert(args) => convert_payload(args, &config),
    }
}

fn open(feed: &str, config: ChartConfig) -> Result<Chart> {
    let source = FeedSource::parse(feed);
    Chart::from_source(&source, config).with_context(|| format!("failed to load feed '{source}'"))
}

fn render(args: RenderArgs, config: ChartConfig) -> Result<()> {
    let mut chart = open(&args.feed, config)?;
    if let Some(name) = &args.theme {
        chart.set_theme(theme::find(name));
    }
    chart
        .resize(Size::new(args.width as f32, args.height as f32))
        .with_context(|| format!("cannot render at {}x{}", args.width, args.height))?;

    let mid = args.height as f32 / 2.0;
    for &(x, delta) in &args.zooms {
        if !chart.on_wheel(x, mid, delta) {
            log::info!("wheel at x={x} left the window unchanged");
        }
    }
    for &(from, to) in &args.pans {
        chart.on_pointer_down(from, mid);
        chart.on_pointer_move(to, mid);
        chart.on_pointer_up();
    }
    if let Some(x) = args.hover {
        chart.on_pointer_move(x, mid);
    }
    if let Some((x, y)) = args.click {
        match chart.on_click(x, y) {
            Some(index) => log::info!("pinned sample #{index}"),
            None => log::info!("click at ({x}, {y}) hit no data point"),
        }
    }
    let w = chart.window();
    log::info!("visible window {} .. {}", w.start.to_rfc3339(), w.end.to_rfc3339());

    ensure_parent(&args.output)?;
    let is_svg = args.output.extension().is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        let Some(scene) = chart.frame() else { bail!("no frame to export") };
        std::fs::write(&args.output, svg::to_svg(&scene))
            .with_context(|| format!("failed to write '{}'", args.output.display()))?;
    } else {
        let mut opts = chart.render_options();
        opts.draw_labels = !args.no_labels;
        chart.render_to_png(&opts, &args.output)?;
    }
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn inspect(feed: &str, at: &str, config: ChartConfig) -> Result<()> {
    let Some(t) = parse_instant(at) else { bail!("unrecognised date '{at}'") };
    let chart = open(feed, config)?;
    let reading = chart.value_at(t);
    let content = TooltipContent::from_reading(&reading, chart.dataset().reference_threshold);
    for line in content.lines() {
        println!("{line}");
    }
    Ok(())
}

fn convert_payload(args: ConvertArgs, config: &ChartConfig) -> Result<()> {
    let raw = std::fs::read_to_string(&args.payload)
        .with_context(|| format!("failed to read '{}'", args.payload.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&raw).context("payload is not valid JSON")?;
    let opts = ConvertOptions {
        playlist_id: args.playlist_id,
        playlist: args.playlist,
        platform: args.platform,
        username: args.username,
        ..ConvertOptions::default()
    };
    let feed = convert(&payload, &config.ladder, &opts, Utc::now())?;

    ensure_parent(&args.output)?;
    let body = serde_json::to_string_pretty(&feed)?;
    std::fs::write(&args.output, body).with_context(|| format!("failed to write '{}'", args.output.display()))?;
    println!("Wrote {} ({} data points)", args.output.display(), feed.data_points.len());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create '{}'", parent.display()))?;
    }
    Ok(())
}
