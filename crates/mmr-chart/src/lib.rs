// File: crates/mmr-chart/src/lib.rs
// Summary: Core library entry point; exports the public API for loading, interacting with and rendering the MMR chart.

pub mod axis;
pub mod chart;
pub mod config;
pub mod convert;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod geometry;
pub mod grid;
pub mod interpolate;
pub mod marker;
pub mod scale;
pub mod scene;
pub mod series;
pub mod stats;
pub mod svg;
pub mod text;
pub mod theme;
pub mod tooltip;
pub mod types;
pub mod view;

pub use chart::{Chart, RenderOptions};
pub use config::ChartConfig;
pub use debounce::ResizeDebouncer;
pub use error::{ChartError, Result};
pub use feed::{load, parse_feed, FeedSource};
pub use interpolate::{Interpolator, RankLadder, Reading};
pub use marker::Marker;
pub use scale::{compute_scales, Scales};
pub use scene::{Layer, Scene};
pub use series::{CategoryBand, Dataset, Sample, SampleSet};
pub use stats::StatsBar;
pub use text::TextShaper;
pub use theme::Theme;
pub use tooltip::{Tooltip, TooltipContent};
pub use types::{Insets, Size};
pub use view::{ViewWindow, Viewport, ViewportEvent, ViewportState};
