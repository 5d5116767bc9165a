// File: crates/mmr-chart/src/error.rs
// Summary: Error taxonomy for loading, measuring and rendering the chart.

use std::io;

/// Everything that can abort a chart operation. None of these are meant to
/// take the host down: callers log and skip the affected operation.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The feed could not be retrieved (network failure or non-success status).
    #[error("failed to fetch feed: {0}")]
    Fetch(String),
    /// The feed body is not JSON or does not have the expected shape.
    #[error("malformed feed: {0}")]
    Parse(String),
    /// The container cannot host a plot yet (e.g. zero width).
    #[error("container not measurable: {width}x{height}")]
    RenderPrecondition { width: f32, height: f32 },
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Raster surface creation or image encoding failed.
    #[error("render backend: {0}")]
    Backend(&'static str),
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Parse(err.to_string())
    }
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
