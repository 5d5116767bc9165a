// File: crates/mmr-cli/src/logger.rs
// Summary: fern dispatch writing `[timestamp LEVEL target] message` to stderr and an optional log file.

use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;

pub fn setup(level: &str, file: Option<&Path>) -> anyhow::Result<()> {
    let level = LevelFilter::from_str(level).map_err(|_| anyhow::anyhow!("unknown log level '{level}'"))?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .chain(std::io::stderr());

    if let Some(path) = file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }
    dispatch.apply()?;
    Ok(())
}
