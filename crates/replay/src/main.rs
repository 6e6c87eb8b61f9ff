//! Activity Replay - Main Entry Point

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use dms::SessionConfig;
use replay::{init_logging, replay, CONFIG_PATH_ENV};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    info!("=== Driver Activity Replay v{} ===", env!("CARGO_PKG_VERSION"));

    let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let config = SessionConfig::load(path.as_deref()).context("loading session config")?;

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());
    let summary = replay(config, stdin, stdout)?;

    info!(
        frames = summary.frames,
        without_face = summary.frames_without_face,
        inactive = summary.inactive_frames,
        "Replay finished"
    );
    Ok(())
}
