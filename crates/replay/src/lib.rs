//! Activity Replay
//!
//! Drives an activity session from recorded per-frame features, one JSON value
//! per line: `{"ear": 0.31, "mouth_open": 0.05}` or `null` for a frame without a face.
//! Emits one JSON line per frame with the classification.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Context;
use dms::{ActivityReport, ActivitySession, ActivityStatus, SessionConfig};
use feature_engine::FrameFeatures;
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Environment variable naming an optional session config file
pub const CONFIG_PATH_ENV: &str = "DMS_CONFIG_PATH";

/// Environment variable selecting the log level
pub const LOG_LEVEL_ENV: &str = "DMS_LOG";

/// One output line
#[derive(Debug, Serialize)]
struct FrameLine<'a> {
    frame: u64,
    face_detected: bool,
    #[serde(flatten)]
    report: Option<&'a ActivityReport>,
}

/// Totals for a finished replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub frames: u64,
    pub frames_without_face: u64,
    pub inactive_frames: u64,
}

/// Initialize logging to stderr, leaving stdout for frame output
pub fn init_logging() -> anyhow::Result<()> {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|v| Level::from_str(&v).ok())
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("setting tracing subscriber")
}

/// Classify every frame read from `input`, writing one JSON line per frame to `output`
pub fn replay<R: BufRead, W: Write>(
    config: SessionConfig,
    input: R,
    mut output: W,
) -> anyhow::Result<ReplaySummary> {
    let mut session = ActivitySession::new(config, ())?;
    let mut summary = ReplaySummary::default();

    for (idx, line) in input.lines().enumerate() {
        let line = line.context("reading input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let features: Option<FrameFeatures> = serde_json::from_str(line)
            .with_context(|| format!("parsing frame features on line {}", idx + 1))?;

        let outcome = session.process_features(features);
        let report = outcome.report();

        if report.is_some_and(|r| r.status() == ActivityStatus::Inactive) {
            summary.inactive_frames += 1;
        }
        summary.frames += 1;

        serde_json::to_writer(
            &mut output,
            &FrameLine {
                frame: summary.frames,
                face_detected: outcome.face_detected(),
                report,
            },
        )?;
        output.write_all(b"\n")?;
    }

    output.flush()?;
    summary.frames_without_face = session.frames_without_face();
    debug!(?summary, "Replay complete");
    Ok(summary)
}
