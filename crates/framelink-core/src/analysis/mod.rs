use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::config::DecoderConfig;
use crate::decoder::Decoder;
use crate::protocols::link::error::ConfigError;
use crate::source::{FrameSource, JsonLinesFrameSource, SourceError};
use crate::{CaptureSummary, InputInfo, Report, make_stub_report};

mod summary;

use summary::{CaptureStats, count_events};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Decode a JSON-lines capture export with one decoder session.
pub fn decode_capture_file(path: &Path, config: &DecoderConfig) -> Result<Report, AnalysisError> {
    let source = JsonLinesFrameSource::open(path)?;
    let mut report = decode_source(config, source)?;
    report.input = Some(InputInfo {
        path: path.display().to_string(),
        bytes: path.metadata()?.len(),
    });
    Ok(report)
}

/// Drain `source` through a fresh decoder built from `config`.
pub fn decode_source<S: FrameSource>(
    config: &DecoderConfig,
    mut source: S,
) -> Result<Report, AnalysisError> {
    let mut decoder = Decoder::new(config.clone())?;
    let mut stats = CaptureStats::default();
    let mut events = Vec::new();

    while let Some(frame) = source.next_frame()? {
        stats.observe(&frame);
        if let Some(event) = decoder.decode(&frame) {
            events.push(event);
        }
    }
    debug!(
        frames = stats.frames_total,
        events = events.len(),
        out_of_order = stats.out_of_order_frames,
        "capture decoded"
    );

    let mut report = make_stub_report(config.clone());
    report.capture_summary = Some(CaptureSummary {
        frames_total: stats.frames_total,
        result_frames: stats.result_frames,
        other_frames: stats.other_frames,
        out_of_order_frames: stats.out_of_order_frames,
        time_start: stats.first_start,
        time_end: stats.last_end,
        open_packet_start: decoder.open_packet_start(),
    });
    report.event_counts = count_events(&events);
    report.events = events;
    Ok(report)
}
