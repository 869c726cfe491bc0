//! framelink core library: link-layer framing decoder for bus captures.
//!
//! A capture engine samples the bus and hands over one transaction frame at
//! a time, each with a peripheral (MISO) and a host (MOSI) payload. This
//! crate turns that frame stream into labeled time spans: Header and Footer
//! delimiters (whose 32-bit magics usually straddle two frames), Status
//! bytes, or whole Packets when aggregating.
//!
//! Layers:
//! - `source`: frame sources (in-memory, JSON-lines capture export)
//! - `protocols::link`: byte layout, delimiter codec, status classification
//! - `decoder`: the per-session state machine
//! - `analysis`: drives a source through a decoder into a `Report`
//!
//! Invariants:
//! - One `Decoder` per capture session; frames are fed strictly in order.
//! - A half-seen delimiter is resolved by the next `result` frame.
//! - Malformed or short payloads never raise errors; they match nothing.
//! - Reports are deterministic for a given config and frame sequence.
//!
//! # Examples
//! ```
//! use framelink_core::{CaptureFrame, DecoderConfig, VecFrameSource, decode_source};
//!
//! let frames = vec![
//!     CaptureFrame::result(vec![0xCA, 0x11], vec![0x00, 0x00], 0.0, 1.0),
//!     CaptureFrame::result(vec![0xAB, 0x1E], vec![0x00, 0x00], 1.0, 2.0),
//! ];
//! let report = decode_source(&DecoderConfig::default(), VecFrameSource::new(frames))?;
//! assert_eq!(report.events.len(), 1);
//! assert_eq!(report.events[0].label.to_string(), "Header");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
mod config;
mod decoder;
mod protocols;
mod source;

pub use analysis::{AnalysisError, decode_capture_file, decode_source};
pub use config::{
    BusDirection, ConfigLoadError, DecoderConfig, MagicWidth, OutputMode, StatusFlags,
    parse_numeric,
};
pub use decoder::{DecodedEvent, Decoder, DecoderState, EventKind, FrameSpan, Phase};
pub use protocols::link::StatusKind;
pub use protocols::link::error::ConfigError;
pub use source::{
    CaptureFrame, FrameKind, FrameSource, JsonLinesFrameSource, SourceError, VecFrameSource,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Decoding report with deterministic ordering.
///
/// # Examples
/// ```
/// use framelink_core::{DecoderConfig, make_stub_report};
///
/// let report = make_stub_report(DecoderConfig::default());
/// assert_eq!(report.report_version, framelink_core::REPORT_VERSION);
/// assert!(report.events.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Input capture metadata, when decoding from a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<InputInfo>,
    /// Effective decoder configuration.
    pub config: DecoderConfig,
    /// Frame stream summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Event totals per label, in label order.
    pub event_counts: Vec<EventCount>,
    /// Decoded events in capture order.
    pub events: Vec<DecodedEvent>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "framelink").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
///
/// # Examples
/// ```
/// use framelink_core::InputInfo;
///
/// let input = InputInfo {
///     path: "capture.jsonl".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Frame stream summary. Times are capture seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Frames read from the source.
    pub frames_total: u64,
    /// Frames of kind `result`.
    pub result_frames: u64,
    /// Frames of any other kind.
    pub other_frames: u64,
    /// Frames that started before their predecessor.
    pub out_of_order_frames: u64,
    /// Earliest frame start (if any frame was read).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<f64>,
    /// Latest frame end (if any frame was read).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<f64>,
    /// Start of a packet still open when the capture ended (Packet mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_packet_start: Option<f64>,
}

/// Number of events sharing a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCount {
    pub label: String,
    pub count: u64,
}

/// Build a report with base fields filled and no events.
pub fn make_stub_report(config: DecoderConfig) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "framelink".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: None,
        config,
        capture_summary: None,
        event_counts: vec![],
        events: vec![],
    }
}
