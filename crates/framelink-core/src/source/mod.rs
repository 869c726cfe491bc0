mod jsonl;
mod memory;

pub use jsonl::JsonLinesFrameSource;
pub use memory::VecFrameSource;

use thiserror::Error;

use crate::config::BusDirection;

/// Capture engine frame type. Only `result` frames carry decodable bytes;
/// anything else (errors, enable/disable markers) breaks delimiter matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    Result,
    Other(String),
}

impl FrameKind {
    pub fn from_name(name: &str) -> Self {
        if name == "result" {
            FrameKind::Result
        } else {
            FrameKind::Other(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FrameKind::Result => "result",
            FrameKind::Other(name) => name,
        }
    }
}

/// One bus transaction as delivered by the capture engine.
///
/// Times are seconds from the start of the capture.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureFrame {
    pub kind: FrameKind,
    /// Peripheral-driven bytes (MISO).
    pub peripheral: Vec<u8>,
    /// Host-driven bytes (MOSI).
    pub host: Vec<u8>,
    pub start_time: f64,
    pub end_time: f64,
}

impl CaptureFrame {
    pub fn result(peripheral: Vec<u8>, host: Vec<u8>, start_time: f64, end_time: f64) -> Self {
        Self {
            kind: FrameKind::Result,
            peripheral,
            host,
            start_time,
            end_time,
        }
    }

    pub fn other(name: &str, start_time: f64, end_time: f64) -> Self {
        Self {
            kind: FrameKind::from_name(name),
            peripheral: Vec::new(),
            host: Vec::new(),
            start_time,
            end_time,
        }
    }

    pub fn is_result(&self) -> bool {
        self.kind == FrameKind::Result
    }

    pub fn payload(&self, direction: BusDirection) -> &[u8] {
        match direction {
            BusDirection::Peripheral => &self.peripheral,
            BusDirection::Host => &self.host,
        }
    }
}

pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<CaptureFrame>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error (line {line}): {message}")]
    Parse { line: usize, message: String },
}

impl From<jsonl::error::JsonlSourceError> for SourceError {
    fn from(value: jsonl::error::JsonlSourceError) -> Self {
        match value {
            jsonl::error::JsonlSourceError::Io(err) => SourceError::Io(err),
            other => SourceError::Parse {
                line: other.line().unwrap_or(0),
                message: other.to_string(),
            },
        }
    }
}
