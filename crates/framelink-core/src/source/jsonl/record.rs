use serde::Deserialize;

use super::error::JsonlSourceError;
use crate::source::{CaptureFrame, FrameKind};

#[derive(Debug, Deserialize)]
pub struct FrameRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: FrameData,
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct FrameData {
    #[serde(default)]
    pub miso: Option<RawPayload>,
    #[serde(default)]
    pub mosi: Option<RawPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawPayload {
    Bytes(Vec<u8>),
    Hex(String),
}

impl RawPayload {
    fn into_bytes(self) -> Result<Vec<u8>, String> {
        match self {
            RawPayload::Bytes(bytes) => Ok(bytes),
            RawPayload::Hex(text) => {
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                hex::decode(compact).map_err(|err| err.to_string())
            }
        }
    }
}

/// Parse one non-blank export line into a frame. `line` is 1-based and only
/// used for error reporting.
pub fn parse_frame_line(text: &str, line: usize) -> Result<CaptureFrame, JsonlSourceError> {
    let record: FrameRecord =
        serde_json::from_str(text).map_err(|err| JsonlSourceError::Record {
            line,
            message: err.to_string(),
        })?;
    if record.end_time < record.start_time {
        return Err(JsonlSourceError::InvalidSpan {
            line,
            start: record.start_time,
            end: record.end_time,
        });
    }
    let peripheral = decode_payload(record.data.miso, "miso", line)?;
    let host = decode_payload(record.data.mosi, "mosi", line)?;
    Ok(CaptureFrame {
        kind: FrameKind::from_name(&record.kind),
        peripheral,
        host,
        start_time: record.start_time,
        end_time: record.end_time,
    })
}

fn decode_payload(
    raw: Option<RawPayload>,
    field: &'static str,
    line: usize,
) -> Result<Vec<u8>, JsonlSourceError> {
    match raw {
        Some(raw) => raw
            .into_bytes()
            .map_err(|message| JsonlSourceError::Payload {
                line,
                field,
                message,
            }),
        None => Ok(Vec::new()),
    }
}
