use std::fmt;

use serde::{Deserialize, Serialize};

use crate::protocols::link::StatusKind;

/// What a decoded event marks. Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventKind {
    Header,
    Footer,
    Status(StatusKind),
    Packet,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Header => f.write_str("Header"),
            EventKind::Footer => f.write_str("Footer"),
            EventKind::Status(kind) => write!(f, "Status {}", kind.suffix()),
            EventKind::Packet => f.write_str("Packet"),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.to_string()
    }
}

impl TryFrom<String> for EventKind {
    type Error = String;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        match label.as_str() {
            "Header" => return Ok(EventKind::Header),
            "Footer" => return Ok(EventKind::Footer),
            "Packet" => return Ok(EventKind::Packet),
            _ => {}
        }
        StatusKind::ALL
            .into_iter()
            .map(EventKind::Status)
            .find(|kind| kind.to_string() == label)
            .ok_or_else(|| format!("unknown event label '{label}'"))
    }
}

/// Labeled time span handed to the presentation layer.
///
/// # Examples
/// ```
/// use framelink_core::{DecodedEvent, EventKind};
///
/// let event = DecodedEvent::new(EventKind::Header, 0.0, 2.0);
/// assert_eq!(event.label.to_string(), "Header");
/// assert_eq!(event.duration(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedEvent {
    pub label: EventKind,
    pub start_time: f64,
    pub end_time: f64,
}

impl DecodedEvent {
    pub fn new(label: EventKind, start_time: f64, end_time: f64) -> Self {
        Self {
            label,
            start_time,
            end_time,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}
