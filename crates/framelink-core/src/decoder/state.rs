use crate::source::CaptureFrame;

/// Time span of a frame holding the leading half of a split delimiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSpan {
    pub start_time: f64,
    pub end_time: f64,
}

impl From<&CaptureFrame> for FrameSpan {
    fn from(frame: &CaptureFrame) -> Self {
        Self {
            start_time: frame.start_time,
            end_time: frame.end_time,
        }
    }
}

/// Matcher phase. The pending span only exists while a split delimiter is
/// half seen, and it never survives past the next `result` frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Phase {
    #[default]
    NoFrame,
    AwaitingHeaderTail {
        pending: FrameSpan,
    },
    AwaitingFooterTail {
        pending: FrameSpan,
    },
}

impl Phase {
    pub fn is_awaiting(&self) -> bool {
        !matches!(self, Phase::NoFrame)
    }
}

/// Per-session memory carried between `decode` calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecoderState {
    pub phase: Phase,
    /// Start of the packet opened by the last confirmed Header (Packet mode).
    pub packet_start: Option<f64>,
}
