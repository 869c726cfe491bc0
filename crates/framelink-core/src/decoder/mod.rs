//! Split-delimiter matcher and packet aggregator.
//!
//! The decoder consumes capture frames one at a time and yields zero or one
//! event per frame. Rules are evaluated in a fixed priority:
//!
//! 1. a pending Header leading half completed by this frame's trailing half;
//! 2. a pending Footer leading half completed likewise;
//! 3. a Header opening;
//! 4. a Footer opening;
//! 5. a status frame (Status mode only);
//! 6. nothing.
//!
//! A pending half is resolved by the very next `result` frame, either as a
//! match or by being dropped. Frames of any other kind drop it too. In Packet
//! mode Header and Footer are folded into one `Packet` event and status
//! frames are ignored.
//!
//! Frames must arrive in non-decreasing time order; the decoder does not
//! check it.

mod event;
mod state;

pub use event::{DecodedEvent, EventKind};
pub use state::{DecoderState, FrameSpan, Phase};

use tracing::{debug, trace};

use crate::config::{BusDirection, DecoderConfig, OutputMode};
use crate::protocols::link::codec::{Delimiter, DelimiterSet};
use crate::protocols::link::error::ConfigError;
use crate::protocols::link::reader::FrameReader;
use crate::protocols::link::status::parse_status;
use crate::source::CaptureFrame;

/// One decoding session.
///
/// # Examples
/// ```
/// use framelink_core::{CaptureFrame, Decoder, DecoderConfig, EventKind};
///
/// let mut decoder = Decoder::new(DecoderConfig::default())?;
/// let first = CaptureFrame::result(vec![0xCA, 0x11], vec![0x00, 0x00], 0.0, 1.0);
/// let second = CaptureFrame::result(vec![0xAB, 0x1E], vec![0x00, 0x00], 1.0, 2.0);
/// assert!(decoder.decode(&first).is_none());
/// let event = decoder.decode(&second).unwrap();
/// assert_eq!(event.label, EventKind::Header);
/// assert_eq!((event.start_time, event.end_time), (0.0, 2.0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
    delimiters: DelimiterSet,
    direction: BusDirection,
    mode: OutputMode,
    state: DecoderState,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Result<Self, ConfigError> {
        let delimiters = DelimiterSet::from_config(&config)?;
        Ok(Self {
            delimiters,
            direction: config.direction,
            mode: config.mode,
            state: DecoderState::default(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Start time of a packet whose Footer has not been seen yet.
    pub fn open_packet_start(&self) -> Option<f64> {
        self.state.packet_start
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Forget any pending delimiter and open packet.
    pub fn reset(&mut self) {
        self.state = DecoderState::default();
    }

    /// Feed one frame.
    pub fn decode(&mut self, frame: &CaptureFrame) -> Option<DecodedEvent> {
        let previous = std::mem::take(&mut self.state.phase);
        if !frame.is_result() {
            if previous.is_awaiting() {
                trace!(
                    kind = frame.kind.name(),
                    at = frame.start_time,
                    "pending delimiter dropped by non-result frame"
                );
            }
            return None;
        }

        let reader = FrameReader::new(frame.payload(self.direction));
        match previous {
            Phase::AwaitingHeaderTail { pending } if self.delimiters.header.completes(&reader) => {
                return self.confirm_header(pending.start_time, frame.end_time);
            }
            Phase::AwaitingFooterTail { pending } if self.delimiters.footer.completes(&reader) => {
                return self.confirm_footer(pending.start_time, frame.end_time);
            }
            Phase::NoFrame => {}
            _ => {
                trace!(at = frame.start_time, "pending delimiter not completed");
            }
        }

        if reader.starts_with_half(self.delimiters.header.opening()) {
            return self.open_header(frame);
        }
        if reader.starts_with_half(self.delimiters.footer.opening()) {
            return self.open_footer(frame);
        }
        if self.mode == OutputMode::Packet {
            return None;
        }
        let kind = parse_status(
            frame.payload(self.direction),
            self.delimiters.status_marker,
            &self.delimiters.status,
        )?;
        Some(DecodedEvent::new(
            EventKind::Status(kind),
            frame.start_time,
            frame.end_time,
        ))
    }

    /// Feed frames in order and collect every event.
    pub fn decode_all<'a, I>(&mut self, frames: I) -> Vec<DecodedEvent>
    where
        I: IntoIterator<Item = &'a CaptureFrame>,
    {
        frames
            .into_iter()
            .filter_map(|frame| self.decode(frame))
            .collect()
    }

    fn open_header(&mut self, frame: &CaptureFrame) -> Option<DecodedEvent> {
        match self.delimiters.header {
            Delimiter::Split { .. } => {
                trace!(at = frame.start_time, "header leading half");
                self.state.phase = Phase::AwaitingHeaderTail {
                    pending: FrameSpan::from(frame),
                };
                None
            }
            Delimiter::Whole(_) => self.confirm_header(frame.start_time, frame.end_time),
        }
    }

    fn open_footer(&mut self, frame: &CaptureFrame) -> Option<DecodedEvent> {
        match self.delimiters.footer {
            Delimiter::Split { .. } => {
                trace!(at = frame.start_time, "footer leading half");
                self.state.phase = Phase::AwaitingFooterTail {
                    pending: FrameSpan::from(frame),
                };
                None
            }
            Delimiter::Whole(_) => self.confirm_footer(frame.start_time, frame.end_time),
        }
    }

    fn confirm_header(&mut self, start_time: f64, end_time: f64) -> Option<DecodedEvent> {
        match self.mode {
            OutputMode::Status => Some(DecodedEvent::new(EventKind::Header, start_time, end_time)),
            OutputMode::Packet => {
                if let Some(open) = self.state.packet_start {
                    debug!(open, restart = start_time, "header restarts open packet");
                }
                self.state.packet_start = Some(start_time);
                None
            }
        }
    }

    fn confirm_footer(&mut self, start_time: f64, end_time: f64) -> Option<DecodedEvent> {
        match self.mode {
            OutputMode::Status => Some(DecodedEvent::new(EventKind::Footer, start_time, end_time)),
            OutputMode::Packet => match self.state.packet_start.take() {
                Some(packet_start) => Some(DecodedEvent::new(
                    EventKind::Packet,
                    packet_start,
                    end_time,
                )),
                None => {
                    debug!(at = start_time, "footer without open packet");
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Decoder, EventKind, Phase};
    use crate::config::{BusDirection, DecoderConfig, OutputMode};
    use crate::protocols::link::StatusKind;
    use crate::source::CaptureFrame;

    fn miso(bytes: &[u8], start: f64, end: f64) -> CaptureFrame {
        CaptureFrame::result(bytes.to_vec(), Vec::new(), start, end)
    }

    fn packet_decoder() -> Decoder {
        Decoder::new(DecoderConfig {
            mode: OutputMode::Packet,
            ..DecoderConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn header_halves_move_through_awaiting_phase() {
        let mut decoder = Decoder::new(DecoderConfig::default()).unwrap();
        assert!(decoder.decode(&miso(&[0xCA, 0x11], 0.0, 1.0)).is_none());
        assert!(matches!(
            decoder.phase(),
            Phase::AwaitingHeaderTail { pending } if pending.start_time == 0.0
        ));
        let event = decoder.decode(&miso(&[0xAB, 0x1E], 1.0, 2.0)).unwrap();
        assert_eq!(event.label, EventKind::Header);
        assert_eq!(decoder.phase(), Phase::NoFrame);
    }

    #[test]
    fn unmatched_tail_resets_without_event() {
        let mut decoder = Decoder::new(DecoderConfig::default()).unwrap();
        decoder.decode(&miso(&[0xCA, 0x11], 0.0, 1.0));
        assert!(decoder.decode(&miso(&[0x00, 0x00], 1.0, 2.0)).is_none());
        assert_eq!(decoder.phase(), Phase::NoFrame);
        assert!(decoder.decode(&miso(&[0xAB, 0x1E], 2.0, 3.0)).is_none());
    }

    #[test]
    fn trailing_half_without_pending_is_ignored() {
        let mut decoder = Decoder::new(DecoderConfig::default()).unwrap();
        assert!(decoder.decode(&miso(&[0xAB, 0x1E], 0.0, 1.0)).is_none());
        assert_eq!(decoder.phase(), Phase::NoFrame);
    }

    #[test]
    fn header_tail_does_not_complete_pending_footer() {
        let mut decoder = Decoder::new(DecoderConfig::default()).unwrap();
        decoder.decode(&miso(&[0xBA, 0x5E], 0.0, 1.0));
        assert!(decoder.decode(&miso(&[0xAB, 0x1E], 1.0, 2.0)).is_none());
        assert_eq!(decoder.phase(), Phase::NoFrame);
    }

    #[test]
    fn repeated_leading_half_restarts_pending() {
        let mut decoder = Decoder::new(DecoderConfig::default()).unwrap();
        decoder.decode(&miso(&[0xCA, 0x11], 0.0, 1.0));
        decoder.decode(&miso(&[0xCA, 0x11], 1.0, 2.0));
        let event = decoder.decode(&miso(&[0xAB, 0x1E], 2.0, 3.0)).unwrap();
        assert_eq!((event.start_time, event.end_time), (1.0, 3.0));
    }

    #[test]
    fn status_frame_uses_own_span() {
        let mut decoder = Decoder::new(DecoderConfig::default()).unwrap();
        let event = decoder.decode(&miso(&[0x33, 0x01], 4.0, 4.5)).unwrap();
        assert_eq!(event.label, EventKind::Status(StatusKind::Rx));
        assert_eq!((event.start_time, event.end_time), (4.0, 4.5));
    }

    #[test]
    fn short_payloads_are_non_matches() {
        let mut decoder = Decoder::new(DecoderConfig::default()).unwrap();
        assert!(decoder.decode(&miso(&[], 0.0, 1.0)).is_none());
        assert!(decoder.decode(&miso(&[0x33], 1.0, 2.0)).is_none());
        assert!(decoder.decode(&miso(&[0xCA], 2.0, 3.0)).is_none());
        assert_eq!(decoder.phase(), Phase::NoFrame);
    }

    #[test]
    fn host_direction_reads_mosi() {
        let mut decoder = Decoder::new(DecoderConfig {
            direction: BusDirection::Host,
            ..DecoderConfig::default()
        })
        .unwrap();
        let frame = CaptureFrame::result(vec![0x33, 0x02], vec![0x33, 0x01], 0.0, 1.0);
        let event = decoder.decode(&frame).unwrap();
        assert_eq!(event.label, EventKind::Status(StatusKind::Rx));
    }

    #[test]
    fn short_form_matches_within_one_frame() {
        let mut decoder = Decoder::new(DecoderConfig::short_form()).unwrap();
        let header = decoder.decode(&miso(&[0xCA, 0x11], 0.0, 1.0)).unwrap();
        assert_eq!(header.label, EventKind::Header);
        assert_eq!((header.start_time, header.end_time), (0.0, 1.0));
        assert_eq!(decoder.phase(), Phase::NoFrame);
        let footer = decoder.decode(&miso(&[0xBA, 0x11], 5.0, 6.0)).unwrap();
        assert_eq!(footer.label, EventKind::Footer);
    }

    #[test]
    fn packet_mode_records_and_consumes_start() {
        let mut decoder = packet_decoder();
        decoder.decode(&miso(&[0xCA, 0x11], 0.0, 1.0));
        assert!(decoder.decode(&miso(&[0xAB, 0x1E], 1.0, 2.0)).is_none());
        assert_eq!(decoder.open_packet_start(), Some(0.0));
        decoder.decode(&miso(&[0xBA, 0x5E], 5.0, 6.0));
        let packet = decoder.decode(&miso(&[0xBA, 0x11], 6.0, 7.0)).unwrap();
        assert_eq!(packet.label, EventKind::Packet);
        assert_eq!((packet.start_time, packet.end_time), (0.0, 7.0));
        assert_eq!(decoder.open_packet_start(), None);
    }

    #[test]
    fn packet_mode_footer_without_header_is_silent() {
        let mut decoder = packet_decoder();
        decoder.decode(&miso(&[0xBA, 0x5E], 0.0, 1.0));
        assert!(decoder.decode(&miso(&[0xBA, 0x11], 1.0, 2.0)).is_none());
        assert_eq!(decoder.phase(), Phase::NoFrame);
    }

    #[test]
    fn packet_mode_second_header_restarts_packet() {
        let mut decoder = packet_decoder();
        decoder.decode(&miso(&[0xCA, 0x11], 0.0, 1.0));
        decoder.decode(&miso(&[0xAB, 0x1E], 1.0, 2.0));
        decoder.decode(&miso(&[0xCA, 0x11], 3.0, 4.0));
        decoder.decode(&miso(&[0xAB, 0x1E], 4.0, 5.0));
        assert_eq!(decoder.open_packet_start(), Some(3.0));
    }

    #[test]
    fn packet_survives_non_result_frames() {
        let mut decoder = packet_decoder();
        decoder.decode(&miso(&[0xCA, 0x11], 0.0, 1.0));
        decoder.decode(&miso(&[0xAB, 0x1E], 1.0, 2.0));
        decoder.decode(&CaptureFrame::other("error", 2.0, 2.5));
        decoder.decode(&miso(&[0xBA, 0x5E], 3.0, 4.0));
        let packet = decoder.decode(&miso(&[0xBA, 0x11], 4.0, 5.0)).unwrap();
        assert_eq!((packet.start_time, packet.end_time), (0.0, 5.0));
    }

    #[test]
    fn reset_clears_pending_and_packet() {
        let mut decoder = packet_decoder();
        decoder.decode(&miso(&[0xCA, 0x11], 0.0, 1.0));
        decoder.decode(&miso(&[0xAB, 0x1E], 1.0, 2.0));
        decoder.decode(&miso(&[0xBA, 0x5E], 2.0, 3.0));
        decoder.reset();
        assert_eq!(decoder.phase(), Phase::NoFrame);
        assert_eq!(decoder.open_packet_start(), None);
        assert!(decoder.decode(&miso(&[0xBA, 0x11], 3.0, 4.0)).is_none());
    }
}
