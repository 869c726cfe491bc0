use std::collections::BTreeMap;

use tracing::warn;

use crate::EventCount;
use crate::decoder::DecodedEvent;
use crate::source::CaptureFrame;

#[derive(Debug, Default)]
pub(crate) struct CaptureStats {
    pub frames_total: u64,
    pub result_frames: u64,
    pub other_frames: u64,
    pub out_of_order_frames: u64,
    pub first_start: Option<f64>,
    pub last_end: Option<f64>,
    previous_start: Option<f64>,
}

impl CaptureStats {
    pub(crate) fn observe(&mut self, frame: &CaptureFrame) {
        self.frames_total += 1;
        if frame.is_result() {
            self.result_frames += 1;
        } else {
            self.other_frames += 1;
        }

        if let Some(previous) = self.previous_start {
            if frame.start_time < previous {
                self.out_of_order_frames += 1;
                warn!(
                    previous,
                    start = frame.start_time,
                    "frame arrived out of time order"
                );
            }
        }
        self.previous_start = Some(frame.start_time);

        self.first_start = Some(match self.first_start {
            Some(first) => first.min(frame.start_time),
            None => frame.start_time,
        });
        self.last_end = Some(match self.last_end {
            Some(last) => last.max(frame.end_time),
            None => frame.end_time,
        });
    }
}

/// Per-label event totals in label order.
pub(crate) fn count_events(events: &[DecodedEvent]) -> Vec<EventCount> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for event in events {
        *counts.entry(event.label.to_string()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(label, count)| EventCount { label, count })
        .collect()
}
