use super::layout;

/// Bounds-checked view over one direction of a capture frame payload.
///
/// Short payloads never fail: every accessor returns `None` (or `false`)
/// when the bytes it needs are missing, which the matcher treats as a
/// non-match.
pub struct FrameReader<'a> {
    payload: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.payload.get(offset).copied()
    }

    pub fn leading_half(&self) -> Option<[u8; layout::HALF_LEN]> {
        self.payload
            .get(layout::LEADING_HALF_RANGE)
            .and_then(|bytes| bytes.try_into().ok())
    }

    pub fn starts_with_half(&self, half: &[u8; layout::HALF_LEN]) -> bool {
        self.leading_half().as_ref() == Some(half)
    }

    /// Flag byte of a status frame, or `None` when the payload does not
    /// start with `marker` or has no flag byte.
    pub fn status_flags(&self, marker: u8) -> Option<u8> {
        if self.read_u8(layout::STATUS_MARKER_OFFSET)? != marker {
            return None;
        }
        self.read_u8(layout::STATUS_FLAGS_OFFSET)
    }
}
