use super::{CaptureFrame, FrameSource, SourceError};

/// In-memory frame source, mostly for embedding and tests.
#[derive(Debug, Default)]
pub struct VecFrameSource {
    frames: std::vec::IntoIter<CaptureFrame>,
}

impl VecFrameSource {
    pub fn new(frames: Vec<CaptureFrame>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl From<Vec<CaptureFrame>> for VecFrameSource {
    fn from(frames: Vec<CaptureFrame>) -> Self {
        Self::new(frames)
    }
}

impl FrameSource for VecFrameSource {
    fn next_frame(&mut self) -> Result<Option<CaptureFrame>, SourceError> {
        Ok(self.frames.next())
    }
}
