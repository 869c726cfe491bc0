use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::source::{CaptureFrame, FrameSource, SourceError};

use super::error::JsonlSourceError;
use super::record::parse_frame_line;

/// `FrameSource` reading a JSON-lines capture export.
pub struct JsonLinesFrameSource<R = BufReader<File>> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl JsonLinesFrameSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesFrameSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    fn read_frame(&mut self) -> Result<Option<CaptureFrame>, JsonlSourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let line = self.line_no;
            let text = std::str::from_utf8(&self.buf).map_err(|err| JsonlSourceError::Record {
                line,
                message: format!("line is not valid UTF-8: {err}"),
            })?;
            if text.trim().is_empty() {
                continue;
            }
            return parse_frame_line(text, line).map(Some);
        }
    }
}

impl<R: BufRead> FrameSource for JsonLinesFrameSource<R> {
    fn next_frame(&mut self) -> Result<Option<CaptureFrame>, SourceError> {
        self.read_frame().map_err(SourceError::from)
    }
}
