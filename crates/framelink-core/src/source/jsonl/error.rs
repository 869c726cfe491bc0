use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonlSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid frame record: {message}")]
    Record { line: usize, message: String },
    #[error("invalid payload in {field}: {message}")]
    Payload {
        line: usize,
        field: &'static str,
        message: String,
    },
    #[error("frame ends before it starts ({start} > {end})")]
    InvalidSpan { line: usize, start: f64, end: f64 },
}

impl JsonlSourceError {
    pub fn line(&self) -> Option<usize> {
        match self {
            JsonlSourceError::Io(_) => None,
            JsonlSourceError::Record { line, .. }
            | JsonlSourceError::Payload { line, .. }
            | JsonlSourceError::InvalidSpan { line, .. } => Some(*line),
        }
    }
}
