//! JSON-lines capture export source.
//!
//! The capture engine's frames are exported one JSON object per line:
//!
//! ```text
//! {"type":"result","data":{"miso":"ca11","mosi":[0,0]},"start_time":0.0,"end_time":0.5}
//! {"type":"error","start_time":0.5,"end_time":0.6}
//! ```
//!
//! Payloads are hex strings (whitespace ignored) or arrays of byte values.
//! A missing payload is empty. Blank lines are skipped. Times are seconds.
//! A line that is not UTF-8 is reported as a bad record on that line.

pub mod error;
pub mod parser;
pub mod record;

pub use parser::JsonLinesFrameSource;
