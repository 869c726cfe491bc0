//! Link-layer framing protocol.
//!
//! Frames are delimited by a 32-bit Header magic (`0xCA11AB1E`) and a 32-bit
//! Footer magic (`0xBA5EBA11`). The capture engine delivers bus transactions
//! two bytes at a time, so each magic usually arrives as a leading half in
//! one frame and a trailing half in the next. A short-form variant uses
//! 16-bit magics (`0xCA11` / `0xBA11`) that fit in a single frame.
//!
//! Between delimiters, a frame starting with the status marker (`0x33`)
//! carries a flag byte describing the bus condition (TX, RX, bad status,
//! no activity).
//!
//! Byte positions and defaults live in `layout`; `codec` turns a config into
//! comparison patterns; `reader` and `status` classify single payloads.
//! Sequencing across frames is the decoder's job.

pub mod codec;
pub mod error;
pub mod layout;
pub mod reader;
pub mod status;

pub use status::StatusKind;
