//! Protocol decoding modules.
//!
//! The link layer follows the same layered structure as every decoder here:
//! - `layout`: byte offsets and default constants (source of truth)
//! - `reader`: safe byte access over a frame payload
//! - `codec`: comparison patterns derived once from configuration
//! - `status`: status byte classification
//! - `error`: explicit, actionable errors
//!
//! Everything below is pure and contains no I/O; sources and the analysis
//! layer handle file access and aggregation.

pub mod link;
