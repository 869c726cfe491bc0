pub const HALF_LEN: usize = 2;
pub const LEADING_HALF_RANGE: std::ops::Range<usize> = 0..2;
pub const TRAILING_HALF_RANGE: std::ops::Range<usize> = 2..4;

pub const STATUS_MARKER_OFFSET: usize = 0;
pub const STATUS_FLAGS_OFFSET: usize = 1;

pub const DEFAULT_HEADER_MAGIC: u64 = 0xCA11_AB1E;
pub const DEFAULT_FOOTER_MAGIC: u64 = 0xBA5E_BA11;
pub const SHORT_HEADER_MAGIC: u64 = 0xCA11;
pub const SHORT_FOOTER_MAGIC: u64 = 0xBA11;

pub const DEFAULT_STATUS_MARKER: u32 = 0x33;
pub const DEFAULT_STATUS_TX: u32 = 0b10;
pub const DEFAULT_STATUS_RX: u32 = 0b01;
pub const DEFAULT_STATUS_BAD: u32 = 0x70;
pub const DEFAULT_STATUS_ACTIVE: u32 = 0b11;
