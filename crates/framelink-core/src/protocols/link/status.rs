use super::reader::FrameReader;

/// Classification of a status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusKind {
    Tx,
    Rx,
    Bad,
    NoActivity,
    Unknown,
}

impl StatusKind {
    pub const ALL: [StatusKind; 5] = [
        StatusKind::Tx,
        StatusKind::Rx,
        StatusKind::Bad,
        StatusKind::NoActivity,
        StatusKind::Unknown,
    ];

    /// Label suffix shown after `Status`.
    pub fn suffix(self) -> &'static str {
        match self {
            StatusKind::Tx => "(TX)",
            StatusKind::Rx => "(RX)",
            StatusKind::Bad => "(Bad Status)",
            StatusKind::NoActivity => "(NoAct)",
            StatusKind::Unknown => "(Unknown!)",
        }
    }
}

/// Single-byte flag masks, validated by the delimiter codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMasks {
    pub tx: u8,
    pub rx: u8,
    pub bad: u8,
    pub active: u8,
}

/// Classify a status flag byte. Tests run in a fixed priority and the first
/// hit wins, so at most one kind is ever reported.
pub fn classify_status(flags: u8, masks: &StatusMasks) -> StatusKind {
    if flags & masks.tx != 0 {
        StatusKind::Tx
    } else if flags & masks.rx != 0 {
        StatusKind::Rx
    } else if flags & masks.bad != 0 {
        StatusKind::Bad
    } else if flags & masks.active == 0 {
        StatusKind::NoActivity
    } else {
        StatusKind::Unknown
    }
}

/// Decode a status frame payload. Returns `None` when the payload is not a
/// status frame or is too short to carry a flag byte.
pub fn parse_status(payload: &[u8], marker: u8, masks: &StatusMasks) -> Option<StatusKind> {
    let flags = FrameReader::new(payload).status_flags(marker)?;
    Some(classify_status(flags, masks))
}
