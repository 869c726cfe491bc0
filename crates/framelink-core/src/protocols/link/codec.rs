use super::error::ConfigError;
use super::layout;
use super::reader::FrameReader;
use super::status::StatusMasks;
use crate::config::{DecoderConfig, MagicWidth, StatusFlags};

/// Byte pattern for one framing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// 32-bit magic, big-endian, split into halves that may arrive in two
    /// consecutive frames.
    Split {
        leading: [u8; layout::HALF_LEN],
        trailing: [u8; layout::HALF_LEN],
    },
    /// 16-bit magic matched within one frame.
    Whole([u8; layout::HALF_LEN]),
}

impl Delimiter {
    pub fn encode(field: &'static str, value: u64, width: MagicWidth) -> Result<Self, ConfigError> {
        match width {
            MagicWidth::Word32 => {
                let value32 = u32::try_from(value).map_err(|_| ConfigError::MagicOutOfRange {
                    field,
                    value,
                    bits: u32::BITS,
                })?;
                let bytes = value32.to_be_bytes();
                let mut leading = [0u8; layout::HALF_LEN];
                let mut trailing = [0u8; layout::HALF_LEN];
                leading.copy_from_slice(&bytes[layout::LEADING_HALF_RANGE]);
                trailing.copy_from_slice(&bytes[layout::TRAILING_HALF_RANGE]);
                Ok(Delimiter::Split { leading, trailing })
            }
            MagicWidth::Word16 => {
                let value16 = u16::try_from(value).map_err(|_| ConfigError::MagicOutOfRange {
                    field,
                    value,
                    bits: u16::BITS,
                })?;
                Ok(Delimiter::Whole(value16.to_be_bytes()))
            }
        }
    }

    /// Bytes a payload has to start with to open this delimiter.
    pub fn opening(&self) -> &[u8; layout::HALF_LEN] {
        match self {
            Delimiter::Split { leading, .. } => leading,
            Delimiter::Whole(bytes) => bytes,
        }
    }

    /// Whether the payload completes a split delimiter opened in the
    /// previous frame. Always false for single-frame delimiters.
    pub fn completes(&self, reader: &FrameReader<'_>) -> bool {
        match self {
            Delimiter::Split { trailing, .. } => reader.starts_with_half(trailing),
            Delimiter::Whole(_) => false,
        }
    }
}

/// Every comparison constant the matcher needs, derived once from a config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterSet {
    pub header: Delimiter,
    pub footer: Delimiter,
    pub status_marker: u8,
    pub status: StatusMasks,
}

impl DelimiterSet {
    pub fn from_config(config: &DecoderConfig) -> Result<Self, ConfigError> {
        let header = Delimiter::encode("header", config.header_magic, config.magic_width)?;
        let footer = Delimiter::encode("footer", config.footer_magic, config.magic_width)?;
        if header.opening() == footer.opening() {
            return Err(ConfigError::AmbiguousDelimiters {
                opening: u16::from_be_bytes(*header.opening()),
            });
        }
        let status_marker =
            u8::try_from(config.status_marker).map_err(|_| ConfigError::MarkerOutOfRange {
                value: config.status_marker,
            })?;
        let status = encode_masks(&config.status_flags)?;
        Ok(Self {
            header,
            footer,
            status_marker,
            status,
        })
    }
}

fn encode_masks(flags: &StatusFlags) -> Result<StatusMasks, ConfigError> {
    Ok(StatusMasks {
        tx: encode_mask("tx", flags.tx)?,
        rx: encode_mask("rx", flags.rx)?,
        bad: encode_mask("bad", flags.bad)?,
        active: encode_mask("active", flags.active)?,
    })
}

fn encode_mask(flag: &'static str, value: u32) -> Result<u8, ConfigError> {
    let mask = u8::try_from(value).map_err(|_| ConfigError::FlagOutOfRange { flag, value })?;
    if mask == 0 {
        return Err(ConfigError::EmptyFlag { flag });
    }
    Ok(mask)
}
