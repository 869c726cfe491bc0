use thiserror::Error;

/// Errors raised while deriving delimiter patterns from a `DecoderConfig`.
///
/// These only occur at construction; decoding itself never fails.
///
/// # Examples
/// ```
/// use framelink_core::{ConfigError, Decoder, DecoderConfig, MagicWidth};
///
/// let config = DecoderConfig {
///     magic_width: MagicWidth::Word16,
///     ..DecoderConfig::default()
/// };
/// let err = Decoder::new(config).unwrap_err();
/// assert!(matches!(err, ConfigError::MagicOutOfRange { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} magic 0x{value:X} does not fit in {bits} bits")]
    MagicOutOfRange {
        field: &'static str,
        value: u64,
        bits: u32,
    },
    #[error("status marker 0x{value:X} does not fit in one byte")]
    MarkerOutOfRange { value: u32 },
    #[error("status flag {flag} mask 0x{value:X} does not fit in one byte")]
    FlagOutOfRange { flag: &'static str, value: u32 },
    #[error("status flag {flag} mask is empty")]
    EmptyFlag { flag: &'static str },
    #[error("header and footer magic both start with 0x{opening:04X}")]
    AmbiguousDelimiters { opening: u16 },
}
