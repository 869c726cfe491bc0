//! Decoder configuration.
//!
//! A `DecoderConfig` is plain data: it is validated once, when a `Decoder`
//! is built from it, and never changes for the lifetime of the session.
//! Every field has a default matching the reference protocol, so JSON
//! config files only need to name what they override.

pub mod error;
pub(crate) mod numeric;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::protocols::link::codec::DelimiterSet;
use crate::protocols::link::error::ConfigError;
use crate::protocols::link::layout;

pub use error::ConfigLoadError;
pub use numeric::parse_numeric;

/// Width of the header/footer magic values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagicWidth {
    /// 32-bit magic whose two halves may land in consecutive frames.
    #[default]
    Word32,
    /// 16-bit magic matched within a single frame.
    Word16,
}

/// Which per-frame payload feeds the matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusDirection {
    /// Peripheral-driven bytes (MISO).
    #[default]
    Peripheral,
    /// Host-driven bytes (MOSI).
    Host,
}

/// What the decoder emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Individual Header, Footer and Status events.
    #[default]
    Status,
    /// One Packet event per Header…Footer span.
    Packet,
}

/// Status flag masks. A flag is set when `byte & mask != 0`.
///
/// Each value is a byte mask, not a bit position: BAD defaults to `0x70`,
/// covering three error bits, and ACTIVE to `0b11`, set by either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusFlags {
    #[serde(with = "numeric")]
    pub tx: u32,
    #[serde(with = "numeric")]
    pub rx: u32,
    #[serde(with = "numeric")]
    pub bad: u32,
    #[serde(with = "numeric")]
    pub active: u32,
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self {
            tx: layout::DEFAULT_STATUS_TX,
            rx: layout::DEFAULT_STATUS_RX,
            bad: layout::DEFAULT_STATUS_BAD,
            active: layout::DEFAULT_STATUS_ACTIVE,
        }
    }
}

/// Immutable decoder configuration.
///
/// # Examples
/// ```
/// use framelink_core::{DecoderConfig, OutputMode};
///
/// let config = DecoderConfig::from_json_str(r#"{"mode": "packet", "status_marker": "0x33"}"#)?;
/// assert_eq!(config.mode, OutputMode::Packet);
/// assert_eq!(config.header_magic, 0xCA11AB1E);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    #[serde(with = "numeric")]
    pub header_magic: u64,
    #[serde(with = "numeric")]
    pub footer_magic: u64,
    pub magic_width: MagicWidth,
    #[serde(with = "numeric")]
    pub status_marker: u32,
    pub status_flags: StatusFlags,
    pub direction: BusDirection,
    pub mode: OutputMode,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            header_magic: layout::DEFAULT_HEADER_MAGIC,
            footer_magic: layout::DEFAULT_FOOTER_MAGIC,
            magic_width: MagicWidth::Word32,
            status_marker: layout::DEFAULT_STATUS_MARKER,
            status_flags: StatusFlags::default(),
            direction: BusDirection::Peripheral,
            mode: OutputMode::Status,
        }
    }
}

impl DecoderConfig {
    /// Defaults with the 16-bit short-form magics.
    pub fn short_form() -> Self {
        Self {
            header_magic: layout::SHORT_HEADER_MAGIC,
            footer_magic: layout::SHORT_FOOTER_MAGIC,
            magic_width: MagicWidth::Word16,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        let config: DecoderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that every constant fits its declared width.
    pub fn validate(&self) -> Result<(), ConfigError> {
        DelimiterSet::from_config(self).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::{BusDirection, ConfigLoadError, DecoderConfig, MagicWidth, OutputMode};

    #[test]
    fn empty_document_yields_defaults() {
        let config = DecoderConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DecoderConfig::default());
    }

    #[test]
    fn accepts_numbers_and_hex_strings() {
        let config = DecoderConfig::from_json_str(
            r#"{
                "header_magic": 3390155550,
                "footer_magic": "0xBA5E_BA11",
                "status_flags": { "tx": "0b100" },
                "direction": "host"
            }"#,
        )
        .unwrap();
        assert_eq!(config.header_magic, 0xCA11_AB1E);
        assert_eq!(config.footer_magic, 0xBA5E_BA11);
        assert_eq!(config.status_flags.tx, 0b100);
        assert_eq!(config.status_flags.rx, 0b01);
        assert_eq!(config.direction, BusDirection::Host);
    }

    #[test]
    fn serializes_constants_as_hex() {
        let value = serde_json::to_value(DecoderConfig::default()).unwrap();
        assert_eq!(value["header_magic"], "0xCA11AB1E");
        assert_eq!(value["status_marker"], "0x33");
        assert_eq!(value["status_flags"]["bad"], "0x70");
        assert_eq!(value["magic_width"], "word32");
        assert_eq!(value["mode"], "status");
    }

    #[test]
    fn serialized_config_reads_back() {
        let config = DecoderConfig {
            mode: OutputMode::Packet,
            ..DecoderConfig::short_form()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(DecoderConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = DecoderConfig::from_json_str(r#"{"header": 1}"#).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Json(_)));
    }

    #[test]
    fn rejects_constants_that_do_not_fit() {
        let err = DecoderConfig::from_json_str(r#"{"status_marker": "0x133"}"#).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(_)));
        assert!(err.to_string().contains("status marker"));
    }

    #[test]
    fn short_form_uses_word16() {
        let config = DecoderConfig::short_form();
        assert_eq!(config.magic_width, MagicWidth::Word16);
        assert_eq!(config.header_magic, 0xCA11);
        assert_eq!(config.footer_magic, 0xBA11);
        assert!(config.validate().is_ok());
    }
}
