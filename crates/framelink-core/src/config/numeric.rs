//! Serde adapter for configuration constants.
//!
//! Values deserialize from a JSON number or from a string in decimal,
//! `0x` hexadecimal or `0b` binary notation (underscores allowed), and
//! serialize back as an upper-case `0x` string.

use serde::{Deserialize, Deserializer, Serializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(u64),
    Text(String),
}

/// Parse a decimal, `0x` hex or `0b` binary literal.
///
/// # Examples
/// ```
/// use framelink_core::parse_numeric;
///
/// assert_eq!(parse_numeric("0xCA11_AB1E"), Ok(0xCA11AB1E));
/// assert_eq!(parse_numeric("0b10"), Ok(2));
/// assert_eq!(parse_numeric("51"), Ok(51));
/// assert!(parse_numeric("0xZZ").is_err());
/// ```
pub fn parse_numeric(text: &str) -> Result<u64, String> {
    let trimmed = text.trim();
    let cleaned: String = trimmed.chars().filter(|c| *c != '_').collect();
    let parsed = if let Some(digits) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        u64::from_str_radix(digits, 16)
    } else if let Some(digits) = cleaned
        .strip_prefix("0b")
        .or_else(|| cleaned.strip_prefix("0B"))
    {
        u64::from_str_radix(digits, 2)
    } else {
        cleaned.parse::<u64>()
    };
    parsed.map_err(|err| format!("invalid number '{trimmed}': {err}"))
}

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Copy + Into<u64>,
    S: Serializer,
{
    let value: u64 = (*value).into();
    serializer.serialize_str(&format!("0x{value:X}"))
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: TryFrom<u64>,
    D: Deserializer<'de>,
{
    let value = match RawValue::deserialize(deserializer)? {
        RawValue::Number(value) => value,
        RawValue::Text(text) => parse_numeric(&text).map_err(de::Error::custom)?,
    };
    T::try_from(value).map_err(|_| de::Error::custom(format!("value 0x{value:X} is out of range")))
}
