//! MAC address text parsing

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use mac_address::MacAddress;
use serde::{Deserialize, Serialize};

use crate::error::MacPoolError;
use crate::Result;

/// Largest value a 48-bit MAC address can take
pub const MAC_MAX: u64 = 0xFFFF_FFFF_FFFF;

/// Number of hex digits in a MAC address once separators are removed
const MAC_DIGITS: usize = 12;

const SEPARATOR: char = ':';

/// How strictly MAC address text is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Exactly 12 hex digits once colons are removed
    #[default]
    Strict,
    /// Any hex integer once colons are removed, whatever its digit count.
    ///
    /// Matches what older engine tooling accepted. Wrong-length input is
    /// silently read as a different address, so only use it to reproduce
    /// old reports.
    Legacy,
}

impl FromStr for ParsePolicy {
    type Err = MacPoolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ParsePolicy::Strict),
            "legacy" => Ok(ParsePolicy::Legacy),
            other => Err(MacPoolError::invalid(
                other,
                "unknown parse policy, expected 'strict' or 'legacy'",
            )),
        }
    }
}

impl fmt::Display for ParsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePolicy::Strict => write!(f, "strict"),
            ParsePolicy::Legacy => write!(f, "legacy"),
        }
    }
}

/// Converts MAC address text to its integer value under a [`ParsePolicy`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MacParser {
    policy: ParsePolicy,
}

impl MacParser {
    pub fn new(policy: ParsePolicy) -> Self {
        Self { policy }
    }

    pub fn strict() -> Self {
        Self::new(ParsePolicy::Strict)
    }

    pub fn legacy() -> Self {
        Self::new(ParsePolicy::Legacy)
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    /// Parse `text` into the big-endian integer value of its hex digits
    pub fn parse(&self, text: &str) -> Result<u64> {
        match self.policy {
            ParsePolicy::Strict => parse_strict(text),
            ParsePolicy::Legacy => parse_legacy(text),
        }
    }
}

/// Parse a colon-separated MAC address into its 48-bit integer value.
///
/// The text must contain exactly 12 hex digits once colons are removed.
pub fn parse_mac(text: &str) -> Result<u64> {
    parse_strict(text)
}

fn strip_separators(text: &str) -> String {
    text.chars().filter(|c| *c != SEPARATOR).collect()
}

fn parse_strict(text: &str) -> Result<u64> {
    let digits = strip_separators(text);

    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(MacPoolError::invalid(
            text,
            format!("unexpected character '{}'", c),
        ));
    }

    if digits.len() != MAC_DIGITS {
        return Err(MacPoolError::invalid(
            text,
            format!("expected {} hex digits, found {}", MAC_DIGITS, digits.len()),
        ));
    }

    u64::from_str_radix(&digits, 16).map_err(|e| MacPoolError::invalid(text, e.to_string()))
}

/// Any hex integer is accepted. A value wider than 64 bits saturates to
/// `u64::MAX`, which lies above every 48-bit range.
fn parse_legacy(text: &str) -> Result<u64> {
    let digits = strip_separators(text.trim());
    if digits.is_empty() {
        return Err(MacPoolError::invalid(text, "no hex digits"));
    }
    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(MacPoolError::invalid(
            text,
            format!("unexpected character '{}'", c),
        ));
    }

    match u64::from_str_radix(&digits, 16) {
        Ok(value) => Ok(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(u64::MAX),
        Err(e) => Err(MacPoolError::invalid(text, e.to_string())),
    }
}

/// Render a MAC integer value as six colon-separated octets.
///
/// Values above [`MAC_MAX`] can only come from legacy parsing and are shown
/// as plain hex.
pub fn format_mac(value: u64) -> String {
    if value > MAC_MAX {
        return format!("{:#x}", value);
    }

    let bytes = value.to_be_bytes();
    let mut octets = [0u8; 6];
    octets.copy_from_slice(&bytes[2..]);
    MacAddress::new(octets).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        assert_eq!(parse_mac("00:1A:4B:16:3C:5E").unwrap(), 0x001A_4B16_3C5E);
        assert_eq!(parse_mac("ff:ff:ff:ff:ff:ff").unwrap(), MAC_MAX);
        assert_eq!(parse_mac("00:00:00:00:00:00").unwrap(), 0);
    }

    #[test]
    fn test_parse_without_separators() {
        assert_eq!(parse_mac("001a4b163c5e").unwrap(), 0x001A_4B16_3C5E);
    }

    #[test]
    fn test_strict_rejects_wrong_length() {
        assert!(parse_mac("00:1A:4B:16:3C").is_err());
        assert!(parse_mac("00:1A:4B:16:3C:5E:7F").is_err());
        assert!(parse_mac("").is_err());
    }

    #[test]
    fn test_strict_rejects_non_hex() {
        let err = parse_mac("00:1A:4B:16:3C:5G").unwrap_err();
        assert!(err.to_string().contains("unexpected character 'G'"));

        // '-' separators are not stripped
        assert!(parse_mac("00-1A-4B-16-3C-5E").is_err());
        assert!(parse_mac("+0:1A:4B:16:3C:5E").is_err());
    }

    #[test]
    fn test_legacy_accepts_short_and_long() {
        let parser = MacParser::legacy();
        assert_eq!(parser.parse("1A:4B").unwrap(), 0x1A4B);
        assert_eq!(parser.parse("00:1A:4B:16:3C:5E:7F").unwrap(), 0x001A_4B16_3C5E_7F);
        assert_eq!(parser.parse(" 00:00:00:00:00:10\n").unwrap(), 0x10);
        assert!(parser.parse("not-a-mac").is_err());
        assert!(parser.parse("::").is_err());
    }

    #[test]
    fn test_legacy_saturates_wide_values() {
        let parser = MacParser::legacy();
        assert_eq!(parser.parse("1A:4B:16:3C:5E:7F:80:91:2").unwrap(), u64::MAX);
        assert_eq!(parser.parse(&"F".repeat(40)).unwrap(), u64::MAX);
        assert_eq!(parser.parse("FF:FF:FF:FF:FF:FF:FF:FF").unwrap(), u64::MAX);
        assert!(parser.parse("1A:4B:16:3C:5E:7F:80:91:2Z").is_err());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("strict".parse::<ParsePolicy>().unwrap(), ParsePolicy::Strict);
        assert_eq!("Legacy".parse::<ParsePolicy>().unwrap(), ParsePolicy::Legacy);
        assert!("loose".parse::<ParsePolicy>().is_err());
        assert_eq!(ParsePolicy::default(), ParsePolicy::Strict);
    }

    #[test]
    fn test_format_mac() {
        assert!(format_mac(0x001A_4B16_3C5E).eq_ignore_ascii_case("00:1a:4b:16:3c:5e"));
        assert_eq!(format_mac(0x10), "00:00:00:00:00:10");
        assert_eq!(format_mac(MAC_MAX + 1), "0x1000000000000");
    }
}
