//! Classification of a vNIC's MAC address against a pool

use crate::error::MacPoolError;
use crate::mac::MacParser;
use crate::range::MacRangeSet;

/// Outcome of checking one vNIC's MAC address against its pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NicMacStatus {
    /// No MAC address is configured on the vNIC
    Unassigned,
    /// A MAC address is configured but is not valid MAC text
    Malformed(MacPoolError),
    /// The MAC address lies outside every range of the pool
    OutOfRange(u64),
    /// The MAC address lies inside at least one range
    InRange(u64),
}

impl NicMacStatus {
    /// Classify `mac` against `ranges`.
    ///
    /// `None` and the empty string both mean no MAC is configured and are
    /// never parsed.
    pub fn classify(mac: Option<&str>, ranges: &MacRangeSet, parser: &MacParser) -> Self {
        let mac = match mac {
            Some(mac) if !mac.is_empty() => mac,
            _ => return NicMacStatus::Unassigned,
        };

        match parser.parse(mac) {
            Ok(value) if ranges.contains(value) => NicMacStatus::InRange(value),
            Ok(value) => NicMacStatus::OutOfRange(value),
            Err(err) => NicMacStatus::Malformed(err),
        }
    }

    /// Only out-of-range addresses are reported; the other non-matching
    /// outcomes are warnings
    pub fn is_reportable(&self) -> bool {
        matches!(self, NicMacStatus::OutOfRange(_))
    }
}
