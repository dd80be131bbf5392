//! MAC pool ranges and membership

use std::fmt;

use crate::mac::{format_mac, MacParser};
use crate::Result;

/// Inclusive `[start, end]` interval of MAC address values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacRange {
    pub start: u64,
    pub end: u64,
}

impl MacRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, value: u64) -> bool {
        self.start <= value && value <= self.end
    }

    /// An inverted range (`start > end`) is kept as given and matches nothing
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for MacRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_mac(self.start), format_mac(self.end))
    }
}

/// Ranges of one MAC pool, in the order the pool lists them.
///
/// Ranges may overlap or repeat; they are never sorted or merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacRangeSet {
    ranges: Vec<MacRange>,
}

impl MacRangeSet {
    pub fn new(ranges: Vec<MacRange>) -> Self {
        Self { ranges }
    }

    /// Build a range set from `(start, end)` text pairs using `parser`.
    ///
    /// The first bound that fails to parse fails the whole set.
    pub fn build<I, S>(parser: &MacParser, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        pairs
            .into_iter()
            .map(|(start, end)| -> Result<MacRange> {
                Ok(MacRange::new(
                    parser.parse(start.as_ref())?,
                    parser.parse(end.as_ref())?,
                ))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// True if any range contains `value`
    pub fn contains(&self, value: u64) -> bool {
        self.ranges.iter().any(|range| range.contains(value))
    }

    /// Parse `mac` with `parser` and test it against every range
    pub fn contains_mac(&self, parser: &MacParser, mac: &str) -> Result<bool> {
        parser.parse(mac).map(|value| self.contains(value))
    }

    pub fn ranges(&self) -> &[MacRange] {
        &self.ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MacRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Ranges whose start lies above their end
    pub fn inverted(&self) -> impl Iterator<Item = &MacRange> {
        self.ranges.iter().filter(|range| range.is_inverted())
    }
}

impl FromIterator<MacRange> for MacRangeSet {
    fn from_iter<T: IntoIterator<Item = MacRange>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MacRangeSet {
    type Item = &'a MacRange;
    type IntoIter = std::slice::Iter<'a, MacRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

/// Build a range set from `(start, end)` text pairs with strict parsing
pub fn build_ranges<I, S>(pairs: I) -> Result<MacRangeSet>
where
    I: IntoIterator<Item = (S, S)>,
    S: AsRef<str>,
{
    MacRangeSet::build(&MacParser::strict(), pairs)
}

/// Check whether `mac` lies inside any range of `ranges`.
///
/// Fails when `mac` is not a valid MAC address; an empty set never matches.
pub fn is_in_range(mac: &str, ranges: &MacRangeSet) -> Result<bool> {
    ranges.contains_mac(&MacParser::strict(), mac)
}
