//! oVirt MAC pool
//!
//! MAC address parsing and MAC pool range membership. A pool is a bag of
//! inclusive `[start, end]` intervals over the 48-bit MAC address space;
//! nothing here talks to the engine.

pub mod error;
pub mod mac;
pub mod range;
pub mod status;

pub use error::MacPoolError;
pub use mac::{format_mac, parse_mac, MacParser, ParsePolicy, MAC_MAX};
pub use range::{build_ranges, is_in_range, MacRange, MacRangeSet};
pub use status::NicMacStatus;

/// Result type for MAC pool operations
pub type Result<T> = std::result::Result<T, MacPoolError>;
