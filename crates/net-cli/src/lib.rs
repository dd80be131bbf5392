//! oVirt network CLI
//!
//! Command-line tools for oVirt network administration: auditing vNIC MAC
//! addresses against the MAC pool of their datacenter, and attaching a
//! logical network to a host NIC.

pub mod cli;
pub mod commands;
pub mod credentials;

#[cfg(test)]
mod tests;
