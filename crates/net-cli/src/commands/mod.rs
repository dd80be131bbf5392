//! CLI commands

pub mod external_macs;
pub mod setup_networks;

pub use external_macs::{AuditReport, ExternalMacsCommand, OutOfRangeNic};
pub use setup_networks::{SetupNetworksCommand, SetupNetworksRequest};

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
