//! oVirt API client
//!
//! Minimal client for the oVirt engine REST API (v4, JSON). It covers the
//! calls the network tools need: datacenters, MAC pools, VMs and their
//! vNICs, hosts, networks, and the host `setupnetworks` action.

pub mod config;
pub mod error;
pub mod inventory;
pub mod session;
pub mod types;

pub use config::{ConnectionConfig, ConnectionOverrides};
pub use error::{ApiError, ConfigError};
pub use inventory::{InventorySource, MockInventory};
pub use session::Session;
pub use types::*;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
