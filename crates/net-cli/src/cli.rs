//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ovirt_api_client::{BootProtocol, ConnectionOverrides};
use ovirt_mac_pool::ParsePolicy;

use crate::commands::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "ovirt-net")]
#[command(about = "oVirt network administration CLI")]
#[command(version)]
#[command(long_about = "
oVirt network administration CLI

Connects to the oVirt engine REST API to audit VM network interfaces and to
configure host networks. Connection settings come from an optional config
file, OVIRT_* environment variables (OVIRT_URL, OVIRT_USERNAME,
OVIRT_PASSWORD, OVIRT_CA_FILE, ...) and the flags below, in increasing
priority. Without a password the CLI prompts for one.

Examples:
  ovirt-net -l https://engine/ovirt-engine/api -u admin@internal external-macs
  ovirt-net --config engine.toml external-macs --format json
  ovirt-net -l https://engine/ovirt-engine/api -u admin@internal -c ca.pem \\
      setup-networks --host nari05 --network test1 --nic enp2s16f3
")]
pub struct Cli {
    /// Engine API URL
    #[arg(short = 'l', long, global = true)]
    pub url: Option<String>,

    /// User name, e.g. admin@internal
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Password (prefer OVIRT_PASSWORD or the prompt)
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// CA certificate file (PEM) of the engine
    #[arg(short = 'c', long = "certfile", global = true)]
    pub certfile: Option<PathBuf>,

    /// Connection settings file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Accept MAC addresses of any digit count, as older tooling did
    #[arg(long, global = true)]
    pub legacy_mac_parsing: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List VMs whose vNIC MAC addresses fall outside their datacenter's MAC pool
    ExternalMacs {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Attach a logical network to a host NIC
    SetupNetworks {
        /// Host name
        #[arg(long)]
        host: String,

        /// Logical network name
        #[arg(long)]
        network: String,

        /// Host NIC name
        #[arg(long)]
        nic: String,

        /// IPv4 boot protocol of the attachment (dhcp, none)
        #[arg(long, default_value = "dhcp")]
        boot_protocol: BootProtocol,

        /// Do not roll back when the engine loses connectivity to the host
        #[arg(long)]
        no_check_connectivity: bool,

        /// Apply even if the engine reports the host out of sync
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Log filter derived from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Connection settings given on the command line
    pub fn connection_overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            ca_file: self.certfile.clone(),
            insecure: self.insecure.then_some(true),
            mac_parsing: self.legacy_mac_parsing.then_some(ParsePolicy::Legacy),
        }
    }
}
