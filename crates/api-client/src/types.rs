//! Engine inventory types and action payloads
//!
//! Field names follow the engine's JSON representation. Collections come
//! wrapped in an object keyed by the singular entity name and may be an
//! empty object when there is nothing to list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reference to another entity by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
}

impl Link {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCenter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mac_pool: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacPool {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ranges: MacPoolRanges,
}

impl MacPool {
    /// `(from, to)` text of every range, in pool order
    pub fn range_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ranges
            .range
            .iter()
            .map(|range| (range.from.as_str(), range.to.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacPoolRanges {
    #[serde(default)]
    pub range: Vec<MacPoolRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacPoolRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vm {
    pub id: String,
    pub name: String,
}

/// Virtual NIC of a VM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mac: Option<NicMac>,
}

impl Nic {
    /// Configured MAC address text, if the engine reported one
    pub fn mac_address(&self) -> Option<&str> {
        self.mac.as_ref().and_then(|mac| mac.address.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicMac {
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    pub name: String,
}

/// Physical NIC of a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostNic {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DataCenterList {
    #[serde(default)]
    pub data_center: Vec<DataCenter>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VmList {
    #[serde(default)]
    pub vm: Vec<Vm>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NicList {
    #[serde(default)]
    pub nic: Vec<Nic>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HostList {
    #[serde(default)]
    pub host: Vec<Host>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NetworkList {
    #[serde(default)]
    pub network: Vec<Network>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HostNicList {
    #[serde(default)]
    pub host_nic: Vec<HostNic>,
}

/// Error body returned by the engine on failed requests
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Fault {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// How a host network attachment obtains its address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootProtocol {
    Dhcp,
    None,
}

impl FromStr for BootProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dhcp" => Ok(BootProtocol::Dhcp),
            "none" => Ok(BootProtocol::None),
            other => Err(format!(
                "unsupported boot protocol '{}', expected 'dhcp' or 'none'",
                other
            )),
        }
    }
}

impl fmt::Display for BootProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootProtocol::Dhcp => write!(f, "dhcp"),
            BootProtocol::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ip {
    pub version: String,
}

impl Ip {
    pub fn v4() -> Self {
        Self {
            version: "v4".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddressAssignment {
    pub assignment_method: BootProtocol,
    pub ip: Ip,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddressAssignments {
    #[serde(default)]
    pub ip_address_assignment: Vec<IpAddressAssignment>,
}

/// Network attached to a host NIC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAttachment {
    pub network: Link,
    pub host_nic: Link,
    #[serde(default)]
    pub ip_address_assignments: IpAddressAssignments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAttachments {
    #[serde(default)]
    pub network_attachment: Vec<NetworkAttachment>,
}

/// Body of the host `setupnetworks` action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupNetworksAction {
    #[serde(rename = "async")]
    pub run_async: bool,
    pub check_connectivity: bool,
    pub force: bool,
    pub modified_network_attachments: NetworkAttachments,
}

impl SetupNetworksAction {
    /// Attach `network` to `nic` with an IPv4 address obtained by `boot_protocol`
    pub fn attach(network: &Network, nic: &HostNic, boot_protocol: BootProtocol) -> Self {
        Self {
            run_async: false,
            check_connectivity: true,
            force: false,
            modified_network_attachments: NetworkAttachments {
                network_attachment: vec![NetworkAttachment {
                    network: Link::new(&network.id),
                    host_nic: Link::new(&nic.id),
                    ip_address_assignments: IpAddressAssignments {
                        ip_address_assignment: vec![IpAddressAssignment {
                            assignment_method: boot_protocol,
                            ip: Ip::v4(),
                        }],
                    },
                }],
            },
        }
    }

    pub fn with_check_connectivity(mut self, check: bool) -> Self {
        self.check_connectivity = check;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}
