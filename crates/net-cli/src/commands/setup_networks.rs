//! Setup networks command

use anyhow::{Context, Result};
use ovirt_api_client::{BootProtocol, InventorySource, SetupNetworksAction};

/// What to attach where
#[derive(Debug, Clone)]
pub struct SetupNetworksRequest {
    pub host: String,
    pub network: String,
    pub nic: String,
    pub boot_protocol: BootProtocol,
    pub check_connectivity: bool,
    pub force: bool,
}

/// Setup networks command implementation
#[derive(Debug, Default)]
pub struct SetupNetworksCommand;

impl SetupNetworksCommand {
    pub fn new() -> Self {
        Self
    }

    /// Attach the requested network to the requested host NIC
    pub async fn execute<S>(&self, source: &S, request: &SetupNetworksRequest) -> Result<()>
    where
        S: InventorySource + ?Sized,
    {
        let host = source
            .find_host(&request.host)
            .await
            .with_context(|| format!("Failed to look up host {}", request.host))?;

        let network = source
            .find_network(&request.network)
            .await
            .with_context(|| format!("Failed to look up network {}", request.network))?;

        let nic = source
            .find_host_nic(&host.id, &request.nic)
            .await
            .with_context(|| {
                format!("Failed to look up NIC {} on host {}", request.nic, host.name)
            })?;

        let action = SetupNetworksAction::attach(&network, &nic, request.boot_protocol)
            .with_check_connectivity(request.check_connectivity)
            .with_force(request.force);

        log::info!(
            "Attaching network {} to {} on host {} ({})",
            network.name,
            nic.name,
            host.name,
            request.boot_protocol
        );

        source
            .setup_networks(&host.id, &action)
            .await
            .with_context(|| format!("Setup networks failed on host {}", host.name))?;

        println!(
            "Network {} attached to {} on host {}",
            network.name, nic.name, host.name
        );
        Ok(())
    }
}
