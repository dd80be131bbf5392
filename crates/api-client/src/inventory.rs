//! Inventory queries used by the network tools

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::types::{DataCenter, Host, HostNic, MacPool, Network, Nic, SetupNetworksAction, Vm};
use crate::Result;

/// Source of engine inventory and host network actions
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn list_data_centers(&self) -> Result<Vec<DataCenter>>;

    async fn get_mac_pool(&self, id: &str) -> Result<MacPool>;

    /// List VMs matching an engine search expression
    async fn list_vms(&self, search: &str) -> Result<Vec<Vm>>;

    async fn list_vm_nics(&self, vm_id: &str) -> Result<Vec<Nic>>;

    async fn find_host(&self, name: &str) -> Result<Host>;

    async fn find_network(&self, name: &str) -> Result<Network>;

    async fn list_host_nics(&self, host_id: &str) -> Result<Vec<HostNic>>;

    async fn setup_networks(&self, host_id: &str, action: &SetupNetworksAction) -> Result<()>;

    async fn find_host_nic(&self, host_id: &str, name: &str) -> Result<HostNic> {
        self.list_host_nics(host_id)
            .await?
            .into_iter()
            .find(|nic| nic.name == name)
            .ok_or_else(|| ApiError::NotFound {
                kind: "host NIC",
                name: name.to_string(),
            })
    }
}

/// In-memory inventory for testing
#[derive(Default)]
pub struct MockInventory {
    data_centers: Vec<DataCenter>,
    mac_pools: HashMap<String, MacPool>,
    vms: HashMap<String, Vec<Vm>>,
    nics: HashMap<String, Vec<Nic>>,
    hosts: Vec<Host>,
    networks: Vec<Network>,
    host_nics: HashMap<String, Vec<HostNic>>,
    actions: Mutex<Vec<(String, SetupNetworksAction)>>,
}

impl MockInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_data_center(&mut self, data_center: DataCenter) {
        self.data_centers.push(data_center);
    }

    pub fn add_mac_pool(&mut self, pool: MacPool) {
        self.mac_pools.insert(pool.id.clone(), pool);
    }

    /// Register VMs returned for the exact search expression `search`
    pub fn add_vms(&mut self, search: impl Into<String>, vms: Vec<Vm>) {
        self.vms.entry(search.into()).or_default().extend(vms);
    }

    pub fn add_vm_nics(&mut self, vm_id: impl Into<String>, nics: Vec<Nic>) {
        self.nics.entry(vm_id.into()).or_default().extend(nics);
    }

    pub fn add_host(&mut self, host: Host) {
        self.hosts.push(host);
    }

    pub fn add_network(&mut self, network: Network) {
        self.networks.push(network);
    }

    pub fn add_host_nics(&mut self, host_id: impl Into<String>, nics: Vec<HostNic>) {
        self.host_nics.entry(host_id.into()).or_default().extend(nics);
    }

    /// Actions received through [`InventorySource::setup_networks`], by host id
    pub async fn submitted_actions(&self) -> Vec<(String, SetupNetworksAction)> {
        self.actions.lock().await.clone()
    }
}

#[async_trait]
impl InventorySource for MockInventory {
    async fn list_data_centers(&self) -> Result<Vec<DataCenter>> {
        Ok(self.data_centers.clone())
    }

    async fn get_mac_pool(&self, id: &str) -> Result<MacPool> {
        self.mac_pools
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                reason: "Not Found".to_string(),
                detail: format!("Mock MAC pool not found: {}", id),
            })
    }

    async fn list_vms(&self, search: &str) -> Result<Vec<Vm>> {
        Ok(self.vms.get(search).cloned().unwrap_or_default())
    }

    async fn list_vm_nics(&self, vm_id: &str) -> Result<Vec<Nic>> {
        Ok(self.nics.get(vm_id).cloned().unwrap_or_default())
    }

    async fn find_host(&self, name: &str) -> Result<Host> {
        self.hosts
            .iter()
            .find(|host| host.name == name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                kind: "host",
                name: name.to_string(),
            })
    }

    async fn find_network(&self, name: &str) -> Result<Network> {
        self.networks
            .iter()
            .find(|network| network.name == name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                kind: "network",
                name: name.to_string(),
            })
    }

    async fn list_host_nics(&self, host_id: &str) -> Result<Vec<HostNic>> {
        Ok(self.host_nics.get(host_id).cloned().unwrap_or_default())
    }

    async fn setup_networks(&self, host_id: &str, action: &SetupNetworksAction) -> Result<()> {
        self.actions
            .lock()
            .await
            .push((host_id.to_string(), action.clone()));
        Ok(())
    }
}
