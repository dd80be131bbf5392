//! External MACs command
//!
//! Walks every datacenter, builds the range set of its MAC pool and checks
//! the MAC address of every vNIC of every VM in that datacenter.

use anyhow::{Context, Result};
use ovirt_api_client::{DataCenter, InventorySource, Vm};
use ovirt_mac_pool::{format_mac, MacParser, MacRangeSet, NicMacStatus};
use serde::Serialize;
use serde_json::{json, Value};

use super::OutputFormat;

/// vNIC whose MAC address lies outside its datacenter's pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutOfRangeNic {
    pub data_center: String,
    pub vm_id: String,
    pub vm_name: String,
    pub nic_name: String,
    pub mac: String,
}

/// Result of auditing all datacenters
#[derive(Debug, Default)]
pub struct AuditReport {
    /// VMs with at least one out-of-range vNIC, in discovery order
    pub vms: Vec<Vm>,
    pub findings: Vec<OutOfRangeNic>,
    /// vNICs without a MAC address
    pub unassigned: usize,
    /// vNICs whose MAC address could not be parsed
    pub malformed: usize,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.vms.is_empty()
    }

    pub fn criteria_by_name(&self) -> String {
        build_search_criteria(&self.vms, |vm| format!("name=\"{}\"", vm.name))
    }

    pub fn criteria_by_id(&self) -> String {
        build_search_criteria(&self.vms, |vm| format!("id=\"{}\"", vm.id))
    }

    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.render_text(),
            OutputFormat::Json => self.to_json().to_string(),
        }
    }

    fn render_text(&self) -> String {
        let mut lines: Vec<String> = self
            .findings
            .iter()
            .map(|finding| {
                format!(
                    "MAC out of range - VM={}\tvNIC={}\tMAC={}",
                    finding.vm_name, finding.nic_name, finding.mac
                )
            })
            .collect();

        if self.is_clean() {
            lines.push("All MAC addresses are in range".to_string());
        } else {
            lines.push(self.criteria_by_name());
            lines.push(self.criteria_by_id());
        }

        lines.join("\n")
    }

    fn to_json(&self) -> Value {
        let criteria = if self.is_clean() {
            Value::Null
        } else {
            json!({
                "by_name": self.criteria_by_name(),
                "by_id": self.criteria_by_id(),
            })
        };

        json!({
            "findings": self.findings,
            "unassigned": self.unassigned,
            "malformed": self.malformed,
            "search_criteria": criteria,
        })
    }
}

/// Join per-VM search terms into one engine search expression
pub fn build_search_criteria<F>(vms: &[Vm], render: F) -> String
where
    F: Fn(&Vm) -> String,
{
    let terms: Vec<String> = vms.iter().map(render).collect();
    format!("VMs: {}", terms.join(" OR "))
}

/// Engine search expression selecting the VMs of one datacenter
pub fn data_center_search(name: &str) -> String {
    format!("datacenter=\"{}\"", name)
}

/// External MACs command implementation
pub struct ExternalMacsCommand {
    parser: MacParser,
}

impl ExternalMacsCommand {
    pub fn new(parser: MacParser) -> Self {
        Self { parser }
    }

    /// Check every vNIC of every datacenter against its MAC pool
    pub async fn audit<S>(&self, source: &S) -> Result<AuditReport>
    where
        S: InventorySource + ?Sized,
    {
        let mut report = AuditReport::default();

        let data_centers = source
            .list_data_centers()
            .await
            .context("Failed to list datacenters")?;

        for data_center in &data_centers {
            let Some(ranges) = self.load_ranges(source, data_center).await? else {
                continue;
            };

            let vms = source
                .list_vms(&data_center_search(&data_center.name))
                .await
                .with_context(|| {
                    format!("Failed to list VMs of datacenter {}", data_center.name)
                })?;

            for vm in vms {
                if self
                    .audit_vm(source, data_center, &vm, &ranges, &mut report)
                    .await?
                {
                    report.vms.push(vm);
                }
            }
        }

        log::info!(
            "Audited {} datacenters: {} VMs with external MACs",
            data_centers.len(),
            report.vms.len()
        );
        Ok(report)
    }

    async fn load_ranges<S>(
        &self,
        source: &S,
        data_center: &DataCenter,
    ) -> Result<Option<MacRangeSet>>
    where
        S: InventorySource + ?Sized,
    {
        let Some(pool_link) = &data_center.mac_pool else {
            log::warn!("Datacenter {} has no MAC pool, skipping", data_center.name);
            return Ok(None);
        };

        let pool = source
            .get_mac_pool(&pool_link.id)
            .await
            .with_context(|| {
                format!("Failed to get MAC pool of datacenter {}", data_center.name)
            })?;

        let ranges = MacRangeSet::build(&self.parser, pool.range_pairs())
            .with_context(|| format!("MAC pool {} has an invalid range", pool.name))?;

        for range in ranges.inverted() {
            log::warn!("MAC pool {} has inverted range {}", pool.name, range);
        }
        log::debug!(
            "Datacenter {} uses MAC pool {} with {} ranges",
            data_center.name,
            pool.name,
            ranges.len()
        );

        Ok(Some(ranges))
    }

    /// Returns true if any vNIC of `vm` has an out-of-range MAC address
    async fn audit_vm<S>(
        &self,
        source: &S,
        data_center: &DataCenter,
        vm: &Vm,
        ranges: &MacRangeSet,
        report: &mut AuditReport,
    ) -> Result<bool>
    where
        S: InventorySource + ?Sized,
    {
        let nics = source
            .list_vm_nics(&vm.id)
            .await
            .with_context(|| format!("Failed to list vNICs of VM {}", vm.name))?;

        let mut external = false;
        for nic in &nics {
            match NicMacStatus::classify(nic.mac_address(), ranges, &self.parser) {
                NicMacStatus::Unassigned => {
                    log::warn!("VM={}\tvNIC={}: vNIC has no MAC address", vm.name, nic.name);
                    report.unassigned += 1;
                }
                NicMacStatus::Malformed(err) => {
                    log::warn!("VM={}\tvNIC={}: {}", vm.name, nic.name, err);
                    report.malformed += 1;
                }
                NicMacStatus::OutOfRange(value) => {
                    log::debug!(
                        "VM={} vNIC={}: MAC {} out of range",
                        vm.name,
                        nic.name,
                        format_mac(value)
                    );
                    report.findings.push(OutOfRangeNic {
                        data_center: data_center.name.clone(),
                        vm_id: vm.id.clone(),
                        vm_name: vm.name.clone(),
                        nic_name: nic.name.clone(),
                        mac: nic.mac_address().unwrap_or_default().to_string(),
                    });
                    external = true;
                }
                NicMacStatus::InRange(_) => {}
            }
        }

        Ok(external)
    }
}
