//! CLI command tests

use std::io::Cursor;

use async_trait::async_trait;
use clap::Parser;
use mockall::mock;
use ovirt_api_client::{
    ApiError, BootProtocol, DataCenter, Host, HostNic, Link, MacPool, MacPoolRange,
    MacPoolRanges, MockInventory, Network, Nic, NicMac, SetupNetworksAction, Vm,
};
use ovirt_mac_pool::{MacParser, ParsePolicy};

use crate::cli::{Cli, Commands};
use crate::commands::external_macs::data_center_search;
use crate::commands::*;
use crate::credentials::prompt_password;

mock! {
    pub Engine {}

    #[async_trait]
    impl ovirt_api_client::InventorySource for Engine {
        async fn list_data_centers(&self) -> ovirt_api_client::Result<Vec<DataCenter>>;
        async fn get_mac_pool(&self, id: &str) -> ovirt_api_client::Result<MacPool>;
        async fn list_vms(&self, search: &str) -> ovirt_api_client::Result<Vec<Vm>>;
        async fn list_vm_nics(&self, vm_id: &str) -> ovirt_api_client::Result<Vec<Nic>>;
        async fn find_host(&self, name: &str) -> ovirt_api_client::Result<Host>;
        async fn find_network(&self, name: &str) -> ovirt_api_client::Result<Network>;
        async fn list_host_nics(&self, host_id: &str) -> ovirt_api_client::Result<Vec<HostNic>>;
        async fn setup_networks(
            &self,
            host_id: &str,
            action: &SetupNetworksAction,
        ) -> ovirt_api_client::Result<()>;
        async fn find_host_nic(&self, host_id: &str, name: &str) -> ovirt_api_client::Result<HostNic>;
    }
}

fn vm(id: &str, name: &str) -> Vm {
    Vm {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn nic(name: &str, mac: Option<&str>) -> Nic {
    Nic {
        id: format!("{}-id", name),
        name: name.to_string(),
        mac: Some(NicMac {
            address: mac.map(str::to_string),
        }),
    }
}

fn pool(id: &str, ranges: &[(&str, &str)]) -> MacPool {
    MacPool {
        id: id.to_string(),
        name: format!("pool-{}", id),
        ranges: MacPoolRanges {
            range: ranges
                .iter()
                .map(|(from, to)| MacPoolRange {
                    from: from.to_string(),
                    to: to.to_string(),
                })
                .collect(),
        },
    }
}

fn data_center(name: &str, pool_id: Option<&str>) -> DataCenter {
    DataCenter {
        id: format!("{}-id", name),
        name: name.to_string(),
        mac_pool: pool_id.map(Link::new),
    }
}

/// Two datacenters with their own pools plus one without a pool
fn sample_inventory() -> MockInventory {
    let mut inventory = MockInventory::new();

    inventory.add_data_center(data_center("Default", Some("pool-a")));
    inventory.add_data_center(data_center("Lab", Some("pool-b")));
    inventory.add_data_center(data_center("Orphan", None));

    inventory.add_mac_pool(pool(
        "pool-a",
        &[
            ("00:1A:4A:16:01:00", "00:1A:4A:16:01:FF"),
            ("56:6F:1A:4A:00:00", "56:6F:1A:4A:00:FF"),
        ],
    ));
    inventory.add_mac_pool(pool("pool-b", &[("02:00:00:00:00:00", "02:00:00:00:00:0F")]));

    inventory.add_vms(
        data_center_search("Default"),
        vec![vm("vm-1", "web01"), vm("vm-2", "db01"), vm("vm-3", "cache01")],
    );
    inventory.add_vm_nics(
        "vm-1",
        vec![
            nic("nic1", Some("00:1A:4A:16:01:10")),
            nic("nic2", Some("56:6f:1a:4a:00:20")),
        ],
    );
    inventory.add_vm_nics(
        "vm-2",
        vec![
            nic("nic1", None),
            nic("nic2", Some("00:1A:4A:16:02:00")),
            nic("nic3", Some("00:1A:4A:16:03:00")),
        ],
    );
    inventory.add_vm_nics("vm-3", vec![nic("nic1", Some("00:1A:4A"))]);

    inventory.add_vms(data_center_search("Lab"), vec![vm("vm-4", "lab01")]);
    inventory.add_vm_nics(
        "vm-4",
        vec![nic("nic1", Some("02:00:00:00:00:10")), nic("nic2", Some(""))],
    );

    inventory
}

#[tokio::test]
async fn test_external_macs_report() {
    let inventory = sample_inventory();
    let cmd = ExternalMacsCommand::new(MacParser::strict());

    let report = cmd.audit(&inventory).await.unwrap();

    let names: Vec<&str> = report.vms.iter().map(|vm| vm.name.as_str()).collect();
    assert_eq!(names, vec!["db01", "lab01"]);

    assert_eq!(report.findings.len(), 3);
    assert_eq!(
        report.findings[0],
        OutOfRangeNic {
            data_center: "Default".to_string(),
            vm_id: "vm-2".to_string(),
            vm_name: "db01".to_string(),
            nic_name: "nic2".to_string(),
            mac: "00:1A:4A:16:02:00".to_string(),
        }
    );
    assert_eq!(report.findings[2].data_center, "Lab");

    assert_eq!(report.unassigned, 2);
    assert_eq!(report.malformed, 1);
}

#[tokio::test]
async fn test_external_macs_search_criteria() {
    let inventory = sample_inventory();
    let report = ExternalMacsCommand::new(MacParser::strict())
        .audit(&inventory)
        .await
        .unwrap();

    assert_eq!(
        report.criteria_by_name(),
        r#"VMs: name="db01" OR name="lab01""#
    );
    assert_eq!(report.criteria_by_id(), r#"VMs: id="vm-2" OR id="vm-4""#);

    let text = report.render(OutputFormat::Text);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "MAC out of range - VM=db01\tvNIC=nic2\tMAC=00:1A:4A:16:02:00"
    );
    assert_eq!(lines[3], report.criteria_by_name());
    assert_eq!(lines[4], report.criteria_by_id());
}

#[tokio::test]
async fn test_external_macs_json_output() {
    let inventory = sample_inventory();
    let report = ExternalMacsCommand::new(MacParser::strict())
        .audit(&inventory)
        .await
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&report.render(OutputFormat::Json)).unwrap();
    assert_eq!(value["findings"].as_array().unwrap().len(), 3);
    assert_eq!(value["findings"][1]["nic_name"], "nic3");
    assert_eq!(value["malformed"], 1);
    assert_eq!(
        value["search_criteria"]["by_id"],
        r#"VMs: id="vm-2" OR id="vm-4""#
    );
}

#[tokio::test]
async fn test_external_macs_all_in_range() {
    let mut inventory = MockInventory::new();
    inventory.add_data_center(data_center("Default", Some("pool-a")));
    inventory.add_mac_pool(pool("pool-a", &[("00:1A:4A:16:01:00", "00:1A:4A:16:01:FF")]));
    inventory.add_vms(data_center_search("Default"), vec![vm("vm-1", "web01")]);
    inventory.add_vm_nics("vm-1", vec![nic("nic1", Some("00:1A:4A:16:01:51"))]);

    let report = ExternalMacsCommand::new(MacParser::strict())
        .audit(&inventory)
        .await
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(
        report.render(OutputFormat::Text),
        "All MAC addresses are in range"
    );
    let value: serde_json::Value =
        serde_json::from_str(&report.render(OutputFormat::Json)).unwrap();
    assert!(value["search_criteria"].is_null());
}

#[tokio::test]
async fn test_external_macs_empty_pool_flags_everything() {
    let mut inventory = MockInventory::new();
    inventory.add_data_center(data_center("Default", Some("empty")));
    inventory.add_mac_pool(pool("empty", &[]));
    inventory.add_vms(data_center_search("Default"), vec![vm("vm-1", "web01")]);
    inventory.add_vm_nics("vm-1", vec![nic("nic1", Some("00:1A:4A:16:01:51"))]);

    let report = ExternalMacsCommand::new(MacParser::strict())
        .audit(&inventory)
        .await
        .unwrap();

    assert_eq!(report.vms, vec![vm("vm-1", "web01")]);
}

#[tokio::test]
async fn test_external_macs_invalid_pool_range() {
    let mut inventory = MockInventory::new();
    inventory.add_data_center(data_center("Default", Some("broken")));
    inventory.add_mac_pool(pool("broken", &[("00:1A:4A:16:01", "00:1A:4A:16:01:FF")]));

    let result = ExternalMacsCommand::new(MacParser::strict())
        .audit(&inventory)
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("invalid range"));
}

#[tokio::test]
async fn test_external_macs_legacy_parsing() {
    let mut inventory = MockInventory::new();
    inventory.add_data_center(data_center("Default", Some("pool-a")));
    inventory.add_mac_pool(pool("pool-a", &[("00:00:00:00:00:10", "00:00:00:00:00:20")]));
    inventory.add_vms(data_center_search("Default"), vec![vm("vm-1", "web01")]);
    inventory.add_vm_nics("vm-1", vec![nic("nic1", Some("00:15")), nic("nic2", Some("00:30"))]);

    let strict = ExternalMacsCommand::new(MacParser::strict())
        .audit(&inventory)
        .await
        .unwrap();
    assert_eq!(strict.malformed, 2);
    assert!(strict.is_clean());

    let legacy = ExternalMacsCommand::new(MacParser::legacy())
        .audit(&inventory)
        .await
        .unwrap();
    assert_eq!(legacy.malformed, 0);
    assert_eq!(legacy.findings.len(), 1);
    assert_eq!(legacy.findings[0].nic_name, "nic2");
}

#[tokio::test]
async fn test_external_macs_missing_pool_fails() {
    let mut inventory = MockInventory::new();
    inventory.add_data_center(data_center("Default", Some("gone")));

    let err = ExternalMacsCommand::new(MacParser::strict())
        .audit(&inventory)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to get MAC pool of datacenter Default"));
}

fn setup_request() -> SetupNetworksRequest {
    SetupNetworksRequest {
        host: "nari05".to_string(),
        network: "test1".to_string(),
        nic: "enp2s16f3".to_string(),
        boot_protocol: BootProtocol::Dhcp,
        check_connectivity: true,
        force: false,
    }
}

#[tokio::test]
async fn test_setup_networks_submits_attachment() {
    let mut inventory = MockInventory::new();
    inventory.add_host(Host {
        id: "host-1".to_string(),
        name: "nari05".to_string(),
    });
    inventory.add_network(Network {
        id: "net-1".to_string(),
        name: "test1".to_string(),
    });
    inventory.add_host_nics(
        "host-1",
        vec![HostNic {
            id: "hnic-1".to_string(),
            name: "enp2s16f3".to_string(),
        }],
    );

    SetupNetworksCommand::new()
        .execute(&inventory, &setup_request())
        .await
        .unwrap();

    let actions = inventory.submitted_actions().await;
    assert_eq!(actions.len(), 1);

    let (host_id, action) = &actions[0];
    assert_eq!(host_id, "host-1");
    assert!(action.check_connectivity);
    assert!(!action.force);

    let attachment = &action.modified_network_attachments.network_attachment[0];
    assert_eq!(attachment.network, Link::new("net-1"));
    assert_eq!(attachment.host_nic, Link::new("hnic-1"));
    assert_eq!(
        attachment.ip_address_assignments.ip_address_assignment[0].assignment_method,
        BootProtocol::Dhcp
    );
}

#[tokio::test]
async fn test_setup_networks_calls_engine_once() {
    let mut engine = MockEngine::new();
    engine
        .expect_find_host()
        .withf(|name| name == "nari05")
        .times(1)
        .returning(|_| {
            Ok(Host {
                id: "host-1".to_string(),
                name: "nari05".to_string(),
            })
        });
    engine
        .expect_find_network()
        .withf(|name| name == "test1")
        .times(1)
        .returning(|_| {
            Ok(Network {
                id: "net-1".to_string(),
                name: "test1".to_string(),
            })
        });
    engine
        .expect_find_host_nic()
        .withf(|host_id, name| host_id == "host-1" && name == "enp2s16f3")
        .times(1)
        .returning(|_, _| {
            Ok(HostNic {
                id: "hnic-1".to_string(),
                name: "enp2s16f3".to_string(),
            })
        });
    engine
        .expect_setup_networks()
        .withf(|host_id, action| host_id == "host-1" && action.force && !action.check_connectivity)
        .times(1)
        .returning(|_, _| Ok(()));

    let request = SetupNetworksRequest {
        check_connectivity: false,
        force: true,
        ..setup_request()
    };

    SetupNetworksCommand::new()
        .execute(&engine, &request)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_setup_networks_unknown_host() {
    let mut engine = MockEngine::new();
    engine.expect_find_host().times(1).returning(|name| {
        Err(ApiError::NotFound {
            kind: "host",
            name: name.to_string(),
        })
    });
    engine.expect_setup_networks().times(0);

    let err = SetupNetworksCommand::new()
        .execute(&engine, &setup_request())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to look up host nari05"));
}

#[test]
fn test_prompt_password() {
    let mut input = Cursor::new("s3cret\r\n");
    let mut output = Vec::new();

    let password = prompt_password(&mut input, &mut output).unwrap();

    assert_eq!(password, "s3cret");
    assert_eq!(String::from_utf8(output).unwrap(), "Please enter your password: ");
}

#[test]
fn test_prompt_password_empty() {
    let mut input = Cursor::new("\n");
    let mut output = Vec::new();

    assert!(prompt_password(&mut input, &mut output).is_err());
}

/// Test CLI argument parsing
#[test]
fn test_cli_parsing() {
    let cli = Cli::try_parse_from([
        "ovirt-net",
        "-l",
        "https://engine/ovirt-engine/api",
        "-u",
        "admin@internal",
        "external-macs",
    ])
    .unwrap();
    assert_eq!(cli.url.as_deref(), Some("https://engine/ovirt-engine/api"));
    assert!(matches!(
        cli.command,
        Commands::ExternalMacs {
            format: OutputFormat::Text
        }
    ));

    // Global flags are accepted after the subcommand
    let cli = Cli::try_parse_from([
        "ovirt-net",
        "external-macs",
        "--format",
        "json",
        "--certfile",
        "/etc/pki/ca.pem",
        "--legacy-mac-parsing",
        "--debug",
    ])
    .unwrap();
    assert_eq!(cli.log_level(), "debug");

    let overrides = cli.connection_overrides();
    assert_eq!(
        overrides.ca_file.as_deref(),
        Some(std::path::Path::new("/etc/pki/ca.pem"))
    );
    assert_eq!(overrides.mac_parsing, Some(ParsePolicy::Legacy));
    assert_eq!(overrides.insecure, None);

    let cli = Cli::try_parse_from([
        "ovirt-net",
        "setup-networks",
        "--host",
        "nari05",
        "--network",
        "test1",
        "--nic",
        "enp2s16f3",
        "--boot-protocol",
        "none",
        "--force",
    ])
    .unwrap();
    match cli.command {
        Commands::SetupNetworks {
            boot_protocol,
            force,
            no_check_connectivity,
            ..
        } => {
            assert_eq!(boot_protocol, BootProtocol::None);
            assert!(force);
            assert!(!no_check_connectivity);
        }
        _ => panic!("expected setup-networks"),
    }
    assert_eq!(cli.log_level(), "warn");
}

#[test]
fn test_verbose_and_version_flags() {
    let cli = Cli::try_parse_from(["ovirt-net", "-v", "external-macs"]).unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.log_level(), "info");

    let cli = Cli::try_parse_from(["ovirt-net", "external-macs", "--verbose"]).unwrap();
    assert_eq!(cli.log_level(), "info");

    let err = Cli::try_parse_from(["ovirt-net", "-V"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
}

/// Test error handling
#[test]
fn test_cli_error_handling() {
    assert!(Cli::try_parse_from(["ovirt-net", "invalid-command"]).is_err());
    assert!(Cli::try_parse_from(["ovirt-net", "setup-networks", "--host", "nari05"]).is_err());
    assert!(Cli::try_parse_from([
        "ovirt-net",
        "setup-networks",
        "--host",
        "h",
        "--network",
        "n",
        "--nic",
        "e",
        "--boot-protocol",
        "static",
    ])
    .is_err());
    assert!(Cli::try_parse_from(["ovirt-net", "external-macs", "--format", "yaml"]).is_err());
}
