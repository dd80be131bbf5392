//! oVirt network CLI (ovirt-net)

use anyhow::{Context, Result};
use clap::Parser;
use ovirt_api_client::{ConnectionConfig, Session};
use ovirt_mac_pool::MacParser;
use ovirt_net::cli::{Cli, Commands};
use ovirt_net::commands::{ExternalMacsCommand, SetupNetworksCommand, SetupNetworksRequest};
use ovirt_net::credentials;

async fn run(cli: &Cli) -> Result<()> {
    let config = ConnectionConfig::load(cli.config.as_deref(), cli.connection_overrides())
        .context("Failed to load connection settings")?;
    log::debug!("Connection settings: {:?}", config);

    let config = credentials::ensure_password(config)?;

    let session = Session::open(&config)
        .await
        .with_context(|| format!("Failed to connect to {}", config.url))?;
    if !cli.quiet {
        println!("Connected to {}", session.url());
    }

    match &cli.command {
        Commands::ExternalMacs { format } => {
            let cmd = ExternalMacsCommand::new(MacParser::new(config.mac_parsing));
            let report = cmd.audit(&session).await;
            session.close();

            println!("{}", report?.render(*format));
            Ok(())
        }

        Commands::SetupNetworks {
            host,
            network,
            nic,
            boot_protocol,
            no_check_connectivity,
            force,
        } => {
            let request = SetupNetworksRequest {
                host: host.clone(),
                network: network.clone(),
                nic: nic.clone(),
                boot_protocol: *boot_protocol,
                check_connectivity: !no_check_connectivity,
                force: *force,
            };

            let result = SetupNetworksCommand::new()
                .execute(&session, &request)
                .await;
            session.close();
            result
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    // Handle errors with appropriate exit codes
    match run(&cli).await {
        Ok(()) => {
            log::info!("Command completed successfully");
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);

            // Print error chain if in verbose mode
            if cli.verbose || cli.debug {
                for cause in e.chain().skip(1) {
                    eprintln!("  Caused by: {}", cause);
                }
            }
            std::process::exit(1);
        }
    }
}
