use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use netsim5g::config::Config;
use netsim5g::{api, scenario, Network};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "netsim5g")]
#[command(about = "Simplified 5G core network simulator", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Run the scenario and exit without starting the API server
    #[arg(long)]
    no_serve: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)?;
    config.validate()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Initializing 5G network");
    let network = Network::from_config(&config)?;
    info!(
        "UDM loaded {} subscribers, {} gNodeBs, {} UEs",
        network.directory().len(),
        network.cells().len(),
        network.devices().len()
    );

    if !config.scenario.is_empty() {
        info!("Running scenario ({} steps)", config.scenario.len());
        let report = scenario::run(&network, &config.scenario);
        info!(
            "Scenario finished: {} succeeded, {} rejected, {} defects",
            report.succeeded(),
            report.rejected(),
            report.defects()
        );
        if report.defects() > 0 {
            warn!("Registry and cell state diverged during the scenario");
        }
    }

    log_status(&network);
    if let Err(e) = network.mobility().verify_consistency() {
        anyhow::bail!("final state is inconsistent: {}", e);
    }

    if args.no_serve {
        return Ok(());
    }

    api::serve(Arc::new(network), config.api_address).await
}

fn log_status(network: &Network) {
    info!("Final network status");
    for cell in network.cells() {
        info!("  {}: {}/{} UEs connected", cell.id, cell.connected_ues, cell.max_cap);
    }
    for device in network.devices() {
        match device.serving_cell {
            Some(cell) => info!("  UE {}: {:?} on {}", device.imsi, device.state, cell),
            None => info!("  UE {}: {:?}", device.imsi, device.state),
        }
    }
    for session in network.sessions() {
        info!(
            "  Session {}: UE {}, {}, {:?}",
            session.session_id, session.imsi, session.session_type, session.state
        );
    }
}
