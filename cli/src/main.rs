use args::{Args, Command};
use clap::Parser;
use error::{Error, Result};
use mempool_accelerator::{
    block::{BlockExtended, PoolTag},
    monitor::AccelerationMonitor,
    AccelerationClient, FetchOutcome, PoolId,
};
use mempool_core::{debug, error, info, signals::shutdown_on_signal, task::tick::TickService};
use serde::Serialize;
use std::{fs, path::Path, process::ExitCode, sync::Arc, time::Duration};

mod args;
mod error;

/// Exit code reported when the accelerator service could not be reached
const EXIT_UNAVAILABLE: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = mempool_core::log::init_logger(args.log_dir.as_deref(), &args.log_level) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    debug!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    mempool_core::panic::configure_panic();

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn run(args: Args) -> Result<ExitCode> {
    let config = args.accelerator_config()?;
    if !config.enabled {
        info!("Accelerator service integration is disabled (use --enable or `enabled = true` in the config file)");
    }
    let client = Arc::new(AccelerationClient::new(config)?);

    match args.command {
        Command::Current => print_records(client.fetch_accelerations().await),
        Command::History { page, status } => print_records(client.fetch_acceleration_history(page, status.as_deref()).await),
        Command::Check { block, pool_id } => {
            let block = block.map(|path| load_block(&path)).transpose()?;
            let outcome = client.fetch_accelerations().await;
            if outcome.is_unavailable() {
                return Ok(ExitCode::from(EXIT_UNAVAILABLE));
            }
            let report = match (block, pool_id) {
                (Some(block), _) => CheckReport::new(block.extras.pool.id, client.is_accelerated_block(&block, outcome.as_slice())),
                (None, pool_id) => {
                    let pool = PoolTag { id: pool_id.unwrap_or_default(), name: String::new(), slug: String::new() };
                    CheckReport::new(pool.id, client.is_accelerated_block(&pool, outcome.as_slice()))
                }
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Monitor { interval } => {
            let tick_service = Arc::new(TickService::new());
            shutdown_on_signal(tick_service.shutdown_trigger()).map_err(|err| Error::Signal(err.to_string()))?;
            let monitor = Arc::new(AccelerationMonitor::new(client, Duration::from_secs(interval), tick_service));
            monitor.worker().await;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport {
    pool_id: PoolId,
    accelerated: bool,
}

impl CheckReport {
    fn new(pool_id: PoolId, accelerated: bool) -> Self {
        Self { pool_id, accelerated }
    }
}

fn load_block(path: &Path) -> Result<BlockExtended> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

/// Renders fetched records as JSON. Returns `None` when the service was unavailable.
fn render_records<T: Serialize>(outcome: FetchOutcome<T>) -> Result<Option<String>> {
    outcome.records().map(|records| serde_json::to_string_pretty(&records)).transpose().map_err(Error::from)
}

fn print_records<T: Serialize>(outcome: FetchOutcome<T>) -> Result<ExitCode> {
    match render_records(outcome)? {
        Some(json) => {
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::from(EXIT_UNAVAILABLE)),
    }
}
