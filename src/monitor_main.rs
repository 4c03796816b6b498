use anyhow::{Context, Result};
use clap::Parser;
use oci_billing::cli::MonitorArgs;
use oci_billing::logging;
use oci_billing::monitor;
use std::time::Duration;

fn main() -> Result<()> {
    logging::init("info");
    let args = MonitorArgs::parse();

    // Fail fast on a broken config before scheduling anything.
    monitor::load_config(&args.config).context("startup failed")?;

    if args.run_once {
        monitor::check_once(&args.config);
        return Ok(());
    }
    monitor::schedule(&args.config, Duration::from_secs(args.interval * 3600))
}
