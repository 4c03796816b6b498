use anyhow::Result;
use clap::Parser;
use oci_billing::cli::SetupArgs;
use oci_billing::config::ProvisionConfig;
use oci_billing::logging;
use oci_billing::oci::{OciCli, OciOptions};
use oci_billing::provision;
use std::io::Write;

fn main() -> Result<()> {
    logging::init("warn");
    let args = SetupArgs::parse();
    let config = ProvisionConfig::from(&args);

    let client = OciCli::locate(OciOptions {
        profile: args.profile.clone(),
        config_file: None,
    })?;
    tracing::debug!(program = %client.program().display(), "located oci CLI");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = provision::run(&config, &client, &mut out)?;
    writeln!(out, "{}", report.confirmation(&config))?;
    Ok(())
}
