//! Cost monitor.
//!
//! A check loads the config, sums the target tenancy's cost since
//! `billing.start_time`, and alerts when the sum is strictly above the
//! threshold. Errors inside a check are logged and end that check only, so a
//! scheduled monitor keeps running through transient failures.
pub mod alert;
pub mod config;
pub mod usage;

pub use alert::{trigger_alert, AlertMethod, AlertOutcome};
pub use config::{load_config, parse_config, MonitorConfig};
pub use usage::{fetch_cumulative_cost, sum_costs, CostTotal};

use crate::oci::{OciCli, UsageClient};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    WithinThreshold { cost: f64 },
    Alerted { cost: f64, alert: AlertOutcome },
    Skipped { reason: String },
}

pub fn alert_message(config: &MonitorConfig, cost: f64) -> String {
    let billing = &config.billing;
    format!(
        "OCI tenancy {} cumulative cost {:.2} {} has exceeded the threshold of {:.2} {} since {}.",
        config.oci.target_tenancy_ocid,
        cost,
        billing.currency,
        billing.cost_threshold,
        billing.currency,
        billing.start_time_str()
    )
}

/// One check against an already-loaded config.
pub fn run_check<C: UsageClient + ?Sized>(
    config: &MonitorConfig,
    client: &C,
    now: DateTime<Utc>,
) -> CheckOutcome {
    let tenant = config.oci.target_tenancy_ocid.as_str();
    let billing = &config.billing;
    let total = match fetch_cumulative_cost(client, config, now) {
        Ok(total) => total,
        Err(err) => {
            tracing::error!(tenant, error = %format!("{err:#}"), "usage fetch failed; skipping check");
            if config.oci.target_tenancy_ocid != config.oci.tenancy_ocid {
                tracing::error!(
                    auth_tenancy = %config.oci.tenancy_ocid,
                    tenant,
                    "confirm the authenticating tenancy may read the target tenancy's usage"
                );
            }
            return CheckOutcome::Skipped {
                reason: format!("{err:#}"),
            };
        }
    };

    tracing::info!(
        tenant,
        "cumulative cost since {}: {:.2} {}",
        billing.start_time_str(),
        total.amount,
        billing.currency
    );
    if total.amount > billing.cost_threshold {
        let alert = trigger_alert(&config.alert, &alert_message(config, total.amount));
        CheckOutcome::Alerted {
            cost: total.amount,
            alert,
        }
    } else {
        tracing::info!(
            tenant,
            "cumulative cost is within the threshold ({:.2} {})",
            billing.cost_threshold,
            billing.currency
        );
        CheckOutcome::WithinThreshold { cost: total.amount }
    }
}

/// Reload the config at `path` and run one check through the `oci` CLI.
pub fn check_once(path: &Path) -> CheckOutcome {
    tracing::info!(config = %path.display(), "starting billing check");
    let outcome = match load_config(path) {
        Ok(config) => match OciCli::locate(config.oci.client_options()) {
            Ok(client) => run_check(&config, &client, Utc::now()),
            Err(err) => {
                tracing::error!(error = %err, "cannot run billing check");
                CheckOutcome::Skipped {
                    reason: err.to_string(),
                }
            }
        },
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "cannot run billing check");
            CheckOutcome::Skipped {
                reason: format!("{err:#}"),
            }
        }
    };
    tracing::info!("billing check finished");
    outcome
}

/// Check immediately, then every `interval`, until the process is stopped.
pub fn schedule(path: &Path, interval: Duration) -> ! {
    tracing::info!(
        interval_hours = interval.as_secs() / 3600,
        "billing checks scheduled; press Ctrl+C to stop"
    );
    loop {
        check_once(path);
        thread::sleep(interval);
    }
}
