//! CLI argument parsing for the setup and monitor binaries.
//!
//! Both surfaces are flat (no subcommands); each binary owns one args type.
use crate::config::{DEFAULT_IDENTITY_DOMAIN, DEFAULT_USER_DESCRIPTION};
use crate::policy::USAGE_REPORT_TENANCY_OCID;
use clap::Parser;
use std::path::PathBuf;

/// Default monitor config path, relative to the working directory.
pub const DEFAULT_MONITOR_CONFIG: &str = "config.toml";

/// Default hours between scheduled monitor checks.
pub const DEFAULT_INTERVAL_HOURS: u64 = 2;

/// One year.
pub const MAX_INTERVAL_HOURS: u64 = 8760;

/// Provision the billing group, user, membership and cost-report policy.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "oci-billing-setup",
    version,
    about = "Create (or reuse) an OCI billing group, user, membership and cost-report policy",
    after_help = "Examples:\n  oci-billing-setup --email ops@example.com --name \"Ops Billing\"\n  oci-billing-setup -e ops@example.com -n ops-billing -c ocid1.tenancy.oc1..xxxx -i Finance",
    arg_required_else_help = true
)]
pub struct SetupArgs {
    /// Email address for the billing user
    #[arg(short = 'e', long, value_name = "EMAIL")]
    pub email: String,

    /// Name of the billing user
    #[arg(short = 'n', long, value_name = "NAME")]
    pub name: String,

    /// Description for the billing user
    #[arg(short = 'd', long, value_name = "DESC", default_value = DEFAULT_USER_DESCRIPTION)]
    pub description: String,

    /// Compartment to provision into (defaults to the tenancy)
    #[arg(short = 'c', long, value_name = "ID")]
    pub compartment_id: Option<String>,

    /// Identity domain label used in descriptions and policy statements
    #[arg(short = 'i', long, value_name = "DOMAIN", default_value = DEFAULT_IDENTITY_DOMAIN)]
    pub identity_domain: String,

    /// Tenancy OCID that publishes usage reports, bound by the policy's define statement
    #[arg(long, value_name = "OCID", default_value = USAGE_REPORT_TENANCY_OCID)]
    pub usage_report_tenancy: String,

    /// Profile from the oci CLI config file
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,
}

/// Watch cumulative tenancy cost and alert past a threshold.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "oci-billing-monitor",
    version,
    about = "Monitor cumulative OCI cost and alert when it exceeds a threshold"
)]
pub struct MonitorArgs {
    /// Path to the monitor TOML config
    #[arg(short = 'c', long, value_name = "PATH", default_value = DEFAULT_MONITOR_CONFIG)]
    pub config: PathBuf,

    /// Hours between checks, at most one year
    #[arg(
        short = 'i',
        long,
        value_name = "HOURS",
        default_value_t = DEFAULT_INTERVAL_HOURS,
        value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_HOURS)
    )]
    pub interval: u64,

    /// Run a single check and exit instead of scheduling
    #[arg(long)]
    pub run_once: bool,
}
