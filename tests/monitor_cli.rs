#![cfg(unix)]

mod common;

use common::{stderr, temp_file, FakeOci};

const BIN: &str = env!("CARGO_BIN_EXE_oci-billing-monitor");

fn config_text(threshold: &str) -> String {
    format!(
        r#"
[oci]
config_file = "/etc/oci/config"
profile_name = "BILLING"
tenancy_ocid = "ocid1.tenancy.oc1..parent"
target_tenancy_ocid = "ocid1.tenancy.oc1..child"

[billing]
start_time = "2024-01-01T00:00:00Z"
cost_threshold = {threshold}
currency = "USD"

[alerting]
method = "log"
"#
    )
}

const USAGE: &str = r#"{"data": {"group-by": null, "items": [
  {"computed-amount": 75.25, "currency": "USD"},
  {"computed-amount": 30.0, "currency": "USD"},
  {"computed-amount": 999.0, "currency": "EUR"}
]}}"#;

#[test]
fn run_once_alerts_above_threshold() {
    let oci = FakeOci::install();
    oci.write_state("usage.json", USAGE);
    let config = temp_file(oci.state(), "config.toml", &config_text("100.0"));

    let output = oci
        .command(BIN)
        .args(["--run-once", "--config"])
        .arg(&config)
        .output()
        .expect("run monitor");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let log = stderr(&output);
    assert!(log.contains("ALERT TRIGGERED"), "log: {log}");
    assert!(log.contains("105.25 USD"), "log: {log}");

    let calls = oci.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("--config-file /etc/oci/config --profile BILLING usage-api"));
    assert!(calls[0].contains("--tenant-id ocid1.tenancy.oc1..child"));
    assert!(calls[0].contains("--time-usage-started 2024-01-01T00:00:00Z"));
    assert!(calls[0].contains("--granularity TOTAL --query-type COST"));
}

#[test]
fn run_once_stays_quiet_below_threshold() {
    let oci = FakeOci::install();
    oci.write_state("usage.json", USAGE);
    let config = temp_file(oci.state(), "config.toml", &config_text("500"));

    let output = oci
        .command(BIN)
        .args(["--run-once", "-c"])
        .arg(&config)
        .output()
        .expect("run monitor");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!stderr(&output).contains("ALERT TRIGGERED"));
}

#[test]
fn broken_config_fails_startup() {
    let oci = FakeOci::install();
    let config = temp_file(oci.state(), "config.toml", "[oci]\nprofile_name = \"X\"\n");

    let output = oci
        .command(BIN)
        .args(["--run-once", "--config"])
        .arg(&config)
        .output()
        .expect("run monitor");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("startup failed"));
    assert!(oci.calls().is_empty());
}

#[test]
fn missing_config_fails_startup() {
    let oci = FakeOci::install();
    let output = oci
        .command(BIN)
        .args(["--run-once", "--config"])
        .arg(oci.state().join("nope.toml"))
        .output()
        .expect("run monitor");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("config file not found"));
}
