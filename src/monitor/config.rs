//! Monitor configuration.
//!
//! The TOML file has three tables, `[oci]`, `[billing]` and `[alerting]`.
//! Missing keys are errors; extra keys are ignored. The raw tables are then
//! validated into a [`MonitorConfig`] whose fields are already parsed.
use super::alert::AlertMethod;
use crate::oci::OciOptions;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Accepted `start_time` layout, always UTC.
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const FEISHU_WEBHOOK_PREFIX: &str = "https://open.feishu.cn/open-apis/bot/v2/hook/";

#[derive(Debug, Deserialize)]
struct RawConfig {
    oci: RawOci,
    billing: RawBilling,
    alerting: RawAlerting,
}

#[derive(Debug, Deserialize)]
struct RawOci {
    config_file: String,
    profile_name: String,
    tenancy_ocid: String,
    #[serde(default)]
    target_tenancy_ocid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBilling {
    start_time: String,
    cost_threshold: f64,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct RawAlerting {
    method: String,
    #[serde(default)]
    feishu_webhook_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub oci: OciSection,
    pub billing: BillingSection,
    pub alert: AlertMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciSection {
    pub config_file: PathBuf,
    pub profile_name: String,
    /// Tenancy whose credentials authenticate the calls.
    pub tenancy_ocid: String,
    /// Tenancy whose usage is summed; defaults to `tenancy_ocid`.
    pub target_tenancy_ocid: String,
}

impl OciSection {
    pub fn client_options(&self) -> OciOptions {
        OciOptions {
            profile: Some(self.profile_name.clone()),
            config_file: Some(self.config_file.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillingSection {
    pub start_time: DateTime<Utc>,
    pub cost_threshold: f64,
    pub currency: String,
}

impl BillingSection {
    pub fn start_time_str(&self) -> String {
        self.start_time.format(START_TIME_FORMAT).to_string()
    }
}

/// Load and validate the monitor config at `path`.
pub fn load_config(path: &Path) -> Result<MonitorConfig> {
    if !path.is_file() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let config =
        parse_config(&text).with_context(|| format!("invalid config {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded monitor config");
    Ok(config)
}

/// Parse and validate config text.
pub fn parse_config(text: &str) -> Result<MonitorConfig> {
    let raw: RawConfig = toml::from_str(text).context("parse monitor config TOML")?;

    let oci = validate_oci(raw.oci)?;
    let billing = validate_billing(raw.billing)?;
    let alert = validate_alerting(raw.alerting)?;
    Ok(MonitorConfig {
        oci,
        billing,
        alert,
    })
}

fn validate_oci(raw: RawOci) -> Result<OciSection> {
    let tenancy_ocid = require_non_empty(raw.tenancy_ocid, "oci.tenancy_ocid")?;
    let target_tenancy_ocid = raw
        .target_tenancy_ocid
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| tenancy_ocid.clone());
    Ok(OciSection {
        config_file: expand_home(&require_non_empty(raw.config_file, "oci.config_file")?),
        profile_name: require_non_empty(raw.profile_name, "oci.profile_name")?,
        tenancy_ocid,
        target_tenancy_ocid,
    })
}

fn validate_billing(raw: RawBilling) -> Result<BillingSection> {
    let start_time = parse_start_time(&raw.start_time)?;
    if !raw.cost_threshold.is_finite() {
        return Err(anyhow!(
            "billing.cost_threshold must be a finite number (got {})",
            raw.cost_threshold
        ));
    }
    Ok(BillingSection {
        start_time,
        cost_threshold: raw.cost_threshold,
        currency: require_non_empty(raw.currency, "billing.currency")?,
    })
}

fn validate_alerting(raw: RawAlerting) -> Result<AlertMethod> {
    let method = raw.method.trim().to_ascii_lowercase();
    match method.as_str() {
        "log" => Ok(AlertMethod::Log),
        "feishu" => {
            let webhook_url = raw
                .feishu_webhook_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .ok_or_else(|| {
                    anyhow!("alerting.feishu_webhook_url is required when method is \"feishu\"")
                })?;
            if !webhook_url.starts_with(FEISHU_WEBHOOK_PREFIX) {
                tracing::warn!(url = %webhook_url, "feishu_webhook_url does not look like a Feishu bot webhook");
            }
            Ok(AlertMethod::Feishu { webhook_url })
        }
        _ => Ok(AlertMethod::Unsupported(raw.method)),
    }
}

pub fn parse_start_time(value: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), START_TIME_FORMAT).with_context(
        || format!("billing.start_time must look like 2024-01-01T00:00:00Z (got {value:?})"),
    )?;
    Ok(naive.and_utc())
}

fn require_non_empty(value: String, key: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{key} must be non-empty"));
    }
    Ok(trimmed.to_string())
}

fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
