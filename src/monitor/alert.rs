//! Alert delivery for threshold breaches.
//!
//! Every alert is logged at warn level first; the configured method then
//! decides whether anything else happens. Delivery failures are logged and
//! never abort the monitor.
use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::time::Duration;

const FEISHU_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertMethod {
    Log,
    Feishu { webhook_url: String },
    /// Kept verbatim so the alert can name what was configured.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    Logged,
    Delivered,
    DeliveryFailed(String),
    Unsupported(String),
}

pub fn trigger_alert(method: &AlertMethod, message: &str) -> AlertOutcome {
    tracing::warn!("ALERT TRIGGERED: {message}");

    match method {
        AlertMethod::Log => AlertOutcome::Logged,
        AlertMethod::Feishu { webhook_url } => match send_feishu_alert(webhook_url, message) {
            Ok(()) => {
                tracing::info!("feishu alert delivered");
                AlertOutcome::Delivered
            }
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "feishu alert failed");
                AlertOutcome::DeliveryFailed(format!("{err:#}"))
            }
        },
        AlertMethod::Unsupported(name) => {
            tracing::error!("Unsupported alerting method configured: {name}");
            AlertOutcome::Unsupported(name.clone())
        }
    }
}

pub fn feishu_payload(message: &str) -> Value {
    json!({
        "msg_type": "text",
        "content": {
            "text": format!("OCI Billing Alert\n\n{message}"),
        },
    })
}

/// Feishu answers HTTP 200 even for rejected messages; success is a zero
/// `StatusCode` (older bots) or `code` (newer bots).
pub fn feishu_accepted(response: &Value) -> bool {
    ["StatusCode", "code"]
        .iter()
        .any(|key| response.get(key).and_then(Value::as_i64) == Some(0))
}

fn send_feishu_alert(webhook_url: &str, message: &str) -> Result<()> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(FEISHU_TIMEOUT))
        .build()
        .into();
    let mut response = agent.post(webhook_url).send_json(feishu_payload(message))?;
    let body: Value = response.body_mut().read_json()?;
    if !feishu_accepted(&body) {
        return Err(anyhow!("feishu rejected alert: {body}"));
    }
    Ok(())
}
