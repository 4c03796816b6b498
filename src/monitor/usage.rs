//! Cumulative cost from the usage API.
use super::config::{MonitorConfig, START_TIME_FORMAT};
use crate::oci::{UsageClient, UsageQuery, UsageSummary};
use anyhow::Result;
use chrono::{DateTime, Timelike, Utc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostTotal {
    pub amount: f64,
    /// Rows returned by the usage API.
    pub items: usize,
    /// Rows dropped because their currency differs from the configured one.
    pub skipped: usize,
}

/// Sum `computed-amount` over rows in `currency`; rows without an amount
/// contribute nothing.
pub fn sum_costs(items: &[UsageSummary], currency: &str) -> CostTotal {
    let mut total = CostTotal {
        items: items.len(),
        ..CostTotal::default()
    };
    for item in items {
        let Some(amount) = item.computed_amount else {
            continue;
        };
        match item.currency.as_deref() {
            Some(code) if code == currency => total.amount += amount,
            other => {
                tracing::warn!(
                    currency = other.unwrap_or("N/A"),
                    expected = currency,
                    amount,
                    "usage row in another currency skipped"
                );
                total.skipped += 1;
            }
        }
    }
    total
}

/// The usage API wants whole hours; the current partial hour is excluded.
pub fn query_end(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_nanosecond(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_minute(0))
        .unwrap_or(now)
}

pub fn fetch_cumulative_cost<C: UsageClient + ?Sized>(
    client: &C,
    config: &MonitorConfig,
    now: DateTime<Utc>,
) -> Result<CostTotal> {
    let tenant = config.oci.target_tenancy_ocid.as_str();
    let start = config.billing.start_time;
    let end = query_end(now);
    if end <= start {
        tracing::info!(tenant, "no complete usage hour since start_time");
        return Ok(CostTotal::default());
    }

    let started = start.format(START_TIME_FORMAT).to_string();
    let ended = end.format(START_TIME_FORMAT).to_string();
    tracing::info!(tenant, started = %started, ended = %ended, "fetching usage");
    let items = client.summarized_costs(&UsageQuery {
        tenant_id: tenant,
        started: &started,
        ended: &ended,
    })?;
    let total = sum_costs(&items, &config.billing.currency);
    tracing::info!(tenant, rows = total.items, skipped = total.skipped, "usage fetched");
    Ok(total)
}
