//! Provisioning orchestrator.
//!
//! Runs the pipeline top to bottom: preflight, tenancy resolution, group,
//! user, membership, policy. Identifiers flow from step to step through
//! return values. The first failed remote call aborts the run; a re-run
//! skips what already exists and resumes at the failed step.
mod ensure;
mod report;
mod steps;

pub use ensure::{ensure, Ensured, Named, ResourceKind};
pub use report::{CompartmentSource, ProvisionReport};
pub use steps::{
    bind_membership, ensure_group, ensure_policy, ensure_user, preflight, resolve_tenancy,
};

use crate::config::ProvisionConfig;
use crate::oci::IdentityClient;
use anyhow::Result;
use std::io::Write;

const STEPS: usize = 6;

/// Run every step against `client`, writing one progress line per step to `out`.
pub fn run<C, W>(config: &ProvisionConfig, client: &C, out: &mut W) -> Result<ProvisionReport>
where
    C: IdentityClient + ?Sized,
    W: Write,
{
    preflight(client)?;
    writeln!(out, "[1/{STEPS}] oci CLI is installed and authenticated")?;

    let (compartment_id, compartment_source) = match &config.compartment_id {
        Some(id) => (id.clone(), CompartmentSource::Supplied),
        None => (resolve_tenancy(client)?, CompartmentSource::ResolvedTenancy),
    };
    writeln!(
        out,
        "[2/{STEPS}] Using compartment {compartment_id} ({})",
        compartment_source.as_str()
    )?;

    let group = ensure_group(client, &compartment_id, &config.identity_domain)?;
    writeln!(out, "[3/{STEPS}] {}", report::describe(&group))?;

    let user = ensure_user(client, &compartment_id, config)?;
    writeln!(out, "[4/{STEPS}] {}", report::describe(&user))?;

    let membership_added =
        bind_membership(client, &user.id, &group.id, &config.identity_domain)?;
    if membership_added {
        writeln!(
            out,
            "[5/{STEPS}] Added user '{}' to group '{}' ({} domain)",
            user.name, group.name, config.identity_domain
        )?;
    } else {
        writeln!(
            out,
            "[5/{STEPS}] User '{}' is already a member of group '{}' ({} domain)",
            user.name, group.name, config.identity_domain
        )?;
    }

    let policy = ensure_policy(client, &compartment_id, config)?;
    writeln!(out, "[6/{STEPS}] {}", report::describe(&policy))?;

    Ok(ProvisionReport {
        compartment_id,
        compartment_source,
        group,
        user,
        membership_added,
        policy,
    })
}
