//! The individual provisioning steps. Each one checks live account state
//! before mutating it.
use super::ensure::{ensure, Ensured, ResourceKind};
use crate::config::{ProvisionConfig, GROUP_NAME};
use crate::error::ProvisionError;
use crate::oci::{IdentityClient, NewPolicy, NewUser};
use crate::policy::{PolicyTemplate, POLICY_NAME};
use anyhow::Result;

/// Authenticated no-op call; locating the binary happens in [`crate::oci::OciCli::locate`].
pub fn preflight<C: IdentityClient + ?Sized>(client: &C) -> Result<()> {
    client.check_auth()?;
    Ok(())
}

/// First compartment without a parent, i.e. the tenancy.
pub fn resolve_tenancy<C: IdentityClient + ?Sized>(client: &C) -> Result<String> {
    let compartments = client.list_compartments()?;
    tracing::debug!(count = compartments.len(), "listed compartments");
    let tenancy = compartments
        .into_iter()
        .find(|compartment| compartment.is_root())
        .ok_or(ProvisionError::TenancyNotFound)?;
    tracing::info!(tenancy_id = %tenancy.id, "resolved tenancy");
    Ok(tenancy.id)
}

pub fn ensure_group<C: IdentityClient + ?Sized>(
    client: &C,
    compartment_id: &str,
    domain: &str,
) -> Result<Ensured> {
    let description = format!("Billing group for cost analysis ({domain} domain)");
    let ensured = ensure(
        ResourceKind::Group,
        GROUP_NAME,
        || client.list_groups(compartment_id, GROUP_NAME),
        || client.create_group(compartment_id, GROUP_NAME, &description),
    )?;
    Ok(ensured)
}

/// Users are matched by name; a different user with the same email is not
/// detected.
pub fn ensure_user<C: IdentityClient + ?Sized>(
    client: &C,
    compartment_id: &str,
    config: &ProvisionConfig,
) -> Result<Ensured> {
    let ensured = ensure(
        ResourceKind::User,
        &config.name,
        || client.list_users(compartment_id, &config.name),
        || {
            client.create_user(&NewUser {
                compartment_id,
                name: &config.name,
                email: &config.email,
                description: &config.description,
            })
        },
    )?;
    Ok(ensured)
}

/// Returns `true` when this call added the membership.
pub fn bind_membership<C: IdentityClient + ?Sized>(
    client: &C,
    user_id: &str,
    group_id: &str,
    domain: &str,
) -> Result<bool> {
    let members = client.list_group_members(group_id)?;
    if members.iter().any(|member| member.id == user_id) {
        tracing::info!(user_id, group_id, domain, "membership present; skipping add");
        return Ok(false);
    }
    client.add_user_to_group(user_id, group_id)?;
    tracing::info!(user_id, group_id, domain, "membership added");
    Ok(true)
}

pub fn ensure_policy<C: IdentityClient + ?Sized>(
    client: &C,
    compartment_id: &str,
    config: &ProvisionConfig,
) -> Result<Ensured> {
    let template = PolicyTemplate {
        domain: &config.identity_domain,
        group_name: GROUP_NAME,
        usage_report_tenancy: &config.usage_report_tenancy,
    };
    let statements = template.statements();
    let description = template.description();
    let ensured = ensure(
        ResourceKind::Policy,
        POLICY_NAME,
        || client.list_policies(compartment_id, POLICY_NAME),
        || {
            client.create_policy(&NewPolicy {
                compartment_id,
                name: POLICY_NAME,
                description: &description,
                statements: &statements,
            })
        },
    )?;
    Ok(ensured)
}
