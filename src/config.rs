//! Immutable provisioning configuration.
use crate::cli::SetupArgs;

pub const GROUP_NAME: &str = "billing";
pub const DEFAULT_USER_DESCRIPTION: &str = "Billing user for cost analysis";
pub const DEFAULT_IDENTITY_DOMAIN: &str = "Default";

/// Everything the pipeline needs, fixed before the first remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    pub email: String,
    pub name: String,
    pub description: String,
    /// `None` means resolve the tenancy and provision there.
    pub compartment_id: Option<String>,
    pub identity_domain: String,
    pub usage_report_tenancy: String,
}

impl From<&SetupArgs> for ProvisionConfig {
    fn from(args: &SetupArgs) -> Self {
        Self {
            email: args.email.clone(),
            name: args.name.clone(),
            description: args.description.clone(),
            compartment_id: args
                .compartment_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            identity_domain: args.identity_domain.clone(),
            usage_report_tenancy: args.usage_report_tenancy.clone(),
        }
    }
}
