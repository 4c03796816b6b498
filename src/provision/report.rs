use super::ensure::Ensured;
use crate::config::ProvisionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompartmentSource {
    Supplied,
    ResolvedTenancy,
}

impl CompartmentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompartmentSource::Supplied => "from --compartment-id",
            CompartmentSource::ResolvedTenancy => "resolved tenancy",
        }
    }
}

/// What a completed run found or created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub compartment_id: String,
    pub compartment_source: CompartmentSource,
    pub group: Ensured,
    pub user: Ensured,
    pub membership_added: bool,
    pub policy: Ensured,
}

impl ProvisionReport {
    /// Number of create/add calls this run issued.
    pub fn mutations(&self) -> usize {
        [self.group.created, self.user.created, self.membership_added, self.policy.created]
            .iter()
            .filter(|changed| **changed)
            .count()
    }

    pub fn confirmation(&self, config: &ProvisionConfig) -> String {
        format!(
            "Billing user '{}' <{}> can view cost reports in the {} domain (group '{}', policy '{}').",
            config.name, config.email, config.identity_domain, self.group.name, self.policy.name
        )
    }
}

pub(super) fn describe(ensured: &Ensured) -> String {
    let verb = if ensured.created {
        "Created"
    } else {
        "Reusing existing"
    };
    format!("{verb} {} '{}': {}", ensured.kind, ensured.name, ensured.id)
}
