//! Fixed cost-report policy template.

/// Oracle's tenancy that publishes usage reports for every customer tenancy.
pub const USAGE_REPORT_TENANCY_OCID: &str =
    "ocid1.tenancy.oc1..aaaaaaaaned4fkpkisbwjlr56u7cj63lf3wffbilvqknstgtvzub7vhqkggq";

pub const POLICY_NAME: &str = "BillingCostViewPolicy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTemplate<'a> {
    pub domain: &'a str,
    pub group_name: &'a str,
    pub usage_report_tenancy: &'a str,
}

impl PolicyTemplate<'_> {
    /// Group reference qualified by identity domain, e.g. `'Default'/'billing'`.
    pub fn group_ref(&self) -> String {
        format!("'{}'/'{}'", self.domain, self.group_name)
    }

    /// The four statements, in the order the policy is created with.
    pub fn statements(&self) -> Vec<String> {
        let group = self.group_ref();
        vec![
            format!("Allow group {group} to read usage-reports in tenancy"),
            format!("Allow group {group} to manage usage-report in tenancy"),
            format!(
                "Define tenancy usage-report as {}",
                self.usage_report_tenancy
            ),
            format!("Endorse group {group} to read objects in tenancy usage-report"),
        ]
    }

    pub fn description(&self) -> String {
        format!(
            "Allow the {} group in the {} domain to view cost and usage reports",
            self.group_name, self.domain
        )
    }
}
