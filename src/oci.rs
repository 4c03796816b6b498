//! Client for the installed `oci` command-line tool.
//!
//! Every remote operation is one CLI invocation whose JSON stdout is
//! deserialized into typed records. Names are compared on the decoded `name`
//! field, never by scanning raw output.
//!
//! The traits are the seam between the pipeline and the account: production
//! code uses [`OciCli`], tests substitute an in-memory account.
use crate::error::OciError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

const OCI_PROGRAM: &str = "oci";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Compartment {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Parent compartment; absent or empty for the tenancy itself.
    #[serde(default)]
    pub compartment_id: Option<String>,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
}

impl Compartment {
    pub fn is_root(&self) -> bool {
        self.compartment_id
            .as_deref()
            .map(str::trim)
            .is_none_or(str::is_empty)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Policy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub statements: Vec<String>,
}

/// One row of a summarized usage response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct UsageSummary {
    #[serde(default)]
    pub computed_amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageAggregation {
    #[serde(default)]
    items: Vec<UsageSummary>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Inputs for a user create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser<'a> {
    pub compartment_id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub description: &'a str,
}

/// Inputs for a policy create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPolicy<'a> {
    pub compartment_id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub statements: &'a [String],
}

/// Summarized-usage query over `[started, ended)`, both RFC 3339 UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageQuery<'a> {
    pub tenant_id: &'a str,
    pub started: &'a str,
    pub ended: &'a str,
}

/// Identity operations the provisioning pipeline needs from the account.
pub trait IdentityClient {
    /// Authenticated no-op call used by preflight.
    fn check_auth(&self) -> Result<(), OciError>;
    fn list_compartments(&self) -> Result<Vec<Compartment>, OciError>;
    fn list_groups(&self, compartment_id: &str, name: &str) -> Result<Vec<Group>, OciError>;
    fn create_group(
        &self,
        compartment_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Group, OciError>;
    fn list_users(&self, compartment_id: &str, name: &str) -> Result<Vec<User>, OciError>;
    fn create_user(&self, user: &NewUser<'_>) -> Result<User, OciError>;
    fn list_group_members(&self, group_id: &str) -> Result<Vec<User>, OciError>;
    fn add_user_to_group(&self, user_id: &str, group_id: &str) -> Result<(), OciError>;
    fn list_policies(&self, compartment_id: &str, name: &str) -> Result<Vec<Policy>, OciError>;
    fn create_policy(&self, policy: &NewPolicy<'_>) -> Result<Policy, OciError>;
}

/// Cost data the monitor needs from the account.
pub trait UsageClient {
    fn summarized_costs(&self, query: &UsageQuery<'_>) -> Result<Vec<UsageSummary>, OciError>;
}

/// Connection options forwarded to every `oci` invocation.
#[derive(Debug, Clone, Default)]
pub struct OciOptions {
    pub profile: Option<String>,
    pub config_file: Option<PathBuf>,
}

/// [`IdentityClient`] and [`UsageClient`] backed by the `oci` binary.
#[derive(Debug, Clone)]
pub struct OciCli {
    program: PathBuf,
    options: OciOptions,
}

impl OciCli {
    /// Locate `oci` on PATH.
    pub fn locate(options: OciOptions) -> Result<Self, OciError> {
        let program = which::which(OCI_PROGRAM).map_err(|_| OciError::NotInstalled)?;
        Ok(Self::with_program(program, options))
    }

    pub fn with_program(program: PathBuf, options: OciOptions) -> Self {
        Self { program, options }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn argv(&self, args: &[&str]) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 4);
        if let Some(config_file) = &self.options.config_file {
            argv.push("--config-file".to_string());
            argv.push(config_file.display().to_string());
        }
        if let Some(profile) = &self.options.profile {
            argv.push("--profile".to_string());
            argv.push(profile.clone());
        }
        argv.extend(args.iter().map(|arg| arg.to_string()));
        argv
    }

    fn run(&self, args: &[&str]) -> Result<String, OciError> {
        let argv = self.argv(args);
        let command = format!("{OCI_PROGRAM} {}", shell_words::join(&argv));
        tracing::debug!(command = %command, "oci invoke");

        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(argv)
            .output()
            .map_err(|source| OciError::Spawn {
                command: command.clone(),
                source,
            })?;
        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis(),
            stdout_bytes = output.stdout.len(),
            status = %output.status,
            "oci invoke complete"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stderr = if stderr.is_empty() {
                format!("`{command}` failed with status {}", output.status)
            } else {
                stderr
            };
            return Err(OciError::CommandFailed { command, stderr });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// List calls print nothing at all when there are no matches.
    fn list<T: DeserializeOwned>(&self, args: &[&str]) -> Result<Vec<T>, OciError> {
        let stdout = self.run(args)?;
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }
        decode::<Vec<T>>(args, &stdout)
    }

    fn fetch<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, OciError> {
        let stdout = self.run(args)?;
        decode(args, &stdout)
    }
}

/// `--statements` takes a JSON array of strings.
fn statements_arg(statements: &[String]) -> String {
    serde_json::Value::from(statements.to_vec()).to_string()
}

fn decode<T: DeserializeOwned>(args: &[&str], stdout: &str) -> Result<T, OciError> {
    serde_json::from_str::<Envelope<T>>(stdout)
        .map(|envelope| envelope.data)
        .map_err(|source| OciError::Decode {
            command: format!("{OCI_PROGRAM} {}", args.join(" ")),
            source,
        })
}

impl IdentityClient for OciCli {
    fn check_auth(&self) -> Result<(), OciError> {
        match self.run(&["iam", "region", "list"]) {
            Ok(_) => Ok(()),
            Err(OciError::CommandFailed { stderr, .. }) => {
                Err(OciError::NotAuthenticated { stderr })
            }
            Err(err) => Err(err),
        }
    }

    fn list_compartments(&self) -> Result<Vec<Compartment>, OciError> {
        self.list(&[
            "iam",
            "compartment",
            "list",
            "--all",
            "--include-root",
            "--compartment-id-in-subtree",
            "true",
            "--access-level",
            "ACCESSIBLE",
        ])
    }

    fn list_groups(&self, compartment_id: &str, name: &str) -> Result<Vec<Group>, OciError> {
        self.list(&[
            "iam",
            "group",
            "list",
            "--compartment-id",
            compartment_id,
            "--name",
            name,
            "--all",
        ])
    }

    fn create_group(
        &self,
        compartment_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Group, OciError> {
        self.fetch(&[
            "iam",
            "group",
            "create",
            "--compartment-id",
            compartment_id,
            "--name",
            name,
            "--description",
            description,
        ])
    }

    fn list_users(&self, compartment_id: &str, name: &str) -> Result<Vec<User>, OciError> {
        self.list(&[
            "iam",
            "user",
            "list",
            "--compartment-id",
            compartment_id,
            "--name",
            name,
            "--all",
        ])
    }

    fn create_user(&self, user: &NewUser<'_>) -> Result<User, OciError> {
        self.fetch(&[
            "iam",
            "user",
            "create",
            "--compartment-id",
            user.compartment_id,
            "--name",
            user.name,
            "--email",
            user.email,
            "--description",
            user.description,
        ])
    }

    fn list_group_members(&self, group_id: &str) -> Result<Vec<User>, OciError> {
        self.list(&["iam", "group", "list-users", "--group-id", group_id, "--all"])
    }

    fn add_user_to_group(&self, user_id: &str, group_id: &str) -> Result<(), OciError> {
        self.run(&[
            "iam",
            "group",
            "add-user",
            "--group-id",
            group_id,
            "--user-id",
            user_id,
        ])?;
        Ok(())
    }

    fn list_policies(&self, compartment_id: &str, name: &str) -> Result<Vec<Policy>, OciError> {
        self.list(&[
            "iam",
            "policy",
            "list",
            "--compartment-id",
            compartment_id,
            "--name",
            name,
            "--all",
        ])
    }

    fn create_policy(&self, policy: &NewPolicy<'_>) -> Result<Policy, OciError> {
        let statements = statements_arg(policy.statements);
        self.fetch(&[
            "iam",
            "policy",
            "create",
            "--compartment-id",
            policy.compartment_id,
            "--name",
            policy.name,
            "--description",
            policy.description,
            "--statements",
            &statements,
        ])
    }
}

impl UsageClient for OciCli {
    fn summarized_costs(&self, query: &UsageQuery<'_>) -> Result<Vec<UsageSummary>, OciError> {
        let stdout = self.run(&[
            "usage-api",
            "usage-summary",
            "request-summarized-usages",
            "--tenant-id",
            query.tenant_id,
            "--time-usage-started",
            query.started,
            "--time-usage-ended",
            query.ended,
            "--granularity",
            "TOTAL",
            "--query-type",
            "COST",
        ])?;
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }
        let aggregation: UsageAggregation = decode(&["usage-api", "usage-summary"], &stdout)?;
        Ok(aggregation.items)
    }
}
