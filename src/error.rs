//! Typed failures from the `oci` command-line client.
//!
//! Orchestration code propagates these through `anyhow`; the variants exist so
//! callers and tests can tell an environment problem from a remote failure.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OciError {
    #[error(
        "the `oci` CLI was not found on PATH; install it \
         (https://docs.oracle.com/iaas/Content/API/SDKDocs/cliinstall.htm) and retry"
    )]
    NotInstalled,

    #[error("the `oci` CLI is not authenticated; run `oci setup config` and retry: {stderr}")]
    NotAuthenticated { stderr: String },

    /// The remote client's own error text, surfaced as-is.
    #[error("{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("unexpected response from `{command}`: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("could not resolve the tenancy id: no compartment without a parent was listed")]
    TenancyNotFound,
}
