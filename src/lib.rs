//! Idempotent provisioning of OCI billing access, plus a cost monitor.
//!
//! Both tools drive the installed `oci` CLI and parse its JSON output; see
//! [`oci`] for the client seam and [`provision`] for the pipeline.
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod oci;
pub mod policy;
pub mod provision;
