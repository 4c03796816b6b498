//! Shared test infrastructure for integration tests.
//!
//! `FakeOci` installs an `oci` shell script on a private PATH. The script
//! keeps account state as marker files in a temp dir, so repeated runs see
//! what earlier runs created, and it appends every invocation to a call log.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const TENANCY: &str = "ocid1.tenancy.oc1..root";

const FAKE_OCI: &str = r#"#!/bin/sh
s="$FAKE_OCI_STATE"
printf '%s\n' "$*" >> "$s/calls.log"
case "$*" in
*"iam region list"*)
  if [ -f "$s/unauthenticated" ]; then
    echo "ConfigFileNotFound: Could not find config file at ~/.oci/config" >&2
    exit 1
  fi
  echo '{"data": [{"key": "IAD", "name": "us-ashburn-1"}]}'
  ;;
*"iam compartment list"*)
  if [ -f "$s/no-root" ]; then
    echo '{"data": [{"id": "ocid1.compartment.oc1..apps", "name": "apps", "compartment-id": "ocid1.tenancy.oc1..root"}]}'
  else
    echo '{"data": [{"id": "ocid1.compartment.oc1..apps", "name": "apps", "compartment-id": "ocid1.tenancy.oc1..root"}, {"id": "ocid1.tenancy.oc1..root", "name": "acme"}]}'
  fi
  ;;
*"iam group list-users"*)
  if [ -f "$s/member" ]; then
    echo '{"data": [{"id": "ocid1.user.oc1..ab", "name": "A B"}]}'
  fi
  ;;
*"iam group list"*)
  if [ -f "$s/group" ]; then
    echo '{"data": [{"id": "ocid1.group.oc1..billing", "name": "billing"}]}'
  fi
  ;;
*"iam group create"*)
  touch "$s/group"
  echo '{"data": {"id": "ocid1.group.oc1..billing", "name": "billing", "lifecycle-state": "ACTIVE"}, "etag": "1"}'
  ;;
*"iam user list"*)
  if [ -f "$s/user" ]; then
    echo '{"data": [{"id": "ocid1.user.oc1..ab", "name": "A B", "email": "a@b.com"}]}'
  fi
  ;;
*"iam user create"*)
  if [ -f "$s/fail-user-create" ]; then
    echo "ServiceError: {\"code\": \"LimitExceeded\", \"status\": 400}" >&2
    exit 1
  fi
  touch "$s/user"
  echo '{"data": {"id": "ocid1.user.oc1..ab", "name": "A B", "email": "a@b.com"}}'
  ;;
*"iam group add-user"*)
  touch "$s/member"
  echo '{"data": {"id": "ocid1.groupmembership.oc1..m", "user-id": "ocid1.user.oc1..ab", "group-id": "ocid1.group.oc1..billing"}}'
  ;;
*"iam policy list"*)
  if [ -f "$s/policy" ]; then
    echo '{"data": [{"id": "ocid1.policy.oc1..p", "name": "BillingCostViewPolicy", "statements": []}]}'
  fi
  ;;
*"iam policy create"*)
  prev=""
  for arg in "$@"; do
    if [ "$prev" = "--statements" ]; then
      printf '%s' "$arg" > "$s/statements.json"
    fi
    prev="$arg"
  done
  touch "$s/policy"
  echo '{"data": {"id": "ocid1.policy.oc1..p", "name": "BillingCostViewPolicy", "statements": []}}'
  ;;
*"usage-api usage-summary request-summarized-usages"*)
  cat "$s/usage.json"
  ;;
*)
  echo "fake oci: unexpected arguments: $*" >&2
  exit 2
  ;;
esac
exit 0
"#;

/// A temp PATH holding a fake `oci` plus the state directory it writes to.
pub struct FakeOci {
    bin_dir: TempDir,
    state_dir: TempDir,
}

impl FakeOci {
    pub fn install() -> Self {
        let bin_dir = tempfile::tempdir().expect("create bin dir");
        let state_dir = tempfile::tempdir().expect("create state dir");
        let script = bin_dir.path().join("oci");
        fs::write(&script, FAKE_OCI).expect("write fake oci");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("chmod fake oci");
        Self { bin_dir, state_dir }
    }

    pub fn state(&self) -> &Path {
        self.state_dir.path()
    }

    /// Create a marker file that switches the script's behavior.
    pub fn mark(&self, name: &str) {
        fs::write(self.state().join(name), b"").expect("write marker");
    }

    pub fn unmark(&self, name: &str) {
        fs::remove_file(self.state().join(name)).expect("remove marker");
    }

    pub fn write_state(&self, name: &str, contents: &str) {
        fs::write(self.state().join(name), contents).expect("write state file");
    }

    /// Invocations so far, one line of space-joined argv per call.
    pub fn calls(&self) -> Vec<String> {
        match fs::read_to_string(self.state().join("calls.log")) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn clear_calls(&self) {
        let _ = fs::remove_file(self.state().join("calls.log"));
    }

    pub fn path_var(&self) -> String {
        format!("{}:/usr/bin:/bin", self.bin_dir.path().display())
    }

    pub fn command(&self, bin: &str) -> Command {
        let mut command = Command::new(bin);
        command
            .env("PATH", self.path_var())
            .env("FAKE_OCI_STATE", self.state())
            .env("RUST_LOG", "info")
            .env("NO_COLOR", "1");
        command
    }
}

/// Run `bin` with an empty PATH so no `oci` can be found.
pub fn run_without_oci(bin: &str, args: &[&str]) -> Output {
    let empty = tempfile::tempdir().expect("create empty dir");
    Command::new(bin)
        .args(args)
        .env("PATH", empty.path())
        .output()
        .expect("run binary")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn temp_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}
