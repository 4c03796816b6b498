//! Existence-check-then-create reconciler shared by every named resource.
use crate::error::OciError;
use crate::oci::{Group, Policy, User};
use std::fmt;

/// A remote resource identified by name within a compartment.
pub trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl Named for Group {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for User {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Policy {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Group,
    User,
    Policy,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Group => "group",
            ResourceKind::User => "user",
            ResourceKind::Policy => "policy",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`ensure`]: the resource id and whether this run created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ensured {
    pub kind: ResourceKind,
    pub name: String,
    pub id: String,
    pub created: bool,
}

/// Return the id of the resource named `name`, creating it only when the
/// listing has no entry with that exact name. Existing resources are never
/// modified.
pub fn ensure<T, L, C>(kind: ResourceKind, name: &str, list: L, create: C) -> Result<Ensured, OciError>
where
    T: Named,
    L: FnOnce() -> Result<Vec<T>, OciError>,
    C: FnOnce() -> Result<T, OciError>,
{
    let existing = list()?;
    if let Some(found) = existing.iter().find(|resource| resource.name() == name) {
        tracing::info!(kind = %kind, name, id = found.id(), "resource present; skipping create");
        return Ok(Ensured {
            kind,
            name: name.to_string(),
            id: found.id().to_string(),
            created: false,
        });
    }

    tracing::info!(kind = %kind, name, "resource absent; creating");
    let created = create()?;
    tracing::info!(kind = %kind, name, id = created.id(), "resource created");
    Ok(Ensured {
        kind,
        name: name.to_string(),
        id: created.id().to_string(),
        created: true,
    })
}
