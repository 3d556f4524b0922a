//! Decide which observed privileges the reconciler is responsible for

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::PrivilegeObservation;
use crate::error::{GrantError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagementPolicy {
    /// Every privilege present on the grantee is managed; anything undeclared is revoked.
    Strict,
    /// Only privileges that are declared, or were managed on the previous pass, are managed.
    #[default]
    Lax,
}

impl ManagementPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagementPolicy::Strict => "strict",
            ManagementPolicy::Lax => "lax",
        }
    }
}

impl fmt::Display for ManagementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManagementPolicy {
    type Err = GrantError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(ManagementPolicy::Strict),
            "lax" => Ok(ManagementPolicy::Lax),
            other => Err(GrantError::UnknownPolicy(other.to_string())),
        }
    }
}

/// The privilege the database grants every new principal on its own schema.
pub fn default_privilege(schema: &str) -> String {
    format!("CREATE ANY ON SCHEMA {}", schema)
}

/// Narrow an observation to the privileges under management.
///
/// Fails with `UnknownPolicy` for a policy other than `strict` or `lax`, and with
/// `NilObservation` when there is nothing to filter.
pub fn filter<O: PrivilegeObservation>(
    observed: Option<&O>,
    desired: &[String],
    previous: &[String],
    policy: &str,
    default_schema: &str,
) -> Result<O> {
    let policy: ManagementPolicy = policy.parse()?;
    let observed = observed.ok_or(GrantError::NilObservation)?;
    Ok(apply_policy(observed, desired, previous, policy, default_schema))
}

/// [`filter`] for an already validated policy and a present observation.
///
/// Under `lax` the managed privileges are the observed ones that are declared or
/// were previously managed, never including the default schema privilege. The
/// comparison is exact, so the default privilege is only excluded when
/// `default_schema` is spelled the way the catalog reports it.
pub fn apply_policy<O: PrivilegeObservation>(
    observed: &O,
    desired: &[String],
    previous: &[String],
    policy: ManagementPolicy,
    default_schema: &str,
) -> O {
    match policy {
        ManagementPolicy::Strict => observed.clone(),
        ManagementPolicy::Lax => {
            let implicit = default_privilege(default_schema);
            let managed: Vec<String> = observed
                .privileges()
                .iter()
                .filter(|p| **p != implicit)
                .filter(|p| desired.contains(p) || previous.contains(p))
                .cloned()
                .collect();

            debug!(
                "Lax policy manages {} of {} observed privilege(s)",
                managed.len(),
                observed.privileges().len()
            );
            observed.clone().with_privileges(managed)
        }
    }
}
