//! Compare a principal's declared grants against what the catalog reports and
//! converge the two.
//!
//! [`plan`] is pure: it narrows the observation with the management policy and
//! diffs privileges, roles and LDAP groups. [`apply`] issues the plan through a
//! [`Grantor`]; run it against a [`crate::db::DryRunExecutor`] to preview the
//! statements without touching the database.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::PrivilegeObservation;
use crate::db::StatementExecutor;
use crate::diff::{Changes, diff};
use crate::error::Result;
use crate::grantor::Grantor;
use crate::policy::{ManagementPolicy, apply_policy, default_privilege};
use crate::privilege::{Privilege, parse};

/// What a principal should hold once reconciled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DesiredGrants {
    #[serde(default)]
    pub privileges: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Only meaningful for roles; ignored for users.
    #[serde(default)]
    pub ldap_groups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantPlan {
    pub privileges: Changes<String>,
    pub roles: Changes<String>,
    pub ldap_groups: Changes<String>,
}

impl GrantPlan {
    pub fn is_empty(&self) -> bool {
        self.privileges.is_empty() && self.roles.is_empty() && self.ldap_groups.is_empty()
    }

    /// Number of individual privileges, roles and groups the plan touches.
    pub fn change_count(&self) -> usize {
        [&self.privileges, &self.roles, &self.ldap_groups]
            .iter()
            .map(|c| c.to_add.len() + c.to_remove.len())
            .sum()
    }
}

/// Outcome of a successful [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub plan: GrantPlan,
    /// Privileges to remember as managed for the next pass.
    pub managed: Vec<String>,
}

/// Diff the desired grants against an observation narrowed by `policy`.
///
/// Under `lax` the default schema privilege is never managed, so a declared
/// default privilege that the principal already holds is not granted again.
pub fn plan<O: PrivilegeObservation>(
    desired: &DesiredGrants,
    observed: &O,
    previous: &[String],
    policy: ManagementPolicy,
    default_schema: &str,
) -> GrantPlan {
    let managed = apply_policy(observed, &desired.privileges, previous, policy, default_schema);
    let mut privileges = diff(&desired.privileges, managed.privileges());

    if policy == ManagementPolicy::Lax {
        let implicit = default_privilege(default_schema);
        if observed.privileges().contains(&implicit) {
            privileges.to_add.retain(|p| *p != implicit);
        }
    }

    let roles = diff(&desired.roles, observed.roles());
    let ldap_groups = observed
        .ldap_groups()
        .map(|current| diff(&desired.ldap_groups, current))
        .unwrap_or_default();

    GrantPlan {
        privileges,
        roles,
        ldap_groups,
    }
}

/// Declared privileges that can never equal an observed one, paired with the
/// clauses the catalog would report instead.
///
/// The catalog reports one privilege per clause with objects schema-qualified,
/// and the diff compares strings exactly, so anything else is granted again on
/// every pass. Unparseable declarations are left to the grantor to reject.
pub fn check_declarations(
    privileges: &[String],
    default_schema: &str,
) -> Vec<(String, Vec<String>)> {
    let mut mismatches = Vec::new();

    for declared in privileges {
        let Ok(privilege) = parse(declared, default_schema) else {
            continue;
        };
        let canonical: Vec<String> = privilege
            .names()
            .map(|name| {
                Privilege::new(privilege.privilege_type, name, privilege.identifier.as_str())
                    .to_string()
            })
            .collect();

        if canonical.len() != 1 || canonical[0] != *declared {
            warn!(
                "Privilege {:?} will never match the catalog; declare it as {:?}",
                declared, canonical
            );
            mismatches.push((declared.clone(), canonical));
        }
    }

    mismatches
}

/// Issue `plan` for `grantee`: privilege revokes, privilege grants, role revokes,
/// role grants, then LDAP group changes. Stops at the first failure.
pub async fn apply<E: StatementExecutor + ?Sized>(
    grantor: &Grantor<'_, E>,
    grantee: &str,
    plan: &GrantPlan,
) -> Result<()> {
    grantor
        .revoke_privileges(grantee, &plan.privileges.to_remove)
        .await?;
    grantor
        .grant_privileges(grantee, &plan.privileges.to_add)
        .await?;
    grantor.revoke_roles(grantee, &plan.roles.to_remove).await?;
    grantor.grant_roles(grantee, &plan.roles.to_add).await?;
    grantor
        .remove_ldap_groups(grantee, &plan.ldap_groups.to_remove)
        .await?;
    grantor
        .add_ldap_groups(grantee, &plan.ldap_groups.to_add)
        .await
}

/// The privileges to record as managed after `desired` has been applied.
pub fn managed_after(desired: &DesiredGrants) -> Vec<String> {
    desired.privileges.clone()
}

/// Plan and apply in one pass.
pub async fn reconcile<E, O>(
    grantor: &Grantor<'_, E>,
    grantee: &str,
    desired: &DesiredGrants,
    observed: &O,
    previous: &[String],
    policy: ManagementPolicy,
) -> Result<Reconciled>
where
    E: StatementExecutor + ?Sized,
    O: PrivilegeObservation,
{
    let plan = plan(desired, observed, previous, policy, grantor.default_schema());

    if plan.is_empty() {
        debug!("{} is up to date", grantee);
    } else {
        info!("Applying {} change(s) to {}", plan.change_count(), grantee);
        apply(grantor, grantee, &plan).await?;
    }

    Ok(Reconciled {
        plan,
        managed: managed_after(desired),
    })
}
