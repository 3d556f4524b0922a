pub mod apply;
pub mod parse;
pub mod plan;

// Re-export all command functions
pub use apply::{ApplyOutcome, ExecutionMode, cmd_apply};
pub use parse::{ParseFormat, cmd_parse};
pub use plan::cmd_plan;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::catalog::{
    GranteeType, RoleObservation, UserObservation, catalog_ident, observe_role, observe_user,
};
use crate::config::{Config, PrincipalSpec};
use crate::db::error_context::describe;
use crate::db::{DryRunExecutor, StatementExecutor};
use crate::grantor::Grantor;
use crate::reconcile::{self, GrantPlan};
use crate::state::ManagedState;

enum Observed {
    User(UserObservation),
    Role(RoleObservation),
}

/// The pending changes for one configured principal.
pub struct PrincipalPlan {
    pub principal: PrincipalSpec,
    pub plan: GrantPlan,
    /// Statements the plan issues, in execution order.
    pub statements: Vec<String>,
}

/// Observe every configured principal and compute its plan. Statements are
/// rendered through a dry run so they match what `apply` executes.
pub async fn plan_principals<E: StatementExecutor + ?Sized>(
    executor: &E,
    config: &Config,
    state: &ManagedState,
) -> Result<Vec<PrincipalPlan>> {
    let default_schema = config.database.default_schema.as_str();
    let policy = config.management.policy;
    let mut plans = Vec::with_capacity(config.principals.len());

    for principal in &config.principals {
        let name = principal.name.as_str();
        let previous = state.get(name);
        reconcile::check_declarations(&principal.grants.privileges, default_schema);

        // A user's implicit default grant is on its own schema, not the connecting user's
        let plan = match observe(executor, principal).await? {
            Observed::User(user) => {
                let own_schema = catalog_ident(&user.name);
                reconcile::plan(&principal.grants, &user, previous, policy, &own_schema)
            }
            Observed::Role(role) => {
                reconcile::plan(&principal.grants, &role, previous, policy, default_schema)
            }
        };

        let dry_run = DryRunExecutor::new(executor);
        let grantor = Grantor::new(&dry_run, default_schema);
        reconcile::apply(&grantor, name, &plan)
            .await
            .map_err(|e| anyhow!(describe(&e)))
            .with_context(|| format!("Failed to plan grants for {}", name))?;

        let statements = dry_run.take();
        debug!("{} statement(s) pending for {}", statements.len(), name);
        plans.push(PrincipalPlan {
            principal: principal.clone(),
            plan,
            statements,
        });
    }

    Ok(plans)
}

async fn observe<E: StatementExecutor + ?Sized>(
    executor: &E,
    principal: &PrincipalSpec,
) -> Result<Observed> {
    let name = principal.name.as_str();
    let observed = match principal.grantee_type {
        GranteeType::User => observe_user(executor, name)
            .await
            .map_err(|e| anyhow!(describe(&e)))?
            .map(Observed::User),
        GranteeType::Role => observe_role(executor, name)
            .await
            .map_err(|e| anyhow!(describe(&e)))?
            .map(Observed::Role),
    };

    observed.ok_or_else(|| {
        anyhow!(
            "{} {} does not exist; create it before managing its grants",
            principal.grantee_type.to_string().to_lowercase(),
            name
        )
    })
}
