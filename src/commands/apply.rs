use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use console::style;
use dialoguer::Confirm;
use tracing::info;

use super::plan::print_plans;
use super::plan_principals;
use crate::config::Config;
use crate::db::connection::connect_to_database;
use crate::db::error_context::describe;
use crate::grantor::Grantor;
use crate::reconcile::{apply, managed_after};
use crate::state::ManagedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Print the plan; execute nothing and leave the state file alone
    DryRun,
    /// Apply without confirmation
    Force,
    /// Confirm before applying
    Interactive,
}

impl ExecutionMode {
    pub fn detect(dry_run: bool, yes: bool) -> Self {
        if dry_run {
            ExecutionMode::DryRun
        } else if yes || !std::io::stdin().is_terminal() {
            ExecutionMode::Force
        } else {
            ExecutionMode::Interactive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    NoChanges,
    DryRun,
    Cancelled,
}

pub async fn cmd_apply(
    config: &Config,
    root_dir: &Path,
    mode: ExecutionMode,
) -> Result<ApplyOutcome> {
    let pool = connect_to_database(&config.database.url).await?;
    let state_path = root_dir.join(&config.management.state_file);
    let mut state = ManagedState::load(&state_path)?;

    let plans = plan_principals(&pool, config, &state).await?;
    let pending = print_plans(&plans);

    if mode == ExecutionMode::DryRun {
        println!("\n🔍 Dry run: {} statement(s) not executed", pending);
        return Ok(ApplyOutcome::DryRun);
    }

    if pending > 0 && mode == ExecutionMode::Interactive {
        let proceed = Confirm::new()
            .with_prompt(format!("Execute {} statement(s)?", pending))
            .default(false)
            .interact()?;
        if !proceed {
            println!("❌ Cancelled");
            return Ok(ApplyOutcome::Cancelled);
        }
    }

    let grantor = Grantor::new(&pool, config.database.default_schema.as_str());
    for entry in &plans {
        let name = entry.principal.name.as_str();

        if !entry.plan.is_empty() {
            info!("Reconciling {}", name);
            apply(&grantor, name, &entry.plan)
                .await
                .map_err(|e| anyhow!(describe(&e)))
                .with_context(|| format!("Failed to apply grants for {}", name))?;
        }

        // Saved per principal so a later failure keeps earlier progress
        state.set(name, managed_after(&entry.principal.grants));
        state.save(&state_path)?;
    }

    if pending == 0 {
        println!("\n✅ Nothing to apply");
        return Ok(ApplyOutcome::NoChanges);
    }

    println!("\n{} Applied {} statement(s)", style("✅").green(), pending);
    Ok(ApplyOutcome::Applied)
}
