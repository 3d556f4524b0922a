use std::path::Path;

use anyhow::Result;
use console::style;

use super::{PrincipalPlan, plan_principals};
use crate::config::Config;
use crate::db::connection::connect_to_database;
use crate::state::ManagedState;

/// Show the statements `apply` would run, without changing anything.
pub async fn cmd_plan(config: &Config, root_dir: &Path) -> Result<()> {
    let pool = connect_to_database(&config.database.url).await?;
    let state = ManagedState::load(&root_dir.join(&config.management.state_file))?;

    let plans = plan_principals(&pool, config, &state).await?;
    print_plans(&plans);
    Ok(())
}

/// Print pending statements per principal; returns the total statement count.
pub fn print_plans(plans: &[PrincipalPlan]) -> usize {
    if plans.is_empty() {
        println!("No principals configured");
        return 0;
    }

    let mut total = 0;
    for entry in plans {
        let name = &entry.principal.name;
        if entry.statements.is_empty() {
            println!("✅ {} is up to date", style(name).bold());
            continue;
        }

        let changes = entry.plan.change_count();
        println!(
            "\n📋 {} ({} change{})",
            style(name).bold().underlined(),
            changes,
            if changes == 1 { "" } else { "s" }
        );
        for statement in &entry.statements {
            let line = format!("{};", statement);
            if statement.starts_with("REVOKE") || statement.contains(" DROP LDAP GROUP ") {
                println!("   {}", style(line).red());
            } else {
                println!("   {}", style(line).green());
            }
        }
        total += entry.statements.len();
    }

    total
}
