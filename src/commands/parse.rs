use anyhow::{Context, Result};
use console::style;

use crate::privilege::{Privilege, group, parse};

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON for piping to jq
    Json,
}

/// Parse privilege clauses offline and show how they would be granted.
pub fn cmd_parse(clauses: &[String], default_schema: &str, format: ParseFormat) -> Result<()> {
    let mut parsed = Vec::with_capacity(clauses.len());
    for clause in clauses {
        let privilege = parse(clause, default_schema)
            .with_context(|| format!("Cannot parse privilege clause {:?}", clause))?;
        parsed.push(privilege);
    }
    let grouped = group(&parsed);

    match format {
        ParseFormat::Json => {
            let output = serde_json::json!({
                "privileges": parsed,
                "grouped": grouped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        ParseFormat::Text => print_text(&parsed, &grouped),
    }

    Ok(())
}

fn print_text(parsed: &[Privilege], grouped: &[String]) {
    println!("{}", style("Privileges").bold().underlined());
    for privilege in parsed {
        let target = if privilege.identifier.is_empty() {
            String::new()
        } else {
            format!(" {} {}", style("on").dim(), privilege.identifier)
        };
        println!(
            "  {:<10} {}{}",
            style(privilege.privilege_type.as_str()).cyan(),
            privilege.name,
            target
        );
    }

    println!("\n{}", style("Grouped clauses").bold().underlined());
    for clause in grouped {
        println!("  {}", clause);
    }
}
