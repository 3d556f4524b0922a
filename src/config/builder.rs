use crate::config::{merge::Merge, types::*};
use crate::db::connection::connecting_user;
use anyhow::{Context, Result, anyhow};
use std::collections::BTreeSet;
use tracing::warn;

pub struct ConfigBuilder {
    config_input: ConfigInput,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_input: ConfigInput::default(),
        }
    }

    pub fn with_file(mut self, file_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(file_input);
        self
    }

    pub fn with_cli_args(mut self, cli_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(cli_input);
        self
    }

    pub fn resolve(self) -> Result<Config> {
        let defaults = Management::default();

        Ok(Config {
            database: self.resolve_database()?,
            management: self.resolve_management(&defaults),
            principals: self.resolve_principals(),
        })
    }

    fn resolve_database(&self) -> Result<Database> {
        let db_input = self.config_input.database.as_ref();

        let url = db_input
            .and_then(|d| d.url.as_ref())
            .cloned()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .ok_or_else(|| {
                anyhow!("No database URL configured. Set database.url, --database-url or DATABASE_URL")
            })?;

        // Unquoted user names are stored upper case, and so is the user's own schema
        let default_schema = match db_input.and_then(|d| d.default_schema.as_ref()) {
            Some(schema) => schema.clone(),
            None => connecting_user(&url)
                .context("Cannot derive a default schema; set database.default_schema")?
                .to_uppercase(),
        };

        Ok(Database {
            url,
            default_schema,
        })
    }

    fn resolve_management(&self, defaults: &Management) -> Management {
        let mgmt_input = self.config_input.management.as_ref();

        Management {
            policy: mgmt_input
                .and_then(|m| m.policy)
                .unwrap_or(defaults.policy),
            state_file: mgmt_input
                .and_then(|m| m.state_file.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.state_file.clone()),
        }
    }

    fn resolve_principals(&self) -> Vec<PrincipalSpec> {
        let principals = self.config_input.principals.clone().unwrap_or_default();

        let mut seen = BTreeSet::new();
        for principal in &principals {
            if !seen.insert(principal.name.as_str()) {
                warn!(
                    "Principal {} is declared more than once; each entry is reconciled in turn",
                    principal.name
                );
            }
        }

        principals
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
