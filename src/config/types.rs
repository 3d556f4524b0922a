use clap::Args;
use serde::{Deserialize, Serialize};

use crate::catalog::GranteeType;
use crate::policy::ManagementPolicy;
use crate::reconcile::DesiredGrants;

/// Raw configuration input - all fields Optional for merging
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigInput {
    pub database: Option<DatabaseInput>,
    pub management: Option<ManagementInput>,
    pub principals: Option<Vec<PrincipalSpec>>,
}

/// Resolved configuration with all defaults applied
#[derive(Debug, Clone)]
pub struct Config {
    pub database: Database,
    pub management: Management,
    pub principals: Vec<PrincipalSpec>,
}

// Database configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseInput {
    pub url: Option<String>,
    pub default_schema: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    /// Schema for unqualified object privileges and the grantor's own schema.
    pub default_schema: String,
}

// Management configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ManagementInput {
    pub policy: Option<ManagementPolicy>,
    pub state_file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Management {
    pub policy: ManagementPolicy,
    pub state_file: String,
}

/// A principal and the grants it should hold.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrincipalSpec {
    pub name: String,
    #[serde(rename = "type", default = "default_grantee_type")]
    pub grantee_type: GranteeType,
    #[serde(flatten)]
    pub grants: DesiredGrants,
}

fn default_grantee_type() -> GranteeType {
    GranteeType::User
}

// CLI argument groups for command-specific options
#[derive(Debug, Clone, Default, Args)]
pub struct DatabaseArgs {
    #[arg(long, help = "Database URL (defaults to DATABASE_URL)")]
    pub database_url: Option<String>,

    #[arg(long, help = "Default schema for unqualified object privileges")]
    pub default_schema: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ManagementArgs {
    #[arg(long, help = "Management policy: strict or lax")]
    pub policy: Option<ManagementPolicy>,

    #[arg(long, help = "Path of the managed state file")]
    pub state_file: Option<String>,
}

// Conversion functions from CLI args to config input
impl From<DatabaseArgs> for DatabaseInput {
    fn from(args: DatabaseArgs) -> Self {
        Self {
            url: args.database_url,
            default_schema: args.default_schema,
        }
    }
}

impl From<ManagementArgs> for ManagementInput {
    fn from(args: ManagementArgs) -> Self {
        Self {
            policy: args.policy,
            state_file: args.state_file,
        }
    }
}
