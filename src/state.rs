//! Persisted record of which privileges each principal had under management
//! after the last successful apply.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ManagedState {
    principals: BTreeMap<String, Vec<String>>,
}

impl ManagedState {
    /// Load state from `path`. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No state file at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = serde_yaml::to_string(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write state file {}", path.display()))?;
        debug!("Saved managed state to {}", path.display());
        Ok(())
    }

    /// Privileges managed for `principal` on the previous pass.
    pub fn get(&self, principal: &str) -> &[String] {
        self.principals
            .get(principal)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn set(&mut self, principal: impl Into<String>, managed: Vec<String>) {
        self.principals.insert(principal.into(), managed);
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}
