use crate::config::types::*;
use crate::constants::DEFAULT_STATE_FILE;
use crate::policy::ManagementPolicy;

impl Default for Management {
    fn default() -> Self {
        Self {
            policy: ManagementPolicy::Lax,
            state_file: DEFAULT_STATE_FILE.to_string(),
        }
    }
}
