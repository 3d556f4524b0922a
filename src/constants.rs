// Configuration file name
pub const CONFIG_FILENAME: &str = "grantsync.yaml";

// Where managed privileges are remembered between runs
pub const DEFAULT_STATE_FILE: &str = ".grantsync/state.yaml";
