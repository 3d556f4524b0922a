/// End-to-end tests that run the `grantsync` binary
pub mod config_errors;
pub mod parse;
