//! Declarative reconciliation of database privilege and role grants.
//!
//! Privilege clauses such as `SELECT ON SCHEMA SALES` are parsed into typed
//! [`privilege::Privilege`] values, grouped into one statement per target and
//! granted or revoked through a [`db::StatementExecutor`]. The [`reconcile`]
//! module ties this to catalog observations and the management policy.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod constants;
pub mod db;
pub mod diff;
pub mod error;
pub mod grantor;
pub mod policy;
pub mod privilege;
pub mod reconcile;
pub mod render;
pub mod state;

pub use error::{GrantError, Result};
