//! Error taxonomy for the grant engine
//!
//! Parse and policy errors are permanent and caused by user input. `NilObservation`
//! is a programmer error. Execution and query errors wrap the underlying driver error
//! together with the statement or catalog read that failed; nothing here is retried.

use thiserror::Error;

pub type Result<T, E = GrantError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GrantError {
    #[error("unknown privilege: {0:?}")]
    UnknownPrivilege(String),

    #[error("unknown management policy: {0:?} (expected \"strict\" or \"lax\")")]
    UnknownPolicy(String),

    #[error("observation is missing; cannot filter managed privileges")]
    NilObservation,

    #[error("failed to execute {statement:?}")]
    Execution {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to read {context}")]
    Query {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("malformed catalog row from {context}: column {column} is missing or NULL")]
    MalformedRow { context: String, column: usize },
}

impl GrantError {
    /// Whether the error was caused by user-authored input and will not go away on retry.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            GrantError::UnknownPrivilege(_) | GrantError::UnknownPolicy(_)
        )
    }
}
