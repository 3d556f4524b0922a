//! Extract readable context from database errors raised while reconciling grants

use std::error::Error as _;

use sqlx::postgres::PgDatabaseError;

use crate::error::GrantError;

/// Rich error context extracted from a database error
#[derive(Debug, Clone, Default)]
pub struct SqlErrorContext {
    pub message: String,
    pub detail: Option<String>,
    pub hint: Option<String>,
    /// Database error code (e.g., "42501" for insufficient_privilege)
    pub code: Option<String>,
}

impl SqlErrorContext {
    pub fn from_sqlx_error(error: &sqlx::Error) -> Self {
        if let Some(db_error) = error.as_database_error() {
            if let Some(pg_error) = db_error.try_downcast_ref::<PgDatabaseError>() {
                return Self {
                    message: pg_error.message().to_string(),
                    detail: pg_error.detail().map(|s| s.to_string()),
                    hint: pg_error.hint().map(|s| s.to_string()),
                    code: Some(pg_error.code().to_string()),
                };
            }
            return Self {
                message: db_error.message().to_string(),
                code: db_error.code().map(|c| c.to_string()),
                ..Self::default()
            };
        }

        Self {
            message: error.to_string(),
            ..Self::default()
        }
    }

    /// Format the error for display, naming the statement or read that failed
    pub fn format(&self, operation: &str) -> String {
        let mut msg = format!("Database error while running {}:\n\n  {}", operation, self.message);

        if let Some(code) = &self.code {
            msg.push_str(&format!(" [{}]", code));
        }
        if let Some(detail) = &self.detail {
            msg.push_str(&format!("\n  Detail: {}", detail));
        }
        if let Some(hint) = &self.hint {
            msg.push_str(&format!("\n  Hint: {}", hint));
        }

        msg
    }
}

/// Render a grant engine error for the terminal, expanding database failures.
pub fn describe(error: &GrantError) -> String {
    match error {
        GrantError::Execution { statement, source } => {
            SqlErrorContext::from_sqlx_error(source).format(&format!("{:?}", statement))
        }
        GrantError::Query { context, source } => {
            SqlErrorContext::from_sqlx_error(source).format(context)
        }
        other => match other.source() {
            Some(source) => format!("{}: {}", other, source),
            None => other.to_string(),
        },
    }
}
