//! Statement execution seam between the grant engine and a database connection

use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::error::GrantError;

/// One result row from a catalog read: nullable text columns in select order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow(Vec<Option<String>>);

impl CatalogRow {
    pub fn new(columns: Vec<Option<String>>) -> Self {
        Self(columns)
    }

    /// Build a row from column values; `None` is a NULL column.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self(values.into_iter().map(|v| v.map(Into::into)).collect())
    }

    /// Column value at `idx`. NULL, empty and out-of-range columns all read as `None`.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0
            .get(idx)
            .and_then(|column| column.as_deref())
            .filter(|value| !value.is_empty())
    }

    pub fn require(&self, idx: usize, context: &str) -> Result<&str, GrantError> {
        self.get(idx).ok_or_else(|| GrantError::MalformedRow {
            context: context.to_string(),
            column: idx,
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Executes DDL and catalog reads for the grant engine.
///
/// Catalog statements use `?` positional placeholders. Dropping a returned future
/// cancels the statement; implementations add no timeouts of their own.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Execute a statement that returns no rows.
    async fn exec(&self, statement: &str) -> Result<(), sqlx::Error>;

    /// Run a catalog read, binding `args` to the statement's placeholders in order.
    async fn query(&self, statement: &str, args: &[&str]) -> Result<Vec<CatalogRow>, sqlx::Error>;
}

#[async_trait]
impl StatementExecutor for PgPool {
    async fn exec(&self, statement: &str) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(statement).execute(self).await?;
        Ok(())
    }

    async fn query(&self, statement: &str, args: &[&str]) -> Result<Vec<CatalogRow>, sqlx::Error> {
        let sql = number_placeholders(statement);
        let mut query = sqlx::query(&sql);
        for arg in args {
            query = query.bind(*arg);
        }

        let rows = query.fetch_all(self).await?;
        rows.iter()
            .map(|row| {
                (0..row.len())
                    .map(|idx| row.try_get::<Option<String>, _>(idx))
                    .collect::<Result<Vec<_>, _>>()
                    .map(CatalogRow::new)
            })
            .collect()
    }
}

/// Forwards catalog reads to `inner` and records DDL instead of executing it.
pub struct DryRunExecutor<'a, E: ?Sized> {
    inner: &'a E,
    recorded: Mutex<Vec<String>>,
}

impl<'a, E: StatementExecutor + ?Sized> DryRunExecutor<'a, E> {
    pub fn new(inner: &'a E) -> Self {
        Self {
            inner,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Statements that would have been executed, in order.
    pub fn recorded(&self) -> Vec<String> {
        self.recorded
            .lock()
            .map(|statements| statements.clone())
            .unwrap_or_default()
    }

    /// Drain the recorded statements.
    pub fn take(&self) -> Vec<String> {
        self.recorded
            .lock()
            .map(|mut statements| std::mem::take(&mut *statements))
            .unwrap_or_default()
    }
}

#[async_trait]
impl<E: StatementExecutor + ?Sized> StatementExecutor for DryRunExecutor<'_, E> {
    async fn exec(&self, statement: &str) -> Result<(), sqlx::Error> {
        debug!("Dry run, not executing: {}", statement);
        if let Ok(mut statements) = self.recorded.lock() {
            statements.push(statement.to_string());
        }
        Ok(())
    }

    async fn query(&self, statement: &str, args: &[&str]) -> Result<Vec<CatalogRow>, sqlx::Error> {
        self.inner.query(statement, args).await
    }
}

/// Rewrite `?` placeholders to PostgreSQL's `$1, $2, ...`, leaving string literals
/// and quoted identifiers untouched.
pub fn number_placeholders(statement: &str) -> String {
    let mut out = String::with_capacity(statement.len() + 8);
    let mut next = 1;
    let mut in_literal = false;
    let mut in_ident = false;

    for c in statement.chars() {
        match c {
            '\'' if !in_ident => {
                in_literal = !in_literal;
                out.push(c);
            }
            '"' if !in_literal => {
                in_ident = !in_ident;
                out.push(c);
            }
            '?' if !in_literal && !in_ident => {
                out.push('$');
                out.push_str(&next.to_string());
                next += 1;
            }
            _ => out.push(c),
        }
    }

    out
}
