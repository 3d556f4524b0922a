pub mod connection;
pub mod error_context;
pub mod executor;
pub mod stub;

pub use executor::{CatalogRow, DryRunExecutor, StatementExecutor};
pub use stub::StubExecutor;
