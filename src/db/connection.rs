use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Mask password in database URL for display
pub fn mask_url_password(url: &str) -> String {
    let Some((protocol, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    // user:pass@host or user@host
    if let Some((user_info, host_and_path)) = rest.split_once('@')
        && let Some((username, _)) = user_info.split_once(':')
    {
        return format!("{}://{}:***@{}", protocol, username, host_and_path);
    }

    url.to_string()
}

/// User name embedded in a connection URL, used as the default schema.
pub fn connecting_user(url: &str) -> Result<String> {
    let options = PgConnectOptions::from_str(url)
        .with_context(|| format!("Invalid database URL: {}", mask_url_password(url)))?;
    Ok(options.get_username().to_string())
}

/// Connect to a database with a 5-second acquire timeout and enriched error messages
pub async fn connect_to_database(url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await
        .with_context(|| format!("Failed to connect to database at {}", mask_url_password(url)))
}
