use std::future::Future;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use grantsync::commands::{self, ApplyOutcome, ExecutionMode};
use grantsync::config;
use grantsync::constants::CONFIG_FILENAME;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config_file: String,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct ParseArgs {
    /// Privilege clauses, e.g. "SELECT ON SCHEMA SALES"
    #[arg(required = true)]
    clauses: Vec<String>,

    /// Schema used to qualify unqualified object privileges
    #[arg(long, default_value = "SYSTEM")]
    default_schema: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: commands::ParseFormat,
}

#[derive(Parser)]
struct PlanArgs {
    #[command(flatten)]
    database_args: config::DatabaseArgs,

    #[command(flatten)]
    management_args: config::ManagementArgs,
}

#[derive(Parser)]
struct ApplyArgs {
    /// Show what would be applied without making any changes
    #[arg(long, conflicts_with = "yes")]
    dry_run: bool,

    /// Apply without a confirmation prompt
    #[arg(long, short = 'y')]
    yes: bool,

    #[command(flatten)]
    database_args: config::DatabaseArgs,

    #[command(flatten)]
    management_args: config::ManagementArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse privilege clauses offline and show the grouped grants
    Parse(ParseArgs),

    /// Show the statements needed to reconcile configured principals
    Plan(PlanArgs),

    /// Reconcile configured principals against the database
    Apply(ApplyArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    initialize_logging(&cli);

    run_until_shutdown(run_main(cli), wait_for_shutdown_signal()).await
}

/// Drive `work` until it finishes or `shutdown` fires. An interrupted run is an
/// error, since statements executed before the signal stay applied.
async fn run_until_shutdown<W, S>(work: W, shutdown: S) -> Result<()>
where
    W: Future<Output = Result<()>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        result = work => result,
        _ = shutdown => {
            info!("Received shutdown signal, cancelling in-flight statements");
            Err(anyhow!(
                "Interrupted; statements executed before the signal remain applied"
            ))
        }
    }
}

async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn resolve_config(
    config_file: &str,
    database_args: &config::DatabaseArgs,
    management_args: &config::ManagementArgs,
) -> Result<(config::Config, std::path::PathBuf)> {
    let (file_config, root_dir) = config::load_config(config_file)?;

    let cli_config = config::ConfigInput {
        database: Some(database_args.clone().into()),
        management: Some(management_args.clone().into()),
        principals: None,
    };

    let config = config::ConfigBuilder::new()
        .with_file(file_config)
        .with_cli_args(cli_config)
        .resolve()?;

    Ok((config, root_dir))
}

async fn run_main(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Parse(args) => commands::cmd_parse(&args.clauses, &args.default_schema, args.format),
        Commands::Plan(args) => {
            let (config, root_dir) =
                resolve_config(&cli.config_file, &args.database_args, &args.management_args)?;

            info!(
                "Planning {} principal(s) under {} policy",
                config.principals.len(),
                config.management.policy
            );
            commands::cmd_plan(&config, &root_dir).await
        }
        Commands::Apply(args) => {
            let (config, root_dir) =
                resolve_config(&cli.config_file, &args.database_args, &args.management_args)?;

            let mode = ExecutionMode::detect(args.dry_run, args.yes);
            info!(
                "Applying grants for {} principal(s) under {} policy",
                config.principals.len(),
                config.management.policy
            );

            match commands::cmd_apply(&config, &root_dir, mode).await? {
                ApplyOutcome::Cancelled => std::process::exit(1),
                _ => Ok(()),
            }
        }
    }
}
