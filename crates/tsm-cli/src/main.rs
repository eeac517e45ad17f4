//! TSM CLI - entrypoint for the mapping API
//!
//! Wires a resolver backend into the HTTP surface and runs the server.

mod commands;

use clap::{Parser, Subcommand};
use commands::ServeCommand;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "TSM_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(long, default_value = "compact", env = "TSM_LOG_FORMAT", global = true)]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve(ServeCommand),
}

/// Filter used when RUST_LOG is not set: our crates at `level`,
/// noisy dependencies at warn
fn default_filter(level: &str) -> String {
    format!(
        "tsm_cli={level},\
         tsm_api={level},\
         tsm_query={level},\
         tsm_query_postgres={level},\
         tower_http={level},\
         tokio_postgres=warn,\
         deadpool_postgres=warn,\
         h2=warn,\
         tower=warn,\
         hyper=warn",
        level = level
    )
}

fn build_filter(log_level: &str) -> anyhow::Result<EnvFilter> {
    if std::env::var("RUST_LOG").is_ok() {
        // RUST_LOG is set, use it as-is
        EnvFilter::try_from_default_env()
            .map_err(|e| anyhow::anyhow!("Invalid RUST_LOG environment variable: {}", e))
    } else {
        EnvFilter::try_new(default_filter(log_level))
            .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", log_level, e))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = build_filter(&cli.log_level)?;

    let fmt_layer = match cli.log_format.as_str() {
        "full" => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer() // "compact" or any other value
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global default subscriber: {}", e))?;

    match cli.command {
        Commands::Serve(serve_cmd) => serve_cmd.execute(),
    }
}
