//! NameLink CLI
//!
//! Runs the lookup server and offers one-shot lookups from the terminal.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use namelink_api::{ApiConfig, ApiServer, AppState};
use namelink_core::types::{LookupOutcome, MobileNumber};
use namelink_limiter::ClientRateLimiter;
use namelink_provider::{UpstreamClient, UpstreamConfig};
use namelink_store::TursoStore;

/// NameLink - mobile number to subscriber name lookup
#[derive(Parser)]
#[command(name = "namelink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
        /// Bind address (overrides BIND_ADDR)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Resolve one number through the full pipeline
    Lookup {
        /// Mobile number, any common formatting
        number: String,
    },

    /// Show what a raw input normalizes to, without any network call
    Check {
        /// Mobile number, any common formatting
        number: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, bind).await,
        Commands::Lookup { number } => cmd_lookup(&number).await,
        Commands::Check { number } => cmd_check(&number),
    }
}

/// EnvFilter from RUST_LOG with a sane default; LOG_FORMAT=json switches
/// to line-delimited JSON output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        "namelink=debug,info"
    } else {
        "namelink=info,warn"
    };

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()));

    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Run the HTTP server
async fn cmd_serve(port: Option<u16>, bind: Option<String>) -> Result<()> {
    let mut config = ApiConfig::from_env().context("Invalid configuration")?;
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }

    let addr: SocketAddr = config.socket_addr().context("Invalid bind address")?;

    let state = build_state(&config).await?;

    println!("{} {}", "🚀 NameLink listening on".green().bold(), addr);

    ApiServer::new(state)
        .run(addr)
        .await
        .context("Server failed")?;

    Ok(())
}

/// Resolve one number through the full pipeline
async fn cmd_lookup(number: &str) -> Result<()> {
    let config = ApiConfig::from_env().context("Invalid configuration")?;
    let state = build_state(&config).await?;

    println!("{} {}", "🔍 Looking up:".cyan().bold(), number);

    match state.service.lookup("cli", number).await {
        Ok(LookupOutcome::Found { record, from_cache }) => {
            println!("\n{}", "✅ Name found:".green().bold());
            println!("   {} {}", "Mobile:".dimmed(), record.mobile);
            println!("   {} {}", "Name:".yellow(), record.name);
            println!(
                "   {} {}",
                "Source:".dimmed(),
                if from_cache { "cache" } else { "upstream" }
            );
            Ok(())
        }
        Ok(LookupOutcome::NotFound { message }) => {
            println!(
                "\n{} {}",
                "⚠️  No name on file.".yellow(),
                message.unwrap_or_default()
            );
            Ok(())
        }
        Err(err) => {
            println!("{} {}", "❌ Lookup failed:".red().bold(), err.user_message());
            Err(err.into())
        }
    }
}

/// Show the canonical form of a number, offline
fn cmd_check(number: &str) -> Result<()> {
    match MobileNumber::parse(number) {
        Ok(mobile) => {
            println!("{} {}", "✅ Canonical form:".green().bold(), mobile);
            Ok(())
        }
        Err(err) => {
            println!("{} {}", "❌ Invalid:".red().bold(), err);
            Err(err.into())
        }
    }
}

/// Wires the full pipeline: store boot failure is fatal here, before the
/// server accepts any traffic.
async fn build_state(config: &ApiConfig) -> Result<Arc<AppState>> {
    let store = TursoStore::connect(&config.database_url, &config.database_auth_token)
        .await
        .context("Failed to reach the record store")?;

    let limiter = Arc::new(ClientRateLimiter::new());
    spawn_idle_sweep(limiter.clone());

    let provider = UpstreamClient::with_config(UpstreamConfig::new(
        &config.upstream_base_url,
        &config.upstream_auth_token,
    ));

    Ok(Arc::new(AppState::new(
        limiter,
        Arc::new(store),
        Arc::new(provider),
    )))
}

/// Periodically drops rate buckets that have sat idle past their timeout.
fn spawn_idle_sweep(limiter: Arc<ClientRateLimiter>) {
    let period = limiter.config().idle_timeout;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // the first tick fires immediately
        loop {
            ticker.tick().await;
            limiter.sweep_idle();
        }
    });
}
