//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docrelay_shared::{AppConfig, HandlerConfig, init_config, load_config};
use tracing::info;

use crate::server;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docrelay — relay PDF uploads through knowledge-base refresh and agent extraction.
#[derive(Parser)]
#[command(
    name = "docrelay",
    version,
    about = "React to object-storage PDF uploads: refresh the knowledge base, \
             extract details via the configured agent, write the result back.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Start the HTTP invoke surface (POST /call, GET /health).
    Serve {
        /// Bind address (overrides config).
        #[arg(long)]
        bind: Option<String>,

        /// Listen port (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a single invocation from a payload file (or stdin) and print the response.
    Invoke {
        /// Path to the notification JSON; reads stdin when omitted.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docrelay=info",
        1 => "docrelay=debug",
        _ => "docrelay=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { bind, port } => cmd_serve(bind.as_deref(), port).await,
        Command::Invoke { file } => cmd_invoke(file.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_serve(bind: Option<&str>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;

    let bind = bind.unwrap_or(&config.server.bind);
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .map_err(|e| eyre!("invalid bind address '{bind}:{port}': {e}"))?;

    let handler_config = Arc::new(HandlerConfig::resolve(&config));

    info!(%addr, region = %handler_config.region, "starting invoke surface");
    server::serve(addr, handler_config).await
}

async fn cmd_invoke(file: Option<&std::path::Path>) -> Result<()> {
    let config = load_config()?;
    let handler_config = HandlerConfig::resolve(&config);

    let bytes = match file {
        Some(path) => std::fs::read(path)
            .map_err(|e| eyre!("cannot read payload '{}': {e}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| eyre!("cannot read stdin: {e}"))?;
            buf
        }
    };

    // An empty payload is a missing body, not an empty JSON document.
    let body = if bytes.is_empty() {
        None
    } else {
        Some(bytes.as_slice())
    };

    let response = docrelay_handler::handle(&handler_config, body).await;
    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
