//! biolink entry point.
//!
//! ```text
//! biolink                          Connect using biolink.toml / defaults
//! biolink --server <ip> --port <p> --api-key <key>
//! biolink --verbose                Print every incoming message
//! biolink --gen-config             Dump default config and exit
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use biolink_core::{CloseReason, SessionController, TcpConnector};

use biolink_client::config::ClientConfig;
use biolink_client::display::TerminalDisplay;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "biolink", about = "Live biometric metrics from a streaming server")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "biolink.toml")]
    config: PathBuf,

    /// Server IP (overrides config).
    #[arg(short, long)]
    server: Option<String>,

    /// Server port (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// API key (overrides config).
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Print every incoming message instead of the metric line.
    #[arg(short, long)]
    verbose: bool,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&ClientConfig::default())?;
        println!("{text}");
        return Ok(ExitCode::SUCCESS);
    }

    let (mut config, source) = ClientConfig::load(&cli.config);
    if let Some(ip) = cli.server {
        config.network.server_ip = ip;
    }
    if let Some(port) = cli.port {
        config.network.server_port = port;
    }
    if let Some(key) = cli.api_key {
        config.auth.api_key = key;
    }
    config.display.verbose |= cli.verbose;

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("biolink v{}", env!("CARGO_PKG_VERSION"));
    source.log(&cli.config);

    if config.auth.api_key.is_empty() {
        error!("no API key configured; set [auth] api_key or pass --api-key");
        return Ok(ExitCode::FAILURE);
    }

    let mut display = TerminalDisplay::stdout(config.display.verbose);
    if !display.is_verbose() {
        display.print_snapshot(&Default::default());
    }

    let mut connector = TcpConnector::new();
    if let Some(limit) = config.connect_timeout() {
        connector = connector.with_timeout(limit);
    }
    let mut session = SessionController::new(config.to_session_config(), connector, display);

    // Ctrl-C drops the session future, and with it the socket.
    let outcome = tokio::select! {
        outcome = session.run() => outcome,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
            return Ok(ExitCode::SUCCESS);
        }
    };
    info!("last values: {}", session.snapshot());

    match outcome {
        Ok(report) => match report.close {
            CloseReason::EndOfStream => {
                info!(messages = report.messages, "done");
                Ok(ExitCode::SUCCESS)
            }
            CloseReason::Error(e) => {
                warn!(messages = report.messages, "session ended abnormally: {e}");
                Ok(ExitCode::FAILURE)
            }
        },
        Err(e) => {
            error!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
