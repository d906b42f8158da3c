#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use room_relay_server::server::RelayServer;
use room_relay_server::{config, logging, websocket};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Room Relay -- lightweight WebSocket relay for room-based message fan-out
#[derive(Parser, Debug)]
#[command(name = "room-relay-server")]
#[command(about = "An in-memory WebSocket relay that multiplexes clients into named rooms")]
#[command(version)]
struct Cli {
    /// Listen port, overriding the configured value.
    #[arg(long, short = 'p', env = "ROOM_RELAY_PORT")]
    port: Option<u16>,

    /// Validate configuration and exit without starting the relay.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from config.json / env if present; defaults otherwise.
    let mut cfg = config::load();
    if let Some(port) = cli.port {
        cfg.port = port;
    }

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let validation_result = config::validate_config(&cfg);

    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Port: {}", cfg.port);
                println!("  Max message size: {} bytes", cfg.server.max_message_size);
                println!(
                    "  Outbound queue capacity: {}",
                    cfg.server.outbound_queue_capacity
                );
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    validation_result.map_err(|e| anyhow::anyhow!("invalid configuration:\n{e}"))?;

    logging::init_with_config(&cfg.logging);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(%addr, "Starting room relay");

    let server = Arc::new(RelayServer::new(cfg.server.clone()));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("SIGINT received, shutting down"),
            Err(err) => tracing::error!(error = %err, "Failed to listen for shutdown signal"),
        }
        signal_token.cancel();
    });

    websocket::serve(listener, server, shutdown).await?;

    Ok(())
}
