//! CLI for feedhub
//!
//! Subcommands:
//! - `serve`: open the message log and run the WebSocket server

use std::sync::Arc;

use clap::Parser;
use feedhub::broadcast::ChannelSink;
use feedhub::config::{Settings, load_config};
use feedhub::persistence::SledStore;
use feedhub::transport::websocket::start_websocket_server;
use feedhub::utils::logging;
use feedhub::{MessageService, SubscriberRegistry};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "feedhub")]
enum Command {
    /// Start the WebSocket server
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured bind port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cmd = Command::parse();

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init(&Settings::default().logging);
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    logging::init(&config.logging);

    match cmd {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Err(e) = run_server(config).await {
                error!("Server failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

async fn run_server(config: Settings) -> feedhub::Result<()> {
    let store = SledStore::open(&config.store.path, &config.store.log_key)?;
    let sink = ChannelSink::new(config.broadcast.capacity);
    let registry = SubscriberRegistry::new(config.registry.queue_capacity);
    let service = MessageService::new(Arc::new(store), Arc::new(sink), registry);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let shutdown = CancellationToken::new();

    tokio::select! {
        res = start_websocket_server(addr, service, shutdown.clone()) => {
            res?;
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
            shutdown.cancel();
        }
    }

    Ok(())
}
