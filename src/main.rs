//! Edge forwarder
//!
//! Publishes a single backend origin under a fixed mount path.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────────┐
//!                        │                 EDGE FORWARDER                 │
//!                        │                                                │
//!   Client Request       │  ┌─────────┐    ┌───────────┐    ┌───────────┐ │
//!   ─────────────────────┼─▶│  http   │───▶│ forwarder │───▶│  reqwest  │─┼──▶ Backend
//!                        │  │ server  │    │ rewrite + │    │  client   │ │
//!   Function event       │  └─────────┘    │ sanitize  │    └─────┬─────┘ │
//!   ─────────────────────┼─▶ invoke ──────▶│           │          │       │
//!                        │                 └─────▲─────┘          │       │
//!   Client Response      │  ┌─────────┐          │   classify +   │       │
//!   ◀────────────────────┼──│response │◀─────────┴── encode ◀─────┘       │
//!                        │  └─────────┘                                   │
//!                        └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use edge_forwarder::config::loader;
use edge_forwarder::forwarder::Forwarder;
use edge_forwarder::invoke;
use edge_forwarder::lifecycle::{signals, startup, Shutdown};
use edge_forwarder::observability::logging;

#[derive(Parser)]
#[command(name = "edge-forwarder")]
#[command(about = "Forward requests under a fixed mount path to one backend origin", long_about = None)]
struct Cli {
    /// TOML configuration file. BACKEND_URL always overrides backend.base_url.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve HTTP traffic (default)
    Serve {
        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Forward one function event (JSON) and print the response JSON
    Invoke {
        /// Event file; stdin when omitted or "-"
        #[arg(short, long)]
        event: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match loader::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(error = %e, "Configuration rejected");
            return Err(e.into());
        }
    };
    logging::init(&config.observability.log_level);

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.listener.bind_address = bind;
            }

            tracing::info!("edge-forwarder v{} starting", env!("CARGO_PKG_VERSION"));
            tracing::info!(
                bind_address = %config.listener.bind_address,
                max_body_size = config.listener.max_body_size,
                request_timeout_secs = ?config.timeouts.request_secs,
                "Configuration loaded"
            );

            let shutdown = Arc::new(Shutdown::new());
            signals::spawn_signal_listener(shutdown.clone());
            startup::serve(config, &shutdown).await?;

            tracing::info!("Shutdown complete");
        }
        Commands::Invoke { event } => {
            let forwarder = Forwarder::new(config.backend.clone(), &config.timeouts)?;
            let event = invoke::read_event(event.as_deref())?;
            println!("{}", invoke::invoke(&forwarder, &event).await?);
        }
    }

    Ok(())
}
