//! Gyro-Pointer server — entry point.
//!
//! This binary turns a phone into an air mouse for the machine it runs on:
//!
//! 1. It binds one TCP listener (default `0.0.0.0:3000`).
//! 2. A browser on the desktop fetches `http://<ip>:3000/qrcode` and shows a
//!    QR code encoding `ws://<ip>:3000`.
//! 3. The phone scans the code, opens a WebSocket to that URI, and streams
//!    gyroscope readings.
//! 4. Every reading nudges the real OS cursor.
//!
//! # Usage
//!
//! ```text
//! gyro-server [OPTIONS]
//!
//! Options:
//!   --port <PORT>   Listener port [default: 3000]
//!   --bind <ADDR>   Bind address  [default: 0.0.0.0]
//! ```
//!
//! Running with no options reproduces the canonical setup: all interfaces,
//! port 3000.  The defaults can also be overridden with environment
//! variables (`GYRO_PORT`, `GYRO_BIND`); CLI args take precedence.
//!
//! # Architecture overview
//!
//! ```text
//! Phone (JSON over WebSocket)        Browser (GET /qrcode)
//!       ↕                                  ↕
//! gyro-server  ← this process, one listener for both
//!   domain/          ServerConfig
//!   application/     MotionBridge, QR publishing
//!   infrastructure/  ws_server, pointer backends, IP probe
//!       ↓
//! OS cursor (absolute moves + clicks)
//! ```

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gyro_server::application::motion_bridge::PointerController;
use gyro_server::application::publish_address::connection_uri;
use gyro_server::domain::ServerConfig;
use gyro_server::infrastructure::net::outbound_local_ip;
use gyro_server::infrastructure::pointer::SystemPointer;
use gyro_server::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Gyro-Pointer server.
///
/// Serves a connection QR code over HTTP and turns a phone's gyroscope
/// stream into desktop cursor movement.
#[derive(Debug, Parser)]
#[command(
    name = "gyro-server",
    about = "Phone-gyroscope to desktop-pointer bridge",
    version
)]
struct Cli {
    /// TCP port for the shared HTTP + WebSocket listener.
    ///
    /// This port appears in the QR code's `ws://` URI, so phones must be able
    /// to reach it over the LAN.
    #[arg(long, default_value_t = 3000, env = "GYRO_PORT")]
    port: u16,

    /// IP address to bind the listener to.
    ///
    /// Use `0.0.0.0` to accept connections from any interface (required for
    /// phones on the LAN), or `127.0.0.1` for local-only testing.
    #[arg(long, default_value = "0.0.0.0", env = "GYRO_BIND")]
    bind: String,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not a valid IP address.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.bind, self.port))?;

        Ok(ServerConfig { bind_addr })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log level comes from RUST_LOG (e.g. RUST_LOG=debug); default to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.into_server_config()?;

    // Announce where to point the phone.  The same discovery runs again per
    // /qrcode request, so a DHCP lease change just needs a page refresh.
    let ip = outbound_local_ip();
    info!(
        "Gyro-Pointer starting — open http://{ip}:{port}/qrcode and scan, or connect to {uri}",
        port = config.advertised_port(),
        uri = connection_uri(ip, config.advertised_port()),
    );

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C — initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // ── Main server loop ──────────────────────────────────────────────────────
    let pointer: Arc<dyn PointerController> = Arc::new(SystemPointer::new());
    run_server(config, running, pointer).await?;

    info!("Gyro-Pointer stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
