//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! It is constructed from CLI arguments in `main.rs` or from defaults (useful
//! for tests).  Keeping configuration as a plain struct (no global state, no
//! environment-variable reads inside the domain) keeps the server easy to
//! embed in tests.

use std::net::SocketAddr;

/// All runtime configuration for the server.
///
/// Build this once at startup and wrap it in an `Arc` so it can be shared
/// cheaply across connection tasks.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address and port the shared HTTP + WebSocket listener binds to.
    ///
    /// `0.0.0.0` accepts connections from any interface, which is what a
    /// phone on the same LAN needs.  The port is also the one advertised in
    /// the QR code's `ws://` URI.
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// The port clients are told to connect to.  Identical to the bound port:
    /// the QR endpoint and the realtime channel share one listener.
    pub fn advertised_port(&self) -> u16 {
        self.bind_addr.port()
    }
}

impl Default for ServerConfig {
    /// Returns the flagless configuration: all interfaces, port 3000.
    fn default() -> Self {
        Self {
            // Compile-time-known valid socket address string.
            bind_addr: "0.0.0.0:3000".parse().unwrap(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
