//! Shared listener: accept loop, HTTP/WebSocket demultiplexing, and the
//! per-connection motion session.
//!
//! This module is responsible for:
//!
//! 1. Binding one TCP listener on the configured address.
//! 2. Accepting incoming connections from phones and browsers alike.
//! 3. Deciding, per connection, whether the peer wants the QR endpoint
//!    (plain HTTP) or the realtime channel (WebSocket upgrade).
//! 4. Serving `GET /qrcode` with a freshly rendered PNG.
//! 5. Running the motion session for upgraded connections: greet once, then
//!    map every incoming event to a pointer operation until the channel
//!    closes.
//! 6. Exiting cleanly when the `running` flag is cleared.
//!
//! # One port, two protocols
//!
//! The QR code advertises `ws://<ip>:<port>` and the browser fetches
//! `http://<ip>:<port>/qrcode` — the same port.  A WebSocket connection *is*
//! an HTTP request until the upgrade completes, so both kinds of peer start
//! by sending an HTTP request head.  `TcpStream::peek` lets us read that head
//! without consuming it: if it carries an `Upgrade: websocket` header the
//! untouched stream is handed to tungstenite for the real handshake;
//! otherwise we answer the request ourselves and close.  No HTTP framework is
//! needed for a single static endpoint.
//!
//! # Scalability
//!
//! Each connection runs in its own Tokio task.  The accept loop never blocks
//! on a session: it accepts, spawns, and immediately accepts again.  Sessions
//! share no mutable state with each other except the OS cursor itself,
//! where last-writer-wins applies.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
    WebSocketStream,
};
use tracing::{debug, error, info, warn};

use gyro_core::protocol::ClientEvent;

use crate::application::motion_bridge::{MotionBridge, PointerButton, PointerController, PointerError};
use crate::application::publish_address::{connection_uri, render_connection_qr};
use crate::domain::config::ServerConfig;
use crate::infrastructure::net::outbound_local_ip;

/// The one HTTP path the server answers.
const QRCODE_PATH: &str = "/qrcode";

/// Upper bound on the request head we are willing to inspect.  Both the
/// browser's `GET /qrcode` and a WebSocket upgrade fit comfortably.
const MAX_HEAD_BYTES: usize = 2048;

// ── Public API ────────────────────────────────────────────────────────────────

/// Runs the accept loop until `running` is set to `false`.
///
/// Binds a TCP listener on `config.bind_addr` and hands each accepted
/// connection to a dedicated Tokio task, so one slow peer never blocks
/// others.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound (port in use, no
/// permission).
pub async fn run_server(
    config: ServerConfig,
    running: Arc<AtomicBool>,
    pointer: Arc<dyn PointerController>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind listener on {}", config.bind_addr))?;

    info!("listening on {}", config.bind_addr);

    let config = Arc::new(config);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // A short timeout on `accept()` lets the loop re-check the `running`
        // flag even when nobody is connecting.
        let accept_result = timeout(Duration::from_millis(200), listener.accept()).await;

        match accept_result {
            Ok(Ok((stream, peer_addr))) => {
                debug!("new connection from {peer_addr}");
                let cfg = Arc::clone(&config);
                let ptr = Arc::clone(&pointer);

                tokio::spawn(async move {
                    handle_connection(stream, peer_addr, cfg, ptr).await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g., out of file descriptors).
                // Log it and keep serving rather than crashing the process.
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout — no new connection; loop back to check the flag.
            }
        }
    }

    Ok(())
}

// ── Per-connection handler ────────────────────────────────────────────────────

/// Top-level handler for a single connection.
///
/// Wraps [`run_connection`] and logs the outcome.  The outer/inner pair lets
/// `run_connection` use `?` freely while errors are reported in one place.
async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<ServerConfig>,
    pointer: Arc<dyn PointerController>,
) {
    match run_connection(stream, peer_addr, config, pointer).await {
        Ok(()) => debug!("connection {peer_addr} closed normally"),
        Err(e) => warn!("connection {peer_addr} closed with error: {e:#}"),
    }
}

/// Routes one connection to the HTTP responder or the motion session.
async fn run_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<ServerConfig>,
    pointer: Arc<dyn PointerController>,
) -> anyhow::Result<()> {
    let head = peek_request_head(&stream).await?;

    match classify_request(&head) {
        RequestKind::Upgrade => run_motion_session(stream, peer_addr, pointer).await,
        RequestKind::Plain { method, path } => {
            serve_http(stream, peer_addr, &method, &path, &config, head.len()).await
        }
        RequestKind::Invalid => {
            warn!("unrecognized request from {peer_addr}; dropping connection");
            Ok(())
        }
    }
}

// ── Request classification ────────────────────────────────────────────────────

/// What a freshly accepted connection turned out to be.
#[derive(Debug, PartialEq, Eq)]
enum RequestKind {
    /// An HTTP request carrying `Upgrade: websocket` — the realtime channel.
    Upgrade,
    /// An ordinary HTTP request to be answered directly.
    Plain { method: String, path: String },
    /// Not HTTP at all (or an empty/garbled head).
    Invalid,
}

/// Peeks the request head off `stream` without consuming it.
///
/// Returns whatever prefix of the head is available once a blank line is
/// seen, the buffer fills up, or the peer stops sending.  The bytes stay in
/// the socket so tungstenite can replay the handshake.
async fn peek_request_head(stream: &TcpStream) -> anyhow::Result<Vec<u8>> {
    let mut buf = vec![0u8; MAX_HEAD_BYTES];
    let mut filled = 0usize;

    for _ in 0..50 {
        let n = stream
            .peek(&mut buf)
            .await
            .context("failed to peek request head")?;

        if n == 0 {
            // Peer closed before sending anything.
            break;
        }
        if head_is_complete(&buf[..n]) || n == buf.len() {
            buf.truncate(n);
            return Ok(buf);
        }
        if n == filled {
            // No progress since the last peek; give the peer a moment.
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        filled = n;
    }

    buf.truncate(filled);
    Ok(buf)
}

/// Returns `true` once the head contains the header-terminating blank line.
fn head_is_complete(head: &[u8]) -> bool {
    head.windows(4).any(|w| w == b"\r\n\r\n")
}

/// Classifies a peeked request head.
///
/// The parse is deliberately shallow: request line plus a case-insensitive
/// scan for the `Upgrade` header.  Anything that does not look like
/// `METHOD /path HTTP/x` is [`RequestKind::Invalid`].
fn classify_request(head: &[u8]) -> RequestKind {
    let text = String::from_utf8_lossy(head);
    let mut lines = text.split("\r\n");

    let request_line = match lines.next() {
        Some(line) if !line.is_empty() => line,
        _ => return RequestKind::Invalid,
    };

    let mut parts = request_line.split_whitespace();
    let method = parts.next();
    let path = parts.next();
    let version = parts.next();

    let (method, path) = match (method, path, version) {
        (Some(m), Some(p), Some(v)) if p.starts_with('/') && v.starts_with("HTTP/") => (m, p),
        _ => return RequestKind::Invalid,
    };

    let wants_upgrade = lines.any(|line| {
        let lower = line.to_ascii_lowercase();
        lower.starts_with("upgrade:") && lower.contains("websocket")
    });

    if wants_upgrade {
        RequestKind::Upgrade
    } else {
        RequestKind::Plain {
            method: method.to_string(),
            path: path.to_string(),
        }
    }
}

// ── HTTP responder ────────────────────────────────────────────────────────────

/// Answers a plain HTTP request and closes the connection.
///
/// `GET /qrcode` renders the connection QR for the currently discovered
/// outbound IP; everything else is a 404.  A rendering failure becomes a
/// plain 500; the server keeps running.
async fn serve_http(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    method: &str,
    path: &str,
    config: &ServerConfig,
    head_len: usize,
) -> anyhow::Result<()> {
    // Consume the head bytes that were only peeked so far.  The response
    // does not depend on them, so a short read is not fatal.
    let mut head = vec![0u8; head_len];
    let _ = stream.read_exact(&mut head).await;

    let response = match (method, path) {
        ("GET", QRCODE_PATH) => {
            let ip = outbound_local_ip();
            let uri = connection_uri(ip, config.advertised_port());
            info!("serving connection QR for {uri} to {peer_addr}");

            match render_connection_qr(&uri) {
                Ok(png) => http_response("200 OK", "image/png", &png),
                Err(e) => {
                    error!("QR rendering failed: {e}");
                    http_response(
                        "500 Internal Server Error",
                        "text/plain",
                        b"QR rendering failed\n",
                    )
                }
            }
        }
        _ => {
            debug!("{peer_addr} requested unknown resource {method} {path}");
            http_response("404 Not Found", "text/plain", b"not found\n")
        }
    };

    stream
        .write_all(&response)
        .await
        .with_context(|| format!("failed to write HTTP response to {peer_addr}"))?;
    let _ = stream.shutdown().await;
    Ok(())
}

/// Serializes a minimal HTTP/1.1 response.
fn http_response(status: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

// ── Motion session ────────────────────────────────────────────────────────────

/// Runs the complete lifecycle of one realtime session.
///
/// 1. Completes the WebSocket upgrade handshake.
/// 2. Sends the one-time greeting event.
/// 3. Maps every incoming event to a pointer operation, in arrival order,
///    until the channel closes or the pointer backend fails.
///
/// # Errors
///
/// Returns an error if the handshake or the greeting send fails, or if a
/// pointer operation fails mid-session.  In every case the bridge is marked
/// disconnected before returning.
async fn run_motion_session(
    stream: TcpStream,
    peer_addr: SocketAddr,
    pointer: Arc<dyn PointerController>,
) -> anyhow::Result<()> {
    let mut ws = accept_async(stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let mut bridge = MotionBridge::new(pointer);

    // Greet before touching any samples; this is the only outbound event.
    let greeting = serde_json::to_string(&bridge.greeting())?;
    ws.send(WsMessage::Text(greeting))
        .await
        .with_context(|| format!("failed to send greeting to {peer_addr}"))?;

    info!("motion session established: {peer_addr}");

    let result = pump_events(&mut ws, &bridge, peer_addr).await;
    bridge.on_disconnect();
    info!("motion session ended: {peer_addr}");
    result
}

/// The per-session receive loop.  Separated from [`run_motion_session`] so
/// the caller can mark the bridge disconnected on every exit path.
async fn pump_events(
    ws: &mut WebSocketStream<TcpStream>,
    bridge: &MotionBridge,
    peer_addr: SocketAddr,
) -> anyhow::Result<()> {
    loop {
        let frame = match ws.next().await {
            Some(Ok(frame)) => frame,
            Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                debug!("session {peer_addr}: channel closed");
                break;
            }
            Some(Err(e)) => {
                warn!("session {peer_addr}: channel error: {e}");
                break;
            }
            None => {
                debug!("session {peer_addr}: stream ended");
                break;
            }
        };

        match frame {
            WsMessage::Text(text) => {
                dispatch_event(bridge, &text, peer_addr)
                    .with_context(|| format!("pointer operation failed for {peer_addr}"))?;
            }

            WsMessage::Binary(_) => {
                // The protocol is JSON text frames only.
                warn!("session {peer_addr}: unexpected binary frame (ignored)");
            }

            WsMessage::Ping(data) => {
                // tungstenite queues the Pong reply automatically.
                debug!("session {peer_addr}: ping ({} bytes)", data.len());
            }

            WsMessage::Pong(_) => {
                debug!("session {peer_addr}: pong received");
            }

            WsMessage::Close(_) => {
                debug!("session {peer_addr}: close frame received");
                break;
            }

            WsMessage::Frame(_) => {
                debug!("session {peer_addr}: raw frame (ignored)");
            }
        }
    }

    Ok(())
}

/// Decodes one text frame and dispatches it to the bridge.
///
/// A frame that fails to decode is logged and skipped: one bad message is
/// not a reason to drop the channel.  A pointer failure, on the other hand,
/// propagates and ends the session.
fn dispatch_event(
    bridge: &MotionBridge,
    text: &str,
    peer_addr: SocketAddr,
) -> Result<(), PointerError> {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            warn!("session {peer_addr}: invalid event (ignored): {e}");
            return Ok(());
        }
    };

    match event {
        ClientEvent::GyroData(sample) => {
            debug!(
                "session {peer_addr}: sample x={} z={}",
                sample.x, sample.z
            );
            bridge.on_sample(&sample)
        }
        ClientEvent::LeftClick => bridge.on_click(PointerButton::Left),
        ClientEvent::RightClick => bridge.on_click(PointerButton::Right),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
