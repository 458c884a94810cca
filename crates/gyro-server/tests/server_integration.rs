//! Integration tests for the shared listener and the motion session.
//!
//! These tests run the real server (real TCP listener, real WebSocket
//! handshake, real HTTP responses) against the mock pointer backend, and
//! verify the externally observable contract:
//!
//! - Connecting yields exactly one outbound event (the greeting), before any
//!   sample is processed.
//! - Each gyro frame displaces the (mock) cursor by the documented linear
//!   mapping, in arrival order.
//! - `GET /qrcode` on the same port answers with an `image/png` body.
//! - Unknown paths answer 404.
//!
//! Each test picks a free port, starts `run_server` with its own shutdown
//! flag, and tears the server down at the end.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use gyro_core::motion::PointerPosition;
use gyro_server::application::motion_bridge::PointerController;
use gyro_server::domain::ServerConfig;
use gyro_server::infrastructure::pointer::MockPointerController;
use gyro_server::infrastructure::run_server;

// ── Harness ───────────────────────────────────────────────────────────────────

/// A running server instance plus the handles the tests need.
struct TestServer {
    port: u16,
    pointer: Arc<MockPointerController>,
    running: Arc<AtomicBool>,
    task: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Starts the server on a free loopback port with the cursor parked at
    /// `(x, y)`.
    async fn start(x: i32, y: i32) -> Self {
        // Bind port 0 to let the OS pick a free port, then release it for
        // the server to claim.
        let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("probe bind");
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let config = ServerConfig {
            bind_addr: format!("127.0.0.1:{port}").parse().unwrap(),
        };
        let pointer = Arc::new(MockPointerController::at(x, y));
        let running = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn(run_server(
            config,
            Arc::clone(&running),
            Arc::clone(&pointer) as Arc<dyn PointerController>,
        ));

        let server = Self {
            port,
            pointer,
            running,
            task,
        };
        server.wait_until_accepting().await;
        server
    }

    /// Polls until the listener accepts connections (bounded).
    async fn wait_until_accepting(&self) {
        for _ in 0..50 {
            if TcpStream::connect(("127.0.0.1", self.port)).await.is_ok() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("server did not start accepting on port {}", self.port);
    }

    /// Opens a WebSocket session to the server.
    async fn connect_ws(&self) -> WebSocketStream<MaybeTlsStream<TcpStream>> {
        let (ws, _) = connect_async(format!("ws://127.0.0.1:{}", self.port))
            .await
            .expect("WebSocket connect");
        ws
    }

    /// Polls until the mock pointer has recorded at least `count` moves.
    async fn wait_for_moves(&self, count: usize) {
        for _ in 0..100 {
            if self.pointer.moves.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {count} moves, saw {}",
            self.pointer.moves.lock().unwrap().len()
        );
    }

    /// Requests shutdown and waits for the accept loop to finish.
    async fn stop(self) {
        self.running.store(false, Ordering::Relaxed);
        let _ = self.task.await;
    }
}

/// Sends a raw HTTP request and returns the complete response bytes.
async fn http_get(port: u16, path: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.expect("connect");
    let request = format!("GET {path} HTTP/1.1\r\nHost: 127.0.0.1:{port}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.expect("write");

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.expect("read");
    response
}

// ── Realtime channel ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connecting_yields_exactly_one_greeting_event() {
    // Arrange
    let server = TestServer::start(0, 0).await;

    // Act: connect and read the first frame
    let mut ws = server.connect_ws().await;
    let first = ws.next().await.expect("frame").expect("no error");

    // Assert: the greeting, with the exact documented payload
    assert_eq!(
        first.into_text().unwrap(),
        r#"{"event":"message","data":{"data":"Connected to the server"}}"#
    );

    // And nothing else is volunteered: the next read should time out rather
    // than produce a second outbound event.
    let second = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(second.is_err(), "server sent an unexpected second event");

    server.stop().await;
}

#[tokio::test]
async fn test_gyro_frame_moves_the_cursor_by_the_linear_mapping() {
    // Arrange: cursor parked at (500, 500)
    let server = TestServer::start(500, 500).await;
    let mut ws = server.connect_ws().await;
    let _greeting = ws.next().await.expect("frame").expect("no error");

    // Act: one tilt sample
    ws.send(Message::Text(
        r#"{"event":"gyroData","data":{"x":1,"z":0}}"#.to_string(),
    ))
    .await
    .expect("send");

    // Assert
    server.wait_for_moves(1).await;
    assert_eq!(
        *server.pointer.position.lock().unwrap(),
        PointerPosition::new(500, 480)
    );

    server.stop().await;
}

#[tokio::test]
async fn test_samples_are_processed_in_arrival_order() {
    // Arrange
    let server = TestServer::start(500, 500).await;
    let mut ws = server.connect_ws().await;
    let _greeting = ws.next().await.expect("frame").expect("no error");

    // Act: a twist sample followed by a tilt sample
    ws.send(Message::Text(
        r#"{"event":"gyroData","data":{"x":0,"z":-2}}"#.to_string(),
    ))
    .await
    .expect("send");
    ws.send(Message::Text(
        r#"{"event":"gyroData","data":{"x":1,"z":0}}"#.to_string(),
    ))
    .await
    .expect("send");

    // Assert: both moves recorded, in order, each from the live position
    server.wait_for_moves(2).await;
    assert_eq!(
        *server.pointer.moves.lock().unwrap(),
        vec![PointerPosition::new(540, 500), PointerPosition::new(540, 480)]
    );

    server.stop().await;
}

#[tokio::test]
async fn test_empty_sample_payload_is_a_no_op_move() {
    // Arrange
    let server = TestServer::start(321, 123).await;
    let mut ws = server.connect_ws().await;
    let _greeting = ws.next().await.expect("frame").expect("no error");

    // Act
    ws.send(Message::Text(
        r#"{"event":"gyroData","data":{}}"#.to_string(),
    ))
    .await
    .expect("send");

    // Assert: a move was issued, to exactly where the cursor already was
    server.wait_for_moves(1).await;
    assert_eq!(
        *server.pointer.position.lock().unwrap(),
        PointerPosition::new(321, 123)
    );

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_frame_does_not_close_the_session() {
    // Arrange
    let server = TestServer::start(500, 500).await;
    let mut ws = server.connect_ws().await;
    let _greeting = ws.next().await.expect("frame").expect("no error");

    // Act: garbage, then a valid sample on the same connection
    ws.send(Message::Text("{not json".to_string())).await.expect("send");
    ws.send(Message::Text(
        r#"{"event":"gyroData","data":{"x":1,"z":0}}"#.to_string(),
    ))
    .await
    .expect("send");

    // Assert: the valid sample still lands
    server.wait_for_moves(1).await;
    assert_eq!(
        *server.pointer.position.lock().unwrap(),
        PointerPosition::new(500, 480)
    );

    server.stop().await;
}

#[tokio::test]
async fn test_click_events_reach_the_pointer() {
    // Arrange
    let server = TestServer::start(0, 0).await;
    let mut ws = server.connect_ws().await;
    let _greeting = ws.next().await.expect("frame").expect("no error");

    // Act
    ws.send(Message::Text(r#"{"event":"leftClick"}"#.to_string()))
        .await
        .expect("send");

    // Assert
    for _ in 0..100 {
        if !server.pointer.clicks.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(server.pointer.clicks.lock().unwrap().len(), 1);

    server.stop().await;
}

// ── HTTP endpoint ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_qrcode_endpoint_serves_a_png() {
    // Arrange
    let server = TestServer::start(0, 0).await;

    // Act
    let response = http_get(server.port, "/qrcode").await;

    // Assert: status, content type, and a PNG body
    let text = String::from_utf8_lossy(&response);
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"), "got: {text}");
    assert!(text.contains("Content-Type: image/png"));

    let body_start = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("header terminator")
        + 4;
    assert_eq!(
        &response[body_start..body_start + 8],
        &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]
    );

    server.stop().await;
}

#[tokio::test]
async fn test_unknown_path_answers_404() {
    let server = TestServer::start(0, 0).await;

    let response = http_get(server.port, "/favicon.ico").await;

    let text = String::from_utf8_lossy(&response);
    assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"), "got: {text}");

    server.stop().await;
}

#[tokio::test]
async fn test_http_and_websocket_share_one_port() {
    // Arrange
    let server = TestServer::start(0, 0).await;

    // Act: an HTTP request first, then a WebSocket session, same port
    let response = http_get(server.port, "/qrcode").await;
    let mut ws = server.connect_ws().await;
    let greeting = ws.next().await.expect("frame").expect("no error");

    // Assert: both succeeded
    assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 200 OK"));
    assert!(greeting.into_text().unwrap().contains("Connected to the server"));

    server.stop().await;
}
