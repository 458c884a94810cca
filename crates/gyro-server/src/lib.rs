//! gyro-server library crate.
//!
//! This crate runs the desktop half of Gyro-Pointer: it publishes a QR code
//! with the host's connection address and turns the phone's gyroscope stream
//! into real cursor movement.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Phone (JSON over WebSocket)          Browser (GET /qrcode)
//!         ↕                                   ↕
//! [gyro-server]  — one TCP listener, both protocols
//!   ├── domain/           ServerConfig
//!   ├── application/      MotionBridge (sample → cursor move),
//!   │                     address publishing (URI + QR PNG)
//!   └── infrastructure/
//!         ├── ws_server/  shared accept loop, HTTP/WS demux, sessions
//!         ├── pointer/    PointerController implementations (system, mock)
//!         └── net/        outbound-IP discovery
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain` and `gyro-core` only, plus the crates
//!   needed to render the QR image (still no sockets, no async).
//! - `infrastructure` depends on everything plus `tokio` and `tungstenite`.

/// Domain layer: runtime configuration.
pub mod domain;

/// Application layer: the motion bridge use case and address publishing.
pub mod application;

/// Infrastructure layer: the shared listener, pointer backends, and
/// network discovery.
pub mod infrastructure;
