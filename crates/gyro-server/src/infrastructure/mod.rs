//! Infrastructure layer for gyro-server.
//!
//! All I/O lives here: the shared TCP listener with its HTTP/WebSocket
//! demultiplexer, the OS cursor backends, and the outbound-IP probe.
//!
//! # What does NOT belong here?
//!
//! - The sample-to-displacement mapping (that is `gyro-core`)
//! - The per-event dispatch rules (application layer, `MotionBridge`)
//! - Configuration parsing (done in `main.rs`)

pub mod net;
pub mod pointer;
pub mod ws_server;

// Re-export the primary entry point so `main.rs` can call it concisely.
pub use ws_server::run_server;
