//! Application layer for gyro-server.
//!
//! The application layer orchestrates the business logic: it knows *what* to
//! do with a sample or a QR request, but delegates *how* (sockets, OS cursor
//! calls) to the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Mapping each decoded event to exactly one pointer operation
//!   ([`MotionBridge`])
//! - Defining the [`PointerController`] capability the OS backends implement
//! - Formatting the connection URI and rendering it as a QR PNG
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or listening for connections (infrastructure)
//! - WebSocket framing (handled by tokio-tungstenite)
//! - The actual OS cursor calls (infrastructure `pointer/` backends)

pub mod motion_bridge;
pub mod publish_address;

pub use motion_bridge::{MotionBridge, PointerButton, PointerController, PointerError};
pub use publish_address::{connection_uri, render_connection_qr, PublishError};
