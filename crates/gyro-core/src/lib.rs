//! # gyro-core
//!
//! Shared library for Gyro-Pointer containing the orientation-to-pointer
//! mapping and the JSON wire protocol spoken between the phone and the host.
//!
//! This crate is used by the server binary and by its integration tests.
//! It has zero dependencies on OS APIs, network sockets, or async runtimes.
//!
//! # Architecture overview (for beginners)
//!
//! Gyro-Pointer turns a phone into an air mouse: the phone streams gyroscope
//! readings to a small server running on the desktop, and the server nudges
//! the real OS cursor for every reading it receives.  There is no session
//! state beyond the open connection: each reading produces exactly one
//! cursor move and is then forgotten.
//!
//! This crate (`gyro-core`) is the pure foundation.  It defines:
//!
//! - **`motion`** – The [`OrientationSample`] type (one gyroscope reading),
//!   the fixed [`SENSITIVITY`](motion::SENSITIVITY) scale factor, and the
//!   deterministic mapping from (current position, sample) to the next
//!   pointer position.
//!
//! - **`protocol`** – The JSON event envelope used on the WebSocket channel:
//!   what the phone sends ([`ClientEvent`]) and what the server sends back
//!   ([`ServerEvent`]).

pub mod motion;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `gyro_core::OrientationSample` instead of the full module path.
pub use motion::{target_position, OrientationSample, PointerPosition, SENSITIVITY};
pub use protocol::{ClientEvent, ServerEvent, GREETING};
