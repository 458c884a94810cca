//! MotionBridge: maps decoded phone events to OS pointer operations.
//!
//! One `MotionBridge` exists per connection.  It sits at the application
//! layer and delegates to a [`PointerController`] trait object for the actual
//! cursor calls; the OS-specific (and mock) implementations live in the
//! infrastructure layer.
//!
//! # Lifecycle
//!
//! ```text
//! Connected ──(channel closes)──▶ Disconnected (terminal)
//! ```
//!
//! A bridge is created `Connected`, handles any number of samples and clicks,
//! and is marked `Disconnected` exactly once when its channel closes.  There
//! is no way back: a reconnecting phone gets a fresh bridge.  Events that
//! arrive after disconnection are ignored rather than rejected: the channel
//! is already gone, so there is nobody to report an error to.
//!
//! # Shared cursor
//!
//! The OS cursor is process-wide state.  Bridges on concurrent connections
//! all write to it with no arbitration: last writer wins, and two phones
//! connected at once will visibly fight over the cursor.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use gyro_core::motion::{target_position, OrientationSample, PointerPosition};
use gyro_core::protocol::ServerEvent;

/// Error type for pointer control operations.
#[derive(Debug, Error)]
pub enum PointerError {
    /// The OS-level cursor call failed (no display, no permission, …).
    #[error("pointer platform error: {0}")]
    Platform(String),
}

/// A pointer button the phone can press remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

/// Platform-agnostic pointer control capability.
///
/// Each supported backend provides an implementation in the infrastructure
/// layer: `SystemPointer` drives the real OS cursor, `MockPointerController`
/// records calls for tests.
///
/// # Contract
///
/// `move_to` is fire-and-forget: it returns once the move command has been
/// issued, not once the cursor has visibly settled.  This keeps per-sample
/// latency low when the phone streams at sensor rate.
pub trait PointerController: Send + Sync {
    /// Reads the current absolute cursor position.
    fn position(&self) -> Result<PointerPosition, PointerError>;

    /// Moves the cursor to an absolute position, without animation and
    /// without waiting for completion.
    fn move_to(&self, target: PointerPosition) -> Result<(), PointerError>;

    /// Presses and releases a pointer button at the current position.
    fn click(&self, button: PointerButton) -> Result<(), PointerError>;
}

/// Per-connection lifecycle state.  See the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeState {
    Connected,
    Disconnected,
}

/// The per-connection handler mapping samples to pointer moves.
pub struct MotionBridge {
    pointer: Arc<dyn PointerController>,
    state: BridgeState,
}

impl MotionBridge {
    /// Creates a bridge for a freshly established connection.
    pub fn new(pointer: Arc<dyn PointerController>) -> Self {
        Self {
            pointer,
            state: BridgeState::Connected,
        }
    }

    /// The one-time acknowledgement event to send right after the handshake.
    ///
    /// Cannot fail; sending it is the caller's job.
    pub fn greeting(&self) -> ServerEvent {
        ServerEvent::greeting()
    }

    /// Handles one gyroscope sample: read the cursor, compute the target,
    /// issue the move.
    ///
    /// The displacement is a pure function of the sample, the live cursor
    /// position, and the fixed sensitivity; no smoothing or history.  The
    /// position is read fresh on every call so that moves from the user's own
    /// physical mouse (or another connection) are taken as the new baseline.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError`] if the OS cursor read or move fails.  There
    /// is no local recovery; the session layer closes the connection.
    pub fn on_sample(&self, sample: &OrientationSample) -> Result<(), PointerError> {
        if self.state == BridgeState::Disconnected {
            debug!("sample after disconnect ignored");
            return Ok(());
        }

        let current = self.pointer.position()?;
        let target = target_position(current, sample);
        self.pointer.move_to(target)
    }

    /// Handles a remote click event.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError`] if the OS click injection fails.
    pub fn on_click(&self, button: PointerButton) -> Result<(), PointerError> {
        if self.state == BridgeState::Disconnected {
            debug!("click after disconnect ignored");
            return Ok(());
        }

        self.pointer.click(button)
    }

    /// Marks the bridge disconnected.  Idempotent; there is no per-connection
    /// state to release beyond the flag itself.
    pub fn on_disconnect(&mut self) {
        self.state = BridgeState::Disconnected;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
