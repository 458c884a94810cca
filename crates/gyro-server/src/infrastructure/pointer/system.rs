//! Real OS cursor control via the `mouse-rs` crate.
//!
//! `mouse-rs` wraps the native pointer APIs on Windows, Linux/X11, and macOS
//! behind one synchronous interface.  The calls are cheap, non-animated, and
//! return as soon as the command is issued, which is exactly the
//! fire-and-forget contract [`PointerController`] asks for.
//!
//! A fresh [`Mouse`] handle is constructed per call.  Construction is trivial
//! on every platform and keeping no handle in the struct makes `SystemPointer`
//! trivially `Send + Sync`, so one instance can be shared across all
//! connection tasks.
//!
//! # Failure
//!
//! On a headless machine (no display server) the position read or the move
//! itself fails; the error is surfaced as [`PointerError::Platform`] and the
//! session layer closes that connection.  There is no retry.

use mouse_rs::{types::keys::Keys, Mouse};

use gyro_core::motion::PointerPosition;

use crate::application::motion_bridge::{PointerButton, PointerController, PointerError};

/// The production pointer backend.
pub struct SystemPointer;

impl SystemPointer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemPointer {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerController for SystemPointer {
    fn position(&self) -> Result<PointerPosition, PointerError> {
        let point = Mouse::new()
            .get_position()
            .map_err(|e| PointerError::Platform(e.to_string()))?;
        Ok(PointerPosition {
            x: point.x,
            y: point.y,
        })
    }

    fn move_to(&self, target: PointerPosition) -> Result<(), PointerError> {
        Mouse::new()
            .move_to(target.x, target.y)
            .map_err(|e| PointerError::Platform(e.to_string()))
    }

    fn click(&self, button: PointerButton) -> Result<(), PointerError> {
        let key = match button {
            PointerButton::Left => Keys::LEFT,
            PointerButton::Right => Keys::RIGHT,
        };
        Mouse::new()
            .click(&key)
            .map_err(|e| PointerError::Platform(e.to_string()))
    }
}
