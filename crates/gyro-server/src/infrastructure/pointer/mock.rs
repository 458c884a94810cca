//! Mock pointer controller for unit and integration testing.
//!
//! # Why a mock pointer?
//!
//! The real backend ([`SystemPointer`](super::system::SystemPointer)) makes
//! OS cursor calls that:
//!
//! - Require a physical desktop environment to run.
//! - Actually move the cursor on the test machine.
//! - Cannot be observed directly from Rust test code.
//!
//! `MockPointerController` replaces the OS calls with in-memory recording.
//! It also *simulates* the screen: `move_to` updates the stored position, so
//! a sequence of samples integrates across calls exactly as it would against
//! a live cursor.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every method return a
//! [`PointerError::Platform`], for exercising error paths without a broken OS.

use std::sync::Mutex;

use gyro_core::motion::PointerPosition;

use crate::application::motion_bridge::{PointerButton, PointerController, PointerError};

/// A pointer that records all calls without touching the OS.
///
/// All records live in `Mutex<Vec<...>>` fields so tests can share the
/// controller across threads behind an `Arc`.
#[derive(Default)]
pub struct MockPointerController {
    /// The simulated cursor position; updated by every `move_to`.
    pub position: Mutex<PointerPosition>,
    /// Every target passed to `move_to`, in call order.
    pub moves: Mutex<Vec<PointerPosition>>,
    /// Every button passed to `click`, in call order.
    pub clicks: Mutex<Vec<PointerButton>>,
    /// When `true`, every method returns a `PointerError::Platform`.
    pub should_fail: bool,
}

impl MockPointerController {
    /// Creates a mock with the cursor at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock with the cursor parked at `(x, y)`.
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            position: Mutex::new(PointerPosition::new(x, y)),
            ..Self::default()
        }
    }
}

impl PointerController for MockPointerController {
    fn position(&self) -> Result<PointerPosition, PointerError> {
        if self.should_fail {
            return Err(PointerError::Platform("mock failure".into()));
        }
        Ok(*self.position.lock().unwrap())
    }

    /// Records the target and adopts it as the new simulated position.
    fn move_to(&self, target: PointerPosition) -> Result<(), PointerError> {
        if self.should_fail {
            return Err(PointerError::Platform("mock failure".into()));
        }
        self.moves.lock().unwrap().push(target);
        *self.position.lock().unwrap() = target;
        Ok(())
    }

    fn click(&self, button: PointerButton) -> Result<(), PointerError> {
        if self.should_fail {
            return Err(PointerError::Platform("mock failure".into()));
        }
        self.clicks.lock().unwrap().push(button);
        Ok(())
    }
}
