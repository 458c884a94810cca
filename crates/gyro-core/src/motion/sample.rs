//! The orientation sample — one gyroscope reading from the phone.

use serde::{Deserialize, Serialize};

/// A snapshot of rotational rate along two axes at one instant.
///
/// The phone reports angular rate around three axes but only two of them
/// drive the pointer: rotation about `x` (tilting the phone forward/back)
/// moves the cursor vertically, and rotation about `z` (twisting left/right)
/// moves it horizontally.  Any other keys in the payload (such as `y`) are
/// ignored during deserialization.
///
/// # Missing fields
///
/// Both fields carry `#[serde(default)]`: a payload that omits `x` or `z`
/// (including the empty object `{}`) deserializes to a zero rate for the
/// missing axis.  A zero-rate sample maps to a zero displacement, so partial
/// payloads are harmless rather than an error.
///
/// # Lifetime
///
/// A sample has no identity and no history.  It is consumed by exactly one
/// pointer move and then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationSample {
    /// Rotation rate about the pitch axis.  Positive values move the cursor
    /// up the screen (the mapping negates it; see `mapping::target_position`).
    #[serde(default)]
    pub x: f64,

    /// Rotation rate about the twist axis.  Drives horizontal cursor motion,
    /// likewise negated by the mapping.
    #[serde(default)]
    pub z: f64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
