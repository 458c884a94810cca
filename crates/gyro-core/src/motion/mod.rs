//! Motion mapping — pure business logic with no infrastructure dependencies.
//!
//! Everything in this module is a plain function over plain data: no I/O,
//! no clocks, no OS calls.  The server's per-connection handler reads the
//! live cursor position, calls [`target_position`], and hands the result to
//! the pointer controller; this module never touches the cursor itself.

pub mod mapping;
pub mod sample;

pub use mapping::{target_position, PointerPosition, SENSITIVITY};
pub use sample::OrientationSample;
