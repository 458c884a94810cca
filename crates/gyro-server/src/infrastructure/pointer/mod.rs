//! Pointer controller implementations.
//!
//! `system` drives the real OS cursor; `mock` records calls for tests.
//! Both implement `application::PointerController`.

pub mod mock;
pub mod system;

pub use mock::MockPointerController;
pub use system::SystemPointer;
