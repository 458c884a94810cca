//! Protocol module containing the JSON event envelope for the phone channel.

pub mod events;

pub use events::{ClientEvent, ServerEvent, GREETING};
