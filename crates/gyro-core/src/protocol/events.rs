//! JSON message types for the phone-facing WebSocket protocol.
//!
//! Every frame on the channel is a JSON object with an `"event"` field naming
//! the event and an optional `"data"` field carrying its payload:
//!
//! ```json
//! {"event":"gyroData","data":{"x":0.42,"z":-0.17}}
//! {"event":"leftClick"}
//! {"event":"message","data":{"data":"Connected to the server"}}
//! ```
//!
//! Serde's adjacently tagged representation (`tag = "event"`,
//! `content = "data"`) produces exactly this shape, including the absent
//! `"data"` key for payload-less events.
//!
//! # Why separate client and server enums?
//!
//! The two directions carry different information: the phone streams input
//! events, the server sends (exactly one) acknowledgement.  Two distinct
//! enums make it a compile-time error to send a client-only event back to
//! the phone, and vice versa.

use serde::{Deserialize, Serialize};

use crate::motion::OrientationSample;

/// Fixed acknowledgement text sent once per connection, immediately after the
/// WebSocket handshake completes.
pub const GREETING: &str = "Connected to the server";

// ── Phone → Server events ─────────────────────────────────────────────────────

/// All events the phone can send to the server.
///
/// Unknown event names fail deserialization; the session handler logs the
/// offending frame and keeps the connection open; one bad frame is not a
/// reason to drop the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// One gyroscope reading.  Arrives at whatever rate the phone samples
    /// its sensor (typically 10–50 ms apart); each reading produces exactly
    /// one cursor move.
    #[serde(rename = "gyroData")]
    GyroData(OrientationSample),

    /// Press-and-release of the primary pointer button at the current
    /// cursor position.
    #[serde(rename = "leftClick")]
    LeftClick,

    /// Press-and-release of the secondary pointer button at the current
    /// cursor position.
    #[serde(rename = "rightClick")]
    RightClick,
}

// ── Server → Phone events ─────────────────────────────────────────────────────

/// All events the server sends to the phone.
///
/// # Serde representation
///
/// ```json
/// {"event":"message","data":{"data":"Connected to the server"}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// The one-time connect acknowledgement.  No further outbound events are
    /// ever sent: sample processing is fire-and-forget with no per-sample
    /// acknowledgement in either direction.
    #[serde(rename = "message")]
    Message {
        /// Human-readable acknowledgement text; always [`GREETING`].
        data: String,
    },
}

impl ServerEvent {
    /// Builds the connect acknowledgement event.
    pub fn greeting() -> Self {
        ServerEvent::Message {
            data: GREETING.to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── ClientEvent deserialization ───────────────────────────────────────────

    #[test]
    fn test_gyro_data_event_deserializes_from_phone_json() {
        // Arrange: the exact shape the phone app emits
        let json = r#"{"event":"gyroData","data":{"x":0.42,"y":1.0,"z":-0.17}}"#;

        // Act
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // Assert: `y` is dropped, `x` and `z` survive
        match event {
            ClientEvent::GyroData(sample) => {
                assert_eq!(sample.x, 0.42);
                assert_eq!(sample.z, -0.17);
            }
            other => panic!("expected GyroData, got {:?}", other),
        }
    }

    #[test]
    fn test_gyro_data_with_empty_payload_is_the_zero_sample() {
        let json = r#"{"event":"gyroData","data":{}}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ClientEvent::GyroData(OrientationSample::default()));
    }

    #[test]
    fn test_left_click_deserializes_without_data_key() {
        let event: ClientEvent = serde_json::from_str(r#"{"event":"leftClick"}"#).unwrap();
        assert_eq!(event, ClientEvent::LeftClick);
    }

    #[test]
    fn test_right_click_deserializes_without_data_key() {
        let event: ClientEvent = serde_json::from_str(r#"{"event":"rightClick"}"#).unwrap();
        assert_eq!(event, ClientEvent::RightClick);
    }

    #[test]
    fn test_unknown_event_name_returns_error() {
        // Arrange
        let json = r#"{"event":"keyPress","data":{"key":"a"}}"#;

        // Act
        let result: Result<ClientEvent, _> = serde_json::from_str(json);

        // Assert: unknown events must produce a deserialization error
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_event_field_returns_error() {
        let result: Result<ClientEvent, _> = serde_json::from_str(r#"{"x":1.0,"z":2.0}"#);
        assert!(result.is_err());
    }

    // ── ServerEvent serialization ─────────────────────────────────────────────

    #[test]
    fn test_greeting_serializes_to_the_fixed_wire_shape() {
        // Arrange
        let event = ServerEvent::greeting();

        // Act
        let json = serde_json::to_string(&event).unwrap();

        // Assert: this exact shape is what phone clients match against
        assert_eq!(
            json,
            r#"{"event":"message","data":{"data":"Connected to the server"}}"#
        );
    }

    #[test]
    fn test_greeting_round_trips() {
        let original = ServerEvent::greeting();
        let json = serde_json::to_string(&original).unwrap();
        let decoded: ServerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }
}
