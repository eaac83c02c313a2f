//! Event types for realtime TTS communication.

use serde::{Deserialize, Serialize};

use crate::types::{SessionInfo, UsageStats};

/// Client events
pub const EVENT_TYPE_SESSION_UPDATE: &str = "session.update";
pub const EVENT_TYPE_INPUT_TEXT_APPEND: &str = "input_text_buffer.append";
pub const EVENT_TYPE_INPUT_TEXT_COMMIT: &str = "input_text_buffer.commit";
pub const EVENT_TYPE_SESSION_FINISH: &str = "session.finish";

/// Server events
pub const EVENT_TYPE_SESSION_CREATED: &str = "session.created";
pub const EVENT_TYPE_SESSION_UPDATED: &str = "session.updated";
pub const EVENT_TYPE_INPUT_TEXT_COMMITTED: &str = "input_text_buffer.committed";
pub const EVENT_TYPE_RESPONSE_CREATED: &str = "response.created";
pub const EVENT_TYPE_RESPONSE_AUDIO_DELTA: &str = "response.audio.delta";
pub const EVENT_TYPE_RESPONSE_AUDIO_DONE: &str = "response.audio.done";
pub const EVENT_TYPE_RESPONSE_DONE: &str = "response.done";
pub const EVENT_TYPE_SESSION_FINISHED: &str = "session.finished";
pub const EVENT_TYPE_ERROR: &str = "error";

/// Realtime event from the server.
#[derive(Debug, Clone, Default)]
pub struct TtsEvent {
    /// Event type.
    pub event_type: String,

    /// Unique event identifier.
    pub event_id: Option<String>,

    /// Session information (for session.* events).
    pub session: Option<SessionInfo>,

    /// Response identifier (for response.* events).
    pub response_id: Option<String>,

    /// Decoded audio data (for response.audio.delta).
    pub audio: Option<Vec<u8>>,

    /// Error information (for error events).
    pub error: Option<EventError>,

    /// Usage statistics (for response.done / session.finished).
    pub usage: Option<UsageStats>,
}

/// Error information from error events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventError {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl TtsEvent {
    /// Returns true if this is a session.created event.
    pub fn is_session_created(&self) -> bool {
        self.event_type == EVENT_TYPE_SESSION_CREATED
    }

    /// Returns true if this is a session.finished event.
    pub fn is_session_finished(&self) -> bool {
        self.event_type == EVENT_TYPE_SESSION_FINISHED
    }

    /// Returns true if this is an error event.
    pub fn is_error(&self) -> bool {
        self.event_type == EVENT_TYPE_ERROR
    }

    /// Returns the error code and message, falling back to placeholders.
    pub fn error_parts(&self) -> (String, String) {
        let err = self.error.clone().unwrap_or_default();
        (
            err.code.or(err.error_type).unwrap_or_else(|| "unknown".to_string()),
            err.message.unwrap_or_else(|| "unknown error".to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds() {
        let finished = TtsEvent {
            event_type: EVENT_TYPE_SESSION_FINISHED.into(),
            ..Default::default()
        };
        assert!(finished.is_session_finished());
        assert!(!finished.is_error());

        let created = TtsEvent {
            event_type: EVENT_TYPE_SESSION_CREATED.into(),
            ..Default::default()
        };
        assert!(created.is_session_created());
        assert!(!created.is_session_finished());
    }

    #[test]
    fn test_error_parts_fallback() {
        let ev = TtsEvent {
            event_type: EVENT_TYPE_ERROR.into(),
            ..Default::default()
        };
        assert_eq!(ev.error_parts(), ("unknown".into(), "unknown error".into()));
    }
}
