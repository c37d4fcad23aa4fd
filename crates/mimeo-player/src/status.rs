//! Status event protocol between the engine and its subscriber

use serde::{Deserialize, Serialize};

/// One event per engine transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusEvent {
    /// The run started (no index) or step `currentIndex` is about to
    /// execute.
    Playing {
        #[serde(
            rename = "currentIndex",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        current_index: Option<usize>,
    },
    /// A click failed. Terminal for the run; no `stopped` follows.
    Error { error: String },
    /// Normal completion or cancellation.
    Stopped,
}

impl StatusEvent {
    pub fn playing() -> Self {
        Self::Playing {
            current_index: None,
        }
    }

    pub fn playing_at(index: usize) -> Self {
        Self::Playing {
            current_index: Some(index),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format() {
        assert_eq!(
            serde_json::to_string(&StatusEvent::playing()).unwrap(),
            r#"{"status":"playing"}"#
        );
        assert_eq!(
            serde_json::to_string(&StatusEvent::playing_at(2)).unwrap(),
            r#"{"status":"playing","currentIndex":2}"#
        );
        assert_eq!(
            serde_json::to_string(&StatusEvent::error("boom")).unwrap(),
            r#"{"status":"error","error":"boom"}"#
        );
        assert_eq!(
            serde_json::to_string(&StatusEvent::Stopped).unwrap(),
            r#"{"status":"stopped"}"#
        );
    }

    #[test]
    fn playing_without_index_parses() {
        let event: StatusEvent = serde_json::from_str(r#"{"status":"playing"}"#).unwrap();
        assert_eq!(event, StatusEvent::playing());
    }
}
