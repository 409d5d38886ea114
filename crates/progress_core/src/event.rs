use serde::Deserialize;
use thiserror::Error;

/// Typed form of a stream payload, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Progress {
        scanned: u64,
    },
    MediaPhase {
        total_media: u64,
    },
    MediaProgress {
        processed_count: u64,
        #[serde(default)]
        total_media: Option<u64>,
    },
    Complete {
        scanned: u64,
    },
    Error {
        message: String,
    },
    /// Any `type` this client does not know about.
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed update payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Payloads starting with the comment marker are keepalives.
pub fn is_heartbeat(raw: &str) -> bool {
    raw.starts_with(':')
}

pub fn decode_event(raw: &str) -> Result<StreamEvent, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}
