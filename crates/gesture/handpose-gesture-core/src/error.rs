//! Error taxonomy for gesture construction and composition.

use thiserror::Error;

/// Every failure the engine reports is fatal to the generation run; nothing is
/// skipped or repaired.
#[derive(Debug, Error)]
pub enum GestureError {
    #[error("gesture '{id}': start frame {start_frame} must be less than end frame {end_frame}")]
    InvalidWindow {
        id: String,
        start_frame: u32,
        end_frame: u32,
    },

    #[error("gesture '{id}': start frame 0 precedes the first simulated frame (1)")]
    StartBeforeClock { id: String },

    #[error("gesture '{gesture}': invalid '{field}': {reason}")]
    InvalidParameter {
        gesture: String,
        field: &'static str,
        reason: String,
    },

    #[error("invalid sequence config: {0}")]
    InvalidConfig(String),

    #[error("gesture names must be unique: '{0}' was declared twice")]
    DuplicateGesture(String),

    #[error("gesture '{id}': malformed declaration: {source}")]
    Declaration {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("gesture document parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("generator '{id}': {reason}")]
    Generator { id: String, reason: String },
}

impl GestureError {
    pub(crate) fn parameter(
        gesture: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        GestureError::InvalidParameter {
            gesture: gesture.into(),
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn generator(id: impl Into<String>, reason: impl Into<String>) -> Self {
        GestureError::Generator {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GestureError>;
