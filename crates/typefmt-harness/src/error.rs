//! Harness error type.

use thiserror::Error;

use typefmt_core::FormatError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(
        "unknown mode '{0}', expected lenient|strict-sign|strict-int-size|strict|unchecked|all"
    )]
    UnknownMode(String),
    #[error("invalid argument '{input}': {reason}")]
    InvalidArg { input: String, reason: String },
    #[error("case '{name}' cannot be captured from the host: {reason}")]
    CaptureUnsupported { name: String, reason: String },
    #[error("host snprintf failed for case '{0}'")]
    HostFailure(String),
    #[error("no fixture JSON files found in {0}")]
    NoFixtures(String),
}

impl HarnessError {
    pub(crate) fn invalid_arg(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArg {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(name: &str, reason: impl Into<String>) -> Self {
        Self::CaptureUnsupported {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
