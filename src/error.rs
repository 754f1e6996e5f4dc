//! Error taxonomy for the voice client.
//!
//! Every operation in this crate returns a [`VoiceResult`]; nothing is
//! logged-and-swallowed. The caller (CLI, or whatever UI layer embeds the
//! library) owns user-facing formatting.

use thiserror::Error;

/// Result alias used throughout the crate
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Errors surfaced by the request client and the voice store.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// Bad caller input: empty text, empty sample, unknown voice name.
    /// Never retried and never reaches the network.
    #[error("validation error: {0}")]
    Validation(String),

    /// The upstream service stayed unavailable through the whole retry
    /// budget. `attempts` is the number of requests actually sent.
    #[error("service unavailable after {attempts} attempts (last status {status})")]
    TransientService { status: u16, attempts: u32 },

    /// Invalid or missing credential. Fatal for the request, not retried.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Local filesystem failure while persisting or loading a voice profile
    #[error("storage error while {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-transient upstream error (malformed payload, model error, ...)
    #[error("provider error {status}: {message}")]
    Provider { status: u16, message: String },

    /// Transport-level failure that survived the retry budget
    #[error("network error: {0}")]
    Network(String),

    /// Bad process configuration detected at startup
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `resolve()` miss: no stored profile under that name
    #[error("voice not found: {0}")]
    VoiceNotFound(String),
}

impl VoiceError {
    /// Wrap an I/O error with a short description of the file operation
    /// that failed.
    pub fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    /// True for errors the retry loop is allowed to act on. Kept here so the
    /// classification used by `RequestClient` is testable in isolation.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VoiceError::TransientService { .. } | VoiceError::Network(_)
        )
    }
}
