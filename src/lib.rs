//! Client library for Sesame CSM-1B hosted inference: text-to-speech and
//! voice cloning over a retry-aware request layer, with cloned voices
//! persisted as local artifacts.

pub mod config;
pub mod core;
pub mod error;

// Re-export commonly used items for convenience
pub use crate::config::AppConfig;
pub use crate::core::client::{AudioResult, RequestClient, RetryPolicy, Sleeper, TokioSleeper};
pub use crate::core::voices::{VoiceProfile, VoiceStore};
pub use crate::error::{VoiceError, VoiceResult};
