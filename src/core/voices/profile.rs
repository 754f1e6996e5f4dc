//! Persisted voice profile artifacts.

use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::client::VoiceParameters;
use crate::error::{VoiceError, VoiceResult};

/// File extension for profile artifacts
pub const PROFILE_EXTENSION: &str = "json";

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid sanitize pattern"));

/// A cloned voice, persisted as one JSON file per profile.
///
/// Immutable once created; re-cloning under the same name replaces the
/// artifact atomically rather than mutating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// User-chosen unique identifier
    pub name: String,
    /// Unix timestamp (seconds) of creation
    pub created_at: u64,
    /// Conditioning values returned by the cloning call
    pub parameters: VoiceParameters,
}

impl VoiceProfile {
    pub fn new(name: &str, parameters: VoiceParameters) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            name: name.to_string(),
            created_at,
            parameters,
        }
    }
}

/// Map a user-chosen voice name to a filesystem-safe stem.
///
/// Every character outside `[A-Za-z0-9._-]` becomes `_`. Names that are
/// empty or collapse to dots only (`.`, `..`) are rejected so a profile can
/// never escape the voice directory.
pub fn sanitize_name(name: &str) -> VoiceResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(VoiceError::Validation(
            "voice name must not be empty".to_string(),
        ));
    }
    let sanitized = UNSAFE_CHARS.replace_all(trimmed, "_").into_owned();
    if sanitized.chars().all(|c| c == '.') {
        return Err(VoiceError::Validation(format!(
            "voice name {name:?} is not usable as a file name"
        )));
    }
    Ok(sanitized)
}
