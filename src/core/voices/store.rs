//! Voice store: named voice-model artifacts plus the synthesis entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::core::client::{
    AudioResult, CloneRequest, CloneResponse, RequestClient, SynthesisRequest,
};
use crate::core::voices::presets::is_builtin_preset;
use crate::core::voices::profile::{PROFILE_EXTENSION, VoiceProfile, sanitize_name};
use crate::error::{VoiceError, VoiceResult};

/// Below this many sample bytes the clone is likely too short to condition
/// the model well. Recommendation only: the store warns and proceeds.
const MIN_SAMPLE_BYTES: usize = 16 * 1024;

/// Manages cloned voice profiles on local storage and routes synthesis
/// requests through the request client.
///
/// Each operation is independent; the only shared mutable state is the
/// artifact directory. Writes to the same profile name are serialized with
/// a per-name mutex so a re-clone can never tear an existing artifact.
pub struct VoiceStore {
    client: Arc<RequestClient>,
    voice_dir: PathBuf,
    write_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl VoiceStore {
    pub fn new(config: &AppConfig, client: Arc<RequestClient>) -> Self {
        Self {
            client,
            voice_dir: config.voice_dir.clone(),
            write_locks: DashMap::new(),
        }
    }

    /// Directory holding the profile artifacts
    pub fn voice_dir(&self) -> &Path {
        &self.voice_dir
    }

    /// Clone a voice from a reference sample and persist it under `name`.
    ///
    /// The profile is written with a temp-file-and-rename so a failed
    /// upstream call or interrupted write leaves no partial artifact.
    /// Cloning an existing name atomically replaces it.
    pub async fn clone_voice(&self, name: &str, sample: &[u8]) -> VoiceResult<VoiceProfile> {
        let stem = sanitize_name(name)?;
        let request = CloneRequest::new(sample)?;

        if sample.len() < MIN_SAMPLE_BYTES {
            warn!(
                voice = name,
                sample_bytes = sample.len(),
                "reference sample is short; cloned voice quality may suffer"
            );
        }

        let lock = self
            .write_locks
            .entry(stem.clone())
            .or_insert_with(Default::default)
            .value()
            .clone();
        let _guard = lock.lock().await;

        debug!(voice = name, sample_bytes = sample.len(), "sending voice extraction request");
        let response = self.client.call(&request).await?;
        let parsed: CloneResponse = serde_json::from_slice(&response.data).map_err(|e| {
            VoiceError::Provider {
                status: 200,
                message: format!("unparseable voice extraction response: {e}"),
            }
        })?;

        let profile = VoiceProfile::new(name, parsed.parameters);
        self.write_profile(&stem, &profile).await?;

        info!(voice = name, "voice cloned");
        Ok(profile)
    }

    /// Names of all stored profiles, alphabetical. Stable across calls as
    /// long as nothing mutates the store in between.
    pub async fn list(&self) -> VoiceResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.voice_dir).await {
            Ok(entries) => entries,
            // No directory yet means no voices have been cloned.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(VoiceError::storage("listing voice profiles", e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| VoiceError::storage("listing voice profiles", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXTENSION) {
                continue;
            }
            // The artifact stores the user-chosen name, which may differ
            // from the sanitized file stem. Fall back to the stem if the
            // artifact cannot be read.
            let name = match fs::read(&path).await {
                Ok(raw) => serde_json::from_slice::<VoiceProfile>(&raw)
                    .map(|profile| profile.name)
                    .ok(),
                Err(_) => None,
            };
            match name {
                Some(name) => names.push(name),
                None => {
                    warn!(path = %path.display(), "unreadable voice profile, listing by file name");
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        names.push(stem.to_string());
                    }
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Load the profile stored under `name`
    pub async fn resolve(&self, name: &str) -> VoiceResult<VoiceProfile> {
        let stem = sanitize_name(name)?;
        let path = self.profile_path(&stem);

        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VoiceError::VoiceNotFound(name.to_string()));
            }
            Err(e) => return Err(VoiceError::storage(format!("reading voice profile {name:?}"), e)),
        };

        serde_json::from_slice(&raw).map_err(|e| {
            VoiceError::storage(
                format!("parsing voice profile {name:?}"),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }

    /// Synthesize speech, optionally conditioned on a stored profile or a
    /// built-in preset.
    ///
    /// Empty text fails with a validation error before any disk or network
    /// activity. A voice name that is neither stored nor a preset is an
    /// unknown voice reference.
    pub async fn synthesize(&self, text: &str, voice: Option<&str>) -> VoiceResult<AudioResult> {
        if text.trim().is_empty() {
            return Err(VoiceError::Validation(
                "text must not be empty".to_string(),
            ));
        }

        let request = match voice {
            None => SynthesisRequest::new(text)?,
            Some(name) => match self.resolve(name).await {
                Ok(profile) => {
                    SynthesisRequest::with_cloned_voice(text, &profile.name, &profile.parameters)?
                }
                Err(VoiceError::VoiceNotFound(_)) if is_builtin_preset(name) => {
                    SynthesisRequest::with_preset(text, name)?
                }
                Err(VoiceError::VoiceNotFound(_)) => {
                    return Err(VoiceError::Validation(format!(
                        "unknown voice reference: {name:?}"
                    )));
                }
                Err(other) => return Err(other),
            },
        };

        debug!(text_len = text.len(), voice = voice.unwrap_or("default"), "synthesis request");
        self.client.call(&request).await
    }

    fn profile_path(&self, stem: &str) -> PathBuf {
        self.voice_dir.join(format!("{stem}.{PROFILE_EXTENSION}"))
    }

    /// Atomic profile write: temp file in the same directory, then rename.
    async fn write_profile(&self, stem: &str, profile: &VoiceProfile) -> VoiceResult<()> {
        fs::create_dir_all(&self.voice_dir)
            .await
            .map_err(|e| VoiceError::storage("creating voice directory", e))?;

        let json = serde_json::to_vec_pretty(profile).map_err(|e| {
            VoiceError::storage(
                "serializing voice profile",
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        let tmp = self.voice_dir.join(format!(".{stem}.tmp"));
        let path = self.profile_path(stem);

        if let Err(e) = fs::write(&tmp, &json).await {
            return Err(VoiceError::storage("writing voice profile", e));
        }
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(VoiceError::storage("committing voice profile", e));
        }
        Ok(())
    }
}
