//! Configuration for the voice client
//!
//! Configuration is read once at process startup from environment variables
//! (after an optional `.env` pass via `dotenvy`) into an explicit
//! [`AppConfig`] value. There are no ambient globals: the request client and
//! the voice store each receive the parts of the config they need at
//! construction time.
//!
//! # Example
//! ```rust,no_run
//! use sesame_voice::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! println!("voice profiles stored under {}", config.voice_dir.display());
//! # Ok(())
//! # }
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::client::RetryPolicy;
use crate::error::{VoiceError, VoiceResult};

/// Default hosted inference endpoint for the CSM-1B model.
///
/// Both logical operations (synthesis and voice extraction) post to this
/// URL; the upstream routes on the payload shape.
pub const DEFAULT_API_URL: &str = "https://api-inference.huggingface.co/models/sesame/csm-1b";

/// Default directory for persisted voice profiles
pub const DEFAULT_VOICE_DIR: &str = "voice_models";

/// Default directory for generated audio files (used by the CLI)
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Process-wide client configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bearer token for the hosted inference service
    pub api_token: String,
    /// Inference endpoint URL
    pub api_url: String,
    /// Directory holding one JSON artifact per cloned voice
    pub voice_dir: PathBuf,
    /// Directory the CLI writes generated audio into
    pub output_dir: PathBuf,
    /// Retry behavior for transient upstream failures
    pub retry: RetryPolicy,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Reads a `.env` file first if one exists, then the process
    /// environment. `HF_API_TOKEN` is required; everything else has a
    /// default. The returned config is already validated.
    pub fn from_env() -> VoiceResult<Self> {
        let _ = dotenvy::dotenv();

        let api_token = env::var("HF_API_TOKEN").map_err(|_| {
            VoiceError::InvalidConfiguration(
                "HF_API_TOKEN is not set; add it to the environment or a .env file".to_string(),
            )
        })?;

        let api_url = env::var("SESAME_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let voice_dir = env::var("VOICE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_VOICE_DIR));
        let output_dir = env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let mut retry = RetryPolicy::default();
        if let Some(max_attempts) = parse_env("TTS_MAX_RETRIES")? {
            retry.max_attempts = max_attempts;
        }
        if let Some(base_ms) = parse_env::<u64>("TTS_RETRY_BASE_MS")? {
            retry.base_delay = Duration::from_millis(base_ms);
        }
        if let Some(multiplier) = parse_env("TTS_RETRY_MULTIPLIER")? {
            retry.backoff_multiplier = multiplier;
        }

        let config = Self {
            api_token,
            api_url,
            voice_dir,
            output_dir,
            retry,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. Called by [`AppConfig::from_env`];
    /// callers constructing a config by hand should call it themselves.
    pub fn validate(&self) -> VoiceResult<()> {
        if self.api_token.trim().is_empty() {
            return Err(VoiceError::InvalidConfiguration(
                "API token must not be empty".to_string(),
            ));
        }
        if self.api_url.trim().is_empty() {
            return Err(VoiceError::InvalidConfiguration(
                "API URL must not be empty".to_string(),
            ));
        }
        self.retry.validate()
    }
}

/// Parse an optional environment variable, turning parse failures into
/// configuration errors rather than silently using a default.
fn parse_env<T: std::str::FromStr>(name: &str) -> VoiceResult<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            VoiceError::InvalidConfiguration(format!("{name} has an unparseable value: {raw:?}"))
        }),
        Err(_) => Ok(None),
    }
}
