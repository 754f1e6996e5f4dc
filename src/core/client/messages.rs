//! Wire types for the hosted inference endpoints.
//!
//! Each endpoint gets an explicit request schema rather than an ad-hoc JSON
//! value, so payloads are validated before anything touches the network.
//! The shapes follow the HF inference convention: an `inputs` field plus an
//! optional `parameters` object.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

use crate::error::{VoiceError, VoiceResult};

/// Task tag the cloning endpoint dispatches on
pub const VOICE_EXTRACTION_TASK: &str = "voice_extraction";

/// Conditioning values attached to a cloned voice.
///
/// Opaque to this crate beyond round-tripping: the upstream model produces
/// them at clone time and consumes them at synthesis time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceParameters {
    #[serde(default)]
    pub pitch: f32,
    #[serde(default)]
    pub timbre: f32,
    #[serde(default = "default_pace")]
    pub pace: f32,
}

fn default_pace() -> f32 {
    1.0
}

impl Default for VoiceParameters {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            timbre: 0.0,
            pace: 1.0,
        }
    }
}

/// Text-to-speech request body
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisRequest {
    pub inputs: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<SynthesisParameters>,
}

/// Optional synthesis conditioning: a preset or cloned-voice name plus the
/// voice parameters captured at clone time.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisParameters {
    pub voice_preset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timbre: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<f32>,
}

impl SynthesisRequest {
    /// Plain synthesis with the model's default voice
    pub fn new(text: &str) -> VoiceResult<Self> {
        if text.trim().is_empty() {
            return Err(VoiceError::Validation(
                "text must not be empty".to_string(),
            ));
        }
        Ok(Self {
            inputs: text.to_string(),
            parameters: None,
        })
    }

    /// Synthesis conditioned on a built-in preset
    pub fn with_preset(text: &str, preset: &str) -> VoiceResult<Self> {
        let mut request = Self::new(text)?;
        request.parameters = Some(SynthesisParameters {
            voice_preset: preset.to_string(),
            pitch: None,
            timbre: None,
            pace: None,
        });
        Ok(request)
    }

    /// Synthesis conditioned on a cloned voice
    pub fn with_cloned_voice(
        text: &str,
        voice_name: &str,
        parameters: &VoiceParameters,
    ) -> VoiceResult<Self> {
        let mut request = Self::new(text)?;
        request.parameters = Some(SynthesisParameters {
            voice_preset: voice_name.to_string(),
            pitch: Some(parameters.pitch),
            timbre: Some(parameters.timbre),
            pace: Some(parameters.pace),
        });
        Ok(request)
    }
}

/// Voice extraction (cloning) request body. The reference sample travels
/// base64-encoded inside the JSON payload.
#[derive(Debug, Clone, Serialize)]
pub struct CloneRequest {
    pub inputs: String,
    pub parameters: CloneParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct CloneParameters {
    pub task: String,
}

impl CloneRequest {
    pub fn new(sample: &[u8]) -> VoiceResult<Self> {
        if sample.is_empty() {
            return Err(VoiceError::Validation(
                "audio sample must not be empty".to_string(),
            ));
        }
        Ok(Self {
            inputs: BASE64.encode(sample),
            parameters: CloneParameters {
                task: VOICE_EXTRACTION_TASK.to_string(),
            },
        })
    }
}

/// Body returned by a successful voice extraction call
#[derive(Debug, Clone, Deserialize)]
pub struct CloneResponse {
    #[serde(default)]
    pub parameters: VoiceParameters,
}
