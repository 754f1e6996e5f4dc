//! HTTP request client for the hosted inference service.
//!
//! Wraps a single outbound call with bounded retry-on-transient behavior.
//! The client is stateless across calls: every `call()` runs the same
//! `Sending -> {Success, Retryable -> Sending, Failed}` loop against the
//! configured endpoint, and the only thing that varies between calls is the
//! payload.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::core::client::policy::RetryPolicy;
use crate::error::{VoiceError, VoiceResult};

/// Content type assumed when the upstream omits the header
const DEFAULT_CONTENT_TYPE: &str = "audio/wav";

/// Per-request timeout; hosted inference can take a while on cold models
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Raw synthesized audio as returned by the upstream, unmodified.
///
/// Ownership transfers to the caller, which decides whether to write it to
/// disk or stream it onward.
#[derive(Debug, Clone)]
pub struct AudioResult {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Sleep abstraction so the retry schedule is testable without wall-clock
/// delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer
#[derive(Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry-aware client for the inference endpoint.
///
/// Holds the pieces of process configuration that shape requests: the
/// endpoint URL, the bearer token, and the retry policy. No other state
/// survives between calls.
pub struct RequestClient {
    http: reqwest::Client,
    endpoint: String,
    api_token: String,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RequestClient {
    /// Build a client from the process configuration
    pub fn new(config: &AppConfig) -> VoiceResult<Self> {
        Self::with_sleeper(config, Arc::new(TokioSleeper))
    }

    /// Build a client with an injected sleeper (tests pass a recording
    /// implementation here).
    pub fn with_sleeper(config: &AppConfig, sleeper: Arc<dyn Sleeper>) -> VoiceResult<Self> {
        config.retry.validate()?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VoiceError::InvalidConfiguration(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.api_url.clone(),
            api_token: config.api_token.clone(),
            policy: config.retry.clone(),
            sleeper,
        })
    }

    /// The endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post a payload to the inference endpoint, retrying on
    /// transient-unavailable responses per the configured policy.
    ///
    /// Transport errors are treated like transient statuses and share the
    /// same backoff schedule. Auth and other non-transient failures return
    /// after a single attempt.
    pub async fn call<T: Serialize + Sync>(&self, payload: &T) -> VoiceResult<AudioResult> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(
                endpoint = %self.endpoint,
                attempt,
                max_attempts = self.policy.max_attempts,
                "sending inference request"
            );

            match self.send_once(payload).await {
                Ok(audio) => {
                    debug!(bytes = audio.data.len(), attempt, "inference request succeeded");
                    return Ok(audio);
                }
                Err(err) if err.is_transient() => {
                    if attempt >= self.policy.max_attempts {
                        warn!(attempt, "retry budget exhausted");
                        return Err(self.exhausted(err, attempt));
                    }
                    let delay = self.policy.delay_for_attempt(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient upstream failure, backing off"
                    );
                    self.sleeper.sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One attempt: send, classify, and read the body on success.
    async fn send_once<T: Serialize + Sync>(&self, payload: &T) -> VoiceResult<AudioResult> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| VoiceError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();
            let data = response
                .bytes()
                .await
                .map_err(|e| VoiceError::Network(format!("failed to read response body: {e}")))?
                .to_vec();
            return Ok(AudioResult { data, content_type });
        }

        let code = status.as_u16();
        if self.policy.is_retryable_status(code) {
            return Err(VoiceError::TransientService {
                status: code,
                attempts: 1,
            });
        }

        let message = response.text().await.unwrap_or_default();
        match code {
            401 | 403 => Err(VoiceError::Auth(format!(
                "upstream rejected credentials ({code}): {message}"
            ))),
            _ => Err(VoiceError::Provider {
                status: code,
                message,
            }),
        }
    }

    /// Fold the final transient failure into an exhaustion error carrying
    /// the true attempt count.
    fn exhausted(&self, last: VoiceError, attempts: u32) -> VoiceError {
        match last {
            VoiceError::TransientService { status, .. } => {
                VoiceError::TransientService { status, attempts }
            }
            other => other,
        }
    }
}
