//! Retry-aware request layer for the hosted inference service

mod messages;
mod policy;
mod request;

pub use messages::{
    CloneParameters, CloneRequest, CloneResponse, SynthesisParameters, SynthesisRequest,
    VOICE_EXTRACTION_TASK, VoiceParameters,
};
pub use policy::{RetryPolicy, SERVICE_UNAVAILABLE};
pub use request::{AudioResult, RequestClient, Sleeper, TokioSleeper};
