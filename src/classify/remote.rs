//! Optional remote-inference substitution: instead of a local voice
//! pipeline, recorded audio is posted to a classification backend that
//! answers with a single `{ emotion, confidence: 0..1 }` pair.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use serde::Deserialize;

use super::RawClassification;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    emotion: String,
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Blocking HTTP client for the backend's `/health` and `/classify`
/// endpoints. Call through `tokio::task::spawn_blocking` from async code.
pub struct RemoteEmotionClient {
    base_url: String,
    client: Client,
}

impl RemoteEmotionClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url: String = base_url.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("health check against {url} failed"))?;

        if !response.status().is_success() {
            return Ok(false);
        }
        let health: HealthResponse = response.json().context("health response was not json")?;
        Ok(health.status.eq_ignore_ascii_case("ok"))
    }

    /// Classify a recorded WAV clip server-side. The backend returns one
    /// label with confidence in 0..1, rescaled here to the 0..100 contract
    /// and wrapped in a one-element batch (the per-tick averaging over a
    /// single value is the value itself).
    pub fn classify_recording(&self, wav_bytes: Vec<u8>) -> Result<Vec<RawClassification>> {
        let url = format!("{}/classify", self.base_url);
        let part = multipart::Part::bytes(wav_bytes)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .context("invalid audio mime type")?;
        let form = multipart::Form::new().part("audio", part).text("message", "");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .with_context(|| format!("classify request to {url} failed"))?
            .error_for_status()
            .context("classify endpoint returned an error status")?;

        let parsed: ClassifyResponse = response.json().context("classify response was not json")?;
        Ok(vec![rescale(parsed)])
    }
}

fn rescale(response: ClassifyResponse) -> RawClassification {
    RawClassification::new(response.emotion, response.confidence * 100.0)
}
