//! Gemini `generateContent` adapter.
//!
//! # Responsibility
//! - Send one prompt to the generative-language REST API.
//! - Map transport, status and body-shape failures onto `SynthesisError`.
//!
//! # Invariants
//! - Exactly one HTTP request per `synthesize` call; no retry.
//! - The API key is sent as a query parameter and never logged.

use crate::config::SynthesisConfig;
use crate::synth::{SynthesisError, SynthesisRequest, Synthesizer};
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const USER_ROLE: &str = "user";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Synthesizer backed by the Gemini REST API.
pub struct GeminiSynthesizer {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiSynthesizer {
    /// Builds an adapter with a client timeout from `config`.
    pub fn new(config: &SynthesisConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| SynthesisError::Setup(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.api_base.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
        })
    }

    async fn post_prompt(&self, prompt: &str) -> Result<String, SynthesisError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: USER_ROLE,
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|err| SynthesisError::Network(describe_transport_error(err)))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|err| SynthesisError::Network(describe_transport_error(err)))?;

        if !status.is_success() {
            return Err(SynthesisError::Status {
                code: status.as_u16(),
                body: raw,
            });
        }

        let decoded: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|err| SynthesisError::Parse(err.to_string()))?;
        extract_text(decoded)
    }
}

#[async_trait]
impl Synthesizer for GeminiSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        let started_at = Instant::now();
        info!(
            "event=synthesis_request module=synth status=start prompt_chars={}",
            request.prompt.chars().count()
        );

        match self.post_prompt(&request.prompt).await {
            Ok(text) => {
                info!(
                    "event=synthesis_request module=synth status=ok duration_ms={} text_chars={}",
                    started_at.elapsed().as_millis(),
                    text.chars().count()
                );
                Ok(text)
            }
            Err(err) => {
                error!(
                    "event=synthesis_request module=synth status=error duration_ms={} error_code={}",
                    started_at.elapsed().as_millis(),
                    err.code()
                );
                Err(err)
            }
        }
    }
}

/// Takes the first candidate's first text part, trimmed.
fn extract_text(response: GenerateContentResponse) -> Result<String, SynthesisError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or(SynthesisError::EmptyResponse)?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SynthesisError::EmptyResponse);
    }
    Ok(trimmed.to_string())
}

fn describe_transport_error(err: reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "unable to reach the API".to_string()
    } else {
        // Strip the URL so the API key query parameter never leaks.
        err.without_url().to_string()
    }
}
