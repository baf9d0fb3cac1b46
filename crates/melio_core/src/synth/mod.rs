//! Concept synthesizer contract.
//!
//! # Responsibility
//! - Define the request/response boundary to the external generative service.
//! - Classify failures so the controller can degrade placeholder text.
//!
//! # Invariants
//! - One request per merge; adapters never retry.

use crate::prompt::build_prompt;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod gemini;

pub use gemini::GeminiSynthesizer;

/// Input for one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub source_a: String,
    pub source_b: String,
    /// Prompt derived from both sources by the prompt policy.
    pub prompt: String,
}

impl SynthesisRequest {
    /// Builds a request, choosing the prompt template from the source texts.
    pub fn from_sources(source_a: impl Into<String>, source_b: impl Into<String>) -> Self {
        let source_a = source_a.into();
        let source_b = source_b.into();
        let prompt = build_prompt(&source_a, &source_b);
        Self {
            source_a,
            source_b,
            prompt,
        }
    }
}

/// External collaborator producing one text from two source fragments.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, SynthesisError>;
}

/// Failure of a synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// Transport failure before a response status was received.
    Network(String),
    /// Service answered with a non-success status.
    Status { code: u16, body: String },
    /// Response body was not valid JSON for the expected envelope.
    Parse(String),
    /// Response decoded but carried no usable text.
    EmptyResponse,
    /// Adapter could not be constructed from its configuration.
    Setup(String),
    /// The synthesis task ended without a result, e.g. it panicked.
    Aborted(String),
}

impl SynthesisError {
    /// Text written into the placeholder block when synthesis fails.
    pub fn placeholder_text(&self) -> &'static str {
        match self {
            Self::Network(_) | Self::Status { .. } | Self::Setup(_) | Self::Aborted(_) => {
                "Error: connection failed!"
            }
            Self::Parse(_) => "Error: unreadable response",
            Self::EmptyResponse => "Error: no concept generated",
        }
    }

    /// Session-level message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) | Self::Status { .. } | Self::Setup(_) | Self::Aborted(_) => {
                "Something went wrong while talking to the AI. Check your connection."
            }
            Self::Parse(_) => "Unexpected response from the AI. Please try again.",
            Self::EmptyResponse => {
                "Could not generate the concept. The AI response had an unexpected shape."
            }
        }
    }

    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Parse(_) => "parse",
            Self::EmptyResponse => "empty_response",
            Self::Setup(_) => "setup",
            Self::Aborted(_) => "aborted",
        }
    }
}

impl Display for SynthesisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "synthesis network error: {message}"),
            Self::Status { code, body } => write!(f, "synthesis failed with status {code}: {body}"),
            Self::Parse(message) => write!(f, "synthesis response could not be parsed: {message}"),
            Self::EmptyResponse => write!(f, "synthesis response contained no text"),
            Self::Setup(message) => write!(f, "synthesizer setup failed: {message}"),
            Self::Aborted(message) => write!(f, "synthesis task aborted: {message}"),
        }
    }
}

impl Error for SynthesisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_sources_and_policy_prompt() {
        let request = SynthesisRequest::from_sources("skywars", "no blocks");
        assert_eq!(request.source_a, "skywars");
        assert_eq!(request.source_b, "no blocks");
        assert!(request.prompt.contains("challenge"));
    }

    #[test]
    fn each_failure_kind_has_distinct_placeholder_text() {
        let network = SynthesisError::Network("refused".to_string());
        let parse = SynthesisError::Parse("eof".to_string());
        let empty = SynthesisError::EmptyResponse;
        assert_ne!(network.placeholder_text(), parse.placeholder_text());
        assert_ne!(parse.placeholder_text(), empty.placeholder_text());
        assert_eq!(
            SynthesisError::Status {
                code: 500,
                body: String::new()
            }
            .placeholder_text(),
            network.placeholder_text()
        );
    }

    #[test]
    fn aborted_task_reads_as_connection_failure() {
        let aborted = SynthesisError::Aborted("task panicked".to_string());
        assert_eq!(aborted.code(), "aborted");
        assert_eq!(aborted.placeholder_text(), "Error: connection failed!");
        assert!(aborted.to_string().contains("task panicked"));
    }
}
