//! Image Generation
//!
//! Turning a prompt into a hosted image URL is an external capability. The
//! rest of the backend only sees the [`ImageGenerator`] trait; the shipped
//! implementation talks to the Gemini `generateContent` API.

use async_trait::async_trait;
use thiserror::Error;

pub mod gemini;

pub use gemini::{GeminiConfig, GeminiImageGenerator};

/// Image generation failures
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key configured, so no request was sent
    #[error("image generation is not configured")]
    NotConfigured,

    /// Upstream answered 429
    #[error("image generation rate limit exceeded")]
    RateLimited,

    /// Upstream rejected the API key
    #[error("image generation credentials rejected")]
    InvalidCredentials,

    /// Upstream answered but without a usable image URL
    #[error("malformed image generation response: {0}")]
    MalformedResponse(String),

    /// Upstream answered with another error status
    #[error("image generation failed with status {status}")]
    Upstream { status: u16 },

    /// No answer within the configured timeout
    #[error("image generation timed out")]
    Timeout,

    /// Connection or protocol failure
    #[error("image generation request failed: {0}")]
    Request(reqwest::Error),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}

/// Prompt in, hosted image URL out
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Accept only absolute http(s) URLs as generator output
pub fn parse_image_url(text: &str) -> Result<String, GenerationError> {
    let url = text.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(GenerationError::MalformedResponse(
            "response did not contain an image URL".to_string(),
        ))
    }
}
