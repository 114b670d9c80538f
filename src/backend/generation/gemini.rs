/**
 * Gemini Image Generator
 *
 * Sends the prompt to `POST {base_url}/v1beta/models/{model}:generateContent`
 * and reads the first text part of the first candidate as the image URL.
 *
 * # Status Mapping
 *
 * - 429 → `RateLimited`
 * - 401 / 403, or a 400 whose body names `API_KEY_INVALID` → `InvalidCredentials`
 * - other non-success → `Upstream`
 * - no candidates / no `http` text → `MalformedResponse`
 *
 * The API key travels in the `x-goog-api-key` header and is never logged.
 */

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{parse_image_url, GenerationError, ImageGenerator};

/// Connection settings for the Gemini API
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiImageGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiImageGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenerationError::Request)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(prompt: &str) -> GenerateContentRequest<'static> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart {
                    text: format!(
                        "Generate a high-quality, realistic image (1024x1024) of: {}. \
                         Return a publicly accessible image URL.",
                        prompt
                    ),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: 1024,
            },
        }
    }
}

fn classify_failure(status: StatusCode, body: &str) -> GenerationError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::InvalidCredentials,
        StatusCode::BAD_REQUEST if body.contains("API_KEY_INVALID") => {
            GenerationError::InvalidCredentials
        }
        other => GenerationError::Upstream {
            status: other.as_u16(),
        },
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::NotConfigured)?;

        tracing::debug!(model = %self.config.model, "Requesting image generation");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status, &body);
            tracing::warn!(status = status.as_u16(), error = %err, "Image generation rejected");
            return Err(err);
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                GenerationError::MalformedResponse("no candidates returned".to_string())
            })?;

        parse_image_url(&text)
    }
}
