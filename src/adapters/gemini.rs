//! Google Gemini `generateContent` client.
//!
//! All configuration, including the API key, is passed in at construction;
//! nothing here reads the process environment.

use crate::config::{ModelConfig, RetryConfig};
use crate::domain::ports::{GenerationRequest, GenerativeModel};
use crate::utils::error::ModelError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    retry: RetryConfig,
}

impl GeminiClient {
    pub fn new(model: &ModelConfig, retry: RetryConfig) -> Result<Self, ModelError> {
        let api_key = model
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ModelError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(model.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: model.name.clone(),
            base_url: model.base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn backoff(&self, attempt: u32) -> Duration {
        // 1x, 2x, 4x ... the base delay
        let factor = 1u64 << (attempt - 1).min(16);
        Duration::from_millis(self.retry.base_delay_ms.saturating_mul(factor))
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ModelError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_mime_type: request.json_mode.then_some(JSON_MIME_TYPE),
            },
        };

        let url = self.endpoint();
        let max_attempts = self.retry.max_attempts.max(1);
        let mut last_error: Option<ModelError> = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let delay = self.backoff(attempt);
                warn!(
                    "Model call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    warn!("Model request failed: {}", e);
                    last_error = Some(ModelError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Model API returned {}: {}", status, body);
                last_error = Some(ModelError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(ModelError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GenerateContentResponse = response.json().await?;
            if let Some(usage) = &parsed.usage_metadata {
                debug!(
                    "Model call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return parsed.text().ok_or(ModelError::EmptyContent);
        }

        // A single attempt surfaces its own error; exhausted retries say so.
        match last_error {
            Some(err) if max_attempts == 1 => Err(err),
            Some(err) => {
                warn!("Giving up after {} attempts: {}", max_attempts, err);
                Err(ModelError::RetriesExhausted {
                    attempts: max_attempts,
                })
            }
            None => Err(ModelError::RetriesExhausted {
                attempts: max_attempts,
            }),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
