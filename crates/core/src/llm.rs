//! LLM collaborator boundary.
//!
//! The pipeline only needs "prompt in, text out". [`TextGenerator`] is that
//! seam; [`GeminiClient`] implements it against Google's Generative Language
//! API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Result;

/// Default sampling temperature for every generation step.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Gemini model tiers offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// Higher quality, higher cost.
    #[default]
    #[serde(alias = "gemini-1.5-pro")]
    Pro,
    /// Faster and cheaper.
    #[serde(alias = "gemini-1.5-flash")]
    Flash,
}

impl Model {
    /// API model identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Model::Pro => "gemini-1.5-pro",
            Model::Flash => "gemini-1.5-flash",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pro" | "gemini-1.5-pro" => Ok(Self::Pro),
            "flash" | "gemini-1.5-flash" => Ok(Self::Flash),
            _ => Err(format!("Invalid model: {}. Valid options: pro, flash", s)),
        }
    }
}

/// A single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub model: Model,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, model: Model) -> Self {
        Self { prompt: prompt.into(), temperature: DEFAULT_TEMPERATURE, model }
    }
}

/// Free-text generation from a prompt.
///
/// Implementations return [`crate::AutowriterError::Generation`] when the
/// remote call does not succeed. Callers never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[cfg(feature = "http")]
pub use gemini::{GeminiClient, GeminiConfig};

#[cfg(feature = "http")]
mod gemini {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::Client;
    use serde::{Deserialize, Serialize};

    use super::{GenerationRequest, TextGenerator};
    use crate::error::truncate_body;
    use crate::{AutowriterError, Result};

    const ERROR_BODY_CHARS: usize = 500;

    /// Connection settings for the Gemini API.
    #[derive(Debug, Clone)]
    pub struct GeminiConfig {
        /// API root, without a trailing slash.
        pub base_url: String,
        /// Request timeout in seconds.
        pub timeout: u64,
    }

    impl Default for GeminiConfig {
        fn default() -> Self {
            Self { base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(), timeout: 90 }
        }
    }

    /// Gemini `generateContent` client authenticated with an API key.
    pub struct GeminiClient {
        api_key: String,
        config: GeminiConfig,
        client: Client,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct GenerateBody<'a> {
        contents: [Content<'a>; 1],
        generation_config: GenerationConfig,
    }

    #[derive(Serialize)]
    struct Content<'a> {
        parts: [Part<'a>; 1],
    }

    #[derive(Serialize)]
    struct Part<'a> {
        text: &'a str,
    }

    #[derive(Serialize)]
    struct GenerationConfig {
        temperature: f32,
    }

    #[derive(Deserialize, Default)]
    struct GenerateResponse {
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
        parts: Vec<CandidatePart>,
    }

    #[derive(Deserialize)]
    struct CandidatePart {
        text: Option<String>,
    }

    impl GenerateResponse {
        fn into_text(self) -> Option<String> {
            self.candidates.into_iter().next()?.content?.parts.into_iter().next()?.text
        }
    }

    impl GeminiClient {
        pub fn new(api_key: impl Into<String>) -> Result<Self> {
            Self::with_config(api_key, GeminiConfig::default())
        }

        pub fn with_config(api_key: impl Into<String>, config: GeminiConfig) -> Result<Self> {
            let api_key = api_key.into().trim().to_string();
            if api_key.is_empty() {
                return Err(AutowriterError::ConfigError("Gemini API key is not set".to_string()));
            }

            let client = Client::builder()
                .timeout(Duration::from_secs(config.timeout))
                .build()
                .map_err(AutowriterError::HttpError)?;

            Ok(Self { api_key, config, client })
        }

        fn endpoint(&self, model: &str) -> String {
            format!("{}/models/{}:generateContent", self.config.base_url.trim_end_matches('/'), model)
        }
    }

    #[async_trait]
    impl TextGenerator for GeminiClient {
        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            let body = GenerateBody {
                contents: [Content { parts: [Part { text: &request.prompt }] }],
                generation_config: GenerationConfig { temperature: request.temperature },
            };

            tracing::debug!(model = request.model.id(), prompt_chars = request.prompt.chars().count(), "calling Gemini");

            let response = self
                .client
                .post(self.endpoint(request.model.id()))
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        AutowriterError::Timeout { timeout: self.config.timeout }
                    } else {
                        AutowriterError::HttpError(e)
                    }
                })?;

            let status = response.status();
            let text = response.text().await?;

            if !status.is_success() {
                return Err(AutowriterError::Generation {
                    status: status.as_u16(),
                    body: truncate_body(&text, ERROR_BODY_CHARS),
                });
            }

            let parsed: GenerateResponse = serde_json::from_str(&text)?;
            parsed.into_text().ok_or_else(|| AutowriterError::Generation {
                status: status.as_u16(),
                body: truncate_body(&text, ERROR_BODY_CHARS),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_gemini_config_default() {
            let config = GeminiConfig::default();
            assert_eq!(config.timeout, 90);
            assert!(config.base_url.starts_with("https://generativelanguage.googleapis.com"));
        }

        #[test]
        fn test_empty_api_key_rejected() {
            let result = GeminiClient::new("   ");
            assert!(matches!(result, Err(AutowriterError::ConfigError(_))));
        }

        #[test]
        fn test_endpoint() {
            let client = GeminiClient::with_config(
                "key",
                GeminiConfig { base_url: "http://localhost:9/v1beta/".to_string(), timeout: 5 },
            )
            .unwrap();
            assert_eq!(
                client.endpoint("gemini-1.5-flash"),
                "http://localhost:9/v1beta/models/gemini-1.5-flash:generateContent"
            );
        }

        #[test]
        fn test_response_text_extraction() {
            let json = r#"{"candidates":[{"content":{"parts":[{"text":"<h2>A</h2>"}]}}]}"#;
            let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
            assert_eq!(parsed.into_text().as_deref(), Some("<h2>A</h2>"));
        }

        #[test]
        fn test_response_without_candidates() {
            let parsed: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
            assert!(parsed.into_text().is_none());
        }

        #[test]
        fn test_request_body_shape() {
            let body = GenerateBody {
                contents: [Content { parts: [Part { text: "hi" }] }],
                generation_config: GenerationConfig { temperature: 0.2 },
            };
            let value = serde_json::to_value(&body).unwrap();
            assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
            assert!(value["generationConfig"]["temperature"].is_number());
        }
    }
}
