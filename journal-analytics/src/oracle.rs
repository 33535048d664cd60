//! Text oracle — the opaque text-completion seam.
//!
//! Callers hand a prompt to a [`TextOracle`] and relay whatever text comes
//! back, unmodified. [`GeminiClient`] is the production implementation.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::config::OracleConfig;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("API key not configured: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("oracle API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle response contained no text")]
    EmptyResponse,
}

/// Anything that turns a prompt into text.
pub trait TextOracle {
    fn complete(&self, prompt: &str) -> Result<String, OracleError>;

    /// Complete a prompt that refers to an attached image.
    fn complete_with_image(&self, prompt: &str, image: &InlineImage) -> Result<String, OracleError>;
}

/// An image sent inline with a prompt, already base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// MIME type from the file extension, for the formats the model accepts.
    pub fn mime_for_path(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "webp" => Some("image/webp"),
            "heic" => Some("image/heic"),
            "heif" => Some("image/heif"),
            _ => None,
        }
    }
}

// ─── Wire format ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: Blob<'a> },
}

#[derive(Debug, Serialize)]
struct Blob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
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

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// ─── Gemini client ──────────────────────────────────────────────────

/// Blocking client for the `generateContent` endpoint.
pub struct GeminiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    pub fn new(config: &OracleConfig, api_key: impl Into<String>) -> Result<Self, OracleError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
            generation: GenerationConfig {
                temperature: config.temperature,
                top_k: config.top_k,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
            },
        })
    }

    /// Read the API key from the environment variable named in the config.
    pub fn from_env(config: &OracleConfig) -> Result<Self, OracleError> {
        let key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| OracleError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, key)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body<'a>(&self, prompt: &'a str, image: Option<&'a InlineImage>) -> GenerateRequest<'a> {
        let mut parts = vec![Part::Text { text: prompt }];
        if let Some(image) = image {
            parts.push(Part::InlineData {
                inline_data: Blob {
                    mime_type: &image.mime_type,
                    data: &image.data,
                },
            });
        }
        GenerateRequest {
            contents: [Content { parts }],
            generation_config: self.generation,
        }
    }

    fn generate(&self, body: &GenerateRequest<'_>) -> Result<String, OracleError> {
        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json()?;
        let text = parsed.into_text().ok_or(OracleError::EmptyResponse)?;
        tracing::debug!(response_chars = text.len(), "completion received");
        Ok(text)
    }
}

impl TextOracle for GeminiClient {
    fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        tracing::info!(model = %self.model, prompt_chars = prompt.len(), "requesting completion");
        self.generate(&self.request_body(prompt, None))
    }

    fn complete_with_image(&self, prompt: &str, image: &InlineImage) -> Result<String, OracleError> {
        tracing::info!(
            model = %self.model,
            prompt_chars = prompt.len(),
            mime_type = %image.mime_type,
            image_bytes = image.data.len() / 4 * 3,
            "requesting completion with image"
        );
        self.generate(&self.request_body(prompt, Some(image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let client = GeminiClient::new(&OracleConfig::default(), "test-key").unwrap();
        let body = serde_json::to_value(client.request_body("hello", None)).unwrap();
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2000);
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-10);
        assert!((body["generationConfig"]["topP"].as_f64().unwrap() - 0.95).abs() < 1e-10);
    }

    #[test]
    fn endpoint_includes_model() {
        let config = OracleConfig {
            base_url: "http://localhost:8080/v1beta/".into(),
            ..OracleConfig::default()
        };
        let client = GeminiClient::new(&config, "k").unwrap();
        assert_eq!(
            client.endpoint(),
            format!("http://localhost:8080/v1beta/models/{}:generateContent", config.model)
        );
    }

    #[test]
    fn response_text_is_first_part_of_first_candidate() {
        let json = r###"{"candidates":[
            {"content":{"parts":[{"text":"## Executive Summary\n..."},{"text":"ignored"}]}},
            {"content":{"parts":[{"text":"second candidate"}]}}
        ]}"###;
        let resp: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_text().as_deref(), Some("## Executive Summary\n..."));
    }

    #[test]
    fn missing_candidates_is_empty() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert!(resp.into_text().is_none());
        let resp: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(resp.into_text().is_none());
    }

    #[test]
    fn from_env_requires_the_key() {
        let config = OracleConfig {
            api_key_env: "JOURNAL_TEST_UNSET_ORACLE_KEY".into(),
            ..OracleConfig::default()
        };
        let err = GeminiClient::from_env(&config).err().unwrap();
        assert!(matches!(err, OracleError::MissingApiKey(ref v) if v == "JOURNAL_TEST_UNSET_ORACLE_KEY"));
    }

    #[test]
    fn image_request_adds_inline_data_part() {
        let client = GeminiClient::new(&OracleConfig::default(), "k").unwrap();
        let image = InlineImage::from_bytes("image/png", b"\x89PNG");
        let body = serde_json::to_value(client.request_body("look", Some(&image))).unwrap();
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "look");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "iVBORw==");
        assert!(parts[1].get("text").is_none());
    }

    #[test]
    fn image_mime_from_extension() {
        assert_eq!(InlineImage::mime_for_path(Path::new("chart.PNG")), Some("image/png"));
        assert_eq!(InlineImage::mime_for_path(Path::new("a/b/setup.jpeg")), Some("image/jpeg"));
        assert_eq!(InlineImage::mime_for_path(Path::new("shot.webp")), Some("image/webp"));
        assert_eq!(InlineImage::mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(InlineImage::mime_for_path(Path::new("no_extension")), None);
    }

    /// Oracle double used by the prompt pipeline tests.
    struct Echo;

    impl TextOracle for Echo {
        fn complete(&self, prompt: &str) -> Result<String, OracleError> {
            Ok(format!("echo: {}", prompt.lines().next().unwrap_or_default()))
        }

        fn complete_with_image(&self, prompt: &str, image: &InlineImage) -> Result<String, OracleError> {
            Ok(format!("{} [{}]", self.complete(prompt)?, image.mime_type))
        }
    }

    #[test]
    fn trait_objects_relay_text() {
        let oracle: &dyn TextOracle = &Echo;
        assert_eq!(oracle.complete("first\nsecond").unwrap(), "echo: first");
        let image = InlineImage::from_bytes("image/jpeg", b"");
        assert_eq!(
            oracle.complete_with_image("chart", &image).unwrap(),
            "echo: chart [image/jpeg]"
        );
    }
}
