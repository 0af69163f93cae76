//! OpenAI-compatible chat-completions client.
//!
//! The analyzers, the assistant and report text extraction all talk to the
//! provider through [`TextGenerator`], so handlers and services can be tested
//! without network access.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors from the text generation provider
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No usable API key is configured
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP client could not be constructed
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success status
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response could not be understood
    #[error("API response parse failed: {0}")]
    ApiParse(String),
}

/// Base64 image attached to a prompt
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub base64_data: String,
}

impl InlineImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

/// A single prompt to the text generator
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Overrides the client's default model
    pub model: Option<String>,
    pub system: Option<String>,
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Ask the provider for a JSON object reply
    pub json_mode: bool,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: None,
            system: None,
            prompt: prompt.into(),
            image: None,
            max_tokens: 1000,
            temperature: 0.7,
            json_mode: false,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// Text returned by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedText {
    pub text: String,
    pub model: String,
}

/// Produces text from a prompt
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedText, GenerationError>;

    /// Model used when a request does not name one
    fn default_model(&self) -> String;
}

/// Chat-completions client for OpenAI and compatible providers
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: &str, model: &str) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GenerationError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, GenerationError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(GenerationError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedText, GenerationError> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        debug!("Sending chat completion request: model={}, max_tokens={}", model, request.max_tokens);

        let body = build_chat_completions_body(&model, &request);
        let text = self.send_json("/chat/completions", &body).await?;
        parse_chat_completions_response(&text, &model)
    }

    fn default_model(&self) -> String {
        self.model.clone()
    }
}

/// Wire body for `/chat/completions`
pub(crate) fn build_chat_completions_body(model: &str, request: &GenerationRequest) -> Value {
    let mut messages = Vec::new();
    if let Some(system) = request.system.as_deref().filter(|s| !s.trim().is_empty()) {
        messages.push(json!({ "role": "system", "content": system }));
    }

    let user_content = match &request.image {
        Some(image) => json!([
            { "type": "text", "text": request.prompt },
            { "type": "image_url", "image_url": { "url": image.data_uri() } },
        ]),
        None => json!(request.prompt),
    };
    messages.push(json!({ "role": "user", "content": user_content }));

    let mut body = json!({
        "model": model,
        "messages": messages,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
    });
    if request.json_mode {
        body["response_format"] = json!({ "type": "json_object" });
    }
    body
}

pub(crate) fn parse_chat_completions_response(json_text: &str, requested_model: &str) -> Result<GeneratedText, GenerationError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| GenerationError::ApiParse(e.to_string()))?;
    let model = root
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or(requested_model)
        .to_string();

    let Some(choice) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(GenerationError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };

    let text = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(GeneratedText { text, model })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_response() {
        let json = json!({
            "model": "gpt-4o-2024-08-06",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "Hello!" } }]
        })
        .to_string();
        let reply = parse_chat_completions_response(&json, "gpt-4o").unwrap();
        assert_eq!(reply.text, "Hello!");
        assert_eq!(reply.model, "gpt-4o-2024-08-06");
    }

    #[test]
    fn test_parse_null_content_is_empty() {
        let json = json!({ "choices": [{ "message": { "content": null } }] }).to_string();
        let reply = parse_chat_completions_response(&json, "gpt-4o").unwrap();
        assert!(reply.text.is_empty());
        assert_eq!(reply.model, "gpt-4o");
    }

    #[test]
    fn test_parse_missing_choices() {
        let json = json!({ "choices": [] }).to_string();
        assert!(parse_chat_completions_response(&json, "gpt-4o").is_err());
    }

    #[test]
    fn test_body_with_image_and_json_mode() {
        let request = GenerationRequest {
            image: Some(InlineImage { mime_type: "image/png".to_string(), base64_data: "AAAA".to_string() }),
            ..GenerationRequest::new("Read this").with_system("You read labels").json()
        };
        let body = build_chat_completions_body("gpt-4o-mini", &request);

        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"][1]["image_url"]["url"], "data:image/png;base64,AAAA");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_body_without_system_prompt() {
        let body = build_chat_completions_body("gpt-4o", &GenerationRequest::new("Hi"));
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["content"], "Hi");
        assert!(body.get("response_format").is_none());
    }
}
