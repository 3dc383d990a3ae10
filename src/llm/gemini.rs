//! Gemini API client implementation
//!
//! This module implements the LlmClient trait for the Google Gemini
//! generateContent API, including JSON-mode structured output.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{EdugenError, Result};
use crate::llm::client::LlmClient;
use crate::llm::types::{CompletionRequest, CompletionResponse, Role, StopReason, Usage};

/// Gemini API base URL
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model to use
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default max output tokens
const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Default sampling temperature (generation is intentionally non-deterministic)
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Environment variable holding the API key
const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(300),
        }
    }
}

impl GeminiConfig {
    /// Create a new config with a specific model
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: GeminiConfig,
    usage: Arc<Mutex<Usage>>,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// Reads the API key from the environment variable `env_var`
    /// (GEMINI_API_KEY when None).
    pub fn new(config: GeminiConfig, env_var: Option<&str>) -> Result<Self> {
        let env_var = env_var.unwrap_or(DEFAULT_API_KEY_ENV);
        let api_key = std::env::var(env_var)
            .map_err(|_| EdugenError::Transport(format!("{} not set", env_var)))?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EdugenError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    /// Build the request body for the generateContent endpoint
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let contents: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::User => "user",
                        Role::Assistant => "model",
                    },
                    "parts": [{ "text": m.content }]
                })
            })
            .collect();

        let mut generation_config = json!({
            "temperature": request.temperature.unwrap_or(self.config.temperature),
            "maxOutputTokens": request.max_tokens.unwrap_or(self.config.max_tokens),
        });

        // JSON mode: constrain output to the caller's schema
        if let Some(schema) = &request.response_schema {
            generation_config["responseMimeType"] = json!("application/json");
            generation_config["responseSchema"] = schema.clone();
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": generation_config,
        });

        if !request.system.is_empty() {
            body["systemInstruction"] = json!({
                "parts": [{ "text": request.system }]
            });
        }

        body
    }

    /// Parse the API response into a CompletionResponse
    fn parse_response(&self, body: Value) -> Result<CompletionResponse> {
        let candidate = body["candidates"]
            .get(0)
            .ok_or_else(|| EdugenError::Transport("response contained no candidates".to_string()))?;

        let stop_reason = match candidate["finishReason"].as_str() {
            Some("STOP") | None => StopReason::EndTurn,
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            Some("SAFETY") => StopReason::Safety,
            Some(_) => StopReason::Other,
        };

        let usage = if let Some(u) = body.get("usageMetadata") {
            Usage::new(
                u["promptTokenCount"].as_u64().unwrap_or(0),
                u["candidatesTokenCount"].as_u64().unwrap_or(0),
            )
        } else {
            Usage::default()
        };

        // Track cumulative usage
        {
            let mut total = self.usage.lock().unwrap();
            total.add(&usage);
        }

        let mut content = String::new();
        if let Some(parts) = candidate["content"]["parts"].as_array() {
            for part in parts {
                if let Some(text) = part["text"].as_str() {
                    content.push_str(text);
                }
            }
        }

        Ok(CompletionResponse {
            content,
            stop_reason,
            usage,
        })
    }

    /// Send a request to the Gemini API
    async fn send_request(&self, model: &str, body: Value) -> Result<Value> {
        let url = format!("{}/{}:generateContent", GEMINI_API_URL, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EdugenError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(EdugenError::Transport(format!(
                "Rate limited, retry after {} seconds",
                retry_after
            )));
        }

        // Handle other errors
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EdugenError::Transport(format!(
                "API error {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| EdugenError::Transport(format!("Failed to parse response: {}", e)))
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        self.usage.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.model.clone());
        let body = self.build_request(&request);
        let response = self.send_request(&model, body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("max_tokens", &self.config.max_tokens)
            .field("temperature", &self.config.temperature)
            .finish()
    }
}
