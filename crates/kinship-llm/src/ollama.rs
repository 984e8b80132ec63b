//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API.
//!
//! # Features
//!
//! - HTTP communication with the `/api/generate` endpoint
//! - Configurable endpoint, model and timeout
//! - Retry logic with exponential backoff for retryable failures
//! - Blocking `LlmProvider` implementation backed by an owned runtime
//!
//! # Examples
//!
//! ```no_run
//! use kinship_llm::OllamaProvider;
//! use kinship_domain::traits::LlmProvider;
//! use std::time::Duration;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3")
//!     .unwrap()
//!     .with_timeout(Duration::from_secs(60));
//! let answer = provider.generate("Say hello").unwrap();
//! ```

use crate::LlmError;
use kinship_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (two minutes; local models are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API provider for local LLM inference
///
/// The blocking [`LlmProvider`](kinship_domain::traits::LlmProvider) methods
/// drive an internal single-threaded runtime, so they must not be called from
/// inside another async runtime. Async callers use [`generate_async`](Self::generate_async).
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u32,
    runtime: Runtime,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "llama2")
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client or the runtime cannot be created.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            runtime,
        })
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts per request (at least one)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// API endpoint in use
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate text using Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running or every attempt failed (`Communication`)
    /// - the last attempt exceeded the timeout (`Timeout`)
    /// - the model is not pulled (`ModelNotAvailable`)
    /// - the response body is not the expected JSON (`InvalidResponse`)
    pub async fn generate_async(&self, prompt: &str) -> Result<String, LlmError> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.attempt(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempts < self.max_retries => {
                    // Exponential backoff: 1s, 2s, 4s, etc.
                    let delay = Duration::from_secs(2u64.pow(attempts - 1));
                    warn!(
                        "Ollama attempt {}/{} failed: {}; retrying in {:?}",
                        attempts, self.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!("POST {} (model {}, {} prompt bytes)", url, self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(|e| self.request_error(e))?;
        parse_generate_response(&body)
    }

    fn request_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout.as_secs())
        } else {
            LlmError::Communication(format!("Request failed: {}", e))
        }
    }
}

fn parse_generate_response(body: &str) -> Result<String, LlmError> {
    serde_json::from_str::<OllamaGenerateResponse>(body)
        .map(|r| r.response)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.runtime.block_on(self.generate_async(prompt))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
