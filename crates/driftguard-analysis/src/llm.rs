use std::time::Duration;

use driftguard_core::{DriftError, LlmConfig};
use serde::{Deserialize, Serialize};

/// A message in a chat conversation with the LLM.
///
/// # Examples
///
/// ```
/// use driftguard_analysis::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage {
///     role: Role::User,
///     content: "Audit this documentation".into(),
/// };
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

/// Role in the chat conversation.
///
/// # Examples
///
/// ```
/// use driftguard_analysis::llm::Role;
///
/// let role = Role::System;
/// assert_eq!(serde_json::to_string(&role).unwrap(), "\"system\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// A successful completion together with the model that produced it.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Raw response text.
    pub text: String,
    /// Identifier of the candidate model that succeeded.
    pub model: String,
}

/// OpenAI-compatible chat completions client with model fallback.
///
/// Works with any provider that exposes the `/chat/completions` endpoint:
/// OpenAI, Gemini's compatibility layer, Ollama, vLLM, LiteLLM, etc.
/// Candidate models are tried strictly in configured order; the first
/// success wins and later candidates are never contacted.
///
/// # Examples
///
/// ```
/// use driftguard_core::LlmConfig;
/// use driftguard_analysis::llm::CompletionClient;
///
/// let config = LlmConfig {
///     api_key: Some("test-key".into()),
///     ..LlmConfig::default()
/// };
/// let client = CompletionClient::new(&config).unwrap();
/// assert_eq!(client.models().len(), 3);
/// ```
pub struct CompletionClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl CompletionClient {
    /// Create a new completion client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::Llm`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, DriftError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| DriftError::Llm(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// The configured candidate models, in fallback order.
    pub fn models(&self) -> &[String] {
        &self.config.models
    }

    /// Base URL for the provider's OpenAI-compatible endpoint.
    ///
    /// An explicit `base_url` in the configuration always wins; otherwise the
    /// URL is derived from the provider name.
    pub fn base_url(&self) -> &str {
        match self.config.base_url.as_deref() {
            Some(url) => url,
            None => match self.config.provider.as_str() {
                "gemini" => "https://generativelanguage.googleapis.com/v1beta/openai",
                _ => "https://api.openai.com/v1",
            },
        }
    }

    /// Send one completion request, trying each candidate model in order.
    ///
    /// Any per-model failure (network, non-2xx status, unexpected response
    /// shape) is logged and the next candidate is tried. The first success
    /// returns immediately with the response text and the model used. No
    /// candidate is attempted more than once and there is no backoff.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::ModelsExhausted`] when every candidate failed
    /// (including the degenerate case of an empty candidate list).
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        want_json: bool,
    ) -> Result<Completion, DriftError> {
        let mut attempts = 0usize;
        for model in &self.config.models {
            attempts += 1;
            match self.try_model(model, messages, want_json).await {
                Ok(text) => {
                    return Ok(Completion {
                        text,
                        model: model.clone(),
                    })
                }
                Err(e) => eprintln!("warning: model {model} failed: {e}"),
            }
        }
        Err(DriftError::ModelsExhausted(attempts))
    }

    async fn try_model(
        &self,
        model: &str,
        messages: &[ChatMessage],
        want_json: bool,
    ) -> Result<String, DriftError> {
        let url = format!("{}/chat/completions", self.base_url());

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": 0.1,
        });
        if want_json {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let mut request = self.client.post(&url);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }
        request = request.header("Content-Type", "application/json");

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| DriftError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(DriftError::Llm(format!(
                "LLM API error {status}: {body_text}"
            )));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DriftError::Llm(format!("failed to parse response: {e}")))?;

        let content = response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                DriftError::Llm(format!("unexpected response structure: {response_body}"))
            })?;

        Ok(content.to_string())
    }
}
