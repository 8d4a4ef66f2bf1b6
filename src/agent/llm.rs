//! Chat-completion client for the analysis workflow.
//!
//! Speaks either the OpenAI chat-completions API or Ollama's `/api/chat`.
//! The workflow only sees the [`LanguageModel`] trait.

use crate::config::{LlmProvider, ModelConfig};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Something that turns a system and user prompt into text.
pub trait LanguageModel {
    /// Name reported in the report metadata.
    fn model_name(&self) -> &str;

    fn complete(&self, system: &str, user: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Message in a chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// OpenAI chat-completions request.
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: ChatMessage,
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: ChatMessage,
}

/// HTTP chat client configured from `[model]`.
pub struct ChatClient {
    config: ModelConfig,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: &ModelConfig, api_key: Option<String>) -> Result<Self> {
        if config.provider == LlmProvider::OpenAi && api_key.is_none() {
            bail!("OPENAI_API_KEY is not set (export it, or use --provider ollama)");
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config: config.clone(),
            api_key,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match self.config.provider {
            LlmProvider::OpenAi if base.ends_with("/v1") => format!("{}/chat/completions", base),
            LlmProvider::OpenAi => format!("{}/v1/chat/completions", base),
            LlmProvider::Ollama => format!("{}/api/chat", base),
        }
    }

    fn request_body(&self, system: &str, user: &str) -> Result<serde_json::Value> {
        let messages = vec![ChatMessage::system(system), ChatMessage::user(user)];
        let body = match self.config.provider {
            LlmProvider::OpenAi => serde_json::to_value(OpenAiRequest {
                model: &self.config.name,
                messages,
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
            }),
            LlmProvider::Ollama => serde_json::to_value(OllamaRequest {
                model: &self.config.name,
                messages,
                stream: false,
                options: OllamaOptions {
                    temperature: self.config.temperature,
                    num_predict: self.config.max_tokens,
                },
            }),
        };
        body.context("Failed to encode chat request")
    }

    async fn send_once(&self, system: &str, user: &str) -> Result<String> {
        let url = self.endpoint();
        let mut request = self
            .http_client
            .post(&url)
            .json(&self.request_body(system, user)?);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow!("Request timed out after {}s", self.config.timeout_seconds)
            } else if e.is_connect() {
                anyhow!("Cannot connect to model API at {}", self.config.base_url)
            } else {
                anyhow!("Failed to send request: {}", e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Model API error {}: {}", status, body));
        }

        let body = response
            .text()
            .await
            .context("Failed to read model response")?;
        extract_content(self.config.provider, &body)
    }
}

impl LanguageModel for ChatClient {
    fn model_name(&self) -> &str {
        &self.config.name
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        debug!(
            "Sending {} chars to {} ({:?})",
            system.len() + user.len(),
            self.config.name,
            self.config.provider
        );
        with_retries(self.config.retries, Duration::from_secs(2), || {
            self.send_once(system, user)
        })
        .await
    }
}

/// Pull the assistant text out of a chat response body.
fn extract_content(provider: LlmProvider, body: &str) -> Result<String> {
    let content = match provider {
        LlmProvider::OpenAi => {
            let response: OpenAiResponse =
                serde_json::from_str(body).context("Failed to parse OpenAI response")?;
            response
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| anyhow!("OpenAI response contained no choices"))?
        }
        LlmProvider::Ollama => {
            let response: OllamaResponse =
                serde_json::from_str(body).context("Failed to parse Ollama response")?;
            response.message.content
        }
    };

    if content.trim().is_empty() {
        bail!("Model returned an empty response");
    }
    Ok(content.trim().to_string())
}

/// Run `op` up to `retries + 1` times, sleeping `backoff * attempt` between tries.
async fn with_retries<F, Fut, T>(retries: usize, backoff: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < retries => {
                attempt += 1;
                warn!("Model request failed (attempt {}/{}): {}", attempt, retries + 1, e);
                if !backoff.is_zero() {
                    tokio::time::sleep(backoff * attempt as u32).await;
                }
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn client(provider: LlmProvider, base_url: &str) -> ChatClient {
        let config = ModelConfig {
            provider,
            base_url: base_url.to_string(),
            ..Default::default()
        };
        ChatClient::new(&config, Some("sk-test".to_string())).unwrap()
    }

    #[test]
    fn test_openai_requires_key() {
        assert!(ChatClient::new(&ModelConfig::default(), None).is_err());

        let ollama = ModelConfig {
            provider: LlmProvider::Ollama,
            ..Default::default()
        };
        assert!(ChatClient::new(&ollama, None).is_ok());
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(
            client(LlmProvider::OpenAi, "https://api.openai.com/").endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            client(LlmProvider::OpenAi, "http://localhost:8000/v1").endpoint(),
            "http://localhost:8000/v1/chat/completions"
        );
        assert_eq!(
            client(LlmProvider::Ollama, "http://localhost:11434").endpoint(),
            "http://localhost:11434/api/chat"
        );
    }

    #[test]
    fn test_request_bodies() {
        let body = client(LlmProvider::OpenAi, "https://api.openai.com")
            .request_body("sys", "hi")
            .unwrap();
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["max_tokens"], 4000);

        let body = client(LlmProvider::Ollama, "http://localhost:11434")
            .request_body("sys", "hi")
            .unwrap();
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 4000);
    }

    #[test]
    fn test_extract_content() {
        let openai = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"  Growth is steady. "}}]}"#;
        assert_eq!(
            extract_content(LlmProvider::OpenAi, openai).unwrap(),
            "Growth is steady."
        );

        let ollama = r#"{"model":"llama3","message":{"role":"assistant","content":"ok"},"done":true}"#;
        assert_eq!(extract_content(LlmProvider::Ollama, ollama).unwrap(), "ok");

        assert!(extract_content(LlmProvider::OpenAi, r#"{"choices":[]}"#).is_err());
        let blank = r#"{"message":{"role":"assistant","content":"   "}}"#;
        assert!(extract_content(LlmProvider::Ollama, blank).is_err());
    }

    #[test]
    fn test_with_retries() {
        let calls = Cell::new(0);
        let result: Result<u32> = tokio_test::block_on(with_retries(2, Duration::ZERO, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(anyhow!("boom"))
                } else {
                    Ok(n)
                }
            }
        }));
        assert_eq!(result.unwrap(), 3);

        calls.set(0);
        let result: Result<u32> = tokio_test::block_on(with_retries(1, Duration::ZERO, || {
            calls.set(calls.get() + 1);
            async { Err(anyhow!("always")) }
        }));
        assert!(result.is_err());
        assert_eq!(calls.get(), 2);
    }
}
