use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

/// Why a completion request produced no usable content.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("OpenAI API key is not configured")]
    MissingApiKey,

    #[error("request to completion API failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("completion API rejected credentials ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("completion API quota exceeded: {0}")]
    Quota(String),

    #[error("completion API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one system/user exchange and returns the assistant's raw text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError>;
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl AIService {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url,
            model,
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat_openai(&self, payload: JsonValue) -> Result<JsonValue, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let res = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(ProviderError::Network)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Auth {
                    status: status.as_u16(),
                    body,
                },
                429 => ProviderError::Quota(body),
                code => ProviderError::Status { status: code, body },
            });
        }

        res.json::<JsonValue>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl CompletionClient for AIService {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ]
        });

        let body = self.chat_openai(payload).await?;
        extract_content(&body)
    }
}

fn extract_content(body: &JsonValue) -> Result<String, ProviderError> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}
