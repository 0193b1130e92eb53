//! Chat completion client
//!
//! Sends user prompts to the `OpenAI` chat completions API and returns the
//! generated reply text. Replies can optionally be cached per prompt for a
//! bounded window so a repeated question does not re-bill the service.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How long a cached reply stays valid
const REPLY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Produces a reply for a user prompt
#[async_trait]
pub trait GenerateReply: Send + Sync {
    /// Generate a reply for `prompt`
    ///
    /// # Errors
    ///
    /// Returns error if the prompt is empty or the completion service fails.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Chat completion client backed by the `OpenAI` API
pub struct CompletionClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    cache: Option<mini_moka::sync::Cache<String, String>>,
}

impl CompletionClient {
    /// Create a new completion client
    #[must_use]
    pub fn new(api_key: SecretString, model: String, cache_replies: bool) -> Self {
        let cache = cache_replies.then(|| {
            mini_moka::sync::Cache::builder()
                .time_to_live(REPLY_CACHE_TTL)
                .build()
        });

        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            cache,
        }
    }

    async fn request_completion(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Completion(format!("completion request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Completion(format!(
                "completion API error {status}: {body}"
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Completion(format!("malformed completion response: {e}")))?;

        let reply = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::Completion("completion returned no reply".to_string()))?;

        Ok(reply)
    }
}

#[async_trait]
impl GenerateReply for CompletionClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(Error::Completion("prompt must not be empty".to_string()));
        }

        if let Some(cache) = &self.cache {
            if let Some(reply) = cache.get(&prompt.to_string()) {
                tracing::debug!(prompt_len = prompt.len(), "reply served from cache");
                return Ok(reply);
            }
        }

        let reply = self.request_completion(prompt).await?;

        if let Some(cache) = &self.cache {
            cache.insert(prompt.to_string(), reply.clone());
        }

        tracing::debug!(reply_len = reply.len(), "completion generated");
        Ok(reply)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
