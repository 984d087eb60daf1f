use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use dharti_core::config::CompletionSettings;
use dharti_core::traits::{ServiceResult, TextCompleter};
use dharti_core::ExternalServiceError;

use crate::http::{malformed, read_json, required, trim_base, unavailable};

const SERVICE: &str = "completion";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-style chat completions, single user turn.
pub struct ChatCompletionClient {
    base_url: String,
    api_key: String,
    model: String,
    http: Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionClient {
    pub fn new(base_url: &str, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: trim_base(base_url),
            api_key: api_key.into(),
            model: model.into(),
            http: Client::new(),
        }
    }

    pub fn from_settings(settings: &CompletionSettings) -> Result<Self, ExternalServiceError> {
        let api_key = required(SERVICE, &settings.api_key)?;
        let base_url = settings.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Ok(Self::new(base_url, api_key, settings.model.clone()))
    }

    async fn ask(&self, prompt: &str) -> ServiceResult<String> {
        let payload = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: [ChatMessage { role: "user", content: prompt }],
        };
        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| unavailable(SERVICE, e))?;
        let body: ChatResponse = read_json(SERVICE, resp).await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| malformed(SERVICE, "no choices in reply"))
    }
}

impl TextCompleter for ChatCompletionClient {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, ServiceResult<String>> {
        Box::pin(self.ask(prompt))
    }
}
