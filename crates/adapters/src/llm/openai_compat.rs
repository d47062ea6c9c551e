//! OpenAI-compatible chat completions adapter (OpenAI, OpenRouter, local servers)

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use topic_tweeter_domain::{GenerateError, Generator};

use super::{
    GeneratorConfig, build_http_client, build_tweet_prompt, check_status, map_transport_error,
    non_empty,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const SYSTEM_PROMPT: &str =
    "You write short, factual social media posts about technology. Output only the post text.";

/// Generator for any provider speaking the chat completions protocol
pub struct OpenAiCompatGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: GeneratorConfig,
}

impl OpenAiCompatGenerator {
    pub fn new(
        api_key: SecretString,
        base_url: String,
        config: GeneratorConfig,
    ) -> Result<Self, GenerateError> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
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

#[async_trait]
impl Generator for OpenAiCompatGenerator {
    async fn generate(&self, topic: &str) -> Result<String, GenerateError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_tweet_prompt(topic),
                },
            ],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_output_tokens),
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::InvalidFormat(e.to_string()))?;

        let text = api_response
            .choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .collect::<Vec<_>>()
            .join("");

        non_empty(&text)
    }

    fn provider(&self) -> &'static str {
        "openai_compat"
    }
}
