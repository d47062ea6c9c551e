//! Hive Intelligence search API adapter

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use topic_tweeter_domain::{GenerateError, Generator};

use super::{
    GeneratorConfig, build_http_client, build_tweet_prompt, check_status, map_transport_error,
    non_empty,
};

pub const DEFAULT_BASE_URL: &str = "https://api.hiveintelligence.xyz";

/// Generator backed by the Hive Intelligence `/v1/search` endpoint
pub struct HiveGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: GeneratorConfig,
}

impl HiveGenerator {
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
struct SearchRequest<'a> {
    prompt: &'a str,
    temperature: f64,
    include_data_sources: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    response: Option<String>,
}

#[async_trait]
impl Generator for HiveGenerator {
    async fn generate(&self, topic: &str) -> Result<String, GenerateError> {
        let prompt = build_tweet_prompt(topic);
        let request = SearchRequest {
            prompt: &prompt,
            temperature: self.config.temperature,
            include_data_sources: false,
        };

        let url = format!("{}/v1/search", self.base_url);

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

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::InvalidFormat(e.to_string()))?;

        let text = body
            .response
            .ok_or_else(|| GenerateError::InvalidFormat("missing `response` field".to_string()))?;

        non_empty(&text)
    }

    fn provider(&self) -> &'static str {
        "hive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(uri: String) -> HiveGenerator {
        HiveGenerator::new(
            SecretString::new("hive-key".into()),
            uri,
            GeneratorConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .and(header("Authorization", "Bearer hive-key"))
            .and(body_partial_json(serde_json::json!({
                "temperature": 0.7,
                "include_data_sources": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "  \"Will AI replace jobs? #AI\"  "
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let text = generator(mock_server.uri())
            .generate("Artificial Intelligence: AI and its impact")
            .await
            .unwrap();

        // quotes are left for the pipeline to strip
        assert_eq!(text, "\"Will AI replace jobs? #AI\"");
    }

    #[tokio::test]
    async fn test_missing_response_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let result = generator(mock_server.uri()).generate("Topic").await;

        assert!(matches!(result, Err(GenerateError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_blank_response_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "response": "   " })),
            )
            .mount(&mock_server)
            .await;

        let result = generator(mock_server.uri()).generate("Topic").await;

        assert!(matches!(result, Err(GenerateError::Empty)));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = generator(mock_server.uri()).generate("Topic").await;

        assert!(matches!(result, Err(GenerateError::Api(_))));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let result = generator(mock_server.uri()).generate("Topic").await;

        assert!(matches!(result, Err(GenerateError::RateLimited)));
    }
}
