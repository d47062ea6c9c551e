//! X API write adapter for publishing posts

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use topic_tweeter_domain::{PublishError, PublishResult, Publisher};

use super::oauth::{OAuthCredentials, OAuthSigner};

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

/// X API publisher for creating standalone posts
pub struct XPublisher {
    client: Client,
    /// `None` for a disabled publisher
    signer: Option<OAuthSigner>,
    base_url: String,
    max_chars: usize,
}

impl XPublisher {
    pub fn new(
        credentials: OAuthCredentials,
        base_url: String,
        max_chars: usize,
        timeout_secs: u64,
    ) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PublishError::Api(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            signer: Some(OAuthSigner::new(credentials)),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_chars,
        })
    }

    /// Create a publisher that refuses every post (dry runs)
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            signer: None,
            base_url: String::new(),
            max_chars: 280,
        }
    }
}

#[derive(Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CreateTweetResponse {
    data: TweetData,
}

#[derive(Deserialize)]
struct TweetData {
    id: String,
}

#[async_trait]
impl Publisher for XPublisher {
    async fn publish(&self, text: &str) -> Result<PublishResult, PublishError> {
        let Some(signer) = &self.signer else {
            return Err(PublishError::Disabled);
        };

        // X counts characters, not bytes
        let len = text.chars().count();
        if len > self.max_chars {
            return Err(PublishError::ContentTooLong {
                len,
                max: self.max_chars,
            });
        }

        let url = format!("{}/2/tweets", self.base_url);
        let authorization = signer.sign("POST", &url, &[])?;

        let response = self
            .client
            .post(&url)
            .header("Authorization", authorization)
            .header("Content-Type", "application/json")
            .json(&CreateTweetRequest { text })
            .send()
            .await
            .map_err(|e| PublishError::Api(e.to_string()))?;

        if response.status() == 401 {
            return Err(PublishError::Auth("Invalid OAuth credentials".to_string()));
        }

        if response.status() == 429 {
            return Err(PublishError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api(format!(
                "Failed to create tweet ({}): {}",
                status, body
            )));
        }

        let tweet_response: CreateTweetResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Api(e.to_string()))?;

        let id = tweet_response.data.id;
        tracing::debug!(id = %id, "Tweet created");

        Ok(PublishResult {
            url: Some(format!("https://x.com/i/status/{}", id)),
            id,
        })
    }

    fn platform(&self) -> &'static str {
        "x"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn signed_with_test_credentials(request: &Request) -> bool {
        let Some(value) = request
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
        else {
            return false;
        };

        value.starts_with("OAuth oauth_consumer_key=\"test-consumer-key\"")
            && value.contains("oauth_token=\"test-access-token\"")
            && value.contains("oauth_signature_method=\"HMAC-SHA1\"")
            && value.contains("oauth_signature=")
            && !value.contains("test-consumer-secret")
    }

    fn credentials() -> OAuthCredentials {
        OAuthCredentials {
            consumer_key: SecretString::new("test-consumer-key".into()),
            consumer_secret: SecretString::new("test-consumer-secret".into()),
            access_token: SecretString::new("test-access-token".into()),
            access_token_secret: SecretString::new("test-access-secret".into()),
        }
    }

    fn publisher(uri: String, max_chars: usize) -> XPublisher {
        XPublisher::new(credentials(), uri, max_chars, 5).unwrap()
    }

    #[tokio::test]
    async fn test_publish_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(signed_with_test_credentials)
            .and(body_json(serde_json::json!({
                "text": "Will quantum beat classical by 2030? #Quantum"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {
                    "id": "1790000000000000000",
                    "text": "Will quantum beat classical by 2030? #Quantum"
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = publisher(mock_server.uri(), 280)
            .publish("Will quantum beat classical by 2030? #Quantum")
            .await
            .unwrap();

        assert_eq!(result.id, "1790000000000000000");
        assert_eq!(
            result.url.as_deref(),
            Some("https://x.com/i/status/1790000000000000000")
        );
    }

    #[tokio::test]
    async fn test_publish_content_too_long() {
        let publisher = publisher("http://127.0.0.1:9".to_string(), 10);

        let result = publisher.publish("this is longer than ten").await;

        assert!(matches!(
            result,
            Err(PublishError::ContentTooLong { len: 23, max: 10 })
        ));
    }

    #[tokio::test]
    async fn test_length_counts_chars() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": { "id": "1" }
            })))
            .mount(&mock_server)
            .await;

        // 5 chars, 10 bytes
        let result = publisher(mock_server.uri(), 5).publish("ééééé").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_publish_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let result = publisher(mock_server.uri(), 280).publish("hello").await;

        assert!(matches!(result, Err(PublishError::Auth(_))));
    }

    #[tokio::test]
    async fn test_publish_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let result = publisher(mock_server.uri(), 280).publish("hello").await;

        assert!(matches!(result, Err(PublishError::RateLimited)));
    }

    #[tokio::test]
    async fn test_publish_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(403).set_body_string("duplicate content"))
            .mount(&mock_server)
            .await;

        let result = publisher(mock_server.uri(), 280).publish("hello").await;

        match result {
            Err(PublishError::Api(msg)) => assert!(msg.contains("duplicate content")),
            other => panic!("unexpected result: {:?}", other.map(|r| r.id)),
        }
    }

    #[tokio::test]
    async fn test_disabled_publisher() {
        let publisher = XPublisher::disabled();

        let result = publisher.publish("hello").await;
        assert!(matches!(result, Err(PublishError::Disabled)));
    }
}
