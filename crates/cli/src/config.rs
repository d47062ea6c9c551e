//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use topic_tweeter_adapters::{llm, x_api};

/// Environment variable that overrides the topic file path
pub const TOPICS_CSV_ENV: &str = "TOPICS_CSV";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub x: XConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_topics_path")]
    pub topics_path: PathBuf,

    #[serde(default = "default_cursor_path")]
    pub cursor_path: PathBuf,

    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub hive: HiveConfig,

    #[serde(default)]
    pub openai_compat: OpenAiCompatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiveConfig {
    #[serde(default = "default_hive_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_hive_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiCompatConfig {
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XConfig {
    #[serde(default = "default_x_consumer_key_env")]
    pub consumer_key_env: String,

    #[serde(default = "default_x_consumer_secret_env")]
    pub consumer_secret_env: String,

    #[serde(default = "default_x_access_token_env")]
    pub access_token_env: String,

    #[serde(default = "default_x_access_token_secret_env")]
    pub access_token_secret_env: String,

    #[serde(default = "default_x_base_url")]
    pub base_url: String,

    #[serde(default = "default_x_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_topics_path() -> PathBuf {
    PathBuf::from("topics.csv")
}

fn default_cursor_path() -> PathBuf {
    PathBuf::from("last_topic_index.txt")
}

fn default_provider() -> String {
    "hive".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    200
}

fn default_timeout() -> u64 {
    30
}

fn default_hive_api_key_env() -> String {
    "HIVE_API_KEY".to_string()
}

fn default_hive_base_url() -> String {
    llm::hive::DEFAULT_BASE_URL.to_string()
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base_url() -> String {
    llm::openai_compat::DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_x_consumer_key_env() -> String {
    "TWITTER_CONSUMER_KEY".to_string()
}

fn default_x_consumer_secret_env() -> String {
    "TWITTER_CONSUMER_SECRET".to_string()
}

fn default_x_access_token_env() -> String {
    "TWITTER_ACCESS_TOKEN".to_string()
}

fn default_x_access_token_secret_env() -> String {
    "TWITTER_ACCESS_TOKEN_SECRET".to_string()
}

fn default_x_base_url() -> String {
    x_api::DEFAULT_BASE_URL.to_string()
}

fn default_x_max_chars() -> usize {
    280
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            topics_path: default_topics_path(),
            cursor_path: default_cursor_path(),
            dry_run: false,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout(),
            hive: HiveConfig::default(),
            openai_compat: OpenAiCompatConfig::default(),
        }
    }
}

impl Default for HiveConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_hive_api_key_env(),
            base_url: default_hive_base_url(),
        }
    }
}

impl Default for OpenAiCompatConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_api_key_env(),
            base_url: default_openai_base_url(),
            model: default_model(),
        }
    }
}

impl Default for XConfig {
    fn default() -> Self {
        Self {
            consumer_key_env: default_x_consumer_key_env(),
            consumer_secret_env: default_x_consumer_secret_env(),
            access_token_env: default_x_access_token_env(),
            access_token_secret_env: default_x_access_token_secret_env(),
            base_url: default_x_base_url(),
            max_chars: default_x_max_chars(),
            timeout_secs: default_timeout(),
        }
    }
}

impl XConfig {
    /// OAuth 1.0a credential env vars, keyed by their config field
    pub fn credential_env_vars(&self) -> [(&'static str, &str); 4] {
        [
            ("consumer_key_env", self.consumer_key_env.as_str()),
            ("consumer_secret_env", self.consumer_secret_env.as_str()),
            ("access_token_env", self.access_token_env.as_str()),
            ("access_token_secret_env", self.access_token_secret_env.as_str()),
        ]
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("TOPIC_TWEETER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.apply_topics_override(std::env::var(TOPICS_CSV_ENV).ok());

        Ok(app_config)
    }

    fn apply_topics_override(&mut self, value: Option<String>) {
        if let Some(path) = value.filter(|p| !p.trim().is_empty()) {
            self.general.topics_path = PathBuf::from(path.trim());
        }
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# topic-tweeter configuration
#
# Every key can be overridden from the environment, e.g.
#   TOPIC_TWEETER__GENERATOR__PROVIDER=stub
# TOPICS_CSV overrides general.topics_path.

[general]
topics_path = "topics.csv"
cursor_path = "last_topic_index.txt"
dry_run = false

[generator]
provider = "hive"  # hive, openai_compat, stub
temperature = 0.7
max_output_tokens = 200
timeout_secs = 30

[generator.hive]
api_key_env = "HIVE_API_KEY"
base_url = "https://api.hiveintelligence.xyz"

[generator.openai_compat]
api_key_env = "OPENAI_API_KEY"
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"

[x]
# OAuth 1.0a user credentials, read from these env vars
consumer_key_env = "TWITTER_CONSUMER_KEY"
consumer_secret_env = "TWITTER_CONSUMER_SECRET"
access_token_env = "TWITTER_ACCESS_TOKEN"
access_token_secret_env = "TWITTER_ACCESS_TOKEN_SECRET"
base_url = "https://api.twitter.com"
max_chars = 280
timeout_secs = 30
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_matches_defaults() {
        let parsed: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        let defaults = AppConfig::default();

        assert_eq!(parsed.general.topics_path, defaults.general.topics_path);
        assert_eq!(parsed.general.cursor_path, defaults.general.cursor_path);
        assert_eq!(parsed.general.dry_run, defaults.general.dry_run);
        assert_eq!(parsed.generator.provider, defaults.generator.provider);
        assert_eq!(parsed.generator.temperature, defaults.generator.temperature);
        assert_eq!(
            parsed.generator.hive.api_key_env,
            defaults.generator.hive.api_key_env
        );
        assert_eq!(parsed.x.max_chars, 280);
        assert_eq!(
            parsed.x.credential_env_vars(),
            defaults.x.credential_env_vars()
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: AppConfig = toml::from_str("[generator]\nprovider = \"stub\"\n").unwrap();

        assert_eq!(parsed.generator.provider, "stub");
        assert_eq!(parsed.generator.timeout_secs, 30);
        assert_eq!(parsed.x.consumer_key_env, "TWITTER_CONSUMER_KEY");
        assert_eq!(parsed.x.access_token_secret_env, "TWITTER_ACCESS_TOKEN_SECRET");
        assert_eq!(parsed.general.topics_path, PathBuf::from("topics.csv"));
    }

    #[test]
    fn test_topics_override() {
        let mut config = AppConfig::default();

        config.apply_topics_override(Some("  ".to_string()));
        assert_eq!(config.general.topics_path, PathBuf::from("topics.csv"));

        config.apply_topics_override(Some("/data/topics.csv".to_string()));
        assert_eq!(config.general.topics_path, PathBuf::from("/data/topics.csv"));
    }
}
