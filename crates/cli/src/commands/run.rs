//! Run command - one topic, one tweet

use anyhow::{Context, Result, anyhow, bail};
use secrecy::SecretString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use topic_tweeter_adapters::{
    cursor::{FsCursorStore, InMemoryCursorStore},
    llm::{
        GeneratorConfig as AdapterGeneratorConfig, HiveGenerator, OpenAiCompatGenerator,
        StubGenerator,
    },
    topics::FsTopicStore,
    x::{OAuthCredentials, XPublisher},
};
use topic_tweeter_domain::{
    CursorStore, Generator, Publisher, RunOutcome, TopicSource,
    policy::TweetPolicy,
    usecases::{PipelineConfig, PostingPipeline},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::args::RunArgs;
use crate::config::{AppConfig, GeneratorConfig, XConfig};

type Pipeline =
    PostingPipeline<dyn TopicSource, dyn CursorStore, dyn Generator, dyn Publisher>;

pub async fn execute(args: RunArgs, config_path: Option<PathBuf>) -> Result<ExitCode> {
    let config = AppConfig::load(config_path.as_deref())?;
    let dry_run = args.dry_run || config.general.dry_run;

    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("run", run_id = %run_id);

    let code = async move {
        tracing::info!(
            dry_run = dry_run,
            topics = %config.general.topics_path.display(),
            cursor = %config.general.cursor_path.display(),
            provider = %config.generator.provider,
            "Starting topic-tweeter run"
        );

        let pipeline = match build_pipeline(&config, dry_run).await {
            Ok(pipeline) => pipeline,
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "Configuration error");
                return ExitCode::FAILURE;
            }
        };

        let outcome = pipeline.run_once().await;
        report(&outcome);

        if outcome.is_success() {
            tracing::info!("topic-tweeter run completed");
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
    .instrument(span)
    .await;

    Ok(code)
}

async fn build_pipeline(config: &AppConfig, dry_run: bool) -> Result<Pipeline> {
    let topics: Arc<dyn TopicSource> =
        Arc::new(FsTopicStore::new(&config.general.topics_path));
    let cursor = build_cursor(config, dry_run).await;
    let generator = build_generator(&config.generator)?;
    let publisher = build_publisher(config, dry_run)?;

    let pipeline_config = PipelineConfig {
        dry_run,
        policy: TweetPolicy::new(config.x.max_chars),
    };

    Ok(PostingPipeline::new(
        topics,
        cursor,
        generator,
        publisher,
        pipeline_config,
    ))
}

/// Dry runs rotate an in-memory copy so the persisted cursor is left alone
async fn build_cursor(config: &AppConfig, dry_run: bool) -> Arc<dyn CursorStore> {
    let file_cursor = FsCursorStore::new(&config.general.cursor_path);
    if !dry_run {
        return Arc::new(file_cursor);
    }

    let seed = match file_cursor.load().await {
        Ok(seed) => seed,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read topic index, starting from the beginning");
            None
        }
    };

    Arc::new(InMemoryCursorStore::with_value(seed))
}

pub(crate) fn build_generator(config: &GeneratorConfig) -> Result<Arc<dyn Generator>> {
    let adapter_config = adapter_generator_config(config);

    match config.provider.as_str() {
        "hive" => {
            let api_key = load_api_key(&config.hive.api_key_env, "hive")?;
            let generator = HiveGenerator::new(
                api_key,
                config.hive.base_url.clone(),
                adapter_config,
            )
            .context("Failed to initialize Hive generator")?;
            Ok(Arc::new(generator))
        }
        "openai_compat" => {
            let base_url = config.openai_compat.base_url.trim();
            if base_url.is_empty() {
                bail!("OpenAI-compatible base_url is required");
            }
            let api_key = load_api_key(&config.openai_compat.api_key_env, "openai_compat")?;
            let generator =
                OpenAiCompatGenerator::new(api_key, base_url.to_string(), adapter_config)
                    .context("Failed to initialize OpenAI-compatible generator")?;
            Ok(Arc::new(generator))
        }
        "stub" => Ok(Arc::new(StubGenerator::echo())),
        other => bail!("Unknown generator provider: {}", other),
    }
}

fn adapter_generator_config(config: &GeneratorConfig) -> AdapterGeneratorConfig {
    AdapterGeneratorConfig {
        model: config.openai_compat.model.clone(),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
        timeout_secs: config.timeout_secs,
    }
}

fn build_publisher(config: &AppConfig, dry_run: bool) -> Result<Arc<dyn Publisher>> {
    if dry_run {
        return Ok(Arc::new(XPublisher::disabled()));
    }

    let credentials = load_x_credentials(&config.x)?;
    let publisher = XPublisher::new(
        credentials,
        config.x.base_url.clone(),
        config.x.max_chars,
        config.x.timeout_secs,
    )
    .context("Failed to initialize X publisher")?;

    Ok(Arc::new(publisher))
}

pub(crate) fn load_api_key(env_var: &str, provider: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No API key env var configured for provider {}", provider);
    }

    let key = std::env::var(env_var).with_context(|| {
        format!(
            "Missing API key env var {} for provider {}",
            env_var, provider
        )
    })?;

    if key.trim().is_empty() {
        bail!(
            "API key env var {} is empty for provider {}",
            env_var,
            provider
        );
    }

    Ok(SecretString::new(key.into()))
}

/// Read all four OAuth credentials, reporting every missing one at once
pub(crate) fn load_x_credentials(config: &XConfig) -> Result<OAuthCredentials> {
    let mut values = Vec::with_capacity(4);
    let mut missing = Vec::new();

    for (field, env_var) in config.credential_env_vars() {
        match read_env_secret(env_var) {
            Some(value) => values.push(value),
            None if env_var.trim().is_empty() => missing.push(format!("x.{}", field)),
            None => missing.push(env_var.to_string()),
        }
    }

    if !missing.is_empty() {
        bail!("Missing required X credentials: {}", missing.join(", "));
    }

    let [consumer_key, consumer_secret, access_token, access_token_secret]: [SecretString; 4] =
        values
            .try_into()
            .map_err(|_| anyhow!("Missing required X credentials"))?;

    Ok(OAuthCredentials {
        consumer_key,
        consumer_secret,
        access_token,
        access_token_secret,
    })
}

/// Value of a non-blank env var
pub(crate) fn read_env_secret(env_var: &str) -> Option<SecretString> {
    if env_var.trim().is_empty() {
        return None;
    }

    std::env::var(env_var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(|value| SecretString::new(value.into()))
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Posted {
            selected,
            post_id,
            url,
            ..
        } => {
            tracing::info!(
                topic_index = selected.index,
                wrapped = selected.wrapped,
                post_id = %post_id,
                "Run finished"
            );
            println!("{}", url.as_deref().unwrap_or(post_id));
        }
        RunOutcome::DryRun { selected, text } => {
            tracing::info!(
                topic_index = selected.index,
                wrapped = selected.wrapped,
                "Dry run finished, nothing posted"
            );
            println!("{}", text);
        }
        // already logged by the pipeline
        RunOutcome::Failed { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = GeneratorConfig {
            provider: "carrier_pigeon".to_string(),
            ..GeneratorConfig::default()
        };

        let err = build_generator(&config).err().unwrap();
        assert!(err.to_string().contains("carrier_pigeon"));
    }

    #[test]
    fn test_stub_provider_needs_no_key() {
        let config = GeneratorConfig {
            provider: "stub".to_string(),
            ..GeneratorConfig::default()
        };

        let generator = build_generator(&config).unwrap();
        assert_eq!(generator.provider(), "stub");
    }

    #[test]
    fn test_empty_env_var_name_is_rejected() {
        let err = load_api_key("  ", "hive").unwrap_err();
        assert!(err.to_string().contains("hive"));
    }

    fn x_config_with_unset_vars() -> XConfig {
        XConfig {
            consumer_key_env: "TOPIC_TWEETER_TEST_UNSET_CONSUMER_KEY".to_string(),
            consumer_secret_env: "TOPIC_TWEETER_TEST_UNSET_CONSUMER_SECRET".to_string(),
            access_token_env: "TOPIC_TWEETER_TEST_UNSET_ACCESS_TOKEN".to_string(),
            access_token_secret_env: String::new(),
            ..XConfig::default()
        }
    }

    #[test]
    fn test_dry_run_publisher_needs_no_credentials() {
        let mut config = AppConfig::default();
        config.x = x_config_with_unset_vars();

        let publisher = build_publisher(&config, true).unwrap();
        assert_eq!(publisher.platform(), "x");
        assert!(build_publisher(&config, false).is_err());
    }

    #[test]
    fn test_every_missing_x_credential_is_reported() {
        let err = load_x_credentials(&x_config_with_unset_vars()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required X credentials: TOPIC_TWEETER_TEST_UNSET_CONSUMER_KEY, \
             TOPIC_TWEETER_TEST_UNSET_CONSUMER_SECRET, TOPIC_TWEETER_TEST_UNSET_ACCESS_TOKEN, \
             x.access_token_secret_env"
        );
    }

    #[test]
    fn test_blank_env_var_reads_as_missing() {
        assert!(read_env_secret("").is_none());
        assert!(read_env_secret("TOPIC_TWEETER_TEST_UNSET_CONSUMER_KEY").is_none());
    }
}
