//! Doctor command - validate configuration and show status

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use topic_tweeter_adapters::{cursor::FsCursorStore, topics::FsTopicStore};
use topic_tweeter_domain::{CursorError, CursorStore, usecases::TopicRotation};

use crate::args::DoctorArgs;
use crate::commands::run::read_env_secret;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    topics: CheckResult,
    cursor: CheckResult,
    generator: CheckResult,
    x: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<ExitCode> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        topics: CheckResult::error("Not checked"),
        cursor: CheckResult::error("Not checked"),
        generator: CheckResult::error("Not checked"),
        x: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.topics = check_topics(config).await;
        report.cursor = check_cursor(config).await;
        report.generator = check_generator(config);
        report.x = check_x(config);
    }

    let checks = [
        &report.config,
        &report.topics,
        &report.cursor,
        &report.generator,
        &report.x,
    ];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if has_error {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

async fn check_topics(config: &AppConfig) -> CheckResult {
    let path = &config.general.topics_path;
    if !path.exists() {
        return CheckResult::warn(format!(
            "Topic file not found: {} (default topics will be written on first run)",
            path.display()
        ));
    }

    let store = Arc::new(FsTopicStore::new(path));
    let topics = match store.load_existing().await {
        Ok(topics) => topics,
        Err(e) => return CheckResult::error(format!("Failed to load topics: {}", e)),
    };

    let rotation = TopicRotation::new(
        store,
        Arc::new(FsCursorStore::new(&config.general.cursor_path)),
    );

    match rotation.peek_next().await {
        Ok(next) => CheckResult::ok(format!(
            "{} topics loaded, next: {}",
            topics.len(),
            next.topic
        ))
        .with_details(serde_json::json!({
            "path": path.display().to_string(),
            "count": topics.len(),
            "next_index": next.index,
        })),
        Err(e) => CheckResult::error(format!("Failed to select next topic: {}", e)),
    }
}

async fn check_cursor(config: &AppConfig) -> CheckResult {
    let path = &config.general.cursor_path;
    let cursor = FsCursorStore::new(path);

    match cursor.load().await {
        Ok(Some(index)) => CheckResult::ok(format!("Last topic index: {}", index)),
        Ok(None) => CheckResult::ok(format!(
            "No cursor yet at {} (first run starts at index 1)",
            path.display()
        )),
        Err(e @ CursorError::Corrupt { .. }) => {
            CheckResult::warn(format!("{} (the next run starts over)", e))
        }
        Err(e) => CheckResult::error(format!("Cannot read {}: {}", path.display(), e)),
    }
}

fn check_generator(config: &AppConfig) -> CheckResult {
    let provider = &config.generator.provider;

    let api_key_env = match provider.as_str() {
        "hive" => &config.generator.hive.api_key_env,
        "openai_compat" => {
            if config.generator.openai_compat.base_url.trim().is_empty() {
                return CheckResult::error("OpenAI-compatible base_url is empty");
            }
            &config.generator.openai_compat.api_key_env
        }
        "stub" => return CheckResult::ok("Provider: stub (offline)"),
        other => return CheckResult::error(format!("Unknown provider: {}", other)),
    };

    check_env_var(&format!("Provider: {}", provider), api_key_env)
}

fn check_x(config: &AppConfig) -> CheckResult {
    if config.general.dry_run {
        return CheckResult::ok("Dry run enabled, posting disabled");
    }

    let mut set = Vec::new();
    let mut missing = Vec::new();
    for (field, env_var) in config.x.credential_env_vars() {
        match read_env_secret(env_var) {
            Some(_) => set.push(env_var.to_string()),
            None if env_var.trim().is_empty() => missing.push(format!("x.{}", field)),
            None => missing.push(env_var.to_string()),
        }
    }

    let details = serde_json::json!({ "set": set, "missing": missing });
    if missing.is_empty() {
        CheckResult::ok(format!(
            "Max chars: {}, OAuth 1.0a credentials: (set)",
            config.x.max_chars
        ))
        .with_details(details)
    } else {
        CheckResult::error(format!(
            "Max chars: {}, missing credentials: {}",
            config.x.max_chars,
            missing.join(", ")
        ))
        .with_details(details)
    }
}

/// Check a credential env var without revealing its value
fn check_env_var(label: &str, env_var: &str) -> CheckResult {
    if env_var.trim().is_empty() {
        return CheckResult::error(format!("{}, no credential env var configured", label));
    }

    match read_env_secret(env_var) {
        Some(_) => CheckResult::ok(format!("{}, {}: (set)", label, env_var)),
        None => CheckResult::error(format!("{}, {}: (not set)", label, env_var)),
    }
}

fn print_report(report: &DoctorReport) {
    println!("topic-tweeter Doctor Report");
    println!("===========================");
    println!();

    print_check("Config", &report.config);
    print_check("Topics", &report.topics);
    print_check("Cursor", &report.cursor);
    print_check("Generator", &report.generator);
    print_check("X", &report.x);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall != "error" {
        println!();
        println!("Ready to run! Try: topic-tweeter run --dry-run");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
