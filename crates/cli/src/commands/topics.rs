//! Topics command - inspect and initialize the topic file

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use topic_tweeter_adapters::{cursor::FsCursorStore, topics::FsTopicStore};
use topic_tweeter_domain::usecases::TopicRotation;

use crate::args::{TopicsArgs, TopicsCommands};
use crate::config::AppConfig;

pub async fn execute(args: TopicsArgs, config_path: Option<PathBuf>) -> Result<ExitCode> {
    let config = AppConfig::load(config_path.as_deref())?;

    match args.command {
        TopicsCommands::List { json } => list_topics(&config, json).await,
        TopicsCommands::Init { force } => init_topics(&config, force).await,
    }
}

#[derive(Serialize)]
struct TopicListing {
    path: String,
    next_index: u64,
    topics: Vec<TopicEntry>,
}

#[derive(Serialize)]
struct TopicEntry {
    index: usize,
    title: String,
    description: Option<String>,
    #[serde(skip)]
    display: String,
    next: bool,
}

async fn list_topics(config: &AppConfig, json: bool) -> Result<ExitCode> {
    let path = &config.general.topics_path;
    if !path.exists() {
        bail!(
            "Topic file not found: {}. Run 'topic-tweeter topics init' to create it.",
            path.display()
        );
    }

    let store = Arc::new(FsTopicStore::new(path));
    let topics = store
        .load_existing()
        .await
        .with_context(|| format!("Failed to load topics from {}", path.display()))?;

    let rotation = TopicRotation::new(
        store,
        Arc::new(FsCursorStore::new(&config.general.cursor_path)),
    );
    let next = rotation
        .peek_next()
        .await
        .context("Failed to determine next topic")?;

    let listing = TopicListing {
        path: path.display().to_string(),
        next_index: next.index,
        topics: topics
            .into_iter()
            .enumerate()
            .map(|(index, topic)| TopicEntry {
                index,
                next: index as u64 == next.index,
                display: topic.to_string(),
                title: topic.title,
                description: topic.description,
            })
            .collect(),
    };

    if json {
        let json =
            serde_json::to_string_pretty(&listing).context("Failed to serialize topics")?;
        println!("{}", json);
    } else {
        println!("Topics in {} ({}):", listing.path, listing.topics.len());
        println!();
        for entry in &listing.topics {
            let marker = if entry.next { ">" } else { " " };
            println!("{} {:>3}  {}", marker, entry.index, entry.display);
        }
        println!();
        println!("> marks the topic the next run will use");
    }

    Ok(ExitCode::SUCCESS)
}

async fn init_topics(config: &AppConfig, force: bool) -> Result<ExitCode> {
    let path = &config.general.topics_path;
    if path.exists() && !force {
        bail!(
            "Topic file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    let store = FsTopicStore::new(path);
    store
        .create_default()
        .await
        .with_context(|| format!("Failed to write topic file: {}", path.display()))?;

    println!("Created topic file: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit the file to add or remove topics (one 'title,description' per row)");
    println!("  2. Run 'topic-tweeter topics list' to check the rotation");
    println!("  3. Run 'topic-tweeter run --dry-run' to preview a tweet");

    Ok(ExitCode::SUCCESS)
}
