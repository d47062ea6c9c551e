//! CSV-backed topic store

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use topic_tweeter_domain::{Topic, TopicSource, TopicStoreError, default_topics};

/// First cell of the optional header row
const HEADER_SENTINEL: &str = "Topic";

/// Topic store reading `title,description` rows from a CSV file
pub struct FsTopicStore {
    path: PathBuf,
}

impl FsTopicStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the built-in topic list to the store path, overwriting it
    pub async fn create_default(&self) -> Result<(), TopicStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, render_csv(&default_topics())).await?;

        tracing::info!(path = %self.path.display(), "Created default topic file");
        Ok(())
    }

    /// Load topics without creating the file when it is missing
    pub async fn load_existing(&self) -> Result<Vec<Topic>, TopicStoreError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        self.parse(&content)
    }

    /// Parse CSV content into topics
    pub fn parse(&self, content: &str) -> Result<Vec<Topic>, TopicStoreError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let records = parse_records(content).map_err(|(line, message)| TopicStoreError::Parse {
            file: self.path.display().to_string(),
            line,
            message,
        })?;

        let mut topics = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let title = record.cells.first().map(|c| c.trim()).unwrap_or_default();
            if idx == 0 && title == HEADER_SENTINEL {
                continue;
            }
            if title.is_empty() {
                continue;
            }

            match record.cells.get(1) {
                Some(description) => topics.push(Topic::new(title, description.trim())),
                None => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = record.line,
                        title = %title,
                        "Topic row has no description"
                    );
                    topics.push(Topic::title_only(title));
                }
            }
        }

        if topics.is_empty() {
            return Err(TopicStoreError::Empty(self.path.display().to_string()));
        }

        Ok(topics)
    }
}

#[async_trait]
impl TopicSource for FsTopicStore {
    async fn load(&self) -> Result<Vec<Topic>, TopicStoreError> {
        match self.load_existing().await {
            Err(TopicStoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Topic file not found, writing default topics"
                );
                self.create_default().await?;
                self.load_existing().await
            }
            other => other,
        }
    }
}

/// Render topics as CSV with a `Topic,Description` header
pub fn render_csv(topics: &[Topic]) -> String {
    let mut out = String::from("Topic,Description\n");
    for topic in topics {
        out.push_str(&escape_field(&topic.title));
        if let Some(description) = &topic.description {
            out.push(',');
            out.push_str(&escape_field(description));
        }
        out.push('\n');
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One CSV row and the line it starts on
#[derive(Debug)]
struct Record {
    line: usize,
    cells: Vec<String>,
}

/// Split CSV content into records. Quoted cells may contain commas, `""`
/// and line breaks. Blank lines produce no record.
///
/// Errors carry the 1-based line where the offending record starts.
fn parse_records(content: &str) -> Result<Vec<Record>, (usize, String)> {
    let mut records = Vec::new();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            ('\n', true) => {
                line += 1;
                current.push('\n');
            }
            ('"', false) if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            (',', false) => cells.push(std::mem::take(&mut current)),
            ('\r', false) if chars.peek() == Some(&'\n') => {}
            ('\n', false) => {
                if !cells.is_empty() || !current.is_empty() {
                    cells.push(std::mem::take(&mut current));
                    records.push(Record {
                        line: record_line,
                        cells: std::mem::take(&mut cells),
                    });
                }
                line += 1;
                record_line = line;
            }
            (c, _) => current.push(c),
        }
    }

    if in_quotes {
        return Err((record_line, "unterminated quoted field".to_string()));
    }

    if !cells.is_empty() || !current.is_empty() {
        cells.push(current);
        records.push(Record {
            line: record_line,
            cells,
        });
    }

    Ok(records)
}
