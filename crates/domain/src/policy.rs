//! Format constraints applied to generated text before it is posted

/// Policy configuration
#[derive(Debug, Clone)]
pub struct TweetPolicy {
    /// Hard length ceiling in characters
    pub max_chars: usize,
    /// Appended when text is cut to fit `max_chars`
    pub ellipsis: &'static str,
}

impl Default for TweetPolicy {
    fn default() -> Self {
        Self {
            max_chars: 280,
            ellipsis: "...",
        }
    }
}

impl TweetPolicy {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            ..Default::default()
        }
    }

    /// Turn raw generator output into postable text.
    ///
    /// Returns `None` when nothing is left after trimming and quote stripping.
    pub fn prepare(&self, raw: &str) -> Option<String> {
        let text = strip_wrapping_quotes(raw.trim()).trim();
        if text.is_empty() {
            return None;
        }

        let length = text.chars().count();
        if length <= self.max_chars {
            return Some(text.to_string());
        }

        tracing::warn!(
            length = length,
            max_chars = self.max_chars,
            "Tweet too long, truncating"
        );
        Some(truncate_with_ellipsis(text, self.max_chars, self.ellipsis))
    }
}

/// Remove one pair of double quotes wrapping the whole text.
///
/// A lone `"` both opens and closes, so it strips to nothing.
pub fn strip_wrapping_quotes(text: &str) -> &str {
    if text == "\"" {
        return "";
    }
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text)
}

/// Cut `text` to `max_chars` characters, the last of which are `ellipsis`
pub fn truncate_with_ellipsis(text: &str, max_chars: usize, ellipsis: &str) -> String {
    let keep = max_chars.saturating_sub(ellipsis.chars().count());
    let cut = text
        .char_indices()
        .nth(keep)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    format!("{}{}", &text[..cut], ellipsis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_wrapping_quotes() {
        let policy = TweetPolicy::default();
        let result = policy.prepare("\"Will AI replace jobs? #AI\"").unwrap();
        assert_eq!(result, "Will AI replace jobs? #AI");
    }

    #[test]
    fn test_keeps_inner_quotes() {
        assert_eq!(
            strip_wrapping_quotes("Is \"serverless\" a lie? #Cloud"),
            "Is \"serverless\" a lie? #Cloud"
        );
    }

    #[test]
    fn test_lone_quote_char_strips_to_nothing() {
        assert_eq!(strip_wrapping_quotes("\""), "");
        assert!(TweetPolicy::default().prepare("  \"  ").is_none());
    }

    #[test]
    fn test_truncates_long_text() {
        let policy = TweetPolicy::default();
        let result = policy.prepare(&"a".repeat(300)).unwrap();

        assert_eq!(result.chars().count(), 280);
        assert!(result.ends_with("..."));
        assert_eq!(&result[..277], "a".repeat(277));
    }

    #[test]
    fn test_exact_limit_is_untouched() {
        let policy = TweetPolicy::default();
        let text = "b".repeat(280);
        assert_eq!(policy.prepare(&text).unwrap(), text);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(300);
        let result = truncate_with_ellipsis(&text, 280, "...");
        assert_eq!(result.chars().count(), 280);
    }

    #[test]
    fn test_empty_after_stripping_is_rejected() {
        let policy = TweetPolicy::default();
        assert!(policy.prepare("   ").is_none());
        assert!(policy.prepare("\"\"").is_none());
    }
}
