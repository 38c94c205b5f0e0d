//! Text generation abstraction and implementations
//!
//! A [`TextGenerator`] turns a topic into draft post text. The real
//! implementation calls the Gemini API; [`mock::MockGenerator`] is available
//! to every build so integration tests can exercise the posting flow without
//! credentials or network access.

use async_trait::async_trait;

use crate::error::Result;

pub mod gemini;
pub mod mock;

/// Character budget for a finished draft
pub const DRAFT_CHAR_LIMIT: usize = 280;

/// Voice used in the drafting prompt when none is configured
pub const DEFAULT_PERSONA: &str = "friendly and helpful developer assistant";

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate draft post text for a topic.
    ///
    /// Implementations return cleaned-up text ready for review or
    /// publishing, never blank.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the upstream call fails or yields no
    /// usable text.
    async fn generate(&self, topic: &str) -> Result<String>;

    /// Lowercase identifier for the backing service (e.g. "gemini")
    fn name(&self) -> &str;
}

/// Build the drafting prompt for a topic
pub fn drafting_prompt(persona: &str, topic: &str) -> String {
    format!(
        "You are a {persona} who posts about tech, coding, and building in public.\n\
         Write a single social media post on the following topic.\n\
         Keep it under {DRAFT_CHAR_LIMIT} characters.\n\
         Be authentic, insightful, and engaging.\n\
         Use emojis sparingly (max 1-2).\n\
         Use at most 1-2 hashtags, and only if they are highly relevant.\n\
         Reply with the post text only, no preamble and no quotation marks.\n\n\
         Topic: {topic}"
    )
}

/// Clean up raw model output: trim, drop one layer of wrapping quotes, and
/// truncate to `limit` characters.
pub fn tidy_draft(raw: &str, limit: usize) -> String {
    let text = raw.trim();
    let text = strip_wrapping_quotes(text).trim();
    truncate_chars(text, limit)
}

fn strip_wrapping_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|t| t.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

/// Truncate on character boundaries, ending with "..." when cut short
fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_persona_and_topic() {
        let prompt = drafting_prompt("grumpy sysadmin", "container networking");
        assert!(prompt.contains("grumpy sysadmin"));
        assert!(prompt.contains("Topic: container networking"));
        assert!(prompt.contains("280"));
    }

    #[test]
    fn test_tidy_trims_whitespace() {
        assert_eq!(tidy_draft("  hello world \n", 280), "hello world");
    }

    #[test]
    fn test_tidy_strips_wrapping_quotes() {
        assert_eq!(tidy_draft("\"quoted post\"", 280), "quoted post");
        assert_eq!(tidy_draft("'quoted post'", 280), "quoted post");
        // Interior quotes stay
        assert_eq!(tidy_draft("she said \"hi\" to me", 280), "she said \"hi\" to me");
        // Only one layer comes off
        assert_eq!(tidy_draft("\"\"double\"\"", 280), "\"double\"");
    }

    #[test]
    fn test_tidy_leaves_short_text_alone() {
        let text = "Short and sweet.";
        assert_eq!(tidy_draft(text, 280), text);
    }

    #[test]
    fn test_truncates_long_text_with_ellipsis() {
        let long = "a".repeat(300);
        let tidied = tidy_draft(&long, 280);
        assert_eq!(tidied.chars().count(), 280);
        assert!(tidied.ends_with("..."));
    }

    #[test]
    fn test_truncation_is_char_safe_on_multibyte_text() {
        let long = "é".repeat(300);
        let tidied = tidy_draft(&long, 280);
        assert!(tidied.chars().count() <= 280);
        assert!(tidied.ends_with("..."));
    }

    #[test]
    fn test_exact_limit_is_not_truncated() {
        let exact = "b".repeat(280);
        assert_eq!(tidy_draft(&exact, 280), exact);
    }
}
