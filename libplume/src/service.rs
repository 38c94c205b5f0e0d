//! Posting flow orchestration
//!
//! `PlumeService` is the single entry point the CLI talks to. It owns the
//! database handle and the generator, publisher, and reviewer collaborators,
//! all built once at startup and threaded through explicitly.
//!
//! Every flow is one pass: check the quota, generate, (optionally) review,
//! publish, and only then advance the counter. The counter is the quota's
//! source of truth, so it moves strictly after a confirmed publish.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Config, QuotaConfig};
use crate::db::{content_fingerprint, Database};
use crate::error::{PlumeError, Result};
use crate::generator::{gemini::GeminiGenerator, TextGenerator};
use crate::publisher::{x::XPublisher, Publisher};
use crate::quota::{self, QuotaDecision};
use crate::review::{ConsoleReviewer, ReviewAction, Reviewer};
use crate::types::Period;

/// Result of a successful publish
#[derive(Debug, Clone, Serialize)]
pub struct PublishReceipt {
    pub post_id: String,
    pub url: Option<String>,
    pub period: String,
    pub used: u32,
    pub ceiling: u32,
}

/// Read-only usage summary for a period
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub period: String,
    pub used: u32,
    pub ceiling: u32,
    pub remaining: u32,
    pub near_limit: bool,
    pub total_published: i64,
}

pub struct PlumeService {
    quota: QuotaConfig,
    db: Database,
    generator: Box<dyn TextGenerator>,
    publisher: Box<dyn Publisher>,
    reviewer: Box<dyn Reviewer>,
}

impl PlumeService {
    /// Production wiring: Gemini generation, X publishing, console review
    pub fn new(config: &Config, db: Database) -> Self {
        Self {
            quota: config.quota,
            db,
            generator: Box::new(GeminiGenerator::new(&config.generator)),
            publisher: Box::new(XPublisher::new(config.publisher.clone())),
            reviewer: Box::new(ConsoleReviewer),
        }
    }

    /// Assemble a service from explicit parts (tests, alternative front ends)
    pub fn with_parts(
        quota: QuotaConfig,
        db: Database,
        generator: Box<dyn TextGenerator>,
        publisher: Box<dyn Publisher>,
        reviewer: Box<dyn Reviewer>,
    ) -> Self {
        Self {
            quota,
            db,
            generator,
            publisher,
            reviewer,
        }
    }

    /// Generate and publish without review
    pub async fn post_auto(&self, topic: &str) -> Result<PublishReceipt> {
        let draft = self.draft(topic).await?;
        self.publish_and_record(&draft).await
    }

    /// Generate, wait for a human decision, then publish on approval.
    ///
    /// Rejection surfaces as [`PlumeError::Cancelled`]: nothing was
    /// published and no counter moved.
    pub async fn post_with_review(&self, topic: &str) -> Result<PublishReceipt> {
        let draft = self.draft(topic).await?;

        match self.reviewer.review(&draft)? {
            ReviewAction::Reject => {
                info!("draft discarded at review");
                Err(PlumeError::Cancelled)
            }
            ReviewAction::Approve(text) => self.publish_and_record(&text).await,
        }
    }

    /// Usage report for the current period; never mutates
    pub async fn stats(&self) -> Result<UsageReport> {
        self.stats_for(Period::current()).await
    }

    /// Usage report for an arbitrary period; never mutates
    pub async fn stats_for(&self, period: Period) -> Result<UsageReport> {
        let used = self.db.post_count(&period).await?;
        let total_published = self.db.total_published().await?;

        Ok(UsageReport {
            period: period.to_string(),
            used,
            ceiling: self.quota.ceiling,
            remaining: quota::remaining(used, self.quota.ceiling),
            near_limit: quota::near_limit(used, self.quota.threshold),
            total_published,
        })
    }

    /// Quota gate, generation, and duplicate check. No state changes.
    async fn draft(&self, topic: &str) -> Result<String> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(PlumeError::InvalidInput("Topic cannot be empty".to_string()));
        }

        let period = Period::current();
        let used = self.db.post_count(&period).await?;
        match quota::decide(used, self.quota.ceiling) {
            QuotaDecision::Deny { used, ceiling } => {
                return Err(PlumeError::QuotaExceeded { used, ceiling });
            }
            QuotaDecision::Allow { remaining } => {
                if quota::near_limit(used, self.quota.threshold) {
                    warn!(used, remaining, "approaching the monthly post quota");
                }
            }
        }

        info!(topic, generator = self.generator.name(), "generating draft");
        let text = self.generator.generate(topic).await?;

        let fingerprint = content_fingerprint(&text);
        if self.db.already_published(&fingerprint).await? {
            return Err(PlumeError::DuplicateContent(preview(&text)));
        }

        Ok(text)
    }

    /// Publish `text`, then advance the counter and record the fingerprint.
    ///
    /// The text may differ from the generated draft (copilot edits), so it
    /// is validated and checked for duplicates again here.
    async fn publish_and_record(&self, text: &str) -> Result<PublishReceipt> {
        self.publisher.validate(text)?;

        let fingerprint = content_fingerprint(text);
        if self.db.already_published(&fingerprint).await? {
            return Err(PlumeError::DuplicateContent(preview(text)));
        }

        let post_id = self.publisher.publish(text).await?;
        info!(post_id = %post_id, platform = self.publisher.name(), "post published");

        // The post is live at this point. Bookkeeping failures are logged
        // rather than returned, since reporting an error for a post that
        // went out would be wrong twice over.
        let period = Period::current();
        if let Err(e) = self.db.increment_post_count(&period).await {
            warn!("published but failed to update the monthly counter: {}", e);
        }
        if let Err(e) = self
            .db
            .record_published(&fingerprint, &post_id, Utc::now().timestamp())
            .await
        {
            warn!("published but failed to record the content fingerprint: {}", e);
        }

        let used = self.db.post_count(&period).await.unwrap_or(0);
        Ok(PublishReceipt {
            url: self.publisher.post_url(&post_id),
            post_id,
            period: period.to_string(),
            used,
            ceiling: self.quota.ceiling,
        })
    }
}

/// Short single-line excerpt of post content for error messages
fn preview(text: &str) -> String {
    const PREVIEW_CHARS: usize = 48;
    let flattened = text.replace('\n', " ");
    if flattened.chars().count() <= PREVIEW_CHARS {
        flattened
    } else {
        let kept: String = flattened.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("short post"), "short post");
    }

    #[test]
    fn test_preview_flattens_newlines_and_truncates() {
        let text = format!("line one\nline two {}", "x".repeat(100));
        let p = preview(&text);
        assert!(!p.contains('\n'));
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 51);
    }
}
