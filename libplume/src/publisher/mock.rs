//! Mock publisher for testing
//!
//! Configurable success and failure behavior with shared counters, so a
//! test can keep a cloned handle after boxing the mock into a service and
//! verify exactly what was (or was not) published.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{PublishError, Result};

use super::Publisher;

#[derive(Clone)]
pub struct MockPublisher {
    post_error: Option<String>,
    character_limit: Option<usize>,
    calls: Arc<Mutex<usize>>,
    published: Arc<Mutex<Vec<String>>>,
}

impl MockPublisher {
    /// Publisher that accepts everything
    pub fn succeeding() -> Self {
        Self {
            post_error: None,
            character_limit: Some(280),
            calls: Arc::new(Mutex::new(0)),
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Publisher whose publish call always fails
    pub fn failing(message: &str) -> Self {
        Self {
            post_error: Some(message.to_string()),
            ..Self::succeeding()
        }
    }

    /// Publisher with a custom character limit
    pub fn with_limit(limit: usize) -> Self {
        Self {
            character_limit: Some(limit),
            ..Self::succeeding()
        }
    }

    pub fn publish_call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    /// Content successfully published, in order
    pub fn published_content(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(&self, text: &str) -> Result<String> {
        *self.calls.lock().unwrap() += 1;

        self.validate(text)?;

        if let Some(message) = &self.post_error {
            return Err(PublishError::Network(message.clone()).into());
        }

        self.published.lock().unwrap().push(text.to_string());
        Ok(format!("mock-{}", uuid::Uuid::new_v4()))
    }

    fn validate(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(PublishError::Validation("Content cannot be empty".to_string()).into());
        }
        if let Some(limit) = self.character_limit {
            let length = text.chars().count();
            if length > limit {
                return Err(PublishError::Validation(format!(
                    "Content exceeds {} character limit (got {} characters)",
                    limit, length
                ))
                .into());
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock-publisher"
    }

    fn character_limit(&self) -> Option<usize> {
        self.character_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_succeeding_publishes_and_records() {
        let publisher = MockPublisher::succeeding();

        let post_id = publisher.publish("Test content").await.unwrap();
        assert!(post_id.starts_with("mock-"));
        assert_eq!(publisher.publish_call_count(), 1);
        assert_eq!(publisher.published_content(), vec!["Test content".to_string()]);
    }

    #[tokio::test]
    async fn test_failing_records_call_but_not_content() {
        let publisher = MockPublisher::failing("network down");

        let error = publisher.publish("Test content").await.unwrap_err();
        assert!(error.to_string().contains("network down"));
        assert_eq!(publisher.publish_call_count(), 1);
        assert!(publisher.published_content().is_empty());
    }

    #[tokio::test]
    async fn test_limit_enforced() {
        let publisher = MockPublisher::with_limit(10);

        assert!(publisher.publish("short").await.is_ok());
        let error = publisher.publish("this is far too long").await.unwrap_err();
        assert!(error.to_string().contains("character limit"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let publisher = MockPublisher::succeeding();
        let handle = publisher.clone();

        publisher.publish("one").await.unwrap();

        assert_eq!(handle.publish_call_count(), 1);
        assert_eq!(handle.published_content(), vec!["one".to_string()]);
    }
}
