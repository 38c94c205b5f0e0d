//! Mock text generator for testing
//!
//! Available to all builds so integration tests can drive the posting flow
//! without credentials or network access. Call counts and received topics
//! are shared across clones, letting tests keep a handle after the mock has
//! been boxed into a service.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{GenerationError, Result};

use super::TextGenerator;

#[derive(Clone)]
pub struct MockGenerator {
    response: Option<String>,
    error: Option<String>,
    calls: Arc<Mutex<usize>>,
    topics: Arc<Mutex<Vec<String>>>,
}

impl MockGenerator {
    /// Generator that always returns `text`
    pub fn returning(text: &str) -> Self {
        Self {
            response: Some(text.to_string()),
            error: None,
            calls: Arc::new(Mutex::new(0)),
            topics: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Generator that always fails with a network-style error
    pub fn failing(message: &str) -> Self {
        Self {
            response: None,
            error: Some(message.to_string()),
            calls: Arc::new(Mutex::new(0)),
            topics: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Generator that returns an empty response
    pub fn empty() -> Self {
        Self {
            response: None,
            error: None,
            calls: Arc::new(Mutex::new(0)),
            topics: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    /// Topics passed to `generate`, in order
    pub fn topics(&self) -> Vec<String> {
        self.topics.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, topic: &str) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        self.topics.lock().unwrap().push(topic.to_string());

        if let Some(message) = &self.error {
            return Err(GenerationError::Network(message.clone()).into());
        }

        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(GenerationError::Empty.into()),
        }
    }

    fn name(&self) -> &str {
        "mock-generator"
    }
}
