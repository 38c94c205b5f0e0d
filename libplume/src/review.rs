//! Human review of generated drafts
//!
//! Copilot mode suspends between generation and publishing while a human
//! decides what happens to the draft. The seam is a blocking trait so the
//! flow stays testable; the console implementation is the only place in the
//! crate that prompts interactively.

use dialoguer::{Input, Select};

use crate::error::{PlumeError, Result};

/// What the reviewer decided to do with a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    /// Publish this text (possibly edited from the draft)
    Approve(String),
    /// Do not publish anything
    Reject,
}

pub trait Reviewer: Send + Sync {
    /// Present a draft and block until the human decides.
    ///
    /// # Errors
    ///
    /// Returns an error only when the prompt itself fails (e.g. no usable
    /// terminal). A "no" from the human is `Ok(ReviewAction::Reject)`.
    fn review(&self, draft: &str) -> Result<ReviewAction>;
}

/// Interactive reviewer for terminal sessions
pub struct ConsoleReviewer;

impl Reviewer for ConsoleReviewer {
    fn review(&self, draft: &str) -> Result<ReviewAction> {
        println!();
        println!("{}", "=".repeat(60));
        println!("DRAFT PREVIEW");
        println!("{}", "-".repeat(60));
        println!("{}", draft);
        println!("{}", "-".repeat(60));
        println!("Length: {}/280 characters", draft.chars().count());
        println!("{}", "=".repeat(60));

        let choice = Select::new()
            .with_prompt("Publish this post?")
            .items(&["Publish as is", "Edit, then publish", "Discard"])
            .default(0)
            .interact()
            .map_err(|e| PlumeError::Prompt(e.to_string()))?;

        match choice {
            0 => Ok(ReviewAction::Approve(draft.to_string())),
            1 => {
                let edited: String = Input::new()
                    .with_prompt("Edit")
                    .with_initial_text(draft)
                    .interact_text()
                    .map_err(|e| PlumeError::Prompt(e.to_string()))?;
                Ok(ReviewAction::Approve(edited))
            }
            _ => Ok(ReviewAction::Reject),
        }
    }
}

/// Reviewer that always returns a fixed decision, for tests
#[derive(Clone)]
pub struct ScriptedReviewer {
    action: ReviewAction,
    calls: std::sync::Arc<std::sync::Mutex<usize>>,
    seen: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl ScriptedReviewer {
    pub fn approving() -> Self {
        Self::with_action(ReviewAction::Approve(String::new()))
    }

    /// Approve with replacement text, as if the human edited the draft
    pub fn editing(text: &str) -> Self {
        Self::with_action(ReviewAction::Approve(text.to_string()))
    }

    pub fn rejecting() -> Self {
        Self::with_action(ReviewAction::Reject)
    }

    fn with_action(action: ReviewAction) -> Self {
        Self {
            action,
            calls: std::sync::Arc::new(std::sync::Mutex::new(0)),
            seen: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    /// Drafts presented for review, in order
    pub fn seen_drafts(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl Reviewer for ScriptedReviewer {
    fn review(&self, draft: &str) -> Result<ReviewAction> {
        *self.calls.lock().unwrap() += 1;
        self.seen.lock().unwrap().push(draft.to_string());

        // An empty Approve means "approve the draft unchanged"
        match &self.action {
            ReviewAction::Approve(text) if text.is_empty() => {
                Ok(ReviewAction::Approve(draft.to_string()))
            }
            action => Ok(action.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approving_passes_draft_through() {
        let reviewer = ScriptedReviewer::approving();
        let action = reviewer.review("the draft").unwrap();
        assert_eq!(action, ReviewAction::Approve("the draft".to_string()));
        assert_eq!(reviewer.call_count(), 1);
        assert_eq!(reviewer.seen_drafts(), vec!["the draft".to_string()]);
    }

    #[test]
    fn test_editing_replaces_text() {
        let reviewer = ScriptedReviewer::editing("edited text");
        let action = reviewer.review("the draft").unwrap();
        assert_eq!(action, ReviewAction::Approve("edited text".to_string()));
    }

    #[test]
    fn test_rejecting() {
        let reviewer = ScriptedReviewer::rejecting();
        assert_eq!(reviewer.review("the draft").unwrap(), ReviewAction::Reject);
    }
}
