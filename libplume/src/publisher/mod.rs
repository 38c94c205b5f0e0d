//! Publishing abstraction and implementations
//!
//! A [`Publisher`] takes finished post text and puts it on the network,
//! returning the platform's post id. The real implementation talks to the
//! X API v2; [`mock::MockPublisher`] is available to every build so
//! integration tests can verify the posting flow without credentials or
//! network access.

use async_trait::async_trait;

use crate::error::Result;

pub mod mock;
pub mod oauth;
pub mod x;

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish text and return the platform-specific post id.
    ///
    /// # Errors
    ///
    /// Returns `PublishError` when validation fails, the request cannot be
    /// sent, or the API rejects the post. No local state is changed by this
    /// call; counting a post happens only after it returns successfully.
    async fn publish(&self, text: &str) -> Result<String>;

    /// Validate content against platform rules without sending anything
    fn validate(&self, text: &str) -> Result<()>;

    /// Lowercase identifier for the platform (e.g. "x")
    fn name(&self) -> &str;

    /// Maximum characters per post, if the platform has a hard limit
    fn character_limit(&self) -> Option<usize>;

    /// Web URL for a published post, if the platform has one
    fn post_url(&self, _post_id: &str) -> Option<String> {
        None
    }
}
