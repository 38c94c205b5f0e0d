//! Plume - AI-drafted posts for X with a monthly quota
//!
//! This library holds the whole posting flow: configuration from the
//! environment, a SQLite-backed monthly counter, a Gemini generation client,
//! an OAuth 1.0a X publishing client, and the copilot review seam. The CLI
//! in the `plume` crate is a thin shell over [`service::PlumeService`].

pub mod config;
pub mod db;
pub mod error;
pub mod generator;
pub mod publisher;
pub mod quota;
pub mod review;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use error::{PlumeError, Result};
pub use service::{PlumeService, PublishReceipt, UsageReport};
pub use types::Period;
