//! Error types for Plume

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlumeError>;

#[derive(Error, Debug)]
pub enum PlumeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Monthly quota exceeded: {used}/{ceiling} posts used")]
    QuotaExceeded { used: u32, ceiling: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Refusing to publish duplicate content: {0}")]
    DuplicateContent(String),

    #[error("Interactive prompt failed: {0}")]
    Prompt(String),

    #[error("Publishing cancelled at review")]
    Cancelled,
}

impl PlumeError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PlumeError::Config(_) => 2,
            PlumeError::InvalidInput(_) | PlumeError::DuplicateContent(_) => 3,
            PlumeError::QuotaExceeded { .. } => 4,
            PlumeError::Cancelled => 5,
            PlumeError::Database(_)
            | PlumeError::Generation(_)
            | PlumeError::Publish(_)
            | PlumeError::Prompt(_) => 1,
        }
    }

    /// Whether the invocation ended by deliberate user choice rather than a fault
    pub fn is_cancellation(&self) -> bool {
        matches!(self, PlumeError::Cancelled)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variables: {0}")]
    MissingEnv(String),

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    #[error("Could not resolve a data directory for the post database")]
    DataDir,
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database operation failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Request to generation API failed: {0}")]
    Network(String),

    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Generation API returned no usable text")]
    Empty,
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Request to publish API failed: {0}")]
    Network(String),

    #[error("Publish API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Publish API response did not contain a post id")]
    MissingId,

    #[error("Content validation failed: {0}")]
    Validation(String),

    #[error("Request signing failed: {0}")]
    Signing(String),
}
