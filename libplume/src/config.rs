//! Configuration for Plume
//!
//! All settings come from the environment (a `.env` file is honored by the
//! CLI before this module runs). Credentials are required; everything else
//! has a default. Validation happens once at startup, before any network
//! call is made.

use secrecy::SecretString;

use crate::error::{ConfigError, Result};
use crate::generator::DEFAULT_PERSONA;

/// Required credential variables, checked together so a single run reports
/// every missing one.
const REQUIRED_ENV: [&str; 5] = [
    "X_API_KEY",
    "X_API_SECRET_KEY",
    "X_ACCESS_TOKEN",
    "X_ACCESS_TOKEN_SECRET",
    "GEMINI_API_KEY",
];

const DEFAULT_QUOTA_CEILING: u32 = 500;
const DEFAULT_QUOTA_THRESHOLD: u32 = 450;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub quota: QuotaConfig,
    pub generator: GeneratorConfig,
    pub publisher: XCredentials,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Copy)]
pub struct QuotaConfig {
    /// Maximum posts per monthly period
    pub ceiling: u32,
    /// Count at which "approaching limit" warnings start
    pub threshold: u32,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: SecretString,
    pub model: String,
    pub persona: String,
}

/// OAuth 1.0a user-context credentials for the posting API
#[derive(Debug, Clone)]
pub struct XCredentials {
    pub api_key: SecretString,
    pub api_secret: SecretString,
    pub access_token: SecretString,
    pub access_token_secret: SecretString,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails with a `ConfigError` naming every missing credential variable
    /// at once rather than one per run.
    pub fn from_env() -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_ENV
            .iter()
            .copied()
            .filter(|name| env_var(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv(missing.join(", ")).into());
        }

        let secret = |name: &str| SecretString::from(env_var(name).unwrap_or_default());

        let ceiling = parse_u32("PLUME_QUOTA_CEILING", DEFAULT_QUOTA_CEILING)?;
        let threshold = parse_u32("PLUME_QUOTA_THRESHOLD", DEFAULT_QUOTA_THRESHOLD)?;

        let path = match env_var("PLUME_DB") {
            Some(path) => path,
            None => default_db_path()?,
        };

        Ok(Self {
            database: DatabaseConfig { path },
            quota: QuotaConfig { ceiling, threshold },
            generator: GeneratorConfig {
                api_key: secret("GEMINI_API_KEY"),
                model: env_var("GEMINI_MODEL")
                    .unwrap_or_else(|| crate::generator::gemini::DEFAULT_MODEL.to_string()),
                persona: env_var("PLUME_PERSONA").unwrap_or_else(|| DEFAULT_PERSONA.to_string()),
            },
            publisher: XCredentials {
                api_key: secret("X_API_KEY"),
                api_secret: secret("X_API_SECRET_KEY"),
                access_token: secret("X_ACCESS_TOKEN"),
                access_token_secret: secret("X_ACCESS_TOKEN_SECRET"),
            },
        })
    }
}

/// Read an environment variable, treating blank values as unset
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u32(name: &str, default: u32) -> Result<u32> {
    match env_var(name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            ConfigError::InvalidValue {
                var: name.to_string(),
                reason: format!("expected an integer, got '{}'", value),
            }
            .into()
        }),
    }
}

/// Default database location following the XDG Base Directory spec
fn default_db_path() -> Result<String> {
    let data_dir = dirs::data_dir().ok_or(ConfigError::DataDir)?;
    Ok(data_dir
        .join("plume")
        .join("plume.db")
        .to_string_lossy()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    fn set_required_env() {
        for name in REQUIRED_ENV {
            std::env::set_var(name, format!("test-{}", name.to_lowercase()));
        }
    }

    fn clear_env() {
        for name in REQUIRED_ENV {
            std::env::remove_var(name);
        }
        for name in [
            "PLUME_DB",
            "PLUME_QUOTA_CEILING",
            "PLUME_QUOTA_THRESHOLD",
            "PLUME_PERSONA",
            "GEMINI_MODEL",
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_missing_credentials_all_reported_together() {
        clear_env();

        let error = Config::from_env().unwrap_err();
        let message = format!("{}", error);
        for name in REQUIRED_ENV {
            assert!(message.contains(name), "missing {} in: {}", name, message);
        }
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    #[serial]
    fn test_single_missing_credential_reported() {
        clear_env();
        set_required_env();
        std::env::remove_var("GEMINI_API_KEY");

        let error = Config::from_env().unwrap_err();
        let message = format!("{}", error);
        assert!(message.contains("GEMINI_API_KEY"));
        assert!(!message.contains("X_API_KEY,"));
    }

    #[test]
    #[serial]
    fn test_blank_credential_counts_as_missing() {
        clear_env();
        set_required_env();
        std::env::set_var("X_ACCESS_TOKEN", "   ");

        let error = Config::from_env().unwrap_err();
        assert!(format!("{}", error).contains("X_ACCESS_TOKEN"));
    }

    #[test]
    #[serial]
    fn test_defaults_applied() {
        clear_env();
        set_required_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.quota.ceiling, 500);
        assert_eq!(config.quota.threshold, 450);
        assert_eq!(config.generator.model, "gemini-2.5-flash");
        assert_eq!(config.generator.persona, DEFAULT_PERSONA);
        assert!(config.database.path.ends_with("plume.db"));
    }

    #[test]
    #[serial]
    fn test_overrides_applied() {
        clear_env();
        set_required_env();
        std::env::set_var("PLUME_QUOTA_CEILING", "100");
        std::env::set_var("PLUME_QUOTA_THRESHOLD", "90");
        std::env::set_var("PLUME_DB", "/tmp/custom/plume.db");
        std::env::set_var("GEMINI_MODEL", "gemini-2.0-flash");
        std::env::set_var("PLUME_PERSONA", "curmudgeonly kernel hacker");

        let config = Config::from_env().unwrap();
        assert_eq!(config.quota.ceiling, 100);
        assert_eq!(config.quota.threshold, 90);
        assert_eq!(config.database.path, "/tmp/custom/plume.db");
        assert_eq!(config.generator.model, "gemini-2.0-flash");
        assert_eq!(config.generator.persona, "curmudgeonly kernel hacker");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_ceiling_rejected() {
        clear_env();
        set_required_env();
        std::env::set_var("PLUME_QUOTA_CEILING", "lots");

        let error = Config::from_env().unwrap_err();
        let message = format!("{}", error);
        assert!(message.contains("PLUME_QUOTA_CEILING"));
        assert!(message.contains("lots"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_credentials_loaded_as_secrets() {
        clear_env();
        set_required_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.publisher.api_key.expose_secret(), "test-x_api_key");
        assert_eq!(
            config.generator.api_key.expose_secret(),
            "test-gemini_api_key"
        );
        // Debug output must not leak secret material
        let debug = format!("{:?}", config);
        assert!(!debug.contains("test-x_api_key"));
        clear_env();
    }
}
