use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub taxonomy_path: String,
    pub port: u16,
    pub rust_log: String,
    pub max_batch_size: usize,
    /// Overrides `MatchTuning::fuzzy_threshold` when set.
    pub fuzzy_threshold: Option<f64>,
    /// Overrides `MatchTuning::rematch_threshold` when set.
    pub rematch_threshold: Option<f64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            taxonomy_path: require_env("TAXONOMY_PATH")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_batch_size: optional_env("MAX_BATCH_SIZE")?.unwrap_or(500),
            fuzzy_threshold: optional_env("FUZZY_THRESHOLD")?,
            rematch_threshold: optional_env("REMATCH_THRESHOLD")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_env_missing_is_none() {
        let value: Option<f64> = optional_env("QUALMAP_TEST_UNSET_VARIABLE").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_optional_env_parses_value() {
        std::env::set_var("QUALMAP_TEST_THRESHOLD", " 0.85 ");
        let value: Option<f64> = optional_env("QUALMAP_TEST_THRESHOLD").unwrap();
        assert_eq!(value, Some(0.85));
    }

    #[test]
    fn test_optional_env_rejects_garbage() {
        std::env::set_var("QUALMAP_TEST_BATCH", "lots");
        let err = optional_env::<usize>("QUALMAP_TEST_BATCH").unwrap_err();
        assert!(err.to_string().contains("QUALMAP_TEST_BATCH"));
    }
}
