use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::analysis::report::PolishWeights;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Unset disables the tone collaborator.
    pub tone_analyzer_url: Option<String>,
    pub tone_analyzer_api_key: Option<String>,
    pub analysis_timeout: Duration,
    pub polish_weights: PolishWeights,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup so parsing is testable without
    /// touching the process environment.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PolishWeights::default();

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080u16)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            tone_analyzer_url: optional_env(&lookup, "TONE_ANALYZER_URL"),
            tone_analyzer_api_key: optional_env(&lookup, "TONE_ANALYZER_API_KEY"),
            analysis_timeout: Duration::from_secs(
                parse_or(&lookup, "ANALYSIS_TIMEOUT_SECS", 20u64)
                    .context("ANALYSIS_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            polish_weights: PolishWeights {
                consistency: weight(&lookup, "POLISH_WEIGHT_CONSISTENCY", defaults.consistency)?,
                tone: weight(&lookup, "POLISH_WEIGHT_TONE", defaults.tone)?,
                job_match: weight(&lookup, "POLISH_WEIGHT_MATCH", defaults.job_match)?,
            },
        })
    }
}

fn optional_env<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(lookup, key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn weight<F>(lookup: &F, key: &str, default: f64) -> Result<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let value: f64 = parse_or(lookup, key, default)?;
    if !(0.0..=1.0).contains(&value) {
        bail!("Environment variable '{key}' must be within [0, 1], got {value}");
    }
    Ok(value)
}
