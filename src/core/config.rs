use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::info;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_FLUSH_SECS: &str = "60";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub activity_flush: Duration,
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("PUZZTERM_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let flush_secs: u64 = try_load(&lookup, "PUZZTERM_ACTIVITY_FLUSH_SECS", DEFAULT_FLUSH_SECS)?;
        if flush_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "PUZZTERM_ACTIVITY_FLUSH_SECS",
                value: "0".into(),
                reason: "flush interval must be positive".into(),
            });
        }

        let data_dir = lookup("PUZZTERM_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(".puzzterm")))
            .unwrap_or_else(|| PathBuf::from(".puzzterm"));

        let log_filter = lookup("PUZZTERM_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            api_base_url,
            activity_flush: Duration::from_secs(flush_secs),
            data_dir,
            log_filter,
        })
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    pub fn activity_path(&self) -> PathBuf {
        self.data_dir.join("activity.jsonl")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("puzzterm.log")
    }

    /// Called once tracing is up; anything logged during `load` would be lost.
    pub fn log_summary(&self) {
        info!(
            api = %self.api_base_url,
            flush_secs = self.activity_flush.as_secs(),
            data_dir = %self.data_dir.display(),
            "configuration loaded"
        );
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[("HOME", "/home/ada")])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.activity_flush, Duration::from_secs(60));
        assert_eq!(config.data_dir, PathBuf::from("/home/ada/.puzzterm"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn overrides_are_honoured() {
        let config = Config::from_lookup(lookup_from(&[
            ("PUZZTERM_API_BASE_URL", "https://api.example.com/v1/"),
            ("PUZZTERM_ACTIVITY_FLUSH_SECS", "15"),
            ("PUZZTERM_DATA_DIR", "/tmp/pz"),
            ("PUZZTERM_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/v1");
        assert_eq!(config.activity_flush, Duration::from_secs(15));
        assert_eq!(config.session_path(), PathBuf::from("/tmp/pz/session.json"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn bad_flush_interval_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("PUZZTERM_ACTIVITY_FLUSH_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PUZZTERM_ACTIVITY_FLUSH_SECS", .. }));

        let err = Config::from_lookup(lookup_from(&[("PUZZTERM_ACTIVITY_FLUSH_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
