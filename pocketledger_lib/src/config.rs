//! Runtime settings read from the environment (a `.env` file is loaded by the CLI).

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use rand::Rng;

use crate::format::Locale;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub session_file: PathBuf,
    pub locale: Locale,
    pub retry: RetryConfig,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("POCKETLEDGER_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            session_file: std::env::var("POCKETLEDGER_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_session_file()),
            locale: std::env::var("POCKETLEDGER_LOCALE")
                .ok()
                .and_then(|val| val.parse().ok())
                .unwrap_or_default(),
            retry: RetryConfig::from_env(),
        }
    }
}

fn default_session_file() -> PathBuf {
    ProjectDirs::from("", "", "pocketledger")
        .map(|dirs| dirs.config_dir().join("session"))
        .unwrap_or_else(|| PathBuf::from(".pocketledger_session"))
}

/// Backoff policy for transient failures on read-only calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 8000,
        }
    }
}

impl RetryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("POCKETLEDGER_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_u64("POCKETLEDGER_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_u64("POCKETLEDGER_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    /// No retries at all.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
