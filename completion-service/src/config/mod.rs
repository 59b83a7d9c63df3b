use serde::Deserialize;
use service_common::config as common_config;
use service_common::error::AppError;
use std::env;
use std::path::PathBuf;

/// Default upstream request timeout in seconds.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Operational log file name, served by `GET /logs`.
pub const OPERATIONAL_LOG_FILE: &str = "app.log";

/// Completion-history file name, served by `GET /history`.
pub const COMPLETION_LOG_FILE: &str = "completions.log";

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub common: common_config::Config,
    pub upstream: UpstreamConfig,
    pub logs: LogConfig,
}

/// Upstream completion backend settings. `url` is `None` when no backend is
/// configured, which switches `/completion` into local-fallback mode.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub dir: PathBuf,
}

impl ServiceConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = common_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(ServiceConfig {
            common,
            upstream: UpstreamConfig {
                url: normalize_base_url(env::var("OLLAMA_URL").ok()),
                model: get_env("OLLAMA_MODEL", Some("mistral"), is_prod)?,
                timeout_secs: get_env(
                    "OLLAMA_TIMEOUT_SECS",
                    Some(&DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            },
            logs: LogConfig {
                dir: PathBuf::from(get_env("LOG_DIR", Some("logs"), is_prod)?),
            },
        })
    }

    /// Path of the operational log file.
    pub fn operational_log_path(&self) -> PathBuf {
        self.logs.dir.join(OPERATIONAL_LOG_FILE)
    }

    /// Path of the completion-history file.
    pub fn completion_log_path(&self) -> PathBuf {
        self.logs.dir.join(COMPLETION_LOG_FILE)
    }
}

/// Treats an absent or blank `OLLAMA_URL` as "no backend configured".
fn normalize_base_url(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_url_means_no_backend() {
        assert_eq!(normalize_base_url(None), None);
    }

    #[test]
    fn blank_url_means_no_backend() {
        assert_eq!(normalize_base_url(Some("".to_string())), None);
        assert_eq!(normalize_base_url(Some("   ".to_string())), None);
    }

    #[test]
    fn url_is_trimmed() {
        assert_eq!(
            normalize_base_url(Some(" http://localhost:11434 ".to_string())),
            Some("http://localhost:11434".to_string())
        );
    }
}
