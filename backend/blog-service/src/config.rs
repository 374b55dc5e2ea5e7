use anyhow::{anyhow, Result};
use link_preview::FetcherConfig;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub redis_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    pub enabled: bool,
    pub timeout_ms: u64,
    pub max_body_bytes: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    /// 0 disables the per-request deadline
    pub deadline_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub preview: PreviewConfig,
    pub request: RequestConfig,
    pub log: LogConfig,
}

impl Config {
    /// Defaults, overridden by `BLOG_*` environment variables (and `.env`).
    ///
    /// Nested keys use `__`, e.g. `BLOG_PREVIEW__TIMEOUT_MS=1500`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("BLOG")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .set_default("store.backend", "memory")?
            .set_default("store.redis_url", "redis://127.0.0.1:6379")?
            .set_default("preview.enabled", true)?
            .set_default("preview.timeout_ms", 3000)?
            .set_default("preview.max_body_bytes", 1024 * 1024)?
            .set_default(
                "preview.user_agent",
                concat!("blog-service/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("request.deadline_ms", 10_000)?
            .set_default("log.format", "text")?
            .add_source(environment)
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.backend == StoreBackend::Redis && self.store.redis_url.is_empty() {
            return Err(anyhow!("Redis URL is required for the redis store backend"));
        }

        if self.preview.timeout_ms == 0 {
            return Err(anyhow!("Preview timeout must be greater than 0"));
        }

        if self.preview.max_body_bytes == 0 {
            return Err(anyhow!("Preview body cap must be greater than 0"));
        }

        if self.request.deadline_ms > 0 && self.preview.timeout_ms >= self.request.deadline_ms {
            return Err(anyhow!(
                "Preview timeout ({}ms) must be shorter than the request deadline ({}ms)",
                self.preview.timeout_ms,
                self.request.deadline_ms
            ));
        }

        Ok(())
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_millis(self.preview.timeout_ms),
            max_body_bytes: self.preview.max_body_bytes,
            user_agent: self.preview.user_agent.clone(),
        }
    }

    pub fn request_deadline(&self) -> Option<Duration> {
        (self.request.deadline_ms > 0).then(|| Duration::from_millis(self.request.deadline_ms))
    }
}
