use std::time::Duration;

use crate::error::{ApiError, Result};

pub const DEFAULT_USER_AGENT: &str = "HelloBot/1.0";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_CRYPTO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_NEWS_BASE_URL: &str = "https://newsapi.org/v2";

const CACHE_TTL_SECS: u64 = 300; // 5 minutes
const CACHE_CAPACITY: usize = 256;
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Settings for the fetcher and the three endpoints it talks to.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub weather_api_key: Option<String>,
    /// When unset the news path serves placeholder headlines.
    pub news_api_key: Option<String>,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub weather_base_url: String,
    pub crypto_base_url: String,
    pub news_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            news_api_key: None,
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
            cache_capacity: CACHE_CAPACITY,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            crypto_base_url: DEFAULT_CRYPTO_BASE_URL.to_string(),
            news_base_url: DEFAULT_NEWS_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads settings from the environment, falling back to defaults for
    /// anything unset. Malformed numbers are an error rather than a silent default.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            weather_api_key: non_empty_var("OPEN_WEATHER_API_KEY"),
            news_api_key: non_empty_var("NEWS_API_KEY"),
            cache_ttl: parse_var::<u64>("API_CACHE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            cache_capacity: parse_var::<usize>("API_CACHE_CAPACITY")?
                .unwrap_or(defaults.cache_capacity),
            request_timeout: parse_var::<u64>("API_REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_weather_api_key(mut self, key: impl Into<String>) -> Self {
        self.weather_api_key = Some(key.into());
        self
    }

    pub fn with_news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Points all three endpoints at one host. Used to aim the plugin at a mock server.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.weather_base_url = format!("{}/data/2.5/weather", base);
        self.crypto_base_url = format!("{}/api/v3", base);
        self.news_base_url = format!("{}/v2", base);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(ApiError::config("cache capacity must be at least 1"));
        }
        if self.request_timeout.is_zero() {
            return Err(ApiError::config("request timeout must be non-zero"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ApiError::config("user agent must not be empty"));
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ApiError::config(format!("{} is not a valid number: {}", name, raw))),
        None => Ok(None),
    }
}
