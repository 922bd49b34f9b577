use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::models::cache::ResponseCache;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};

/// Extra request settings. Part of the cache key, so two calls only share a
/// cache entry when their options serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchOptions {
    pub headers: BTreeMap<String, String>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// HTTP GET with a short-lived in-memory cache of successful JSON bodies.
#[derive(Debug)]
pub struct ApiFetcher {
    client: Client,
    user_agent: String,
    cache: Mutex<ResponseCache>,
}

impl ApiFetcher {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            cache: Mutex::new(ResponseCache::new(config.cache_ttl, config.cache_capacity)),
        })
    }

    pub fn cache_key(url: &str, options: &FetchOptions) -> String {
        let serialized = serde_json::to_string(options).unwrap_or_default();
        format!("{}:{}", url, serialized)
    }

    /// Returns parsed JSON for `url`, from cache when a fresh entry exists.
    ///
    /// One attempt per call: a non-2xx status or transport failure comes back
    /// as an error and nothing is cached.
    pub async fn fetch_json(&self, url: &str, options: &FetchOptions) -> Result<serde_json::Value> {
        let key = Self::cache_key(url, options);
        let shown = redact_url(url);

        // The lock is released before the request goes out; two concurrent
        // misses on one key will both hit the network.
        let cached = self.lock_cache().get(&key);
        if let Some(data) = cached {
            debug!("Using cached data for {}", shown);
            return Ok(data);
        }

        info!("Fetching data from {}", shown);
        let json = match self.request(url, options).await {
            Ok(json) => json,
            Err(e) => {
                error!("API fetch failed for {}: {}", shown, e);
                return Err(e);
            }
        };

        self.lock_cache().insert(key, json.clone());
        Ok(json)
    }

    async fn request(&self, url: &str, options: &FetchOptions) -> Result<serde_json::Value> {
        let overrides = |name: &str| {
            options
                .headers
                .keys()
                .any(|key| key.eq_ignore_ascii_case(name))
        };

        let mut request = self.client.get(url);
        if !overrides(USER_AGENT.as_str()) {
            request = request.header(USER_AGENT, &self.user_agent);
        }
        if !overrides(ACCEPT.as_str()) {
            request = request.header(ACCEPT, "application/json");
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let shown = redact_url(url);
        let response = request.send().await.map_err(|source| ApiError::Network {
            url: shown.clone(),
            source: source.without_url(),
        })?;

        let status = response.status();
        debug!(status = %status, "response received from {}", shown);
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                url: shown,
            });
        }

        response.json().await.map_err(|source| ApiError::Decode {
            url: shown,
            source: source.without_url(),
        })
    }

    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn sweep_expired(&self) -> usize {
        let removed = self.lock_cache().sweep_expired();
        if removed > 0 {
            debug!("Swept {} expired cache entries", removed);
        }
        removed
    }

    pub fn clear_cache(&self) -> usize {
        self.lock_cache().clear()
    }

    // A panic while holding the lock cannot leave the map half-written, so a
    // poisoned guard is still usable.
    fn lock_cache(&self) -> MutexGuard<'_, ResponseCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Drops the query string, which may carry API keys, before a URL is logged
/// or put into an error.
pub fn redact_url(url: &str) -> String {
    url.split(['?', '#']).next().unwrap_or(url).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_includes_serialized_options() {
        let plain = ApiFetcher::cache_key("http://x/a", &FetchOptions::new());
        let with_header = ApiFetcher::cache_key(
            "http://x/a",
            &FetchOptions::new().header("Authorization", "Bearer t"),
        );
        assert_eq!(plain, r#"http://x/a:{"headers":{}}"#);
        assert_ne!(plain, with_header);
    }

    #[test]
    fn redacted_url_has_no_query() {
        assert_eq!(
            redact_url("http://x/data/2.5/weather?q=rome&appid=SECRET123&units=metric"),
            "http://x/data/2.5/weather"
        );
        assert_eq!(redact_url("http://x/plain"), "http://x/plain");
    }

    #[test]
    fn cache_key_is_stable_across_header_order() {
        let a = FetchOptions::new().header("a", "1").header("b", "2");
        let b = FetchOptions::new().header("b", "2").header("a", "1");
        assert_eq!(ApiFetcher::cache_key("u", &a), ApiFetcher::cache_key("u", &b));
    }
}
