use crate::api::fetcher::{ApiFetcher, FetchOptions};
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::utils::display::DisplayFormatter;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

pub const API_SERVICE_TYPE: &str = "api-fetcher";
pub const API_SERVICE_CAPABILITY: &str = "Fetches and formats data from various APIs";

/// Owns the cached fetcher and the formatters, and knows the three endpoints.
///
/// Built once per plugin and shared with the action and provider through `Arc`.
#[derive(Debug)]
pub struct ApiService {
    config: ApiConfig,
    fetcher: ApiFetcher,
    display: DisplayFormatter,
    running: AtomicBool,
}

impl ApiService {
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = ApiFetcher::new(&config)?;
        info!(
            ttl_secs = config.cache_ttl.as_secs(),
            capacity = config.cache_capacity,
            "Starting {} service: {}",
            API_SERVICE_TYPE,
            API_SERVICE_CAPABILITY
        );
        Ok(Self {
            config,
            fetcher,
            display: DisplayFormatter::new(),
            running: AtomicBool::new(true),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Clears the cache; every later fetch reports the service as unavailable.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let dropped = self.fetcher.clear_cache();
        info!(dropped, "Stopped {} service", API_SERVICE_TYPE);
    }

    pub fn cached_entries(&self) -> usize {
        self.fetcher.cached_entries()
    }

    pub fn sweep_cache(&self) -> usize {
        self.fetcher.sweep_expired()
    }

    pub async fn fetch_api(&self, url: &str, options: &FetchOptions) -> Result<Value> {
        if !self.is_running() {
            return Err(ApiError::service_unavailable("API service"));
        }
        self.fetcher.fetch_json(url, options).await
    }

    pub fn weather_url(&self, city: &str) -> Result<String> {
        let key = self
            .config
            .weather_api_key
            .as_deref()
            .ok_or_else(|| ApiError::config("OPEN_WEATHER_API_KEY is not set"))?;
        Ok(format!(
            "{}?q={}&appid={}&units=metric",
            self.config.weather_base_url,
            urlencoding::encode(city),
            urlencoding::encode(key)
        ))
    }

    pub fn crypto_url(&self) -> String {
        format!(
            "{}/coins/markets?vs_currency=usd&ids=bitcoin",
            self.config.crypto_base_url
        )
    }

    pub fn news_url(&self) -> Option<String> {
        self.config.news_api_key.as_deref().map(|key| {
            format!(
                "{}/top-headlines?language=en&apiKey={}",
                self.config.news_base_url,
                urlencoding::encode(key)
            )
        })
    }

    pub async fn current_weather(&self, city: &str) -> Result<String> {
        let url = self.weather_url(city)?;
        let data = self.fetch_api(&url, &FetchOptions::new()).await?;
        debug!(city, "weather data received");
        Ok(self.display.format_weather_data(&data))
    }

    pub async fn bitcoin_price(&self) -> Result<String> {
        let data = self.fetch_api(&self.crypto_url(), &FetchOptions::new()).await?;
        Ok(self.display.format_crypto_data(&data))
    }

    /// Live headlines when a news key is configured, placeholder articles otherwise.
    pub async fn latest_news(&self) -> Result<String> {
        let data = match self.news_url() {
            Some(url) => self.fetch_api(&url, &FetchOptions::new()).await?,
            None => {
                if !self.is_running() {
                    return Err(ApiError::service_unavailable("API service"));
                }
                debug!("No news API key configured, serving placeholder headlines");
                placeholder_news()
            }
        };
        Ok(self.display.format_news_data(&data))
    }
}

pub fn placeholder_news() -> Value {
    json!({
        "articles": [
            {
                "title": "Tech Innovation Continues to Drive Markets",
                "description": "Latest developments in AI and automation are reshaping industries worldwide.",
                "source": { "name": "Tech Daily" }
            },
            {
                "title": "Climate Change Summit Reaches Key Agreements",
                "description": "World leaders agree on new initiatives to combat climate change.",
                "source": { "name": "Global News" }
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(config: ApiConfig) -> ApiService {
        ApiService::new(config.with_base_url("http://localhost:1")).unwrap()
    }

    #[test]
    fn weather_url_requires_api_key() {
        let service = service(ApiConfig::new());
        assert!(matches!(service.weather_url("Paris"), Err(ApiError::Config(_))));
    }

    #[test]
    fn weather_url_encodes_city() {
        let service = service(ApiConfig::new().with_weather_api_key("k1"));
        assert_eq!(
            service.weather_url("new york").unwrap(),
            "http://localhost:1/data/2.5/weather?q=new%20york&appid=k1&units=metric"
        );
    }

    #[test]
    fn news_url_only_with_key() {
        assert!(service(ApiConfig::new()).news_url().is_none());
        let url = service(ApiConfig::new().with_news_api_key("n")).news_url().unwrap();
        assert_eq!(url, "http://localhost:1/v2/top-headlines?language=en&apiKey=n");
    }

    #[tokio::test]
    async fn placeholder_news_is_formatted_without_network() {
        let text = service(ApiConfig::new()).latest_news().await.unwrap();
        assert!(text.contains("Tech Innovation Continues to Drive Markets"));
        assert!(text.contains("🔗 Source: Global News"));
    }

    #[tokio::test]
    async fn stopped_service_refuses_fetches() {
        let service = service(ApiConfig::new());
        service.stop();
        assert!(!service.is_running());
        let err = service.bitcoin_price().await.unwrap_err();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
        assert!(service.latest_news().await.is_err());
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(ApiService::new(ApiConfig::new().with_cache_capacity(0)).is_err());
    }
}
