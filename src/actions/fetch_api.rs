use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::intent::{extract_city, Intent};
use super::{Action, ActionExample, HandlerCallback};
use crate::error::{ApiError, Result};
use crate::models::message::{Content, Memory};
use crate::services::api_service::ApiService;

/// Marker attached to every message this action emits on success.
pub const FETCH_API_ACTION: &str = "FETCH_API_DATA";
pub const ERROR_ACTION: &str = "ERROR";

const UNKNOWN_REQUEST: &str =
    "🤔 I'm not sure what API data you're looking for. Try asking about weather, Bitcoin prices, or latest news!";

/// Answers weather, Bitcoin price and news questions.
pub struct FetchApiAction {
    service: Arc<ApiService>,
}

impl FetchApiAction {
    pub fn new(service: Arc<ApiService>) -> Self {
        Self { service }
    }

    async fn run(&self, message: &Memory, callback: &dyn HandlerCallback) -> Result<()> {
        if !self.service.is_running() {
            return Err(ApiError::service_unavailable("API service"));
        }

        let text = &message.content.text;
        let intent = Intent::route(text);
        debug!(intent = intent.as_str(), "handling API request");

        let reply = match intent {
            Intent::Weather => {
                emit(callback, "🔍 Let me check the current weather for you...").await?;
                let city = extract_city(text);
                match self.service.current_weather(&city).await {
                    Ok(formatted) => formatted,
                    Err(e) => {
                        warn!(city = %city, "weather lookup failed: {}", e);
                        format!("❌ Sorry, I couldn't get weather data for {}. {}", city, e)
                    }
                }
            }
            Intent::Crypto => {
                emit(callback, "🔍 Checking the latest Bitcoin price...").await?;
                match self.service.bitcoin_price().await {
                    Ok(formatted) => formatted,
                    Err(e) => {
                        warn!("crypto lookup failed: {}", e);
                        format!("❌ Sorry, I couldn't get cryptocurrency data. {}", e)
                    }
                }
            }
            Intent::News => {
                emit(callback, "📰 Fetching the latest news for you...").await?;
                match self.service.latest_news().await {
                    Ok(formatted) => formatted,
                    Err(e) => {
                        warn!("news lookup failed: {}", e);
                        format!("❌ Sorry, I couldn't get news data. {}", e)
                    }
                }
            }
            Intent::None => UNKNOWN_REQUEST.to_string(),
        };

        emit(callback, reply).await
    }
}

async fn emit(callback: &dyn HandlerCallback, text: impl Into<String>) -> Result<()> {
    callback
        .send(Content::with_action(text, FETCH_API_ACTION))
        .await
}

#[async_trait]
impl Action for FetchApiAction {
    fn name(&self) -> &'static str {
        FETCH_API_ACTION
    }

    fn description(&self) -> &'static str {
        "Fetches data from various APIs based on user requests"
    }

    fn similes(&self) -> Vec<&'static str> {
        vec![
            "GET_WEATHER",
            "CHECK_WEATHER",
            "WEATHER_INFO",
            "GET_CRYPTO",
            "CHECK_CRYPTO",
            "CRYPTO_PRICE",
            "GET_NEWS",
            "LATEST_NEWS",
            "NEWS_UPDATE",
            "FETCH_DATA",
            "GET_INFO",
            "API_CALL",
        ]
    }

    fn examples(&self) -> Vec<Vec<ActionExample>> {
        vec![
            vec![
                ActionExample::user("What's the weather like?"),
                ActionExample::agent("🔍 Let me check the current weather for you...", FETCH_API_ACTION),
            ],
            vec![
                ActionExample::user("What's the Bitcoin price?"),
                ActionExample::agent("🔍 Checking the latest Bitcoin price...", FETCH_API_ACTION),
            ],
            vec![
                ActionExample::user("Show me the latest news"),
                ActionExample::agent("📰 Fetching the latest news for you...", FETCH_API_ACTION),
            ],
        ]
    }

    async fn validate(&self, message: &Memory) -> bool {
        Intent::detect(&message.content.text) != Intent::None
    }

    async fn handle(&self, message: &Memory, callback: &dyn HandlerCallback) -> bool {
        match self.run(message, callback).await {
            Ok(()) => true,
            Err(e) => {
                error!("API action failed: {}", e);
                let report = Content::with_action(
                    format!("❌ I encountered an error while fetching data: {}", e),
                    ERROR_ACTION,
                );
                if let Err(send_err) = callback.send(report).await {
                    error!("could not report failure: {}", send_err);
                }
                false
            }
        }
    }
}
