use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::warn;

use super::{MessageHistory, Provider, ProviderResult};
use crate::actions::FETCH_API_ACTION;
use crate::models::message::Memory;
use crate::services::api_service::ApiService;

/// How many of the latest room messages are checked for a fetch.
pub const RECENT_MESSAGE_WINDOW: usize = 5;

/// Tells the agent whether API data was fetched recently in this room.
pub struct ApiDataProvider {
    service: Arc<ApiService>,
    history: Arc<dyn MessageHistory>,
}

impl ApiDataProvider {
    pub fn new(service: Arc<ApiService>, history: Arc<dyn MessageHistory>) -> Self {
        Self { service, history }
    }
}

#[async_trait]
impl Provider for ApiDataProvider {
    fn name(&self) -> &'static str {
        "API_DATA"
    }

    fn description(&self) -> &'static str {
        "Provides context about recently fetched API data"
    }

    async fn get(&self, message: &Memory) -> ProviderResult {
        if !self.service.is_running() {
            return ProviderResult::empty();
        }

        let recent = match self
            .history
            .recent_messages(&message.room_id, RECENT_MESSAGE_WINDOW)
            .await
        {
            Ok(recent) => recent,
            Err(e) => {
                warn!(room_id = %message.room_id, "could not read message history: {}", e);
                Vec::new()
            }
        };

        let has_recent_api_activity = recent
            .iter()
            .take(RECENT_MESSAGE_WINDOW)
            .any(|memory| memory.has_action(FETCH_API_ACTION));

        let mut values = Map::new();
        if has_recent_api_activity {
            values.insert("hasRecentApiData".into(), Value::Bool(true));
            values.insert("canFetchMore".into(), Value::Bool(true));
            ProviderResult {
                text: "I recently fetched some API data in our conversation. I can get updated information if needed.".to_string(),
                values,
            }
        } else {
            values.insert("hasRecentApiData".into(), Value::Bool(false));
            values.insert("availableApis".into(), json!(["weather", "crypto", "news"]));
            ProviderResult {
                text: "I can fetch real-time data from various APIs like weather, cryptocurrency prices, and news.".to_string(),
                values,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::error::{ApiError, Result};
    use crate::models::message::Content;
    use crate::providers::InMemoryHistory;

    struct BrokenHistory;

    #[async_trait]
    impl MessageHistory for BrokenHistory {
        async fn recent_messages(&self, _room_id: &str, _count: usize) -> Result<Vec<Memory>> {
            Err(ApiError::service_unavailable("memory store"))
        }
    }

    fn service() -> Arc<ApiService> {
        Arc::new(ApiService::new(ApiConfig::new()).unwrap())
    }

    fn fetched(room: &str) -> Memory {
        Memory::new(room, Content::with_action("₿ ...", FETCH_API_ACTION))
    }

    #[tokio::test]
    async fn no_history_offers_available_apis() {
        let provider = ApiDataProvider::new(service(), Arc::new(InMemoryHistory::new()));
        let result = provider.get(&Memory::user_text("room", "hi")).await;

        assert_eq!(result.values["hasRecentApiData"], json!(false));
        assert_eq!(result.values["availableApis"], json!(["weather", "crypto", "news"]));
        assert!(result.text.starts_with("I can fetch real-time data"));
    }

    #[tokio::test]
    async fn fetch_within_last_five_messages_is_reported() {
        let history = Arc::new(InMemoryHistory::new());
        history.record(fetched("room"));
        for i in 0..4 {
            history.record(Memory::user_text("room", format!("chat {}", i)));
        }
        let provider = ApiDataProvider::new(service(), history);
        let result = provider.get(&Memory::user_text("room", "hi")).await;

        assert_eq!(result.values["hasRecentApiData"], json!(true));
        assert_eq!(result.values["canFetchMore"], json!(true));
    }

    #[tokio::test]
    async fn fetch_older_than_window_is_ignored() {
        let history = Arc::new(InMemoryHistory::new());
        history.record(fetched("room"));
        for i in 0..5 {
            history.record(Memory::user_text("room", format!("chat {}", i)));
        }
        let provider = ApiDataProvider::new(service(), history);
        let result = provider.get(&Memory::user_text("room", "hi")).await;

        assert_eq!(result.values["hasRecentApiData"], json!(false));
    }

    #[tokio::test]
    async fn fetch_in_another_room_is_ignored() {
        let history = Arc::new(InMemoryHistory::new());
        history.record(fetched("elsewhere"));
        let provider = ApiDataProvider::new(service(), history);
        let result = provider.get(&Memory::user_text("room", "hi")).await;

        assert_eq!(result.values["hasRecentApiData"], json!(false));
    }

    #[tokio::test]
    async fn stopped_service_yields_empty_context() {
        let service = service();
        service.stop();
        let provider = ApiDataProvider::new(service, Arc::new(InMemoryHistory::new()));
        assert_eq!(provider.get(&Memory::user_text("room", "hi")).await, ProviderResult::empty());
    }

    #[tokio::test]
    async fn history_errors_are_treated_as_empty() {
        let provider = ApiDataProvider::new(service(), Arc::new(BrokenHistory));
        let result = provider.get(&Memory::user_text("room", "hi")).await;
        assert_eq!(result.values["hasRecentApiData"], json!(false));
    }
}
