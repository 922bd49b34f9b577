mod api_data;
mod history;

pub use api_data::{ApiDataProvider, RECENT_MESSAGE_WINDOW};
pub use history::{InMemoryHistory, MessageHistory};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::models::message::Memory;

/// Context handed back to the host's reasoning step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResult {
    pub text: String,
    pub values: Map<String, Value>,
}

impl ProviderResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn get(&self, message: &Memory) -> ProviderResult;
}
