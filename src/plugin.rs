use std::sync::Arc;
use tracing::info;

use crate::actions::{Action, FetchApiAction};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::providers::{ApiDataProvider, MessageHistory, Provider};
use crate::services::api_service::ApiService;

pub const PLUGIN_NAME: &str = "hello-world-api";
pub const PLUGIN_DESCRIPTION: &str = "API fetching capabilities for HelloBot";

/// The service, action and provider, wired together with one shared service.
pub struct ApiPlugin {
    service: Arc<ApiService>,
    actions: Vec<Arc<dyn Action>>,
    providers: Vec<Arc<dyn Provider>>,
}

impl ApiPlugin {
    pub fn new(config: ApiConfig, history: Arc<dyn MessageHistory>) -> Result<Self> {
        let service = Arc::new(ApiService::new(config)?);
        let action: Arc<dyn Action> = Arc::new(FetchApiAction::new(Arc::clone(&service)));
        let provider: Arc<dyn Provider> =
            Arc::new(ApiDataProvider::new(Arc::clone(&service), history));

        info!("Registered plugin {}", PLUGIN_NAME);
        Ok(Self {
            service,
            actions: vec![action],
            providers: vec![provider],
        })
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn description(&self) -> &'static str {
        PLUGIN_DESCRIPTION
    }

    pub fn service(&self) -> &Arc<ApiService> {
        &self.service
    }

    pub fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    pub fn stop(&self) {
        self.service.stop();
    }
}
