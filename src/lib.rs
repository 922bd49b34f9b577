pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod plugin;
pub mod providers;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use actions::{Action, ActionExample, CollectingCallback, FetchApiAction, HandlerCallback, Intent};
pub use api::fetcher::{redact_url, ApiFetcher, FetchOptions};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use models::message::{Content, Memory};
pub use plugin::ApiPlugin;
pub use providers::{ApiDataProvider, InMemoryHistory, MessageHistory, Provider, ProviderResult};
pub use services::api_service::ApiService;
pub use utils::display::DisplayFormatter;
