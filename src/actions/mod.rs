mod fetch_api;
pub mod intent;

pub use fetch_api::{FetchApiAction, ERROR_ACTION, FETCH_API_ACTION};
pub use intent::{extract_city, Intent};

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::Result;
use crate::models::message::{Content, Memory};

/// Sink for the messages an action emits while it runs.
#[async_trait]
pub trait HandlerCallback: Send + Sync {
    async fn send(&self, content: Content) -> Result<()>;
}

/// One turn of a sample conversation showing when an action fires.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionExample {
    pub name: &'static str,
    pub content: Content,
}

impl ActionExample {
    pub fn user(text: &str) -> Self {
        Self {
            name: "User",
            content: Content::text(text),
        }
    }

    pub fn agent(text: &str, action: &str) -> Self {
        Self {
            name: "HelloBot",
            content: Content::with_action(text, action),
        }
    }
}

/// A trigger predicate paired with a response handler.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn similes(&self) -> Vec<&'static str>;
    /// Sample exchanges, each a user turn followed by the agent's reply.
    fn examples(&self) -> Vec<Vec<ActionExample>> {
        Vec::new()
    }
    /// Whether this action should handle `message`.
    async fn validate(&self, message: &Memory) -> bool;
    /// Runs the action, emitting replies through `callback`. Returns `false` on failure.
    async fn handle(&self, message: &Memory, callback: &dyn HandlerCallback) -> bool;
}

/// Callback that keeps everything it is sent, in order.
#[derive(Debug, Default)]
pub struct CollectingCallback {
    sent: Mutex<Vec<Content>>,
}

impl CollectingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Content> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl HandlerCallback for CollectingCallback {
    async fn send(&self, content: Content) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(content);
        Ok(())
    }
}
