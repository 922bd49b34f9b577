use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::models::message::Memory;

/// Read access to the host's stored conversation.
#[async_trait]
pub trait MessageHistory: Send + Sync {
    /// The newest `count` messages of `room_id`, newest first.
    async fn recent_messages(&self, room_id: &str, count: usize) -> Result<Vec<Memory>>;
}

/// Room-scoped message log kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    rooms: Mutex<HashMap<String, Vec<Memory>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, memory: Memory) {
        self.rooms()
            .entry(memory.room_id.clone())
            .or_default()
            .push(memory);
    }

    pub fn len(&self, room_id: &str) -> usize {
        self.rooms().get(room_id).map_or(0, Vec::len)
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<String, Vec<Memory>>> {
        self.rooms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MessageHistory for InMemoryHistory {
    async fn recent_messages(&self, room_id: &str, count: usize) -> Result<Vec<Memory>> {
        Ok(self
            .rooms()
            .get(room_id)
            .map(|messages| messages.iter().rev().take(count).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recent_messages_are_newest_first_and_room_scoped() {
        let history = InMemoryHistory::new();
        for i in 0..4 {
            history.record(Memory::user_text("a", format!("m{}", i)));
        }
        history.record(Memory::user_text("b", "other"));

        let recent = history.recent_messages("a", 2).await.unwrap();
        let texts: Vec<_> = recent.iter().map(|m| m.content.text.as_str()).collect();
        assert_eq!(texts, vec!["m3", "m2"]);
        assert_eq!(history.len("b"), 1);
        assert!(history.recent_messages("missing", 5).await.unwrap().is_empty());
    }
}
