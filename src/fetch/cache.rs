use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum CallKind {
    PullRequests,
    IssueComments,
    WorksheetTitles,
    WorksheetValues,
}

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct FetchKey {
    pub source: String,
    pub call: CallKind,
    pub id: String,
}

impl FetchKey {
    pub fn new(source: impl ToString, call: CallKind, id: impl ToString) -> Self {
        Self {
            source: source.to_string(),
            call,
            id: id.to_string(),
        }
    }
}

/// Raw remote payloads for the lifetime of one invocation. Never invalidated
/// except through [`FetchCache::clear`].
#[derive(Debug, Default)]
pub struct FetchCache {
    entries: Mutex<HashMap<FetchKey, Value>>,
}

impl FetchCache {
    pub async fn get(&self, key: &FetchKey) -> Option<Value> {
        self.entries.lock().await.get(key).cloned()
    }

    pub async fn insert(&self, key: FetchKey, value: Value) {
        self.entries.lock().await.insert(key, value);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
