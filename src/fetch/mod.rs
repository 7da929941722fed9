mod cache;
mod http;
#[cfg(test)]
pub mod testing;

pub use cache::{CallKind, FetchCache, FetchKey};
pub use http::HttpTransport;

use crate::model::{Error, Result};
use serde_json::Value;

/// One response body together with the `rel="next"` link it advertised.
#[derive(Debug, Clone)]
pub struct Page {
    pub body: Value,
    pub next: Option<String>,
}

impl Page {
    pub fn new(body: Value, next: Option<String>) -> Self {
        Self { body, next }
    }
}

pub trait Transport {
    async fn get(&self, url: &str) -> Result<Page>;
}

/// Follows `next` links until the source stops advertising one and
/// concatenates every page's items. Results are memoized under `key`.
pub async fn fetch_all_pages<T: Transport>(
    transport: &T,
    cache: &FetchCache,
    key: FetchKey,
    url: String,
) -> Result<Vec<Value>> {
    if let Some(Value::Array(items)) = cache.get(&key).await {
        tracing::debug!(?key, items = items.len(), "served from cache");
        return Ok(items);
    }

    let mut items = vec![];
    let mut next = Some(url);
    let mut page = 0;
    while let Some(url) = next {
        page += 1;
        tracing::debug!(%url, page, "fetching page");
        let response = transport.get(&url).await?;
        match response.body {
            Value::Array(values) => items.extend(values),
            Value::Null => {}
            other => {
                return Err(Error::Transport(format!(
                    "expected a JSON array from `{url}`, got {}",
                    kind_of(&other)
                )))
            }
        }
        next = response.next;
    }

    cache.insert(key, Value::Array(items.clone())).await;
    Ok(items)
}

/// Single-response variant of [`fetch_all_pages`] for non-paginated resources.
pub async fn fetch_once<T: Transport>(
    transport: &T,
    cache: &FetchCache,
    key: FetchKey,
    url: &str,
) -> Result<Value> {
    if let Some(body) = cache.get(&key).await {
        tracing::debug!(?key, "served from cache");
        return Ok(body);
    }
    let response = transport.get(url).await?;
    cache.insert(key, response.body.clone()).await;
    Ok(response.body)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
