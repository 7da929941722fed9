use super::{Page, Transport};
use crate::model::{Error, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory transport serving canned pages by URL and recording every call.
#[derive(Default)]
pub struct FakeTransport {
    pages: HashMap<String, Page>,
    failures: HashMap<String, fn(String) -> Error>,
    calls: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn with_page(mut self, url: &str, body: Value, next: Option<&str>) -> Self {
        self.pages
            .insert(url.to_string(), Page::new(body, next.map(String::from)));
        self
    }

    pub fn with_failure(mut self, url: &str, error: fn(String) -> Error) -> Self {
        self.failures.insert(url.to_string(), error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<Page> {
        self.calls.borrow_mut().push(url.to_string());
        if let Some(error) = self.failures.get(url) {
            return Err(error(url.to_string()));
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no canned page for `{url}`")))
    }
}
