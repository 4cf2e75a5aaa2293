//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::ArticleRecord;
use crate::sources::{FetchError, Source};

/// A mock source that serves predefined identifiers and records.
///
/// Every call is appended to a log so tests can assert which requests were
/// made and in what order.
#[derive(Debug, Default)]
pub struct MockSource {
    ids: Mutex<Vec<String>>,
    records: Mutex<HashMap<String, ArticleRecord>>,
    failing: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create a new mock source with no data
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifiers returned by every search
    pub fn set_search_ids<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut guard = self.ids.lock().unwrap();
        *guard = ids.into_iter().map(Into::into).collect();
    }

    /// Register the record returned for `id`
    pub fn insert_record(&self, id: impl Into<String>, record: ArticleRecord) {
        self.records.lock().unwrap().insert(id.into(), record);
    }

    /// Make fetching `id` fail with a parse error carrying `message`
    pub fn fail_record(&self, id: impl Into<String>, message: impl Into<String>) {
        self.failing.lock().unwrap().insert(id.into(), message.into());
    }

    /// Calls made so far, as `"search:<query>"` or `"fetch:<id>"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of record fetches made so far
    pub fn fetch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with("fetch:"))
            .count()
    }
}

#[async_trait]
impl Source for MockSource {
    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, FetchError> {
        self.calls.lock().unwrap().push(format!("search:{}", query));
        Ok(self.ids.lock().unwrap().clone())
    }

    async fn fetch_record(&self, id: &str) -> Result<ArticleRecord, FetchError> {
        self.calls.lock().unwrap().push(format!("fetch:{}", id));

        if let Some(message) = self.failing.lock().unwrap().get(id) {
            return Err(FetchError::Parse(message.clone()));
        }

        self.records
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: 404,
                url: format!("mock://{}", id),
            })
    }
}
