//! Mock prior-art backend for deterministic testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use claimscope_core::models::{PatentCandidate, PriorArtQuery, PriorArtSearchResult};
use claimscope_core::{Error, PriorArtBackend, Result};

use crate::client::SEARCH_STRATEGY;

/// Build a fixture result with `count` candidates, scores descending from 0.9.
pub fn fixture_result(count: usize) -> PriorArtSearchResult {
    let patents = (0..count)
        .map(|i| PatentCandidate {
            patent_id: format!("US{:07}A1", 1000000 + i),
            title: format!("Candidate patent {}", i + 1),
            abstract_text: "An adaptive apparatus for the assessed domain.".to_string(),
            inventors: vec!["Jane Inventor".to_string()],
            assignee: "Acme Corp".to_string(),
            filing_date: "2019-03-01".to_string(),
            publication_date: "2020-09-15".to_string(),
            patent_office: "USPTO".to_string(),
            classifications: vec!["H04B".to_string()],
            url: format!("https://patents.google.com/patent/US{:07}A1", 1000000 + i),
            similarity_score: (0.9 - i as f32 * 0.1).max(0.05),
            relevance_reason: "Shares key concepts: adaptive, apparatus, domain".to_string(),
        })
        .collect::<Vec<_>>();

    PriorArtSearchResult {
        query: "Multi-strategy search: fixture".to_string(),
        total_results: count,
        patents,
        search_duration_ms: 42,
        confidence_score: if count == 0 { 0.0 } else { 0.8 },
        search_strategy: SEARCH_STRATEGY.to_string(),
    }
}

/// The affirmative zero-match outcome.
pub fn empty_result() -> PriorArtSearchResult {
    fixture_result(0)
}

/// Deterministic prior-art backend for tests.
#[derive(Clone)]
pub struct MockPriorArtBackend {
    result: Arc<Mutex<PriorArtSearchResult>>,
    fail_with: Option<String>,
    calls: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<PriorArtQuery>>>,
}

impl MockPriorArtBackend {
    pub fn new() -> Self {
        Self {
            result: Arc::new(Mutex::new(fixture_result(3))),
            fail_with: None,
            calls: Arc::new(AtomicUsize::new(0)),
            last_query: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the canned result.
    pub fn with_result(self, result: PriorArtSearchResult) -> Self {
        *self.result.lock().unwrap() = result;
        self
    }

    /// Make every call fail with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Number of `search` calls issued against this backend.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent query received, if any.
    pub fn last_query(&self) -> Option<PriorArtQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

impl Default for MockPriorArtBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriorArtBackend for MockPriorArtBackend {
    async fn search(&self, query: &PriorArtQuery) -> Result<PriorArtSearchResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());

        if let Some(ref msg) = self.fail_with {
            return Err(Error::PatentSearch(msg.clone()));
        }

        let mut result = self.result.lock().unwrap().clone();
        result.patents.truncate(query.max_results);
        Ok(result)
    }
}
