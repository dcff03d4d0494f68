//! Custom-search client for prior art on patents.google.com.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};

use claimscope_core::models::{PatentCandidate, PriorArtQuery, PriorArtSearchResult};
use claimscope_core::{defaults, Error, PriorArtBackend, Result};

use crate::query::generate_queries;
use crate::ranking::{dedupe_and_rank, search_confidence};

/// Default custom-search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://customsearch.googleapis.com/customsearch/v1";

/// Strategy label attached to every multi-query search result.
pub const SEARCH_STRATEGY: &str = "multi_query_deduplication";

static PATENT_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // US20210123456A1-style ids
        r"patents\.google\.com/patent/([A-Z]{2}\d+[A-Z]\d*)",
        // Simpler formats
        r"patents\.google\.com/patent/([A-Z]+\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract a patent id from a patents.google.com URL.
pub fn extract_patent_id(url: &str) -> Option<String> {
    for pattern in PATENT_ID_PATTERNS.iter() {
        if let Some(cap) = pattern.captures(url) {
            return Some(cap[1].to_string());
        }
    }
    None
}

/// Patent office from the id prefix.
pub fn patent_office_for(patent_id: &str) -> &'static str {
    if patent_id.starts_with("US") {
        "USPTO"
    } else if patent_id.starts_with("EP") {
        "EPO"
    } else if patent_id.starts_with("WO") {
        "WIPO"
    } else if patent_id.starts_with("CN") {
        "CNIPA"
    } else if patent_id.starts_with("JP") {
        "JPO"
    } else if patent_id.starts_with("KR") {
        "KIPO"
    } else {
        "Unknown"
    }
}

/// Prior-art search client over a Google-Custom-Search-style endpoint.
pub struct GooglePatentsClient {
    client: reqwest::Client,
    search_url: String,
    api_key: Option<String>,
    engine_id: Option<String>,
    timeout_secs: u64,
}

impl GooglePatentsClient {
    /// Create a client with explicit configuration.
    pub fn with_config(search_url: String, api_key: Option<String>, engine_id: Option<String>) -> Self {
        let timeout_secs = std::env::var("CLAIMSCOPE_SEARCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::SEARCH_TIMEOUT_SECS);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            search_url,
            api_key,
            engine_id,
            timeout_secs,
        }
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CLAIMSCOPE_PATENTS_SEARCH_URL` | Google custom-search endpoint |
    /// | `CLAIMSCOPE_PATENTS_API_KEY` | (none — searches return empty) |
    /// | `CLAIMSCOPE_PATENTS_ENGINE_ID` | (none — searches return empty) |
    /// | `CLAIMSCOPE_SEARCH_TIMEOUT_SECS` | `30` |
    pub fn from_env() -> Self {
        let search_url = std::env::var("CLAIMSCOPE_PATENTS_SEARCH_URL")
            .unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string());
        let api_key = std::env::var("CLAIMSCOPE_PATENTS_API_KEY").ok();
        let engine_id = std::env::var("CLAIMSCOPE_PATENTS_ENGINE_ID").ok();

        Self::with_config(search_url, api_key, engine_id)
    }

    /// Run one query against the search endpoint, paging up to `limit`
    /// results. Query-level failures return an empty list; the caller
    /// decides whether to continue with other strategies.
    async fn search_single(&self, query: &str, limit: usize) -> Vec<PatentCandidate> {
        let (api_key, engine_id) = match (&self.api_key, &self.engine_id) {
            (Some(k), Some(e)) => (k, e),
            _ => {
                warn!("Patent search API key or engine id not configured");
                return Vec::new();
            }
        };

        let mut patents = Vec::new();
        let mut start_index = 1usize;
        let page_size = defaults::SEARCH_PAGE_SIZE;

        // The API returns at most 10 results per request and 100 overall
        while start_index <= limit.min(100) {
            let num = page_size.min(limit).to_string();
            let start = start_index.to_string();
            let request = self
                .client
                .get(&self.search_url)
                .timeout(Duration::from_secs(self.timeout_secs))
                .query(&[
                    ("key", api_key.as_str()),
                    ("cx", engine_id.as_str()),
                    ("q", query),
                    ("num", num.as_str()),
                    ("start", start.as_str()),
                    ("fileType", "pdf"),
                    ("siteSearch", "patents.google.com"),
                    ("siteSearchFilter", "i"),
                ]);

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, query = %query, "Patent search request failed");
                    break;
                }
            };

            if !response.status().is_success() {
                warn!(status = %response.status(), query = %query, "Patent search request rejected");
                break;
            }

            let data: JsonValue = match response.json().await {
                Ok(d) => d,
                Err(e) => {
                    warn!(error = %e, "Failed to decode search response");
                    break;
                }
            };

            let items = match data.get("items").and_then(|i| i.as_array()) {
                Some(items) if !items.is_empty() => items.clone(),
                _ => break,
            };

            let item_count = items.len();
            for item in items {
                match parse_search_item(&item) {
                    Some(patent) => patents.push(patent),
                    None => debug!("Skipping unparseable search item"),
                }
            }

            if item_count < page_size || patents.len() >= limit {
                break;
            }

            start_index += page_size;
            // Stay under the per-second quota
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        patents.truncate(limit);
        patents
    }
}

/// Parse a single custom-search item into a candidate patent.
///
/// Items without a recognizable patent id are dropped.
fn parse_search_item(item: &JsonValue) -> Option<PatentCandidate> {
    let url = item.get("link")?.as_str()?.to_string();
    let patent_id = extract_patent_id(&url)?;

    let title = item
        .get("title")
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .replace(" - Google Patents", "");

    let snippet = item
        .get("snippet")
        .and_then(|s| s.as_str())
        .unwrap_or_default();
    let abstract_text: String = snippet.chars().take(defaults::ABSTRACT_MAX_CHARS).collect();

    let page_map = item.get("pagemap");

    let inventors: Vec<String> = page_map
        .and_then(|pm| pm.get("person"))
        .and_then(|p| p.as_array())
        .map(|people| {
            people
                .iter()
                .filter_map(|p| p.get("name").and_then(|n| n.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let assignee = page_map
        .and_then(|pm| pm.get("organization"))
        .and_then(|o| o.as_array())
        .and_then(|orgs| orgs.first())
        .and_then(|org| org.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or_default()
        .to_string();

    let metatags = page_map
        .and_then(|pm| pm.get("metatags"))
        .and_then(|m| m.as_array())
        .and_then(|tags| tags.first());
    let filing_date = metatags
        .and_then(|m| m.get("citation_patent_filing_date"))
        .and_then(|d| d.as_str())
        .unwrap_or_default()
        .to_string();
    let publication_date = metatags
        .and_then(|m| m.get("citation_patent_publication_date"))
        .and_then(|d| d.as_str())
        .unwrap_or_default()
        .to_string();

    let patent_office = patent_office_for(&patent_id).to_string();

    Some(PatentCandidate {
        patent_id,
        title,
        abstract_text,
        inventors,
        assignee,
        filing_date,
        publication_date,
        patent_office,
        classifications: Vec::new(),
        url,
        similarity_score: 0.0,
        relevance_reason: String::new(),
    })
}

#[async_trait]
impl PriorArtBackend for GooglePatentsClient {
    #[instrument(skip(self, query), fields(subsystem = "patents", component = "cse_client", op = "search"))]
    async fn search(&self, query: &PriorArtQuery) -> Result<PriorArtSearchResult> {
        let start = Instant::now();

        if query.invention_description.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Invention description is required for prior-art search".to_string(),
            ));
        }

        let queries = generate_queries(
            &query.invention_description,
            query.technical_field,
            query.keywords.as_deref(),
        );

        let per_query_limit = (query.max_results / queries.len().max(1))
            .clamp(1, defaults::DEFAULT_MAX_RESULTS);

        let mut all_patents = Vec::new();
        let mut total_results = 0usize;

        for search_query in queries.iter().take(defaults::MAX_QUERIES_EXECUTED) {
            let results = self.search_single(search_query, per_query_limit).await;
            total_results += results.len();
            all_patents.extend(results);
        }

        let unique = dedupe_and_rank(all_patents, &query.invention_description, query.max_results);
        let confidence_score = search_confidence(unique.len(), total_results, queries.len());
        let search_duration_ms = start.elapsed().as_millis() as u64;

        info!(
            result_count = unique.len(),
            duration_ms = search_duration_ms,
            "Prior-art search complete"
        );

        Ok(PriorArtSearchResult {
            query: format!("Multi-strategy search: {}", query.technical_field.label()),
            total_results,
            patents: unique,
            search_duration_ms,
            confidence_score,
            search_strategy: SEARCH_STRATEGY.to_string(),
        })
    }
}
