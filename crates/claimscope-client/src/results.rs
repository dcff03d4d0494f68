//! Results view: fetch-once rendering of assessment results.

use std::num::NonZeroUsize;

use chrono::Utc;
use lru::LruCache;
use uuid::Uuid;

use claimscope_core::models::*;
use claimscope_core::{defaults, Error, Result};

use crate::api::ApiClient;

/// How the prior-art section of a result should render.
#[derive(Debug, PartialEq)]
pub enum PriorArtView<'a> {
    /// The run did not include a prior-art search.
    NotRequested,
    /// The search ran and found nothing — shown affirmatively.
    NoSimilarPatents,
    /// Ranked candidates, highest similarity first.
    Ranked(&'a [PatentCandidate]),
}

/// Classify a result's prior-art section for rendering.
pub fn prior_art_view(result: &AssessmentResult) -> PriorArtView<'_> {
    match &result.prior_art {
        None => PriorArtView::NotRequested,
        Some(search) if search.is_empty() => PriorArtView::NoSimilarPatents,
        Some(search) => PriorArtView::Ranked(&search.patents),
    }
}

/// Fixed example result rendered when no assessment id is supplied.
/// Demonstration data only; involves no network call.
pub fn sample_result() -> AssessmentResult {
    let now = Utc::now();
    AssessmentResult {
        assessment_id: Uuid::nil(),
        scores: CriterionScores::from_criteria(0.75, 0.72, 0.88, 0.82),
        confidence_level: 0.68,
        summary: "This invention shows strong potential for patentability with novel technical features.".to_string(),
        recommendations: vec![
            "Consider broadening claim scope in communications technology".to_string(),
            "Additional prior art search recommended in machine learning domain".to_string(),
            "Strong technical merit for patent application".to_string(),
        ],
        key_features: vec![
            "Adaptive signal processing pipeline".to_string(),
            "Self-calibrating sensor array".to_string(),
            "Low-power operation mode".to_string(),
        ],
        risk_factors: vec![
            "Crowded prior-art landscape in the core field".to_string(),
            "Enablement depends on unpublished calibration data".to_string(),
        ],
        prior_art: None,
        created_at: now,
        completed_at: now,
    }
}

/// Read-only results view with a per-id cache.
///
/// A result is fetched at most once per assessment id; repeat lookups hit
/// the cache. Results are immutable once produced, so the cache never
/// invalidates.
pub struct ResultsView {
    cache: LruCache<Uuid, AssessmentResult>,
}

impl Default for ResultsView {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsView {
    pub fn new() -> Self {
        Self {
            cache: LruCache::new(
                NonZeroUsize::new(defaults::RESULT_CACHE_CAPACITY).expect("nonzero capacity"),
            ),
        }
    }

    /// Load a result for display.
    ///
    /// With an id: returns the cached result or fetches once; an assessment
    /// that has not completed yet (or failed) has no renderable result and
    /// errors. Without an id: returns the fixed example result, no network.
    pub async fn load(
        &mut self,
        client: &ApiClient,
        assessment_id: Option<Uuid>,
    ) -> Result<AssessmentResult> {
        let id = match assessment_id {
            None => return Ok(sample_result()),
            Some(id) => id,
        };

        if let Some(cached) = self.cache.get(&id) {
            return Ok(cached.clone());
        }

        let record = client.get_assessment(id).await?;
        let result = record
            .result
            .ok_or_else(|| Error::NotFound(format!("No result available for assessment {}", id)))?;

        self.cache.put(id, result.clone());
        Ok(result)
    }

    /// Whether a result for this id is already cached.
    pub fn is_cached(&self, id: Uuid) -> bool {
        self.cache.contains(&id)
    }
}
