//! Lenient parsing of model responses.
//!
//! Models frequently fence JSON in markdown code blocks or wrap the payload
//! in an extra object even when the prompt asks for a bare object. The
//! parser tolerates both before giving up.

use serde::Deserialize;

use claimscope_core::models::{clamp_score, CriterionAssessment};
use claimscope_core::{Error, Result};

/// Raw wire shape of a criterion analysis response.
#[derive(Debug, Deserialize)]
struct RawAssessment {
    #[serde(default)]
    novelty_score: f32,
    #[serde(default)]
    non_obviousness_score: f32,
    #[serde(default)]
    utility_score: f32,
    #[serde(default)]
    enablement_score: f32,
    #[serde(default)]
    confidence_level: f32,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    key_features: Vec<String>,
    #[serde(default)]
    risk_factors: Vec<String>,
}

impl From<RawAssessment> for CriterionAssessment {
    fn from(raw: RawAssessment) -> Self {
        CriterionAssessment {
            novelty: clamp_score(raw.novelty_score),
            non_obviousness: clamp_score(raw.non_obviousness_score),
            utility: clamp_score(raw.utility_score),
            enablement: clamp_score(raw.enablement_score),
            confidence: clamp_score(raw.confidence_level),
            summary: raw.summary,
            recommendations: raw.recommendations,
            key_features: raw.key_features,
            risk_factors: raw.risk_factors,
        }
    }
}

/// Strip markdown code fences and surrounding prose from a model response,
/// returning the JSON body.
pub fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();

    // Fenced block: take everything between the first fence line and the
    // closing fence.
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        // Skip an optional language tag on the fence line
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
        return body.trim();
    }

    // Unfenced: take the outermost object if there is leading/trailing prose.
    if let (Some(open), Some(close)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if open < close {
            return trimmed[open..=close].trim();
        }
    }

    trimmed
}

/// Parse a criterion-analysis response.
///
/// Tries a direct parse first; if that fails and the payload is an object
/// wrapping a single object value (e.g. `{"assessment": {...}}`), unwraps
/// and parses the inner value. All scores are clamped to `[0, 1]`.
pub fn parse_assessment(raw: &str) -> Result<CriterionAssessment> {
    let body = extract_json(raw);

    let direct_err = match serde_json::from_str::<RawAssessment>(body) {
        Ok(parsed) => return Ok(parsed.into()),
        Err(e) => e,
    };

    if let Ok(obj) = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(body) {
        for (_key, value) in &obj {
            if value.is_object() {
                if let Ok(parsed) = serde_json::from_value::<RawAssessment>(value.clone()) {
                    return Ok(parsed.into());
                }
            }
        }
    }

    Err(Error::Analysis(format!(
        "Unparseable analysis response: {}",
        direct_err
    )))
}
