//! Domain and wire types for claimscope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults;

/// Clamp a model-produced score into the valid `[0.0, 1.0]` range.
pub fn clamp_score(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

// =============================================================================
// TECHNICAL FIELD
// =============================================================================

/// Fixed technical-field taxonomy for invention submissions.
///
/// The wire representation is snake_case; any value outside this set is
/// rejected at deserialization, before any backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalField {
    Software,
    Electronics,
    Mechanical,
    Chemical,
    Biotech,
    Telecommunications,
    Energy,
    Other,
}

impl TechnicalField {
    /// All valid fields, in display order.
    pub const ALL: [TechnicalField; 8] = [
        TechnicalField::Software,
        TechnicalField::Electronics,
        TechnicalField::Mechanical,
        TechnicalField::Chemical,
        TechnicalField::Biotech,
        TechnicalField::Telecommunications,
        TechnicalField::Energy,
        TechnicalField::Other,
    ];

    /// Human-readable label used in prompts and UI copy.
    pub fn label(&self) -> &'static str {
        match self {
            TechnicalField::Software => "Software/Computing",
            TechnicalField::Electronics => "Electronics/Hardware",
            TechnicalField::Mechanical => "Mechanical/Manufacturing",
            TechnicalField::Chemical => "Chemical/Materials",
            TechnicalField::Biotech => "Biotechnology/Medical",
            TechnicalField::Telecommunications => "Telecommunications",
            TechnicalField::Energy => "Energy/Environmental",
            TechnicalField::Other => "Other",
        }
    }

    /// Parse from string (case-insensitive, accepts the label's first word).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let key = s
            .trim()
            .to_lowercase()
            .replace('-', "_")
            .replace(' ', "_");
        let head = key.split(['/', '_']).next().unwrap_or(&key);
        match head {
            "software" | "computing" => Some(Self::Software),
            "electronics" | "hardware" => Some(Self::Electronics),
            "mechanical" | "manufacturing" => Some(Self::Mechanical),
            "chemical" | "materials" => Some(Self::Chemical),
            "biotech" | "biotechnology" | "medical" => Some(Self::Biotech),
            "telecommunications" | "telecom" => Some(Self::Telecommunications),
            "energy" | "environmental" => Some(Self::Energy),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for TechnicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TechnicalField::Software => "software",
            TechnicalField::Electronics => "electronics",
            TechnicalField::Mechanical => "mechanical",
            TechnicalField::Chemical => "chemical",
            TechnicalField::Biotech => "biotech",
            TechnicalField::Telecommunications => "telecommunications",
            TechnicalField::Energy => "energy",
            TechnicalField::Other => "other",
        };
        write!(f, "{}", s)
    }
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// An invention submission, immutable once built by the intake form.
///
/// Consumed exactly once by the assessment pipeline. `keywords` are the
/// optional enrichment terms (already split and trimmed); `document_id`
/// references a previously uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub project_title: String,
    pub description: String,
    pub technical_field: TechnicalField,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Uuid>,
}

// =============================================================================
// SCORES & RESULTS
// =============================================================================

/// The four patentability criterion scores plus the derived overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionScores {
    pub novelty: f32,
    pub non_obviousness: f32,
    pub utility: f32,
    pub enablement: f32,
    pub overall: f32,
}

impl CriterionScores {
    /// Build from the four criteria, clamping each to `[0, 1]`.
    /// The overall score is the arithmetic mean of the four.
    pub fn from_criteria(novelty: f32, non_obviousness: f32, utility: f32, enablement: f32) -> Self {
        let novelty = clamp_score(novelty);
        let non_obviousness = clamp_score(non_obviousness);
        let utility = clamp_score(utility);
        let enablement = clamp_score(enablement);
        Self {
            novelty,
            non_obviousness,
            utility,
            enablement,
            overall: (novelty + non_obviousness + utility + enablement) / 4.0,
        }
    }
}

/// Raw output of the AI analysis backend, before report assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionAssessment {
    pub novelty: f32,
    pub non_obviousness: f32,
    pub utility: f32,
    pub enablement: f32,
    pub confidence: f32,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub key_features: Vec<String>,
    pub risk_factors: Vec<String>,
}

/// Input to the AI analysis backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub project_title: String,
    pub text: String,
    pub technical_field: Option<TechnicalField>,
}

/// The final assessment report. Produced exactly once per run and read-only
/// thereafter; cached client-side by `assessment_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub assessment_id: Uuid,
    pub scores: CriterionScores,
    pub confidence_level: f32,
    pub summary: String,
    /// Ordered list, most important first.
    pub recommendations: Vec<String>,
    pub key_features: Vec<String>,
    pub risk_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_art: Option<PriorArtSearchResult>,
    pub created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// PRIOR ART
// =============================================================================

/// Parameters for a prior-art search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorArtQuery {
    pub invention_description: String,
    pub technical_field: TechnicalField,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    defaults::DEFAULT_MAX_RESULTS
}

/// A single candidate patent from a prior-art search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentCandidate {
    pub patent_id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub inventors: Vec<String>,
    pub assignee: String,
    pub filing_date: String,
    pub publication_date: String,
    pub patent_office: String,
    pub classifications: Vec<String>,
    pub url: String,
    pub similarity_score: f32,
    pub relevance_reason: String,
}

/// Complete result of a prior-art search. Immutable once received;
/// `patents` are ranked by similarity, descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorArtSearchResult {
    pub query: String,
    pub total_results: usize,
    pub patents: Vec<PatentCandidate>,
    pub search_duration_ms: u64,
    pub confidence_score: f32,
    /// Free-text label describing the query strategy used.
    pub search_strategy: String,
}

impl PriorArtSearchResult {
    /// Zero prior-art matches is a valid, positively-framed outcome.
    pub fn is_empty(&self) -> bool {
        self.patents.is_empty()
    }
}

// =============================================================================
// PIPELINE STAGES
// =============================================================================

/// Ordered stages of an assessment run.
///
/// The workflow is strictly linear; the only branch is the binary
/// success/failure exit at each stage. Intermediate target percentages are
/// illustrative estimates shown while a stage's request is outstanding, not
/// measured telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStage {
    DocumentProcessing,
    AiAnalysis,
    PriorArtSearch,
    ReportGeneration,
    Completed,
}

impl AssessmentStage {
    /// The full forward sequence, in order.
    pub const SEQUENCE: [AssessmentStage; 5] = [
        AssessmentStage::DocumentProcessing,
        AssessmentStage::AiAnalysis,
        AssessmentStage::PriorArtSearch,
        AssessmentStage::ReportGeneration,
        AssessmentStage::Completed,
    ];

    /// Target progress percentage shown while this stage is active.
    pub fn target_percent(&self) -> u8 {
        match self {
            AssessmentStage::DocumentProcessing => 25,
            AssessmentStage::AiAnalysis => 50,
            AssessmentStage::PriorArtSearch => 75,
            AssessmentStage::ReportGeneration => 90,
            AssessmentStage::Completed => 100,
        }
    }

    /// Human-readable status message for this stage.
    pub fn status_message(&self) -> &'static str {
        match self {
            AssessmentStage::DocumentProcessing => "Processing uploaded documents...",
            AssessmentStage::AiAnalysis => "Running AI patentability analysis...",
            AssessmentStage::PriorArtSearch => "Searching prior art databases...",
            AssessmentStage::ReportGeneration => "Generating assessment report...",
            AssessmentStage::Completed => "Assessment complete",
        }
    }

    /// Position in the forward sequence (0-based).
    pub fn ordinal(&self) -> usize {
        match self {
            AssessmentStage::DocumentProcessing => 0,
            AssessmentStage::AiAnalysis => 1,
            AssessmentStage::PriorArtSearch => 2,
            AssessmentStage::ReportGeneration => 3,
            AssessmentStage::Completed => 4,
        }
    }

    /// The next stage in the sequence, if any.
    pub fn next(&self) -> Option<AssessmentStage> {
        Self::SEQUENCE.get(self.ordinal() + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssessmentStage::Completed)
    }
}

/// Status of an assessment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// An assessment run record: the row clients poll for stage, progress and
/// (eventually) the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub submission: AssessmentSubmission,
    pub status: AssessmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<AssessmentStage>,
    pub progress_percent: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AssessmentResult>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// A stored uploaded document.
///
/// `text` is populated for plain-text payloads only; binary formats keep
/// metadata and the hash (content extraction is handled elsewhere).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub sha256: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

// =============================================================================
// WIRE DTOS
// =============================================================================

/// Response body for a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
    pub document_id: Uuid,
    pub filename: String,
    pub size_bytes: u64,
    pub content_type: String,
}

/// Response body for an accepted assessment request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessAccepted {
    pub assessment_id: Uuid,
    pub status: AssessmentStatus,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technical_field_wire_format_is_snake_case() {
        let json = serde_json::to_string(&TechnicalField::Telecommunications).unwrap();
        assert_eq!(json, "\"telecommunications\"");
        let parsed: TechnicalField = serde_json::from_str("\"biotech\"").unwrap();
        assert_eq!(parsed, TechnicalField::Biotech);
    }

    #[test]
    fn technical_field_rejects_unknown_values() {
        let parsed = serde_json::from_str::<TechnicalField>("\"quantum\"");
        assert!(parsed.is_err());
        let parsed = serde_json::from_str::<TechnicalField>("\"\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn technical_field_has_exactly_eight_values() {
        assert_eq!(TechnicalField::ALL.len(), 8);
        // All distinct
        let mut seen = std::collections::HashSet::new();
        for field in TechnicalField::ALL {
            assert!(seen.insert(field));
        }
    }

    #[test]
    fn technical_field_from_str_loose() {
        assert_eq!(
            TechnicalField::from_str_loose("Software/Computing"),
            Some(TechnicalField::Software)
        );
        assert_eq!(
            TechnicalField::from_str_loose("BIOTECHNOLOGY"),
            Some(TechnicalField::Biotech)
        );
        assert_eq!(
            TechnicalField::from_str_loose("Energy/Environmental"),
            Some(TechnicalField::Energy)
        );
        assert_eq!(TechnicalField::from_str_loose("underwater basket weaving"), None);
    }

    #[test]
    fn clamp_score_bounds() {
        assert_eq!(clamp_score(-0.5), 0.0);
        assert_eq!(clamp_score(1.5), 1.0);
        assert_eq!(clamp_score(0.42), 0.42);
    }

    #[test]
    fn criterion_scores_overall_is_mean() {
        let scores = CriterionScores::from_criteria(0.8, 0.6, 1.0, 0.6);
        assert!((scores.overall - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn criterion_scores_clamps_out_of_range_inputs() {
        let scores = CriterionScores::from_criteria(1.4, -0.2, 0.5, 0.5);
        assert_eq!(scores.novelty, 1.0);
        assert_eq!(scores.non_obviousness, 0.0);
        assert!((scores.overall - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn stage_sequence_is_fixed_and_forward() {
        let mut stage = AssessmentStage::DocumentProcessing;
        let mut walked = vec![stage];
        while let Some(next) = stage.next() {
            walked.push(next);
            stage = next;
        }
        assert_eq!(walked, AssessmentStage::SEQUENCE);
        assert!(stage.is_terminal());
    }

    #[test]
    fn stage_targets_are_non_decreasing() {
        let targets: Vec<u8> = AssessmentStage::SEQUENCE
            .iter()
            .map(|s| s.target_percent())
            .collect();
        assert_eq!(targets, vec![25, 50, 75, 90, 100]);
        for pair in targets.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn stage_ordinals_match_sequence_position() {
        for (i, stage) in AssessmentStage::SEQUENCE.iter().enumerate() {
            assert_eq!(stage.ordinal(), i);
        }
    }

    #[test]
    fn patent_candidate_abstract_serializes_as_abstract() {
        let candidate = PatentCandidate {
            patent_id: "US1234567A1".to_string(),
            title: "Widget".to_string(),
            abstract_text: "A widget.".to_string(),
            inventors: vec![],
            assignee: String::new(),
            filing_date: String::new(),
            publication_date: String::new(),
            patent_office: "USPTO".to_string(),
            classifications: vec![],
            url: String::new(),
            similarity_score: 0.5,
            relevance_reason: String::new(),
        };
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["abstract"], "A widget.");
        assert!(json.get("abstract_text").is_none());
    }

    #[test]
    fn prior_art_query_defaults_max_results() {
        let query: PriorArtQuery = serde_json::from_str(
            r#"{"invention_description": "x", "technical_field": "software"}"#,
        )
        .unwrap();
        assert_eq!(query.max_results, defaults::DEFAULT_MAX_RESULTS);
        assert!(query.keywords.is_none());
    }

    #[test]
    fn empty_search_result_is_empty() {
        let result = PriorArtSearchResult {
            query: "q".to_string(),
            total_results: 0,
            patents: vec![],
            search_duration_ms: 12,
            confidence_score: 0.0,
            search_strategy: "multi_query_deduplication".to_string(),
        };
        assert!(result.is_empty());
    }
}
