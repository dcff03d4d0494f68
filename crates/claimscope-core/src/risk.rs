//! Qualitative risk bucketing of prior-art similarity scores.

use serde::{Deserialize, Serialize};

use crate::defaults::{RISK_HIGH_THRESHOLD, RISK_LOW_THRESHOLD, RISK_MEDIUM_THRESHOLD};

/// Four-level qualitative risk label for a similarity score.
///
/// The thresholds are a policy contract: UI, reports, and tests all rely on
/// the same cut points, so they live in `defaults` and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Minimal,
}

impl RiskLevel {
    /// Bucket a similarity score.
    ///
    /// `s >= 0.7` → High, `0.5 <= s < 0.7` → Medium, `0.3 <= s < 0.5` → Low,
    /// otherwise Minimal. Exhaustive and non-overlapping.
    pub fn from_score(score: f32) -> Self {
        if score >= RISK_HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= RISK_MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else if score >= RISK_LOW_THRESHOLD {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }

    /// Display label shown next to a candidate patent.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "High Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::Minimal => "Minimal Risk",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
