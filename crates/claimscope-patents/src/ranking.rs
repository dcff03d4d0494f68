//! Deduplication, similarity ranking, and confidence scoring for
//! prior-art search results.
//!
//! Similarity here is intentionally lexical (Jaccard word overlap with a
//! recency boost). It orders candidates for display; it is not a
//! substantive infringement analysis.

use std::collections::HashSet;

use chrono::Datelike;

use claimscope_core::defaults::{RECENCY_BOOST_MAX, RECENCY_DECAY_YEARS};
use claimscope_core::models::PatentCandidate;

/// Remove duplicate patents (by id, first occurrence wins), score each
/// against the invention description, and return the top `max_results`
/// ranked by similarity descending.
pub fn dedupe_and_rank(
    patents: Vec<PatentCandidate>,
    invention_description: &str,
    max_results: usize,
) -> Vec<PatentCandidate> {
    let mut seen_ids = HashSet::new();
    let mut unique: Vec<PatentCandidate> = Vec::new();

    for patent in patents {
        if seen_ids.insert(patent.patent_id.clone()) {
            unique.push(patent);
        }
    }

    let current_year = chrono::Utc::now().year();
    for patent in &mut unique {
        patent.similarity_score = similarity_score_at(patent, invention_description, current_year);
        patent.relevance_reason = relevance_reason(patent, invention_description);
    }

    unique.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    unique.truncate(max_results);
    unique
}

/// Jaccard word-overlap similarity between a patent and the invention,
/// with a recency boost for recent publications.
pub fn similarity_score_at(
    patent: &PatentCandidate,
    invention_description: &str,
    current_year: i32,
) -> f32 {
    let patent_text = format!("{} {}", patent.title, patent.abstract_text).to_lowercase();
    let invention_text = invention_description.to_lowercase();

    let patent_words: HashSet<&str> = patent_text.split_whitespace().collect();
    let invention_words: HashSet<&str> = invention_text.split_whitespace().collect();

    let union = patent_words.union(&invention_words).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = patent_words.intersection(&invention_words).count();
    let mut score = intersection as f32 / union as f32;

    // Recent patents are more likely to still be in force
    if let Some(pub_year) = publication_year(&patent.publication_date) {
        let age = (current_year - pub_year) as f32;
        let recency = (1.0 - age / RECENCY_DECAY_YEARS).max(0.0);
        score *= 1.0 + recency * RECENCY_BOOST_MAX;
    }

    score.min(1.0)
}

fn publication_year(publication_date: &str) -> Option<i32> {
    publication_date.split('-').next()?.parse::<i32>().ok()
}

/// Explain why a candidate was ranked: shared vocabulary, assignee, or
/// office, in that order of preference.
pub fn relevance_reason(patent: &PatentCandidate, invention_description: &str) -> String {
    let patent_text = format!("{} {}", patent.title, patent.abstract_text).to_lowercase();
    let invention_text = invention_description.to_lowercase();

    let patent_words: HashSet<&str> = patent_text
        .split_whitespace()
        .filter(|w| w.len() > 4)
        .collect();
    let invention_words: HashSet<&str> = invention_text
        .split_whitespace()
        .filter(|w| w.len() > 4)
        .collect();

    let mut common: Vec<&str> = patent_words.intersection(&invention_words).copied().collect();
    common.sort_unstable();

    if common.len() >= 3 {
        format!("Shares key concepts: {}", common[..3].join(", "))
    } else if !patent.assignee.is_empty() {
        format!("Related work by {}", patent.assignee)
    } else if patent.patent_office == "USPTO" {
        "US patent in similar technical field".to_string()
    } else {
        "Similar technical approach".to_string()
    }
}

/// Confidence in search comprehensiveness.
///
/// Mean of: result-count factor (unique/20 capped at 1), query-diversity
/// factor (queries/3 capped at 1), and a duplicate penalty (unique/total,
/// floored at 0.5). Zero when nothing was found at all.
pub fn search_confidence(unique_results: usize, total_results: usize, query_count: usize) -> f32 {
    if total_results == 0 {
        return 0.0;
    }

    let result_confidence = (unique_results as f32 / 20.0).min(1.0);
    let query_confidence = (query_count as f32 / 3.0).min(1.0);
    let diversity_penalty = (unique_results as f32 / total_results.max(1) as f32).max(0.5);

    let overall = (result_confidence + query_confidence + diversity_penalty) / 3.0;
    (overall * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, title: &str, abstract_text: &str, pub_date: &str) -> PatentCandidate {
        PatentCandidate {
            patent_id: id.to_string(),
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            inventors: vec![],
            assignee: String::new(),
            filing_date: String::new(),
            publication_date: pub_date.to_string(),
            patent_office: "USPTO".to_string(),
            classifications: vec![],
            url: String::new(),
            similarity_score: 0.0,
            relevance_reason: String::new(),
        }
    }

    #[test]
    fn dedupes_by_patent_id_keeping_first() {
        let patents = vec![
            candidate("US1", "first", "", ""),
            candidate("US1", "duplicate", "", ""),
            candidate("US2", "second", "", ""),
        ];
        let ranked = dedupe_and_rank(patents, "anything", 10);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().any(|p| p.title == "first"));
        assert!(!ranked.iter().any(|p| p.title == "duplicate"));
    }

    #[test]
    fn ranks_by_similarity_descending_and_truncates() {
        let description = "adaptive beamforming antenna array with feedback control";
        let patents = vec![
            candidate("US1", "cooking recipes", "pasta sauce", ""),
            candidate("US2", "adaptive beamforming antenna", "feedback control array", ""),
            candidate("US3", "antenna array", "adaptive feedback", ""),
        ];
        let ranked = dedupe_and_rank(patents, description, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].patent_id, "US2");
        assert!(ranked[0].similarity_score >= ranked[1].similarity_score);
        assert!(!ranked.iter().any(|p| p.patent_id == "US1"));
    }

    #[test]
    fn similarity_is_zero_for_disjoint_text() {
        let patent = candidate("US1", "alpha beta", "gamma", "");
        let score = similarity_score_at(&patent, "delta epsilon zeta", 2026);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn similarity_is_bounded_by_one() {
        let patent = candidate("US1", "widget", "widget", "2026-01-01");
        let score = similarity_score_at(&patent, "widget", 2026);
        assert!(score <= 1.0);
    }

    #[test]
    fn recent_publication_boosts_score() {
        let description = "adaptive antenna feedback control system";
        let old = candidate("US1", "adaptive antenna", "feedback control system", "1990-01-01");
        let new = candidate("US2", "adaptive antenna", "feedback control system", "2024-06-01");
        let old_score = similarity_score_at(&old, description, 2026);
        let new_score = similarity_score_at(&new, description, 2026);
        assert!(new_score > old_score);
    }

    #[test]
    fn unparseable_publication_date_gets_no_boost() {
        let description = "adaptive antenna feedback";
        let undated = candidate("US1", "adaptive antenna feedback", "", "");
        let dated_old = candidate("US2", "adaptive antenna feedback", "", "1900-01-01");
        assert_eq!(
            similarity_score_at(&undated, description, 2026),
            similarity_score_at(&dated_old, description, 2026)
        );
    }

    #[test]
    fn relevance_reason_prefers_shared_concepts() {
        let patent = candidate(
            "US1",
            "beamforming antenna weights",
            "multipath interference mitigation",
            "",
        );
        let reason = relevance_reason(
            &patent,
            "beamforming antenna weights for multipath interference",
        );
        assert!(reason.starts_with("Shares key concepts:"), "{}", reason);
    }

    #[test]
    fn relevance_reason_falls_back_to_assignee_then_office() {
        let mut patent = candidate("US1", "unrelated", "totally", "");
        patent.assignee = "Acme Corp".to_string();
        assert_eq!(
            relevance_reason(&patent, "different words entirely"),
            "Related work by Acme Corp"
        );

        patent.assignee = String::new();
        assert_eq!(
            relevance_reason(&patent, "different words entirely"),
            "US patent in similar technical field"
        );

        patent.patent_office = "EPO".to_string();
        assert_eq!(
            relevance_reason(&patent, "different words entirely"),
            "Similar technical approach"
        );
    }

    #[test]
    fn confidence_zero_when_no_results() {
        assert_eq!(search_confidence(0, 0, 3), 0.0);
    }

    #[test]
    fn confidence_full_when_saturated() {
        // 20 unique of 20 total over 3 queries: all three factors at 1.0
        assert_eq!(search_confidence(20, 20, 3), 1.0);
    }

    #[test]
    fn confidence_penalizes_duplicates_with_floor() {
        // 5 unique of 50 total: diversity factor floors at 0.5
        let with_dupes = search_confidence(5, 50, 3);
        let without = search_confidence(5, 5, 3);
        assert!(with_dupes < without);
        // floor: (0.25 + 1.0 + 0.5) / 3 = 0.58
        assert_eq!(with_dupes, 0.58);
    }

    #[test]
    fn confidence_rounded_to_two_decimals() {
        let value = search_confidence(7, 9, 2);
        assert_eq!((value * 100.0).round() / 100.0, value);
    }
}
