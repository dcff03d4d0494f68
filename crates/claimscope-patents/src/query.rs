//! Search query generation.
//!
//! A single query rarely surfaces the relevant prior art, so several are
//! generated from different angles: technical vocabulary, the problem being
//! solved, functional verbs, user keywords, and the broad field.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use claimscope_core::defaults::MAX_QUERIES_GENERATED;
use claimscope_core::models::TechnicalField;

static TECH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b\w*(?:system|method|apparatus|device|process|algorithm|protocol)\b",
        r"\b\w*(?:network|database|interface|module|engine|framework)\b",
        r"\b\w*(?:analysis|processing|detection|recognition|optimization)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static FUNCTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?:detect|analyze|process|generate|create|optimize|improve|enhance|reduce)\w*\b",
        r"\b(?:calculate|determine|identify|classify|predict|estimate|measure)\w*\b",
        r"\b(?:control|manage|monitor|track|observe|record|store|retrieve)\w*\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static NON_QUERY_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());

const PROBLEM_INDICATORS: &[&str] = &[
    "problem",
    "challenge",
    "difficulty",
    "limitation",
    "issue",
    "need",
];

const COMMON_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Extract technical vocabulary from an invention description.
///
/// Longest terms first; capped at 10.
pub fn extract_technical_terms(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    let mut terms: HashSet<String> = HashSet::new();

    for pattern in TECH_PATTERNS.iter() {
        for m in pattern.find_iter(&lower) {
            terms.insert(m.as_str().to_string());
        }
    }

    let mut technical: Vec<String> = terms
        .into_iter()
        .filter(|t| !COMMON_WORDS.contains(&t.as_str()) && t.len() > 3)
        .collect();

    // Longest first, alphabetical tiebreak for deterministic output
    technical.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    technical.truncate(10);
    technical
}

/// Extract terms around problem/challenge language.
pub fn extract_problem_terms(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    let mut seen = HashSet::new();
    let mut terms = Vec::new();

    for (i, word) in words.iter().enumerate() {
        if PROBLEM_INDICATORS.iter().any(|ind| word.contains(ind)) {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(words.len());
            for context in &words[start..end] {
                if context.len() > 3 && seen.insert(context.to_string()) {
                    terms.push(context.to_string());
                }
            }
        }
    }

    terms.truncate(5);
    terms
}

/// Extract functional/action verbs.
pub fn extract_function_terms(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    let mut functions: HashSet<String> = HashSet::new();

    for pattern in FUNCTION_PATTERNS.iter() {
        for m in pattern.find_iter(&lower) {
            functions.insert(m.as_str().to_string());
        }
    }

    let mut sorted: Vec<String> = functions.into_iter().collect();
    sorted.sort();
    sorted.truncate(5);
    sorted
}

/// Clean and bound a search query for the custom-search API.
pub fn clean_query(query: &str) -> String {
    let cleaned = NON_QUERY_CHARS.replace_all(query, " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    // The custom search API rejects very long queries
    if cleaned.len() > 100 {
        return cleaned
            .split_whitespace()
            .take(15)
            .collect::<Vec<_>>()
            .join(" ");
    }

    cleaned
}

/// Generate the ranked list of search queries for a prior-art request.
///
/// Strategies, in priority order: technical field + key terms,
/// problem/solution, field + functional terms, user keywords, and the broad
/// field label. Cleaned and deduplicated, capped at `MAX_QUERIES_GENERATED`.
pub fn generate_queries(
    description: &str,
    technical_field: TechnicalField,
    keywords: Option<&[String]>,
) -> Vec<String> {
    let field_label = technical_field.label();
    let mut queries = Vec::new();

    let tech_terms = extract_technical_terms(description);
    if !tech_terms.is_empty() {
        queries.push(format!("{} {}", field_label, tech_terms[..tech_terms.len().min(5)].join(" ")));
    }

    let problem_terms = extract_problem_terms(description);
    if !problem_terms.is_empty() {
        queries.push(format!(
            "method system apparatus {}",
            problem_terms[..problem_terms.len().min(3)].join(" ")
        ));
    }

    let function_terms = extract_function_terms(description);
    if !function_terms.is_empty() {
        let field_head = field_label.split('/').next().unwrap_or(field_label);
        queries.push(format!(
            "{} {}",
            field_head,
            function_terms[..function_terms.len().min(3)].join(" ")
        ));
    }

    if let Some(keywords) = keywords {
        if !keywords.is_empty() {
            queries.push(keywords[..keywords.len().min(5)].join(" "));
        }
    }

    queries.push(field_label.to_string());

    let mut cleaned_queries = Vec::new();
    for query in queries {
        let cleaned = clean_query(&query);
        if !cleaned.is_empty() && !cleaned_queries.contains(&cleaned) {
            cleaned_queries.push(cleaned);
        }
    }

    cleaned_queries.truncate(MAX_QUERIES_GENERATED);
    cleaned_queries
}
