//! Prompt construction for patent analysis.

use claimscope_core::models::TechnicalField;

/// System prompt establishing the analyst role and the scoring contract.
pub fn system_prompt() -> &'static str {
    r#"You are an expert patent analyst and intellectual property specialist with deep knowledge
of patent law, technical innovation assessment, and prior art analysis. Your role is to evaluate
inventions for their patentability potential based on the four key criteria:

1. **Novelty**: Is this invention truly new and not disclosed in prior art?
2. **Non-obviousness**: Would this invention be non-obvious to a person skilled in the art?
3. **Utility**: Does this invention have practical application and solve a real problem?
4. **Enablement**: Is the invention described in enough detail for reproduction?

Provide detailed analysis with scores from 0.0 to 1.0 for each criterion, where:
- 0.0-0.3: Poor potential
- 0.4-0.6: Moderate potential
- 0.7-0.8: Good potential
- 0.9-1.0: Excellent potential

Always respond in valid JSON format with the specified structure."#
}

/// Build the criterion-analysis prompt for an invention.
pub fn analysis_prompt(
    project_title: &str,
    text: &str,
    technical_field: Option<TechnicalField>,
) -> String {
    let field_context = technical_field
        .map(|f| format!("Technical Field: {}\n", f.label()))
        .unwrap_or_default();

    format!(
        r#"Analyze the following invention for patent potential:

Project Title: {project_title}
{field_context}
Invention Description:
{text}

Please provide a comprehensive patent assessment in JSON format with the following structure:
{{
    "novelty_score": 0.0-1.0,
    "non_obviousness_score": 0.0-1.0,
    "utility_score": 0.0-1.0,
    "enablement_score": 0.0-1.0,
    "confidence_level": 0.0-1.0,
    "summary": "2-3 sentence executive summary of the patent potential",
    "recommendations": ["Specific recommendation 1", "Specific recommendation 2"],
    "key_features": ["Novel feature 1", "Novel feature 2"],
    "risk_factors": ["Risk or weakness 1", "Risk or weakness 2"]
}}

Ensure all scores are numeric values between 0.0 and 1.0.
Provide specific, actionable recommendations.
Identify the most novel and valuable features of the invention.
Be honest about risks and potential prior art concerns."#
    )
}

/// Build the technical-field classification prompt.
pub fn classification_prompt(text: &str) -> String {
    let fields = TechnicalField::ALL
        .iter()
        .map(|f| format!("- {}", f.label()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Classify the following invention into one of these technical fields:
{fields}

Invention: {text}

Respond with just the field name."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_includes_title_and_text() {
        let prompt = analysis_prompt("Widget", "A widget that widgets.", None);
        assert!(prompt.contains("Project Title: Widget"));
        assert!(prompt.contains("A widget that widgets."));
        assert!(prompt.contains("novelty_score"));
    }

    #[test]
    fn analysis_prompt_includes_field_when_present() {
        let prompt = analysis_prompt("Widget", "text", Some(TechnicalField::Biotech));
        assert!(prompt.contains("Technical Field: Biotechnology/Medical"));
    }

    #[test]
    fn analysis_prompt_omits_field_line_when_absent() {
        let prompt = analysis_prompt("Widget", "text", None);
        assert!(!prompt.contains("Technical Field:"));
    }

    #[test]
    fn classification_prompt_lists_all_eight_fields() {
        let prompt = classification_prompt("some invention");
        for field in TechnicalField::ALL {
            assert!(prompt.contains(field.label()), "missing {}", field.label());
        }
    }
}
