//! Assessment intake form state.

use uuid::Uuid;

use claimscope_core::models::{AssessmentSubmission, TechnicalField};
use claimscope_core::validate::{
    parse_keywords, validate_submission, FieldErrors, FIELD_DESCRIPTION, FIELD_TECHNICAL_FIELD,
    FIELD_TITLE,
};

/// Intake form for an assessment submission.
///
/// Validation runs on submit; editing a field clears that field's error.
/// The form has no side effects beyond local validation — the assessment
/// request itself is issued elsewhere.
#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    title: String,
    description: String,
    technical_field: Option<TechnicalField>,
    keywords_raw: String,
    errors: FieldErrors,
}

impl IntakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.errors.clear(FIELD_TITLE);
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
        self.errors.clear(FIELD_DESCRIPTION);
    }

    pub fn set_technical_field(&mut self, field: Option<TechnicalField>) {
        self.technical_field = field;
        self.errors.clear(FIELD_TECHNICAL_FIELD);
    }

    /// Optional enrichment keywords, comma-separated freeform input.
    pub fn set_keywords(&mut self, raw: &str) {
        self.keywords_raw = raw.to_string();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn technical_field(&self) -> Option<TechnicalField> {
        self.technical_field
    }

    /// Current per-field errors (from the last submit attempt).
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Inline error for one field, if any.
    pub fn error(&self, field: &str) -> Option<&'static str> {
        self.errors.get(field)
    }

    /// Validate and, if clean, emit the immutable submission.
    ///
    /// On validation failure the per-field errors are retained for inline
    /// rendering and returned.
    pub fn submit(
        &mut self,
        document_id: Option<Uuid>,
    ) -> Result<AssessmentSubmission, FieldErrors> {
        let errors = validate_submission(&self.title, &self.description, self.technical_field);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(errors);
        }

        self.errors = FieldErrors::new();
        Ok(AssessmentSubmission {
            project_title: self.title.trim().to_string(),
            description: self.description.clone(),
            technical_field: self.technical_field.expect("validated above"),
            keywords: parse_keywords(&self.keywords_raw),
            document_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimscope_core::validate::MSG_DESCRIPTION_TOO_SHORT;

    fn filled_form() -> IntakeForm {
        let mut form = IntakeForm::new();
        form.set_title("Adaptive antenna array");
        form.set_description(&"d".repeat(150));
        form.set_technical_field(Some(TechnicalField::Telecommunications));
        form
    }

    #[test]
    fn valid_form_emits_immutable_submission() {
        let mut form = filled_form();
        form.set_keywords("beamforming, mimo , ");
        let doc_id = Uuid::new_v4();

        let submission = form.submit(Some(doc_id)).unwrap();
        assert_eq!(submission.project_title, "Adaptive antenna array");
        assert_eq!(submission.technical_field, TechnicalField::Telecommunications);
        assert_eq!(submission.keywords, vec!["beamforming", "mimo"]);
        assert_eq!(submission.document_id, Some(doc_id));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn description_of_99_chars_is_rejected_with_inline_message() {
        let mut form = filled_form();
        form.set_description(&"d".repeat(99));

        let errors = form.submit(None).unwrap_err();
        assert_eq!(errors.get(FIELD_DESCRIPTION), Some(MSG_DESCRIPTION_TOO_SHORT));
        // Error is retained on the form for inline rendering
        assert_eq!(form.error(FIELD_DESCRIPTION), Some(MSG_DESCRIPTION_TOO_SHORT));
    }

    #[test]
    fn description_of_exactly_100_chars_is_accepted() {
        let mut form = filled_form();
        form.set_description(&"d".repeat(100));
        assert!(form.submit(None).is_ok());
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut form = IntakeForm::new();
        let errors = form.submit(None).unwrap_err();
        assert_eq!(errors.len(), 3);

        form.set_title("Now present");
        assert!(form.error(FIELD_TITLE).is_none());
        // Other errors remain until their fields are edited
        assert!(form.error(FIELD_DESCRIPTION).is_some());
        assert!(form.error(FIELD_TECHNICAL_FIELD).is_some());

        form.set_description(&"d".repeat(120));
        assert!(form.error(FIELD_DESCRIPTION).is_none());
        assert!(form.error(FIELD_TECHNICAL_FIELD).is_some());
    }

    #[test]
    fn resubmit_after_fixes_succeeds() {
        let mut form = IntakeForm::new();
        assert!(form.submit(None).is_err());

        form.set_title("Title");
        form.set_description(&"d".repeat(100));
        form.set_technical_field(Some(TechnicalField::Software));
        assert!(form.submit(None).is_ok());
    }

    #[test]
    fn submission_without_document_reference() {
        let mut form = filled_form();
        let submission = form.submit(None).unwrap();
        assert!(submission.document_id.is_none());
        assert!(submission.keywords.is_empty());
    }
}
