//! Prior-art query panel state.
//!
//! An independent, user-triggerable search flow. It can be driven directly
//! or auto-triggered when the parent supplies new invention context; in the
//! auto-trigger path the parameter tuple is compared structurally against
//! the last issued query so re-renders never cause redundant requests.

use claimscope_core::models::{
    PatentCandidate, PriorArtQuery, PriorArtSearchResult, TechnicalField,
};
use claimscope_core::{parse_keywords, Error, Result, RiskLevel};

use crate::api::ApiClient;

/// Result-count limit offered by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultLimit {
    Ten,
    #[default]
    Twenty,
    Fifty,
}

impl ResultLimit {
    pub const ALL: [ResultLimit; 3] = [ResultLimit::Ten, ResultLimit::Twenty, ResultLimit::Fifty];

    pub fn as_usize(&self) -> usize {
        match self {
            ResultLimit::Ten => 10,
            ResultLimit::Twenty => 20,
            ResultLimit::Fifty => 50,
        }
    }
}

/// How the panel's result area should render.
#[derive(Debug, PartialEq)]
pub enum PriorArtPresentation<'a> {
    /// No search has completed yet.
    NotSearched,
    /// A search completed with zero matches — the affirmative outcome,
    /// rendered distinctly from any error banner.
    NoSimilarPatents,
    /// Ranked candidates, highest similarity first.
    Ranked(&'a [PatentCandidate]),
}

/// Prior-art query panel session state.
#[derive(Debug, Default)]
pub struct PriorArtPanel {
    description: String,
    technical_field: Option<TechnicalField>,
    keywords_raw: String,
    limit: ResultLimit,
    last_issued: Option<PriorArtQuery>,
    result: Option<PriorArtSearchResult>,
    selected: Option<usize>,
    error: Option<String>,
}

impl PriorArtPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn set_technical_field(&mut self, field: Option<TechnicalField>) {
        self.technical_field = field;
    }

    pub fn set_keywords(&mut self, raw: &str) {
        self.keywords_raw = raw.to_string();
    }

    pub fn set_limit(&mut self, limit: ResultLimit) {
        self.limit = limit;
    }

    /// Supply new invention context from the parent (description + field).
    pub fn set_context(&mut self, description: &str, field: TechnicalField) {
        self.description = description.to_string();
        self.technical_field = Some(field);
    }

    /// Submission is disabled while description or technical field is empty.
    pub fn can_search(&self) -> bool {
        !self.description.trim().is_empty() && self.technical_field.is_some()
    }

    fn build_query(&self) -> Option<PriorArtQuery> {
        if !self.can_search() {
            return None;
        }
        let keywords = parse_keywords(&self.keywords_raw);
        Some(PriorArtQuery {
            invention_description: self.description.clone(),
            technical_field: self.technical_field?,
            keywords: if keywords.is_empty() {
                None
            } else {
                Some(keywords)
            },
            max_results: self.limit.as_usize(),
        })
    }

    async fn run(&mut self, client: &ApiClient, query: PriorArtQuery) -> Result<()> {
        match client.search_prior_art(&query).await {
            Ok(result) => {
                self.last_issued = Some(query);
                self.result = Some(result);
                self.selected = None;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                // Dismissible banner text; the previous result stays visible
                self.error = Some(match &e {
                    Error::Request(msg) => msg.clone(),
                    other => other.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Explicit user-triggered search. Always issues a request when the
    /// panel is searchable.
    pub async fn search(&mut self, client: &ApiClient) -> Result<()> {
        let query = self
            .build_query()
            .ok_or_else(|| Error::InvalidInput("Search requires a description and a technical field".to_string()))?;
        self.run(client, query).await
    }

    /// Auto-trigger path for parent-supplied context. Issues a request only
    /// when the parameter tuple differs structurally from the last issued
    /// query. Returns whether a request was issued.
    pub async fn search_if_changed(&mut self, client: &ApiClient) -> Result<bool> {
        let query = match self.build_query() {
            Some(q) => q,
            None => return Ok(false),
        };
        if self.last_issued.as_ref() == Some(&query) {
            return Ok(false);
        }
        self.run(client, query).await.map(|_| true)
    }

    pub fn result(&self) -> Option<&PriorArtSearchResult> {
        self.result.as_ref()
    }

    /// Dismissible transport error banner text, if a search failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// How the result area should render right now.
    pub fn presentation(&self) -> PriorArtPresentation<'_> {
        match &self.result {
            None => PriorArtPresentation::NotSearched,
            Some(result) if result.is_empty() => PriorArtPresentation::NoSimilarPatents,
            Some(result) => PriorArtPresentation::Ranked(&result.patents),
        }
    }

    /// Open the detail view for a candidate by its rank index.
    pub fn select_candidate(&mut self, index: usize) -> Option<&PatentCandidate> {
        let patents = &self.result.as_ref()?.patents;
        if index >= patents.len() {
            return None;
        }
        self.selected = Some(index);
        patents.get(index)
    }

    pub fn selected(&self) -> Option<&PatentCandidate> {
        self.result.as_ref()?.patents.get(self.selected?)
    }

    /// Close the detail view. Never re-issues the search.
    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// Qualitative risk bucket for a candidate.
    pub fn risk_of(candidate: &PatentCandidate) -> RiskLevel {
        RiskLevel::from_score(candidate.similarity_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimscope_patents::mock::fixture_result;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn searchable_panel() -> PriorArtPanel {
        let mut panel = PriorArtPanel::new();
        panel.set_context(
            "An adaptive beamforming antenna system",
            TechnicalField::Telecommunications,
        );
        panel
    }

    async fn mount_search(server: &MockServer, result: &PriorArtSearchResult) {
        Mock::given(method("POST"))
            .and(path("/api/prior-art/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(result))
            .mount(server)
            .await;
    }

    #[test]
    fn search_disabled_until_context_present() {
        let mut panel = PriorArtPanel::new();
        assert!(!panel.can_search());

        panel.set_description("some invention");
        assert!(!panel.can_search());

        panel.set_technical_field(Some(TechnicalField::Software));
        assert!(panel.can_search());

        panel.set_description("   ");
        assert!(!panel.can_search());
    }

    #[test]
    fn result_limits_are_the_fixed_choices() {
        assert_eq!(
            ResultLimit::ALL.map(|l| l.as_usize()),
            claimscope_core::defaults::RESULT_LIMIT_CHOICES
        );
        assert_eq!(ResultLimit::default().as_usize(), 20);
    }

    #[tokio::test]
    async fn explicit_search_renders_ranked_results() {
        let server = MockServer::start().await;
        mount_search(&server, &fixture_result(3)).await;

        let mut panel = searchable_panel();
        panel.set_keywords("beamforming, mimo");
        let client = ApiClient::new(server.uri());
        panel.search(&client).await.unwrap();

        match panel.presentation() {
            PriorArtPresentation::Ranked(patents) => assert_eq!(patents.len(), 3),
            other => panic!("Expected ranked presentation, got {:?}", other),
        }
        assert!(panel.error().is_none());
    }

    #[tokio::test]
    async fn zero_matches_render_affirmative_empty_state() {
        let server = MockServer::start().await;
        mount_search(&server, &fixture_result(0)).await;

        let mut panel = searchable_panel();
        let client = ApiClient::new(server.uri());
        panel.search(&client).await.unwrap();

        assert_eq!(panel.presentation(), PriorArtPresentation::NoSimilarPatents);
        // Not an error: no banner
        assert!(panel.error().is_none());
    }

    #[tokio::test]
    async fn transport_error_sets_dismissible_banner() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(502)
                    .set_body_json(serde_json::json!({"error": "Bad Gateway"})),
            )
            .mount(&server)
            .await;

        let mut panel = searchable_panel();
        let client = ApiClient::new(server.uri());
        assert!(panel.search(&client).await.is_err());

        assert_eq!(panel.error(), Some("Bad Gateway"));
        // Distinct from the empty-result state
        assert_eq!(panel.presentation(), PriorArtPresentation::NotSearched);

        panel.dismiss_error();
        assert!(panel.error().is_none());
    }

    #[tokio::test]
    async fn identical_context_does_not_reissue_the_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/prior-art/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture_result(1)))
            .expect(2)
            .mount(&server)
            .await;

        let mut panel = searchable_panel();
        let client = ApiClient::new(server.uri());

        // First render triggers a search
        assert!(panel.search_if_changed(&client).await.unwrap());
        // Re-render with identical context: structural equality suppresses it
        assert!(!panel.search_if_changed(&client).await.unwrap());
        assert!(!panel.search_if_changed(&client).await.unwrap());

        // Changed context issues exactly one more request
        panel.set_context("A different invention entirely", TechnicalField::Software);
        assert!(panel.search_if_changed(&client).await.unwrap());
    }

    #[tokio::test]
    async fn selecting_and_closing_detail_never_touches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/prior-art/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture_result(2)))
            .expect(1)
            .mount(&server)
            .await;

        let mut panel = searchable_panel();
        let client = ApiClient::new(server.uri());
        panel.search(&client).await.unwrap();

        let selected = panel.select_candidate(1).unwrap().patent_id.clone();
        assert_eq!(panel.selected().unwrap().patent_id, selected);
        panel.close_detail();
        assert!(panel.selected().is_none());
        // Result is still rendered after closing the detail view
        assert!(matches!(panel.presentation(), PriorArtPresentation::Ranked(_)));

        assert!(panel.select_candidate(99).is_none());
    }

    #[test]
    fn candidates_bucket_into_risk_levels() {
        let result = fixture_result(4);
        let levels: Vec<RiskLevel> = result
            .patents
            .iter()
            .map(PriorArtPanel::risk_of)
            .collect();
        // Fixture scores: 0.9, 0.8, 0.7, 0.6
        assert_eq!(
            levels,
            vec![
                RiskLevel::High,
                RiskLevel::High,
                RiskLevel::High,
                RiskLevel::Medium
            ]
        );
    }
}
