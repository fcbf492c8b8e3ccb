//! Wire types for the analysis service.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::export::ExportFormat;
use crate::session::entry::{ResultEntry, Stats};

/// Message shown when a failed response carries no `error` of its own.
pub const GENERIC_FAILURE: &str = "Analysis failed. Please try again.";

/// Response to any of the three analyze requests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Vec<ResultEntry>,
    #[serde(default)]
    pub stats: Option<Stats>,
    #[serde(default)]
    pub analysis_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A successful analysis, ready to load into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub analysis_id: Option<String>,
    pub results: Vec<ResultEntry>,
    pub stats: Stats,
}

impl AnalysisResponse {
    /// Anything short of `success: true` is an application-level failure.
    pub fn into_outcome(self) -> Result<AnalysisOutcome, ServiceError> {
        if !self.success {
            let message = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            return Err(ServiceError::Rejected(message));
        }
        let stats = self
            .stats
            .unwrap_or_else(|| Stats::from_results(&self.results));
        Ok(AnalysisOutcome {
            analysis_id: self.analysis_id,
            results: self.results,
            stats,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UrlAnalysisRequest<'a> {
    pub url: &'a str,
    pub max_pages: u32,
    pub scan_depth: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct TextAnalysisRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExportRequest<'a> {
    pub results: &'a [ResultEntry],
    pub format: ExportFormat,
}

/// Body returned by the service's export endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportPayload {
    /// Delimited text as produced by the service.
    Csv(String),
    /// Structured document as produced by the service.
    Json(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entry::Confidence;

    #[test]
    fn test_success_response() {
        let json = r#"{"success":true,"analysis_id":"text_1",
            "results":[{"original_cta":"Click here","suggested_improvement":"Start your free trial","confidence":"high","source":"N/A"}],
            "stats":{"ctas_analyzed":1,"suggestions_provided":1}}"#;
        let response: AnalysisResponse = serde_json::from_str(json).unwrap();
        let outcome = response.into_outcome().unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.analysis_id.as_deref(), Some("text_1"));
        assert_eq!(outcome.stats.ctas_analyzed, 1);
    }

    #[test]
    fn test_non_string_confidence_keeps_response() {
        let json = r#"{"success":true,"analysis_id":"text_2","results":[
            {"original_cta":"Click here","suggested_improvement":"Start your free trial","confidence":"high"},
            {"original_cta":"Submit","suggested_improvement":"Get my quote","confidence":0.85},
            {"original_cta":"Learn more","suggested_improvement":"See pricing","confidence":null}]}"#;
        let response: AnalysisResponse = serde_json::from_str(json).unwrap();
        let outcome = response.into_outcome().unwrap();
        let tiers: Vec<Confidence> = outcome.results.iter().map(|r| r.confidence).collect();
        assert_eq!(
            tiers,
            vec![Confidence::High, Confidence::Unknown, Confidence::Unknown]
        );
    }

    #[test]
    fn test_failure_uses_service_message() {
        let response: AnalysisResponse =
            serde_json::from_str(r#"{"success":false,"error":"No text provided"}"#).unwrap();
        assert_eq!(
            response.into_outcome().unwrap_err(),
            ServiceError::Rejected("No text provided".into())
        );
    }

    #[test]
    fn test_missing_success_is_failure_with_generic_message() {
        let response: AnalysisResponse = serde_json::from_str(r#"{"results":[]}"#).unwrap();
        assert_eq!(
            response.into_outcome().unwrap_err(),
            ServiceError::Rejected(GENERIC_FAILURE.into())
        );
    }

    #[test]
    fn test_missing_stats_are_derived() {
        let response: AnalysisResponse = serde_json::from_str(
            r#"{"success":true,"results":[{"original_cta":"a","suggested_improvement":"b"}]}"#,
        )
        .unwrap();
        let outcome = response.into_outcome().unwrap();
        assert_eq!(outcome.stats.ctas_analyzed, 1);
        assert_eq!(outcome.stats.suggestions_provided, 1);
    }

    #[test]
    fn test_url_request_shape() {
        let body = serde_json::to_value(UrlAnalysisRequest {
            url: "https://example.com",
            max_pages: 5,
            scan_depth: 2,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"url":"https://example.com","max_pages":5,"scan_depth":2})
        );
    }
}
