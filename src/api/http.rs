use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{info, warn};
use url::Url;

use super::types::{AnalysisResponse, ExportPayload, ExportRequest, TextAnalysisRequest, UrlAnalysisRequest};
use super::AnalysisService;
use crate::error::ServiceError;
use crate::export::ExportFormat;
use crate::session::entry::ResultEntry;
use crate::session::history::HistoryEntry;
use crate::session::input::Submission;

const ANALYZE_URL: &str = "api/analyze-url";
const ANALYZE_IMAGE: &str = "api/analyze-image";
const ANALYZE_TEXT: &str = "api/analyze-text";
const HISTORY: &str = "api/history";
const EXPORT: &str = "api/export-results";

/// Longest slice of an error body carried into a [`ServiceError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// JSON-over-HTTP client for the analysis service.
///
/// In the browser `reqwest` rides on `fetch`, so cookies and CORS follow the page.
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: reqwest::Client,
    base: Url,
}

impl HttpAnalysisService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ServiceError> {
        let mut base = Url::parse(base_url).map_err(|e| {
            ServiceError::Transport(format!("Invalid service URL '{}': {}", base_url, e))
        })?;
        // Url::join drops the last path segment unless it ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base
            .join(path)
            .map_err(|e| ServiceError::Transport(format!("Failed to build URL for '{}': {}", path, e)))
    }

    /// Decode an analyze response, keeping the service's own error body when
    /// it sent one alongside a failure status.
    async fn read_analysis(response: reqwest::Response) -> Result<AnalysisResponse, ServiceError> {
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<AnalysisResponse>(&body) {
            Ok(parsed) => {
                if !status.is_success() {
                    warn!("Analysis request returned {}: {:?}", status, parsed.error);
                }
                Ok(parsed)
            }
            Err(e) if status.is_success() => Err(ServiceError::Decode(e.to_string())),
            Err(_) => Err(ServiceError::Status {
                status: status.as_u16(),
                message: snippet(&body),
            }),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if let Ok(parsed) = serde_json::from_str::<AnalysisResponse>(&body) {
            if let Some(message) = parsed.error.filter(|m| !m.trim().is_empty()) {
                return Err(ServiceError::Rejected(message));
            }
        }
        Err(ServiceError::Status {
            status: status.as_u16(),
            message: snippet(&body),
        })
    }
}

#[async_trait(?Send)]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, submission: &Submission) -> Result<AnalysisResponse, ServiceError> {
        info!("Submitting analysis: {}", submission.describe());
        let request = match submission {
            Submission::Url {
                url,
                max_pages,
                scan_depth,
            } => self.client.post(self.endpoint(ANALYZE_URL)?).json(&UrlAnalysisRequest {
                url,
                max_pages: *max_pages,
                scan_depth: *scan_depth,
            }),
            Submission::Text { text } => self
                .client
                .post(self.endpoint(ANALYZE_TEXT)?)
                .json(&TextAnalysisRequest { text }),
            Submission::Image(upload) => {
                let mut part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
                if !upload.mime_type.is_empty() {
                    part = part.mime_str(&upload.mime_type).map_err(|e| {
                        ServiceError::Transport(format!(
                            "Invalid MIME type '{}': {}",
                            upload.mime_type, e
                        ))
                    })?;
                }
                self.client
                    .post(self.endpoint(ANALYZE_IMAGE)?)
                    .multipart(Form::new().part("image", part))
            }
        };

        let response = request.send().await?;
        Self::read_analysis(response).await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ServiceError> {
        let response = self.client.get(self.endpoint(HISTORY)?).send().await?;
        let response = Self::check_status(response).await?;
        let entries: Vec<HistoryEntry> = response.json().await?;
        info!("Fetched {} history entries", entries.len());
        Ok(entries)
    }

    async fn export(
        &self,
        results: &[ResultEntry],
        format: ExportFormat,
    ) -> Result<ExportPayload, ServiceError> {
        info!("Requesting {} export of {} results", format, results.len());
        let response = self
            .client
            .post(self.endpoint(EXPORT)?)
            .json(&ExportRequest { results, format })
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        match format {
            ExportFormat::Csv => Ok(ExportPayload::Csv(response.text().await?)),
            ExportFormat::Json => Ok(ExportPayload::Json(response.json().await?)),
        }
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_join_under_base_path() {
        let service = HttpAnalysisService::new("https://cta.example.com/tools").unwrap();
        assert_eq!(service.base_url().path(), "/tools/");
        assert_eq!(
            service.endpoint(ANALYZE_TEXT).unwrap().as_str(),
            "https://cta.example.com/tools/api/analyze-text"
        );

        let service = HttpAnalysisService::new("http://localhost:5005").unwrap();
        assert_eq!(
            service.endpoint(HISTORY).unwrap().as_str(),
            "http://localhost:5005/api/history"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpAnalysisService::new("not a url"),
            Err(ServiceError::Transport(_))
        ));
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(500);
        let s = snippet(&long);
        assert!(s.ends_with("..."));
        assert_eq!(s.chars().count(), MAX_ERROR_BODY + 3);
        assert_eq!(snippet("  short  "), "short");
    }
}
