//! Seam to the external analysis service.

pub mod http;
pub mod types;

use async_trait::async_trait;

pub use http::HttpAnalysisService;
pub use types::{AnalysisOutcome, AnalysisResponse, ExportPayload, GENERIC_FAILURE};

use crate::error::ServiceError;
use crate::export::ExportFormat;
use crate::session::entry::ResultEntry;
use crate::session::history::HistoryEntry;
use crate::session::input::Submission;

/// The three request shapes the client needs, plus history and export.
///
/// Futures are not `Send`: the browser runs everything on one thread.
#[async_trait(?Send)]
pub trait AnalysisService {
    /// Submit one analysis. Application-level failures come back as a
    /// response with `success: false`, not as `Err`.
    async fn analyze(&self, submission: &Submission) -> Result<AnalysisResponse, ServiceError>;

    /// Full history list in store order.
    async fn history(&self) -> Result<Vec<HistoryEntry>, ServiceError>;

    async fn export(
        &self,
        results: &[ResultEntry],
        format: ExportFormat,
    ) -> Result<ExportPayload, ServiceError>;
}
