//! Suggestion regeneration capability.

use async_trait::async_trait;

use super::entry::ResultEntry;
use crate::error::ServiceError;

/// Produces a fresh suggestion for one entry.
///
/// `Ok(None)` means no new text is available; the live field is left alone.
#[async_trait(?Send)]
pub trait Regenerator {
    async fn regenerate(&self, entry: &ResultEntry) -> Result<Option<String>, ServiceError>;
}

/// Default regenerator. Never produces new text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRegenerator;

#[async_trait(?Send)]
impl Regenerator for NoopRegenerator {
    async fn regenerate(&self, _entry: &ResultEntry) -> Result<Option<String>, ServiceError> {
        Ok(None)
    }
}
