//! Async workflows around the controller.
//!
//! Each workflow takes the controller out for a synchronous step, releases it
//! across the await, then takes it again to apply the result. Nothing is
//! borrowed while a request is in flight.

use std::cell::RefCell;

use chrono::NaiveDateTime;
use tracing::debug;

use super::controller::{SessionController, SubmitOutcome};
use super::input::SubmissionKind;
use super::regenerate::Regenerator;
use crate::api::AnalysisService;
use crate::export::{ExportFile, ExportFormat};

/// Single-writer access to a [`SessionController`].
///
/// Returns `None` when the controller is gone (a disposed UI signal, for example).
pub trait ControllerCell {
    fn update_with<R>(&self, f: impl FnOnce(&mut SessionController) -> R) -> Option<R>;
}

impl ControllerCell for RefCell<SessionController> {
    fn update_with<R>(&self, f: impl FnOnce(&mut SessionController) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Validate the form for `kind`, send it, and load the response.
/// A successful load also refreshes the history cache.
pub async fn submit<C, S>(cell: &C, service: &S, kind: SubmissionKind) -> Option<SubmitOutcome>
where
    C: ControllerCell + ?Sized,
    S: AnalysisService + ?Sized,
{
    let pending = match cell.update_with(|c| c.begin_submit(kind))? {
        Ok(pending) => pending,
        Err(err) => return Some(SubmitOutcome::Invalid(err)),
    };
    let result = service.analyze(&pending.submission).await;
    let outcome = cell.update_with(|c| c.complete_submit(pending.ticket, result))?;
    if matches!(outcome, SubmitOutcome::Loaded { .. }) {
        refresh_history(cell, service).await;
    }
    Some(outcome)
}

pub async fn refresh_history<C, S>(cell: &C, service: &S)
where
    C: ControllerCell + ?Sized,
    S: AnalysisService + ?Sized,
{
    let result = service.history().await;
    if cell.update_with(|c| c.apply_history(result)).is_none() {
        debug!("Controller dropped before history arrived");
    }
}

/// Ask the service to encode the current collection.
pub async fn export_remote<C, S>(
    cell: &C,
    service: &S,
    format: ExportFormat,
    now: NaiveDateTime,
) -> Option<ExportFile>
where
    C: ControllerCell + ?Sized,
    S: AnalysisService + ?Sized,
{
    let snapshot = cell.update_with(|c| c.export_snapshot())??;
    let result = service.export(&snapshot, format).await;
    cell.update_with(|c| c.complete_export(result, now))?
}

pub async fn regenerate<C, R>(cell: &C, regenerator: &R, index: usize)
where
    C: ControllerCell + ?Sized,
    R: Regenerator + ?Sized,
{
    let pending = match cell.update_with(|c| c.begin_regenerate(index)) {
        Some(Ok(pending)) => pending,
        Some(Err(err)) => {
            debug!("Regenerate skipped: {}", err);
            return;
        }
        None => return,
    };
    let result = regenerator.regenerate(&pending.entry).await;
    cell.update_with(|c| c.complete_regenerate(pending.id, result));
}
