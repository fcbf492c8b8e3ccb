//! Session controller.
//!
//! Owns the active session and everything projected from it. All mutation goes
//! through `&mut self`; the async edges live in [`driver`](super::driver) and
//! call back in here before and after each await.

use chrono::NaiveDateTime;
use tracing::{debug, error, info, warn};

use super::bulk::{BulkAction, BulkOutcome};
use super::collection::ResultsCollection;
use super::entry::{EntryId, ResultEntry, Stats};
use super::history::{HistoryCache, HistoryEntry};
use super::input::{InputForm, Submission, SubmissionKind};
use super::notice::{NoticeLevel, Notifications};
use super::table::ResultsTable;
use crate::api::{AnalysisOutcome, AnalysisResponse, ExportPayload};
use crate::config::{ClientConfig, RevertMode};
use crate::error::{ServiceError, SessionError, ValidationError};
use crate::export::{self, ExportFile, ExportFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    ResultsReady,
}

/// Which section is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Input,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// A validated submission that has entered `Submitting`.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub ticket: Ticket,
    pub submission: Submission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rejected locally; nothing was sent.
    Invalid(ValidationError),
    Loaded { count: usize },
    Failed(String),
}

/// Entry snapshot handed to a regenerator, addressed by handle so a
/// replaced collection is detected when the result comes back.
#[derive(Debug, Clone)]
pub struct PendingRegeneration {
    pub id: EntryId,
    pub entry: ResultEntry,
}

/// The active analysis: identifier, results, and counters.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub analysis_id: Option<String>,
    pub results: ResultsCollection,
    pub stats: Stats,
}

#[derive(Debug, Clone)]
pub struct SessionController {
    config: ClientConfig,
    form: InputForm,
    session: Session,
    table: ResultsTable,
    history: HistoryCache,
    notices: Notifications,
    phase: Phase,
    view: ActiveView,
    in_flight: usize,
    next_ticket: u64,
    bulk_choice: Option<BulkAction>,
}

impl SessionController {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            form: InputForm::new(&config),
            history: HistoryCache::new(config.history_display_limit),
            config,
            session: Session::default(),
            table: ResultsTable::new(),
            notices: Notifications::default(),
            phase: Phase::Idle,
            view: ActiveView::Input,
            in_flight: 0,
            next_ticket: 0,
            bulk_choice: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn form(&self) -> &InputForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut InputForm {
        &mut self.form
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn results(&self) -> &ResultsCollection {
        &self.session.results
    }

    pub fn stats(&self) -> Stats {
        self.session.stats
    }

    pub fn table(&self) -> &ResultsTable {
        &self.table
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    pub fn notices(&self) -> &Notifications {
        &self.notices
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view(&self) -> ActiveView {
        self.view
    }

    pub fn bulk_choice(&self) -> Option<BulkAction> {
        self.bulk_choice
    }

    pub fn set_bulk_choice(&mut self, choice: Option<BulkAction>) {
        self.bulk_choice = choice;
    }

    /// Whether the results tab can be opened.
    pub fn results_enabled(&self) -> bool {
        !self.session.results.is_empty()
    }

    /// True while any submission is awaiting its response.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Switch sections. The results section is refused while there is nothing to show.
    pub fn show_view(&mut self, view: ActiveView) -> bool {
        if view == ActiveView::Results && !self.results_enabled() {
            debug!("Results view requested with an empty collection");
            return false;
        }
        self.view = view;
        true
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.notices.push(level, message)
    }

    pub fn dismiss_notice(&mut self, id: u64) {
        self.notices.dismiss(id);
    }

    /// Any still-pending submission keeps the phase at `Submitting`.
    fn settle(&mut self, next: Phase) {
        self.phase = if self.in_flight > 0 {
            Phase::Submitting
        } else {
            next
        };
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        debug!("Input rejected: {}", err);
        self.notices.push(NoticeLevel::Warning, err.to_string());
        err
    }

    // -- Submission --

    /// Validate the form for `kind` and enter `Submitting`.
    pub fn begin_submit(&mut self, kind: SubmissionKind) -> Result<PendingSubmission, ValidationError> {
        match self.form.to_submission(kind) {
            Ok(submission) => self.begin_submission(submission),
            Err(err) => Err(self.reject(err)),
        }
    }

    pub fn begin_submission(&mut self, submission: Submission) -> Result<PendingSubmission, ValidationError> {
        if let Err(err) = submission.validate(&self.config) {
            return Err(self.reject(err));
        }
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.in_flight += 1;
        self.phase = Phase::Submitting;
        info!("Submission {} started: {}", ticket.0, submission.describe());
        Ok(PendingSubmission { ticket, submission })
    }

    /// Apply a response. Whichever response resolves last wins.
    pub fn complete_submit(
        &mut self,
        ticket: Ticket,
        result: Result<AnalysisResponse, ServiceError>,
    ) -> SubmitOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result.and_then(AnalysisResponse::into_outcome) {
            Ok(outcome) => {
                let count = outcome.results.len();
                info!(
                    "Submission {} completed with {} results (analysis {:?})",
                    ticket.0, count, outcome.analysis_id
                );
                self.load_outcome(outcome);
                self.settle(Phase::ResultsReady);
                if count == 0 {
                    self.notices.push(NoticeLevel::Info, "No CTAs found in this content");
                } else {
                    self.notices.push(
                        NoticeLevel::Success,
                        format!("Analysis complete: {} CTAs found", count),
                    );
                }
                SubmitOutcome::Loaded { count }
            }
            Err(err) => {
                warn!("Submission {} failed: {}", ticket.0, err);
                let message = err.to_string();
                self.notices.push(NoticeLevel::Error, message.clone());
                self.settle(Phase::Idle);
                SubmitOutcome::Failed(message)
            }
        }
    }

    fn load_outcome(&mut self, outcome: AnalysisOutcome) {
        self.session.analysis_id = outcome.analysis_id;
        self.session.results.replace(outcome.results);
        self.session.stats = outcome.stats;
        self.table.rebuild(&self.session.results);
        self.bulk_choice = None;
        if self.results_enabled() {
            self.view = ActiveView::Results;
        }
    }

    /// Drop the current session and go back to an empty input form.
    pub fn start_new(&mut self) {
        info!("Starting new analysis");
        self.form.clear(&self.config);
        // Clear in place so handles keep counting up.
        self.session.results.clear();
        self.session.analysis_id = None;
        self.session.stats = Stats::default();
        self.table.clear();
        self.bulk_choice = None;
        self.view = ActiveView::Input;
        self.settle(Phase::Idle);
    }

    // -- History --

    pub fn apply_history(&mut self, result: Result<Vec<HistoryEntry>, ServiceError>) {
        match result {
            Ok(entries) => self.history.replace(entries),
            Err(err) => {
                warn!("Failed to load history: {}", err);
                self.notices
                    .push(NoticeLevel::Error, format!("Failed to load history: {}", err));
            }
        }
    }

    /// Replay a stored session as if it had just been analyzed.
    pub fn load_from_history(&mut self, id: &str) -> Result<(), SessionError> {
        let entry = self
            .history
            .find(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownHistoryEntry(id.to_string()))?;
        let stats = Stats::from_results(&entry.results);
        let label = format!("Loaded {} analysis from {}", entry.kind, entry.display_time());
        info!("Loading history entry {} ({} results)", entry.id, entry.results.len());
        self.load_outcome(AnalysisOutcome {
            analysis_id: Some(entry.id),
            results: entry.results,
            stats,
        });
        self.settle(Phase::ResultsReady);
        self.notices.push(NoticeLevel::Info, label);
        Ok(())
    }

    // -- Row actions --

    /// Id of the row currently at `index`.
    pub fn id_at(&self, index: usize) -> Result<EntryId, SessionError> {
        self.session.results.id_at(index)
    }

    pub fn index_of(&self, id: EntryId) -> Result<usize, SessionError> {
        self.session
            .results
            .index_of(id)
            .ok_or(SessionError::UnknownEntry(id))
    }

    pub fn edit_suggestion(&mut self, index: usize, text: String) -> Result<(), SessionError> {
        self.table.set_suggestion(index, text)
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<(), SessionError> {
        self.table.set_selected(index, selected)
    }

    pub fn set_select_all(&mut self, selected: bool) {
        self.table.set_select_all(selected);
    }

    fn accept_row(&mut self, index: usize) -> Result<(), SessionError> {
        let live = self.table.row(index)?.suggestion.clone();
        self.session.results.accept(index, &live)?;
        self.table.set_display_cta(index, live)
    }

    fn revert_row(&mut self, index: usize) -> Result<(), SessionError> {
        let restored = match self.config.revert_mode {
            RevertMode::LastAccepted => self.session.results.get(index)?.original_cta.clone(),
            RevertMode::Pristine => {
                let text = self.session.results.restore_pristine(index)?.original_cta.clone();
                self.table.set_display_cta(index, text.clone())?;
                text
            }
        };
        self.table.set_suggestion(index, restored)
    }

    /// Commit the row's live suggestion as its CTA.
    pub fn accept(&mut self, index: usize) -> Result<(), SessionError> {
        self.accept_row(index)?;
        debug!("Accepted suggestion for row {}", index);
        self.notices.push(NoticeLevel::Success, "Suggestion accepted");
        Ok(())
    }

    /// Reset the row's suggestion field according to the configured [`RevertMode`].
    pub fn revert(&mut self, index: usize) -> Result<(), SessionError> {
        self.revert_row(index)?;
        debug!("Reverted row {} ({:?})", index, self.config.revert_mode);
        self.notices.push(NoticeLevel::Info, "Suggestion reverted");
        Ok(())
    }

    /// Text to place on the clipboard for a row.
    pub fn copy_suggestion(&self, index: usize) -> Result<String, SessionError> {
        Ok(self.table.row(index)?.suggestion.clone())
    }

    // -- Bulk --

    /// Run the action picked in the bulk selector.
    pub fn apply_selected_bulk(&mut self) -> Result<BulkOutcome, SessionError> {
        match self.bulk_choice {
            Some(action) => self.apply_bulk(action),
            None => {
                self.notices
                    .push(NoticeLevel::Warning, "Please choose a bulk action");
                Ok(BulkOutcome::NothingSelected)
            }
        }
    }

    /// Apply `action` to every checked row in ascending order, then reset the selector.
    pub fn apply_bulk(&mut self, action: BulkAction) -> Result<BulkOutcome, SessionError> {
        let indices = self.table.selected_indices();
        self.bulk_choice = None;
        if indices.is_empty() {
            self.reject(ValidationError::NothingSelected);
            return Ok(BulkOutcome::NothingSelected);
        }

        for &index in &indices {
            match action {
                BulkAction::Accept => self.accept_row(index)?,
                BulkAction::Revert => self.revert_row(index)?,
            }
        }
        let verb = match action {
            BulkAction::Accept => "Accepted",
            BulkAction::Revert => "Reverted",
        };
        info!("Bulk {} applied to {} rows", action, indices.len());
        self.notices.push(
            NoticeLevel::Success,
            format!("{} {} suggestions", verb, indices.len()),
        );
        Ok(BulkOutcome::Applied { action, indices })
    }

    // -- Regeneration --

    pub fn begin_regenerate(&mut self, index: usize) -> Result<PendingRegeneration, SessionError> {
        let id = self.session.results.id_at(index)?;
        let mut entry = self.session.results.get(index)?.clone();
        entry.suggested_improvement = self.table.row(index)?.suggestion.clone();
        self.notices.push(NoticeLevel::Info, "Regenerating suggestion...");
        Ok(PendingRegeneration { id, entry })
    }

    pub fn complete_regenerate(&mut self, id: EntryId, result: Result<Option<String>, ServiceError>) {
        let Some(index) = self.session.results.index_of(id) else {
            debug!("Entry {} was replaced before regeneration finished", id);
            return;
        };
        match result {
            Ok(Some(text)) => {
                if self.table.set_suggestion(index, text).is_ok() {
                    self.notices.push(NoticeLevel::Success, "Suggestion regenerated");
                }
            }
            Ok(None) => {
                self.notices
                    .push(NoticeLevel::Info, "No new suggestion is available for this CTA");
            }
            Err(err) => {
                warn!("Regeneration failed for {}: {}", id, err);
                self.notices
                    .push(NoticeLevel::Error, format!("Regeneration failed: {}", err));
            }
        }
    }

    // -- Export --

    /// Encode the collection locally. No network involved.
    pub fn export_local(&mut self, format: ExportFormat, now: NaiveDateTime) -> Option<ExportFile> {
        let snapshot = self.export_snapshot()?;
        let contents = match format {
            ExportFormat::Csv => Ok(export::to_csv(&snapshot)),
            ExportFormat::Json => export::to_json(&snapshot),
        };
        match contents {
            Ok(contents) => {
                info!("Exported {} results as {}", snapshot.len(), format);
                Some(ExportFile::new(format, contents, now))
            }
            Err(err) => {
                error!("Local export failed: {}", err);
                self.notices
                    .push(NoticeLevel::Error, format!("Export failed: {}", err));
                None
            }
        }
    }

    /// Copy of the collection for a service-side export, or `None` if it is empty.
    pub fn export_snapshot(&mut self) -> Option<Vec<ResultEntry>> {
        if self.session.results.is_empty() {
            self.notices.push(NoticeLevel::Warning, "No results to export");
            return None;
        }
        Some(self.session.results.to_vec())
    }

    /// Handle the service's export response. Failures never touch the collection.
    pub fn complete_export(
        &mut self,
        result: Result<ExportPayload, ServiceError>,
        now: NaiveDateTime,
    ) -> Option<ExportFile> {
        let file = result
            .map_err(String::from)
            .and_then(|payload| ExportFile::from_payload(payload, now).map_err(String::from));
        match file {
            Ok(file) => Some(file),
            Err(message) => {
                warn!("Export failed: {}", message);
                self.notices
                    .push(NoticeLevel::Error, format!("Export failed: {}", message));
                None
            }
        }
    }
}
