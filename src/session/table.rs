//! View model for the editable results table.
//!
//! The table projects a [`ResultsCollection`] row for row. Between rebuilds the
//! live `suggestion` and `selected` fields here are authoritative; the collection
//! only learns about them when the user accepts or reverts.

use super::collection::ResultsCollection;
use super::entry::{Confidence, EntryId};
use crate::error::SessionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: EntryId,
    /// Static CTA text cell.
    pub display_cta: String,
    /// Live value of the editable suggestion field.
    pub suggestion: String,
    pub selected: bool,
    pub confidence: Confidence,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    rows: Vec<TableRow>,
    select_all: bool,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear and rebuild every row from the collection.
    ///
    /// Selection never survives a rebuild: all checkboxes and the select-all
    /// indicator are reset.
    pub fn rebuild(&mut self, collection: &ResultsCollection) {
        self.rows = collection
            .handles()
            .map(|(id, entry)| TableRow {
                id,
                display_cta: entry.original_cta.clone(),
                suggestion: entry.suggested_improvement.clone(),
                selected: false,
                confidence: entry.confidence,
                source: entry.source_label().to_string(),
            })
            .collect();
        self.select_all = false;
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn select_all(&self) -> bool {
        self.select_all
    }

    pub fn row(&self, index: usize) -> Result<&TableRow, SessionError> {
        self.rows.get(index).ok_or(SessionError::IndexOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    pub fn row_by_id(&self, id: EntryId) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut TableRow, SessionError> {
        let len = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })
    }

    pub fn set_suggestion(&mut self, index: usize, text: String) -> Result<(), SessionError> {
        self.row_mut(index)?.suggestion = text;
        Ok(())
    }

    pub fn set_display_cta(&mut self, index: usize, text: String) -> Result<(), SessionError> {
        self.row_mut(index)?.display_cta = text;
        Ok(())
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<(), SessionError> {
        self.row_mut(index)?.selected = selected;
        if !selected {
            self.select_all = false;
        } else if self.rows.iter().all(|r| r.selected) {
            self.select_all = true;
        }
        Ok(())
    }

    pub fn set_select_all(&mut self, selected: bool) {
        self.select_all = selected;
        for row in &mut self.rows {
            row.selected = selected;
        }
    }

    /// Indices of checked rows, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.selected)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.select_all = false;
    }
}
