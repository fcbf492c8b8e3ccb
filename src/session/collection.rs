//! Ordered, indexable store of the active session's result entries.

use tracing::debug;

use super::entry::{EntryId, ResultEntry};
use crate::error::SessionError;

/// Editable text fields of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    OriginalCta,
    SuggestedImprovement,
}

#[derive(Debug, Clone)]
struct Slot {
    id: EntryId,
    /// Text as delivered by the analysis, never touched by accept.
    pristine: String,
    entry: ResultEntry,
}

/// Single source of truth for the active result set.
///
/// Slots are kept in display order. Every slot also carries an [`EntryId`] that
/// survives in-place mutation and is never reused, so callers holding a handle
/// from a previous render can detect that the collection was replaced.
#[derive(Debug, Clone, Default)]
pub struct ResultsCollection {
    slots: Vec<Slot>,
    next_id: u64,
}

impl ResultsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap the whole collection. Handles from before the swap no longer resolve.
    pub fn replace(&mut self, entries: Vec<ResultEntry>) {
        self.slots = entries
            .into_iter()
            .map(|entry| {
                let id = EntryId(self.next_id);
                self.next_id += 1;
                Slot {
                    id,
                    pristine: entry.original_cta.clone(),
                    entry,
                }
            })
            .collect();
        debug!("Results collection replaced with {} entries", self.slots.len());
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, index: usize) -> Result<&Slot, SessionError> {
        self.slots.get(index).ok_or(SessionError::IndexOutOfRange {
            index,
            len: self.slots.len(),
        })
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Slot, SessionError> {
        let len = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })
    }

    pub fn get(&self, index: usize) -> Result<&ResultEntry, SessionError> {
        self.slot(index).map(|s| &s.entry)
    }

    pub fn id_at(&self, index: usize) -> Result<EntryId, SessionError> {
        self.slot(index).map(|s| s.id)
    }

    /// Position of the entry with the given handle, if it is still present.
    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    /// The original CTA text as it arrived, before any accept.
    pub fn pristine(&self, index: usize) -> Result<&str, SessionError> {
        self.slot(index).map(|s| s.pristine.as_str())
    }

    pub fn set(&mut self, index: usize, field: Field, value: String) -> Result<(), SessionError> {
        let slot = self.slot_mut(index)?;
        match field {
            Field::OriginalCta => slot.entry.original_cta = value,
            Field::SuggestedImprovement => slot.entry.suggested_improvement = value,
        }
        Ok(())
    }

    /// Commit `suggestion` (the live editable value) as the entry's CTA.
    pub fn accept(&mut self, index: usize, suggestion: &str) -> Result<&ResultEntry, SessionError> {
        let slot = self.slot_mut(index)?;
        slot.entry.suggested_improvement = suggestion.to_string();
        slot.entry.original_cta = suggestion.to_string();
        Ok(&slot.entry)
    }

    /// Undo any accept on this entry by restoring the pristine CTA text.
    pub fn restore_pristine(&mut self, index: usize) -> Result<&ResultEntry, SessionError> {
        let slot = self.slot_mut(index)?;
        slot.entry.original_cta = slot.pristine.clone();
        Ok(&slot.entry)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ResultEntry> {
        self.slots.iter().map(|s| &s.entry)
    }

    pub fn handles(&self) -> impl Iterator<Item = (EntryId, &ResultEntry)> {
        self.slots.iter().map(|s| (s.id, &s.entry))
    }

    /// Owned snapshot in display order, suitable for export or history.
    pub fn to_vec(&self) -> Vec<ResultEntry> {
        self.entries().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entry::Confidence;

    fn sample() -> ResultsCollection {
        let mut c = ResultsCollection::new();
        c.replace(vec![
            ResultEntry::new("Get Started", "Start Your Free Trial Today", Confidence::High, None),
            ResultEntry::new(
                "Learn More",
                "Discover How It Works",
                Confidence::Medium,
                Some("Features Section".into()),
            ),
        ]);
        c
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let mut c = sample();
        assert_eq!(
            c.get(2).unwrap_err(),
            SessionError::IndexOutOfRange { index: 2, len: 2 }
        );
        assert!(c.set(5, Field::OriginalCta, "x".into()).is_err());
        assert!(c.accept(9, "x").is_err());
    }

    #[test]
    fn test_accept_copies_live_suggestion() {
        let mut c = sample();
        c.accept(0, "Try it free").unwrap();
        let entry = c.get(0).unwrap();
        assert_eq!(entry.original_cta, "Try it free");
        assert_eq!(entry.suggested_improvement, "Try it free");
        assert_eq!(c.pristine(0).unwrap(), "Get Started");
    }

    #[test]
    fn test_restore_pristine_undoes_accept() {
        let mut c = sample();
        c.accept(1, "See how").unwrap();
        c.restore_pristine(1).unwrap();
        assert_eq!(c.get(1).unwrap().original_cta, "Learn More");
    }

    #[test]
    fn test_replace_invalidates_handles() {
        let mut c = sample();
        let old = c.id_at(0).unwrap();
        assert_eq!(c.index_of(old), Some(0));

        c.replace(vec![ResultEntry::new("Buy", "Buy now", Confidence::Low, None)]);
        assert_eq!(c.index_of(old), None);
        assert_ne!(c.id_at(0).unwrap(), old);
    }

    #[test]
    fn test_set_and_clear() {
        let mut c = sample();
        c.set(1, Field::SuggestedImprovement, "".into()).unwrap();
        assert_eq!(c.get(1).unwrap().suggested_improvement, "");
        c.clear();
        assert!(c.is_empty());
    }
}
