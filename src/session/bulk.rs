//! Bulk actions over the checked rows.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Accept,
    Revert,
}

impl BulkAction {
    pub const ALL: [BulkAction; 2] = [BulkAction::Accept, BulkAction::Revert];

    /// Value used by the bulk selector's `<option>`.
    pub fn value(self) -> &'static str {
        match self {
            BulkAction::Accept => "accept",
            BulkAction::Revert => "revert",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "accept" => Some(BulkAction::Accept),
            "revert" => Some(BulkAction::Revert),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BulkAction::Accept => "Accept selected",
            BulkAction::Revert => "Revert selected",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Result of one bulk apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    /// Nothing was checked; only a validation notice was raised.
    NothingSelected,
    /// The action ran on these indices, ascending.
    Applied {
        action: BulkAction,
        indices: Vec<usize>,
    },
}
