//! # Transition Module
//!
//! A resolved move, shaped like the history entry the caller persists.

use crate::policy::AUTO_ARCHIVED;
use crate::{Checklist, Stage, Target};
use serde::{Deserialize, Serialize};

/// One resolved move of a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Stage,
    pub result: String,
    pub to: Target,
    /// Items that were ticked when the contact was recorded, sorted.
    pub checklist_items: Vec<String>,
}

impl Transition {
    #[must_use]
    pub fn new(from: Stage, result: impl Into<String>, to: Target, checklist: &Checklist) -> Self {
        Self {
            from,
            result: result.into(),
            to,
            checklist_items: checklist.ticked().map(str::to_string).collect(),
        }
    }

    /// The follow-up entry written when the callback limit archives a lead.
    #[must_use]
    pub fn auto_archived(from: Stage) -> Self {
        Self {
            from,
            result: AUTO_ARCHIVED.to_string(),
            to: Target::Archived,
            checklist_items: Vec::new(),
        }
    }

    /// Lead moved to another funnel stage.
    #[must_use]
    pub fn is_advance(&self) -> bool {
        !self.is_stay() && !self.is_archival()
    }

    #[must_use]
    pub fn is_archival(&self) -> bool {
        self.to.is_archived()
    }

    /// Lead stayed where it was.
    #[must_use]
    pub fn is_stay(&self) -> bool {
        self.to == self.from
    }

    /// Storage codes of both ends, for the caller's history table.
    #[must_use]
    pub fn storage_codes(&self) -> (&'static str, &'static str) {
        (self.from.storage_code(), self.to.storage_code())
    }
}

// =============================================================================
// TESTS
// =============================================================================
