//! Callback limit: archive leads whose decision maker keeps being unavailable.

use serde::{Deserialize, Serialize};

/// Result code of the history entry written when a lead is auto-archived.
pub const AUTO_ARCHIVED: &str = "auto_archived";

/// Result code that counts as a requested callback.
pub const DEFAULT_CALLBACK_RESULT: &str = "decision_maker_unavailable";

/// Callbacks allowed before the lead is archived.
pub const DEFAULT_MAX_CALLBACKS: u32 = 2;

/// When to give up on a lead that keeps asking for a callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackLimit {
    /// Result code being counted.
    pub result: String,
    /// Count (including the contact just recorded) that triggers archival.
    pub max_callbacks: u32,
}

impl Default for CallbackLimit {
    fn default() -> Self {
        Self::new(DEFAULT_CALLBACK_RESULT, DEFAULT_MAX_CALLBACKS)
    }
}

impl CallbackLimit {
    /// Create a limit. A limit of 0 is treated as 1.
    #[must_use]
    pub fn new(result: impl Into<String>, max_callbacks: u32) -> Self {
        Self {
            result: result.into(),
            max_callbacks: max_callbacks.max(1),
        }
    }

    /// Whether the contact just recorded should archive the lead.
    ///
    /// `recorded` is how many entries with the counted result the lead's
    /// history holds, the new one included.
    #[must_use]
    pub fn should_archive(&self, result: &str, recorded: u32) -> bool {
        result == self.result && recorded >= self.max_callbacks
    }

    /// Callbacks left before archival.
    #[must_use]
    pub fn remaining(&self, recorded: u32) -> u32 {
        self.max_callbacks.saturating_sub(recorded)
    }
}
