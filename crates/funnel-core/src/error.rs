//! # Error Module
//!
//! Every failure the resolver can report. All of them are recoverable by the
//! caller: the resolver is pure, so retrying with the same inputs gives the
//! same answer.

use crate::{Stage, Target};
use thiserror::Error;

/// Errors from pipeline resolution, manual moves and rule-table loading.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The stage identifier is not known to the rule table.
    #[error("invalid stage: {stage}")]
    InvalidStage { stage: String },

    /// The result code is not declared for the stage.
    #[error(
        "result '{result}' is not valid for stage {stage}; valid results: [{}]",
        valid.join(", ")
    )]
    InvalidResult {
        stage: Stage,
        result: String,
        valid: Vec<String>,
    },

    /// A forward advance was attempted before the stage checklist was done.
    #[error(
        "checklist incomplete to advance from {stage}; required items: [{}], missing: [{}]",
        required.join(", "),
        missing.join(", ")
    )]
    IncompleteChecklist {
        stage: Stage,
        required: Vec<String>,
        missing: Vec<String>,
    },

    /// A manual move targets the stage the lead is already in.
    #[error("lead is already in {stage}")]
    SameStage { stage: Target },

    /// A manual move is not on the board's adjacency list.
    #[error("moving from {from} to {to} is not allowed; record a contact to advance or go back")]
    MoveNotAllowed { from: Target, to: Target },

    /// A loaded rule table failed validation.
    #[error("invalid rule table: {reason}")]
    InvalidRuleTable { reason: String },

    /// A rule table document could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Shorthand for an unknown stage identifier.
    pub fn invalid_stage(stage: impl Into<String>) -> Self {
        Self::InvalidStage {
            stage: stage.into(),
        }
    }

    /// Shorthand for a rule-table validation failure.
    pub fn invalid_rule_table(reason: impl Into<String>) -> Self {
        Self::InvalidRuleTable {
            reason: reason.into(),
        }
    }

    /// Whether this is a user-facing validation error rather than a
    /// configuration problem.
    ///
    /// Validation errors are meant to be shown to the salesperson as form
    /// messages; configuration errors point at a broken rule file.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::InvalidRuleTable { .. } | Self::Json(_))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_result_lists_valid_codes() {
        let err = PipelineError::InvalidResult {
            stage: Stage::ContactPending,
            result: "bogus".to_string(),
            valid: vec!["invalid_number".to_string(), "no_answer".to_string()],
        };

        let message = err.to_string();
        assert!(message.contains("'bogus'"));
        assert!(message.contains("CONTACT_PENDING"));
        assert!(message.contains("[invalid_number, no_answer]"));
    }

    #[test]
    fn incomplete_checklist_names_missing_items() {
        let err = PipelineError::IncompleteChecklist {
            stage: Stage::ContactMade,
            required: vec!["a".to_string(), "b".to_string()],
            missing: vec!["b".to_string()],
        };

        assert!(err.to_string().contains("missing: [b]"));
    }

    #[test]
    fn validation_classification() {
        assert!(PipelineError::invalid_stage("FOO").is_validation());
        assert!(
            PipelineError::SameStage {
                stage: Target::Archived
            }
            .is_validation()
        );
        assert!(!PipelineError::invalid_rule_table("empty").is_validation());
    }
}
