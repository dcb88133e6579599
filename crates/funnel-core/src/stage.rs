//! # Stage Module
//!
//! The sales funnel's stages and the "Archived" terminal marker.
//!
//! Stages are identified three ways:
//! - a canonical identifier (`CONTACT_PENDING`), used by the rule table
//! - a display label (`Contact Pending`), shown on the board
//! - a storage code (`contact_pending`), persisted by the calling application
//!
//! Parsing accepts the canonical identifier or the display label. Storage
//! codes are translated explicitly with [`Target::from_storage_code`].

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// STAGE
// =============================================================================

/// A position in the sales funnel.
///
/// Variants are declared in business order, so `Ord` follows the funnel.
/// The resolver does not rely on that order: results may keep a lead where
/// it is or archive it from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Stage {
    ContactPending,
    ContactMade,
    Negotiation,
    OrderPlaced,
    ActiveAccount,
}

impl Stage {
    /// All stages in funnel order.
    pub const ALL: [Stage; 5] = [
        Stage::ContactPending,
        Stage::ContactMade,
        Stage::Negotiation,
        Stage::OrderPlaced,
        Stage::ActiveAccount,
    ];

    /// Canonical identifier used in rule tables.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Stage::ContactPending => "CONTACT_PENDING",
            Stage::ContactMade => "CONTACT_MADE",
            Stage::Negotiation => "NEGOTIATION",
            Stage::OrderPlaced => "ORDER_PLACED",
            Stage::ActiveAccount => "ACTIVE_ACCOUNT",
        }
    }

    /// Human-readable column title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Stage::ContactPending => "Contact Pending",
            Stage::ContactMade => "Contact Made",
            Stage::Negotiation => "Negotiation / Quote",
            Stage::OrderPlaced => "Order Placed",
            Stage::ActiveAccount => "Active Account",
        }
    }

    /// Status code persisted by the calling application.
    #[must_use]
    pub const fn storage_code(self) -> &'static str {
        match self {
            Stage::ContactPending => "contact_pending",
            Stage::ContactMade => "contact_made",
            Stage::Negotiation => "negotiation_quote",
            Stage::OrderPlaced => "order_placed",
            Stage::ActiveAccount => "active_account",
        }
    }

    /// Whether the stage has a column on the Kanban board.
    ///
    /// Active accounts leave the board; they are worked from their own list.
    #[must_use]
    pub const fn on_board(self) -> bool {
        !matches!(self, Stage::ActiveAccount)
    }

    /// Position in the funnel, starting at 0.
    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Stage {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.id() == s || stage.label() == s)
            .ok_or_else(|| PipelineError::invalid_stage(s))
    }
}

impl TryFrom<String> for Stage {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.id().to_string()
    }
}

// =============================================================================
// TARGET
// =============================================================================

/// Canonical identifier of the archived marker.
pub const ARCHIVED_ID: &str = "ARCHIVED";

/// Where a lead ends up: a funnel stage or the archive.
///
/// Rule tables can only name a `Target`, so every result destination is a
/// known stage or the archive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Target {
    Stage(Stage),
    Archived,
}

impl Target {
    /// Every target: the funnel stages followed by the archive.
    pub const ALL: [Target; 6] = [
        Target::Stage(Stage::ContactPending),
        Target::Stage(Stage::ContactMade),
        Target::Stage(Stage::Negotiation),
        Target::Stage(Stage::OrderPlaced),
        Target::Stage(Stage::ActiveAccount),
        Target::Archived,
    ];

    /// The stage a restored (un-archived) lead returns to.
    #[must_use]
    pub const fn restore_stage() -> Stage {
        Stage::ContactPending
    }

    /// Canonical identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Target::Stage(stage) => stage.id(),
            Target::Archived => ARCHIVED_ID,
        }
    }

    /// Human-readable title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Target::Stage(stage) => stage.label(),
            Target::Archived => "Archived",
        }
    }

    /// Status code persisted by the calling application.
    #[must_use]
    pub const fn storage_code(self) -> &'static str {
        match self {
            Target::Stage(stage) => stage.storage_code(),
            Target::Archived => "archived",
        }
    }

    /// Translate a persisted status code.
    pub fn from_storage_code(code: &str) -> Result<Self> {
        Target::ALL
            .into_iter()
            .find(|target| target.storage_code() == code)
            .ok_or_else(|| PipelineError::invalid_stage(code))
    }

    /// The funnel stage, if this is not the archive.
    #[must_use]
    pub const fn stage(self) -> Option<Stage> {
        match self {
            Target::Stage(stage) => Some(stage),
            Target::Archived => None,
        }
    }

    #[must_use]
    pub const fn is_archived(self) -> bool {
        matches!(self, Target::Archived)
    }

    /// Whether a lead here shows up on the board.
    #[must_use]
    pub const fn on_board(self) -> bool {
        match self {
            Target::Stage(stage) => stage.on_board(),
            Target::Archived => false,
        }
    }
}

impl From<Stage> for Target {
    fn from(stage: Stage) -> Self {
        Target::Stage(stage)
    }
}

impl PartialEq<Stage> for Target {
    fn eq(&self, other: &Stage) -> bool {
        *self == Target::Stage(*other)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Target {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        if s == ARCHIVED_ID || s == Target::Archived.label() {
            return Ok(Target::Archived);
        }
        s.parse().map(Target::Stage)
    }
}

impl TryFrom<String> for Target {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.id().to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identifier_and_label() {
        assert!(matches!("CONTACT_MADE".parse::<Stage>(), Ok(Stage::ContactMade)));
        assert!(matches!("Contact Made".parse::<Stage>(), Ok(Stage::ContactMade)));
        assert!(matches!(
            "Negotiation / Quote".parse::<Stage>(),
            Ok(Stage::Negotiation)
        ));
    }

    #[test]
    fn unknown_stage_is_rejected() {
        let err = "FOO".parse::<Stage>();
        assert!(matches!(err, Err(PipelineError::InvalidStage { ref stage }) if stage == "FOO"));
    }

    #[test]
    fn archived_is_a_target_not_a_stage() {
        assert!("ARCHIVED".parse::<Stage>().is_err());
        assert!(matches!("ARCHIVED".parse::<Target>(), Ok(Target::Archived)));
        assert!(matches!("Archived".parse::<Target>(), Ok(Target::Archived)));
    }

    #[test]
    fn storage_codes_translate_both_ways() {
        for target in Target::ALL {
            let code = target.storage_code();
            assert!(matches!(Target::from_storage_code(code), Ok(t) if t == target));
        }
        assert!(Target::from_storage_code("CONTACT_PENDING").is_err());
    }

    #[test]
    fn ordering_follows_the_funnel() {
        let mut shuffled = vec![Stage::OrderPlaced, Stage::ContactPending, Stage::Negotiation];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Stage::ContactPending, Stage::Negotiation, Stage::OrderPlaced]
        );
        assert_eq!(Stage::ActiveAccount.position(), 4);
    }

    #[test]
    fn board_excludes_active_and_archived() {
        let board: Vec<_> = Target::ALL.into_iter().filter(|t| t.on_board()).collect();
        assert_eq!(board.len(), 4);
        assert!(!Target::Archived.on_board());
        assert!(!Stage::ActiveAccount.on_board());
    }

    #[test]
    fn serde_uses_canonical_identifiers() {
        let json = serde_json::to_string(&Target::Stage(Stage::OrderPlaced)).ok();
        assert_eq!(json.as_deref(), Some("\"ORDER_PLACED\""));

        let back: Option<Target> = serde_json::from_str("\"ARCHIVED\"").ok();
        assert_eq!(back, Some(Target::Archived));

        let bad: std::result::Result<Stage, _> = serde_json::from_str("\"LOST\"");
        assert!(bad.is_err());
    }

    #[test]
    fn target_compares_with_stage() {
        assert!(Target::Stage(Stage::ContactMade) == Stage::ContactMade);
        assert!(Target::Archived != Stage::ContactMade);
        assert_eq!(Target::restore_stage(), Stage::ContactPending);
    }
}
