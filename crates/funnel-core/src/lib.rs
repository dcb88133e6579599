//! # Funnel Core
//!
//! The deterministic transition resolver of the sales funnel.
//!
//! A lead sits in one [`Stage`]. Each contact with it ends in a result code,
//! and the [`RuleTable`] says where that result takes the lead: the same
//! stage, a later one, or the archive. Moving forward is only allowed once
//! the stage's checklist is complete.
//!
//! ```
//! use funnel_core::{resolve_next_stage, Checklist, Stage, Target};
//!
//! let checklist = Checklist::from_items(["attempt_made", "channel_validated", "result_logged"]);
//! let next = resolve_next_stage("Contact Pending", "spoke_with_decision_maker", &checklist);
//! assert!(matches!(next, Ok(Target::Stage(Stage::ContactMade))));
//! ```
//!
//! The crate holds no state and does no I/O. Persisting leads, checking
//! permissions and rendering the board belong to the calling application.

mod checklist;
mod error;
mod resolver;
mod stage;
mod transition;

pub mod formats;
pub mod policy;
pub mod rules;

pub use checklist::Checklist;
pub use error::{PipelineError, Result};
pub use formats::RuleTableDocument;
pub use policy::{CallbackLimit, allowed_moves, check_manual_move};
pub use resolver::ResultOption;
pub use rules::{ChecklistItem, ResultRule, RuleTable, StageRule};
pub use stage::{ARCHIVED_ID, Stage, Target};
pub use transition::Transition;

/// Whether every required item of `stage` is ticked, per the standard table.
///
/// Unknown stages are never complete.
#[must_use]
pub fn is_checklist_complete(stage: &str, checklist: &Checklist) -> bool {
    RuleTable::standard().is_checklist_complete(stage, checklist)
}

/// Next stage for a contact result, per the standard table.
pub fn resolve_next_stage(stage: &str, result: &str, checklist: &Checklist) -> Result<Target> {
    RuleTable::standard().resolve_next_stage(stage, result, checklist)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_functions_use_standard_table() {
        let checklist = Checklist::from_items(["attempt_made", "channel_validated", "result_logged"]);
        assert!(is_checklist_complete("CONTACT_PENDING", &checklist));
        assert!(matches!(
            resolve_next_stage("CONTACT_PENDING", "spoke_with_decision_maker", &checklist),
            Ok(Target::Stage(Stage::ContactMade))
        ));
    }

    #[test]
    fn unknown_stage_via_free_functions() {
        assert!(!is_checklist_complete("FOO", &Checklist::new()));
        assert!(matches!(
            resolve_next_stage("FOO", "anything", &Checklist::new()),
            Err(PipelineError::InvalidStage { .. })
        ));
    }

    #[test]
    fn resolver_is_shareable_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    resolve_next_stage("NEGOTIATION", "declined", &Checklist::new()).ok()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().ok().flatten(), Some(Target::Archived));
        }
    }
}
