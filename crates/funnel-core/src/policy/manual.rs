//! Manual moves between board columns.
//!
//! Dragging a card does not consult result codes or checklists. It is only
//! allowed along a fixed adjacency, and the restore path out of the archive
//! always lands in [`Target::restore_stage`].

use crate::error::{PipelineError, Result};
use crate::{Stage, Target};

const CONTACT_PENDING: Target = Target::Stage(Stage::ContactPending);
const CONTACT_MADE: Target = Target::Stage(Stage::ContactMade);
const NEGOTIATION: Target = Target::Stage(Stage::Negotiation);
const ORDER_PLACED: Target = Target::Stage(Stage::OrderPlaced);
const ACTIVE_ACCOUNT: Target = Target::Stage(Stage::ActiveAccount);

/// Targets a card may be dragged to from `from`.
#[must_use]
pub fn allowed_moves(from: Target) -> &'static [Target] {
    match from {
        Target::Stage(Stage::ContactPending) => &[CONTACT_MADE, Target::Archived],
        Target::Stage(Stage::ContactMade) => &[NEGOTIATION, CONTACT_PENDING, Target::Archived],
        Target::Stage(Stage::Negotiation) => &[ORDER_PLACED, CONTACT_MADE, Target::Archived],
        Target::Stage(Stage::OrderPlaced) => &[ACTIVE_ACCOUNT],
        Target::Stage(Stage::ActiveAccount) => &[NEGOTIATION, CONTACT_PENDING, Target::Archived],
        Target::Archived => &[CONTACT_PENDING],
    }
}

/// Check a manual move.
///
/// Fails with `SameStage` when nothing would change, and `MoveNotAllowed`
/// when `to` is not adjacent to `from`.
pub fn check_manual_move(from: Target, to: Target) -> Result<()> {
    if from == to {
        return Err(PipelineError::SameStage { stage: from });
    }
    if !allowed_moves(from).contains(&to) {
        return Err(PipelineError::MoveNotAllowed { from, to });
    }
    Ok(())
}
