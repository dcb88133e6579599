//! # Resolver Module
//!
//! Given a stage, a result code and a checklist, decide where the lead goes.
//!
//! Rules:
//! - Unknown stage → `InvalidStage`
//! - Result code not declared for the stage → `InvalidResult`
//! - Result keeps the lead in place, or archives it → always allowed
//! - Result moves the lead to another stage → the stage checklist must be
//!   complete, otherwise `IncompleteChecklist`
//!
//! Nothing here has side effects. Persisting the outcome is the caller's job.

use crate::error::{PipelineError, Result};
use crate::rules::{RuleTable, StageRule};
use crate::transition::Transition;
use crate::{Checklist, Stage, Target};
use serde::{Deserialize, Serialize};

/// A result the form can offer, with where it leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultOption {
    pub code: String,
    pub label: String,
    pub target: Target,
    pub target_label: String,
}

impl RuleTable {
    // =========================================================================
    // CHECKLIST
    // =========================================================================

    /// Whether every required item of `stage` is ticked.
    ///
    /// Fails closed: an unknown stage is never complete. A stage with no
    /// requirements is always complete.
    #[must_use]
    pub fn is_checklist_complete(&self, stage: &str, checklist: &Checklist) -> bool {
        self.rule_for(stage)
            .map(|(_, rule)| missing_in(rule, checklist).is_empty())
            .unwrap_or(false)
    }

    /// Typed form of [`RuleTable::is_checklist_complete`].
    #[must_use]
    pub fn checklist_complete(&self, stage: Stage, checklist: &Checklist) -> bool {
        self.rule(stage)
            .map(|rule| missing_in(rule, checklist).is_empty())
            .unwrap_or(false)
    }

    /// Required items of `stage` that are not ticked, in rule order.
    pub fn missing_items(&self, stage: &str, checklist: &Checklist) -> Result<Vec<String>> {
        let (_, rule) = self.rule_for(stage)?;
        Ok(missing_in(rule, checklist))
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Compute the next stage for a contact result.
    pub fn resolve_next_stage(
        &self,
        stage: &str,
        result: &str,
        checklist: &Checklist,
    ) -> Result<Target> {
        let parsed: Stage = stage.parse()?;
        self.resolve(parsed, result, checklist)
    }

    /// Typed form of [`RuleTable::resolve_next_stage`].
    pub fn resolve(&self, stage: Stage, result: &str, checklist: &Checklist) -> Result<Target> {
        let rule = self
            .rule(stage)
            .ok_or_else(|| PipelineError::invalid_stage(stage.id()))?;

        let next = rule
            .target_of(result)
            .ok_or_else(|| PipelineError::InvalidResult {
                stage,
                result: result.to_string(),
                valid: rule.result_codes(),
            })?;

        let advancing = next != Target::Stage(stage) && !next.is_archived();
        if advancing {
            let missing = missing_in(rule, checklist);
            if !missing.is_empty() {
                return Err(PipelineError::IncompleteChecklist {
                    stage,
                    required: rule.required_keys().map(str::to_string).collect(),
                    missing,
                });
            }
        }

        Ok(next)
    }

    /// Resolve and package the outcome as a history record.
    pub fn transition(
        &self,
        stage: &str,
        result: &str,
        checklist: &Checklist,
    ) -> Result<Transition> {
        let from: Stage = stage.parse()?;
        let to = self.resolve(from, result, checklist)?;
        Ok(Transition::new(from, result, to, checklist))
    }

    // =========================================================================
    // FORM DATA
    // =========================================================================

    /// Every result valid in `stage`, with its destination.
    pub fn result_options(&self, stage: &str) -> Result<Vec<ResultOption>> {
        let (parsed, rule) = self.rule_for(stage)?;
        Ok(rule
            .results
            .iter()
            .map(|(code, result)| ResultOption {
                code: code.clone(),
                label: self.result_label(parsed, code).to_string(),
                target: result.target,
                target_label: result.target.label().to_string(),
            })
            .collect())
    }

    /// Required checklist items of `stage` as `(key, label)` pairs.
    pub fn checklist_items(&self, stage: &str) -> Result<Vec<(String, String)>> {
        let (_, rule) = self.rule_for(stage)?;
        Ok(rule
            .checklist
            .iter()
            .map(|item| (item.key.clone(), item.display_label().to_string()))
            .collect())
    }
}

fn missing_in(rule: &StageRule, checklist: &Checklist) -> Vec<String> {
    rule.required_keys()
        .filter(|key| !checklist.is_done(key))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
