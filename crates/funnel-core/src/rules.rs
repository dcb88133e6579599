//! # Rules Module
//!
//! The immutable rule table behind the resolver.
//!
//! For each stage the table declares:
//! - the checklist items that must be ticked before the lead may advance
//! - the result codes valid in that stage, and where each one leads
//!
//! The standard table is compiled in and built once. Custom tables can be
//! loaded from JSON (see [`crate::formats`]) and go through the same
//! validation as [`RuleTable::new`].

use crate::error::{PipelineError, Result};
use crate::{Stage, Target};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

// =============================================================================
// RULE ENTRIES
// =============================================================================

/// A checklist requirement of a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecklistItem {
    /// Identifier submitted by the form.
    pub key: String,
    /// Text shown next to the checkbox. Falls back to `key` when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
}

impl ChecklistItem {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    #[must_use]
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

/// Where a result code leads, and how it reads in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultRule {
    pub target: Target,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
}

impl ResultRule {
    #[must_use]
    pub fn new(target: impl Into<Target>, label: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            label: label.into(),
        }
    }
}

/// Rules for one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageRule {
    /// Required checklist items, in display order.
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    /// Result code → destination.
    #[serde(default)]
    pub results: BTreeMap<String, ResultRule>,
}

impl StageRule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required checklist item.
    #[must_use]
    pub fn require(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.checklist.push(ChecklistItem::new(key, label));
        self
    }

    /// Declare a result code and its destination.
    #[must_use]
    pub fn result(
        mut self,
        code: impl Into<String>,
        target: impl Into<Target>,
        label: impl Into<String>,
    ) -> Self {
        self.results
            .insert(code.into(), ResultRule::new(target, label));
        self
    }

    /// Required item identifiers, in display order.
    pub fn required_keys(&self) -> impl Iterator<Item = &str> {
        self.checklist.iter().map(|item| item.key.as_str())
    }

    /// Valid result codes, sorted.
    #[must_use]
    pub fn result_codes(&self) -> Vec<String> {
        self.results.keys().cloned().collect()
    }

    /// Destination of a result code, if the code is valid here.
    #[must_use]
    pub fn target_of(&self, code: &str) -> Option<Target> {
        self.results.get(code).map(|rule| rule.target)
    }

    /// A stage with no results can only be left by manual reactivation.
    #[must_use]
    pub fn is_dead_end(&self) -> bool {
        self.results.is_empty()
    }
}

// =============================================================================
// RULE TABLE
// =============================================================================

/// Stage → rules. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTable {
    stages: BTreeMap<Stage, StageRule>,
}

static STANDARD: OnceLock<RuleTable> = OnceLock::new();

impl RuleTable {
    /// Build a table after validating it.
    ///
    /// Targets are typed, so they are known stages or the archive already.
    /// This checks what the types cannot:
    /// - the table defines at least one stage
    /// - checklist keys are non-empty and unique within a stage
    /// - result codes are non-empty
    pub fn new(stages: BTreeMap<Stage, StageRule>) -> Result<Self> {
        if stages.is_empty() {
            return Err(PipelineError::invalid_rule_table("no stages defined"));
        }

        for (stage, rule) in &stages {
            let mut seen = BTreeSet::new();
            for item in &rule.checklist {
                if item.key.trim().is_empty() {
                    return Err(PipelineError::invalid_rule_table(format!(
                        "{stage}: checklist item with an empty key"
                    )));
                }
                if !seen.insert(item.key.as_str()) {
                    return Err(PipelineError::invalid_rule_table(format!(
                        "{stage}: checklist item '{}' listed twice",
                        item.key
                    )));
                }
            }

            if rule.results.keys().any(|code| code.trim().is_empty()) {
                return Err(PipelineError::invalid_rule_table(format!(
                    "{stage}: result with an empty code"
                )));
            }
        }

        Ok(Self { stages })
    }

    /// The compiled-in sales funnel, built on first use.
    pub fn standard() -> &'static RuleTable {
        STANDARD.get_or_init(standard_table)
    }

    /// Rules of a stage, if the table defines it.
    #[must_use]
    pub fn rule(&self, stage: Stage) -> Option<&StageRule> {
        self.stages.get(&stage)
    }

    /// Parse a stage identifier and look up its rules.
    ///
    /// Fails with `InvalidStage` both for unparseable identifiers and for
    /// stages this table does not define. The latter report the canonical
    /// identifier, whatever form the caller used.
    pub fn rule_for(&self, stage: &str) -> Result<(Stage, &StageRule)> {
        let parsed: Stage = stage.parse()?;
        self.rule(parsed)
            .map(|rule| (parsed, rule))
            .ok_or_else(|| PipelineError::invalid_stage(parsed.id()))
    }

    /// All stages with their rules, in funnel order.
    pub fn stages(&self) -> impl Iterator<Item = (Stage, &StageRule)> {
        self.stages.iter().map(|(stage, rule)| (*stage, rule))
    }

    #[must_use]
    pub fn contains(&self, stage: Stage) -> bool {
        self.stages.contains_key(&stage)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Label for a result code in a stage, falling back to the code itself.
    #[must_use]
    pub fn result_label<'a>(&'a self, stage: Stage, code: &'a str) -> &'a str {
        self.rule(stage)
            .and_then(|rule| rule.results.get(code))
            .map(|rule| rule.label.as_str())
            .filter(|label| !label.is_empty())
            .unwrap_or(code)
    }
}

// =============================================================================
// STANDARD TABLE
// =============================================================================

fn standard_table() -> RuleTable {
    use Stage::*;

    let stages = BTreeMap::from([
        (
            ContactPending,
            StageRule::new()
                .require("attempt_made", "Contact attempt made")
                .require("channel_validated", "Channel validated (phone/WhatsApp)")
                .require("result_logged", "Contact result logged")
                .result(
                    "spoke_with_decision_maker",
                    ContactMade,
                    "Spoke with decision maker (owner or purchasing)",
                )
                .result(
                    "decision_maker_unavailable",
                    ContactPending,
                    "Decision maker unavailable, callback requested",
                )
                .result("no_answer", Target::Archived, "No answer after several attempts")
                .result("invalid_number", Target::Archived, "Invalid number"),
        ),
        (
            ContactMade,
            StageRule::new()
                .require("pain_identified", "Pain/need identified")
                .require("interest_confirmed", "Interest confirmed")
                .require("product_identified", "Product/service identified")
                .result("interested", Negotiation, "Interested")
                .result("evaluating", ContactMade, "Evaluating")
                .result("not_interested", Target::Archived, "Not interested")
                .result("not_a_fit", Target::Archived, "Not a fit"),
        ),
        (
            Negotiation,
            StageRule::new()
                .require("proposal_sent", "Proposal/quote sent")
                .require("price_presented", "Price presented")
                .require("lead_time_given", "Delivery lead time given")
                .result("negotiating", Negotiation, "Negotiating")
                .result("awaiting_reply", Negotiation, "Awaiting reply")
                .result("declined", Target::Archived, "Declined")
                .result("accepted", OrderPlaced, "Accepted proposal"),
        ),
        (
            OrderPlaced,
            StageRule::new()
                .require("order_confirmed", "Order confirmed")
                .require("customer_data_complete", "Customer data complete")
                .require("payment_method_defined", "Payment method defined")
                .result("fulfilled", ActiveAccount, "Fulfilled"),
        ),
        (ActiveAccount, StageRule::new()),
    ]);

    RuleTable { stages }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_every_stage() {
        let table = RuleTable::standard();
        assert_eq!(table.len(), Stage::ALL.len());
        for stage in Stage::ALL {
            assert!(table.contains(stage), "missing {stage}");
        }
    }

    #[test]
    fn standard_table_passes_validation() {
        let table = RuleTable::standard();
        let rebuilt = RuleTable::new(table.stages.clone());
        assert!(matches!(rebuilt, Ok(ref t) if t == table));
    }

    #[test]
    fn active_account_is_a_dead_end() {
        let rule = RuleTable::standard().rule(Stage::ActiveAccount);
        assert!(rule.map(StageRule::is_dead_end).unwrap_or(false));
        assert!(rule.map(|r| r.checklist.is_empty()).unwrap_or(false));
    }

    #[test]
    fn every_other_stage_can_reach_the_archive_or_advance() {
        let table = RuleTable::standard();
        for (stage, rule) in table.stages() {
            if stage == Stage::ActiveAccount {
                continue;
            }
            let leaves = rule
                .results
                .values()
                .any(|r| r.target != Target::Stage(stage));
            assert!(leaves, "{stage} has no way out");
        }
    }

    #[test]
    fn rule_for_rejects_unknown_and_undefined_stages() {
        let table = RuleTable::standard();
        assert!(matches!(
            table.rule_for("FOO"),
            Err(PipelineError::InvalidStage { .. })
        ));

        let partial = RuleTable::new(BTreeMap::from([(Stage::ContactPending, StageRule::new())]));
        let partial = partial.ok();
        let lookup = partial.as_ref().map(|t| t.rule_for("NEGOTIATION").is_err());
        assert_eq!(lookup, Some(true));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(
            RuleTable::new(BTreeMap::new()),
            Err(PipelineError::InvalidRuleTable { .. })
        ));
    }

    #[test]
    fn duplicate_checklist_item_is_rejected() {
        let rule = StageRule::new().require("a", "A").require("a", "again");
        let result = RuleTable::new(BTreeMap::from([(Stage::ContactPending, rule)]));
        assert!(
            matches!(result, Err(PipelineError::InvalidRuleTable { ref reason }) if reason.contains("'a' listed twice"))
        );
    }

    #[test]
    fn blank_keys_are_rejected() {
        let blank_item = StageRule::new().require("  ", "blank");
        assert!(RuleTable::new(BTreeMap::from([(Stage::ContactMade, blank_item)])).is_err());

        let blank_code = StageRule::new().result("", Target::Archived, "blank");
        assert!(RuleTable::new(BTreeMap::from([(Stage::ContactMade, blank_code)])).is_err());
    }

    #[test]
    fn result_label_falls_back_to_code() {
        let table = RuleTable::standard();
        assert_eq!(
            table.result_label(Stage::ContactPending, "invalid_number"),
            "Invalid number"
        );
        assert_eq!(table.result_label(Stage::ContactPending, "unknown"), "unknown");
    }

    #[test]
    fn checklist_item_label_fallback() {
        assert_eq!(ChecklistItem::new("k", "").display_label(), "k");
        assert_eq!(ChecklistItem::new("k", "Key").display_label(), "Key");
    }
}
