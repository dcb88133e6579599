use crate::error::Result;
use crate::rules::{RuleTable, StageRule};
use crate::Stage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk shape of a rule table.
///
/// ```json
/// {
///   "stages": {
///     "CONTACT_PENDING": {
///       "checklist": [{ "key": "attempt_made", "label": "Contact attempt made" }],
///       "results": {
///         "spoke_with_decision_maker": { "target": "CONTACT_MADE" },
///         "invalid_number": { "target": "ARCHIVED" }
///       }
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleTableDocument {
    pub stages: BTreeMap<Stage, StageRule>,
}

impl RuleTable {
    /// Parse and validate a JSON rule table.
    pub fn from_json(input: &str) -> Result<Self> {
        let document: RuleTableDocument = serde_json::from_str(input)?;
        RuleTable::new(document.stages)
    }

    /// Render the table as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
