use crate::condition::ConditionNode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome a rule assigns to a matching context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DecisionStatus {
    Prohibited,
    RequiresReview,
    Approved,
}

impl DecisionStatus {
    /// Strictness rank; higher is stricter.
    pub fn strictness(self) -> u8 {
        match self {
            DecisionStatus::Prohibited => 2,
            DecisionStatus::RequiresReview => 1,
            DecisionStatus::Approved => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DecisionStatus::Prohibited => "Prohibited",
            DecisionStatus::RequiresReview => "RequiresReview",
            DecisionStatus::Approved => "Approved",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    pub status: DecisionStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub audit_trigger: bool,
}

/// One authored policy rule. Rules are immutable; a change is a new rule version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyRule {
    /// Unique within the authoring scope.
    pub rule_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Lower is more authoritative on ties.
    #[serde(default)]
    pub priority: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Scope or context the rule was written for.
    #[serde(default)]
    pub context_id: String,
    #[serde(default)]
    pub conditions: ConditionNode,
    pub decision: Decision,
}

fn default_active() -> bool {
    true
}

/// A recorded override between two overlapping rules with different outcomes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Conflict {
    /// Winning rule id.
    #[serde(alias = "ruleA")]
    pub rule_a: String,
    /// Overridden rule id.
    #[serde(alias = "ruleB")]
    pub rule_b: String,
    pub field: String,
    pub detail: String,
}
