use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Remediated,
}

/// One observed outcome event. Append-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TelemetryAtom {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub ts: OffsetDateTime,
    pub tool_id: String,
    #[serde(default)]
    pub tool_version: String,
    #[serde(default)]
    pub use_case_id: String,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation_id: Option<String>,
    pub region_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum EscalationLevel {
    Reviewer,
    ComplianceLead,
}

/// Derived escalation decision; recomputed on demand, never persisted state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Escalation {
    pub level: EscalationLevel,
    pub reason: String,
}
