use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `govseal.toml` schema v1.
///
/// This is a *user-facing* config model: every key is optional so a preset fills the gaps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GovsealConfigV1 {
    /// Optional schema string for tooling (`govseal.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Preset profile: `standard` (default), `strict`, or `relaxed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(default)]
    pub escalation: EscalationSection,

    #[serde(default)]
    pub risk: RiskSection,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EscalationSection {
    /// Risk at or above this escalates to a reviewer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_threshold: Option<f64>,

    /// Risk at or above this escalates to the compliance lead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_threshold: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RiskSection {
    /// Upper clamp applied to every risk score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<f64>,

    /// Score used when no telemetry matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
}
