//! JSON input documents accepted by the use cases.

use anyhow::Context;
use govseal_domain::PolicyInstance;
use govseal_types::{
    ApprovalRecord, Conflict, PolicyRule, ScopeSpec, ScopedPolicy, TelemetryAtom,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HarmonizeInput {
    #[serde(default, alias = "rulesA")]
    pub rules_a: Vec<PolicyRule>,
    #[serde(default, alias = "rulesB")]
    pub rules_b: Vec<PolicyRule>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessInput {
    #[serde(default)]
    pub telemetry: Vec<TelemetryAtom>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Conflicts recorded by an earlier harmonization.
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
    /// Rule sets to harmonize before assessing; optional.
    #[serde(default, alias = "rulesA")]
    pub rules_a: Vec<PolicyRule>,
    #[serde(default, alias = "rulesB")]
    pub rules_b: Vec<PolicyRule>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolveInput {
    pub scope_id: String,
    pub scope_tree: ScopeSpec,
    #[serde(default)]
    pub policies: Vec<ScopedPolicy>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SealInput {
    #[serde(flatten)]
    pub source: ResolveInput,
    #[serde(default)]
    pub approval_chain: Vec<ApprovalRecord>,
    pub snapshot_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Submit,
    Approve,
    Activate,
    Deprecate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionInput {
    pub instance: PolicyInstance,
    pub scope_tree: ScopeSpec,
    #[serde(default)]
    pub policies: Vec<ScopedPolicy>,
    #[serde(default)]
    pub approval_chain: Vec<ApprovalRecord>,
}

pub(crate) fn parse_input<T: DeserializeOwned>(text: &str, what: &str) -> anyhow::Result<T> {
    serde_json::from_str(text).with_context(|| format!("parse {what} input"))
}
