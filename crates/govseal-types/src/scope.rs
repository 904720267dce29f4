use crate::rule::PolicyRule;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    Enterprise,
    Region,
    Country,
    Brand,
}

impl ScopeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeType::Enterprise => "enterprise",
            ScopeType::Region => "region",
            ScopeType::Country => "country",
            ScopeType::Brand => "brand",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nested scope tree as supplied by callers (`enterprise -> region -> country -> brand`).
///
/// Each node owns its children; there are no back-references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScopeSpec {
    pub id: String,
    pub scope_type: ScopeType,
    #[serde(default)]
    pub name: String,
    /// Dot-delimited ancestry, e.g. `acme.na.us`.
    pub scope_path: String,
    #[serde(default)]
    pub children: Vec<ScopeSpec>,
}

/// How a descendant scope may relate to an ancestor's value for a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum InheritanceMode {
    Override,
    Merge,
    InheritOnly,
}

impl InheritanceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InheritanceMode::Override => "override",
            InheritanceMode::Merge => "merge",
            InheritanceMode::InheritOnly => "inherit-only",
        }
    }
}

impl fmt::Display for InheritanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field declaration inside a scoped policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyField {
    pub mode: InheritanceMode,
    pub value: JsonValue,
}

/// A policy attached to one scope of the tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScopedPolicy {
    pub policy_id: String,
    pub scope_id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, PolicyField>,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

/// Where an effective value came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldProvenance {
    pub source_scope_path: String,
    pub source_scope_type: ScopeType,
    pub inheritance_mode: InheritanceMode,
    /// Descendant declarations that were ignored (`inherit-only`); advisory only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisory_scopes: Vec<String>,
}

/// Flattened policy for one scope: effective field values, rules, and per-field provenance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EffectivePolicy {
    pub scope_id: String,
    pub scope_path: String,
    #[serde(default)]
    pub fields: BTreeMap<String, JsonValue>,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
    #[serde(default)]
    pub field_provenance: BTreeMap<String, FieldProvenance>,
}
