use crate::scope::{EffectivePolicy, FieldProvenance};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifier for proof bundles.
pub const SCHEMA_PROOF_BUNDLE_V1: &str = "govseal.proof_bundle.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
    ChangesRequested,
}

/// One stage of the approval chain. Chains are kept in chronological order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApprovalRecord {
    pub stage: String,
    pub decision: ApprovalDecision,
    pub decided_by: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub decided_at: OffsetDateTime,
    #[serde(default)]
    pub rationale: String,
}

/// Algorithm names only; never key material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CryptographicSeal {
    pub hash_algorithm: String,
    pub canonicalization: String,
    pub signature_algorithm: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Generation metadata. Not part of the hashed payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationMeta {
    pub snapshot_id: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub generator: ToolMeta,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicySnapshotPayload {
    pub content_hash: String,
    pub policy: EffectivePolicy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BundleData {
    pub policy_snapshot: PolicySnapshotPayload,
    pub approval_chain: Vec<ApprovalRecord>,
    pub cryptographic_seal: CryptographicSeal,
    pub generation: GenerationMeta,
}

/// Sealed artifact binding an effective policy snapshot and its approval chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProofBundle {
    /// Versioned schema identifier for the bundle shape.
    pub schema: String,
    pub proof_hash: String,
    pub proof_signature: String,
    pub bundle_data: BundleData,
}

/// Effective Policy Snapshot (EPS). Immutable; a new version supersedes the prior one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EffectivePolicySnapshot {
    pub id: String,
    pub instance_id: String,
    /// Monotonic per policy instance, starting at 1.
    pub version: u32,
    pub content_hash: String,
    pub proof_hash: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    #[schemars(with = "Option<String>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub activated_at: Option<OffsetDateTime>,
    pub field_provenance: BTreeMap<String, FieldProvenance>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn approval_record_uses_rfc3339() {
        let record = ApprovalRecord {
            stage: "legal".to_string(),
            decision: ApprovalDecision::ChangesRequested,
            decided_by: "user-7".to_string(),
            decided_at: datetime!(2024-03-01 12:00:00 UTC),
            rationale: String::new(),
        };
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["decided_at"], json!("2024-03-01T12:00:00Z"));
        assert_eq!(value["decision"], json!("changes_requested"));
    }
}
