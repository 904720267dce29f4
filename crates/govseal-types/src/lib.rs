//! Stable DTOs and IDs used across the govseal workspace.
//!
//! This crate is intentionally boring:
//! - data types for rules, condition trees, telemetry and escalations
//! - the scope tree input shape and field provenance
//! - snapshot and proof bundle documents
//! - stable string IDs and codes

#![forbid(unsafe_code)]

pub mod condition;
pub mod ids;
pub mod rule;
pub mod scope;
pub mod snapshot;
pub mod telemetry;

pub use condition::{
    ConditionClause, ConditionGroup, ConditionNode, ConditionOperator, ConditionValue,
    FactContext, GroupOperator,
};
pub use rule::{Conflict, Decision, DecisionStatus, PolicyRule};
pub use scope::{
    EffectivePolicy, FieldProvenance, InheritanceMode, PolicyField, ScopeSpec, ScopeType,
    ScopedPolicy,
};
pub use snapshot::{
    ApprovalDecision, ApprovalRecord, BundleData, CryptographicSeal, EffectivePolicySnapshot,
    GenerationMeta, PolicySnapshotPayload, ProofBundle, SCHEMA_PROOF_BUNDLE_V1, ToolMeta,
};
pub use telemetry::{Escalation, EscalationLevel, Outcome, TelemetryAtom};
