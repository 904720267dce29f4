//! Pure policy governance engine (no IO).
//!
//! Input: rule sets, scope trees, scoped policies, telemetry and approval chains
//! constructed elsewhere.
//! Output: harmonized rules, risk scores, escalations, effective policies and sealed
//! proof bundles.

#![forbid(unsafe_code)]

pub mod canonical;
pub mod condition;
pub mod config;
pub mod error;
pub mod escalation;
pub mod harmonize;
pub mod lifecycle;
pub mod resolve;
pub mod risk;
pub mod scope;
pub mod seal;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use condition::{ConditionWarning, Evaluation, evaluate, evaluate_with_warnings};
pub use config::{EngineConfig, EscalationConfig, RiskConfig};
pub use error::{LifecycleError, ResolveError, SealError};
pub use escalation::escalate_if_needed;
pub use harmonize::{HarmonizeSummary, Harmonized, harmonize};
pub use lifecycle::{
    InstanceStatus, PolicyInstance, ResolvingGenerator, SnapshotGenerator, activate_instance,
    approve_instance, deprecate_instance, submit_for_approval,
};
pub use resolve::{Resolution, resolve_effective_policy};
pub use risk::{RiskAssessment, RiskFilter, assess_risk, score_risk};
pub use scope::{ScopeNode, ScopeTree};
pub use seal::{BundleVerification, content_hash, seal_descriptor, seal_snapshot, verify_bundle};
