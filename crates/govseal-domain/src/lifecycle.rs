//! Policy instance lifecycle: `draft -> in_review -> approved -> active -> deprecated`.
//!
//! Approval and activation seal a snapshot synchronously. A failed seal during approval
//! leaves the instance approved but unsealed (retry with [`approve_instance`]); a failed seal
//! during activation leaves the status untouched.

use crate::error::{LifecycleError, SealError};
use crate::resolve::resolve_effective_policy;
use crate::scope::ScopeTree;
use crate::seal::seal_snapshot;
use govseal_types::{
    ApprovalRecord, EffectivePolicySnapshot, GenerationMeta, ProofBundle, ScopeSpec, ScopedPolicy,
    ToolMeta,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Draft,
    InReview,
    Approved,
    Active,
    Deprecated,
}

impl InstanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceStatus::Draft => "draft",
            InstanceStatus::InReview => "in_review",
            InstanceStatus::Approved => "approved",
            InstanceStatus::Active => "active",
            InstanceStatus::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A policy applied at one scope. Owns its snapshot chain; older versions are never edited.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyInstance {
    pub id: String,
    pub policy_id: String,
    pub scope_id: String,
    pub status: InstanceStatus,
    #[serde(default)]
    pub snapshots: Vec<EffectivePolicySnapshot>,
}

impl PolicyInstance {
    pub fn new(id: &str, policy_id: &str, scope_id: &str) -> Self {
        Self {
            id: id.to_string(),
            policy_id: policy_id.to_string(),
            scope_id: scope_id.to_string(),
            status: InstanceStatus::Draft,
            snapshots: Vec::new(),
        }
    }

    pub fn current_snapshot(&self) -> Option<&EffectivePolicySnapshot> {
        self.snapshots.last()
    }

    /// Approved, but the snapshot generation that should accompany approval never succeeded.
    pub fn is_unsealed(&self) -> bool {
        self.status == InstanceStatus::Approved && self.snapshots.is_empty()
    }

    fn next_version(&self) -> u32 {
        self.current_snapshot().map_or(1, |s| s.version + 1)
    }
}

/// Produces the sealed bundle for an instance at a point in time.
pub trait SnapshotGenerator {
    fn generate(
        &self,
        instance: &PolicyInstance,
        snapshot_id: &str,
        generated_at: OffsetDateTime,
    ) -> Result<ProofBundle, SealError>;
}

/// Resolves the instance's scope against the current tree contents, then seals.
///
/// The tree is only built here, so a malformed tree fails sealing and nothing else.
pub struct ResolvingGenerator<'a> {
    pub scope_tree: &'a ScopeSpec,
    pub policies: &'a [ScopedPolicy],
    pub approval_chain: &'a [ApprovalRecord],
    pub tool: ToolMeta,
}

impl SnapshotGenerator for ResolvingGenerator<'_> {
    fn generate(
        &self,
        instance: &PolicyInstance,
        snapshot_id: &str,
        generated_at: OffsetDateTime,
    ) -> Result<ProofBundle, SealError> {
        let tree = ScopeTree::from_spec(self.scope_tree)?;
        let resolution = resolve_effective_policy(&instance.scope_id, &tree, self.policies)?;
        seal_snapshot(
            &resolution.policy,
            self.approval_chain,
            GenerationMeta {
                snapshot_id: snapshot_id.to_string(),
                generated_at,
                generator: self.tool.clone(),
            },
        )
    }
}

pub fn submit_for_approval(instance: &mut PolicyInstance) -> Result<(), LifecycleError> {
    expect_status(instance, InstanceStatus::Draft, "submit")?;
    transition(instance, InstanceStatus::InReview);
    Ok(())
}

/// `in_review -> approved`, then seal. Also retries sealing for an approved, unsealed instance.
///
/// The approval is recorded even if sealing fails; the error is still returned.
pub fn approve_instance(
    instance: &mut PolicyInstance,
    generator: &dyn SnapshotGenerator,
    now: OffsetDateTime,
) -> Result<ProofBundle, LifecycleError> {
    if !instance.is_unsealed() {
        expect_status(instance, InstanceStatus::InReview, "approve")?;
        transition(instance, InstanceStatus::Approved);
    }
    let (snapshot, bundle) = generate(instance, generator, now)?;
    instance.snapshots.push(snapshot);
    Ok(bundle)
}

/// `approved -> active` with a freshly sealed, activated snapshot version.
///
/// An approved but unsealed instance must have its approval retried first.
pub fn activate_instance(
    instance: &mut PolicyInstance,
    generator: &dyn SnapshotGenerator,
    now: OffsetDateTime,
) -> Result<ProofBundle, LifecycleError> {
    expect_status(instance, InstanceStatus::Approved, "activate")?;
    if instance.is_unsealed() {
        return Err(LifecycleError::Unsealed {
            instance_id: instance.id.clone(),
            action: "activate",
        });
    }
    let (mut snapshot, bundle) = generate(instance, generator, now)?;
    snapshot.activated_at = Some(now);
    instance.snapshots.push(snapshot);
    transition(instance, InstanceStatus::Active);
    Ok(bundle)
}

pub fn deprecate_instance(instance: &mut PolicyInstance) -> Result<(), LifecycleError> {
    expect_status(instance, InstanceStatus::Active, "deprecate")?;
    transition(instance, InstanceStatus::Deprecated);
    Ok(())
}

fn expect_status(
    instance: &PolicyInstance,
    expected: InstanceStatus,
    action: &'static str,
) -> Result<(), LifecycleError> {
    if instance.status == expected {
        Ok(())
    } else {
        Err(LifecycleError::InvalidTransition {
            instance_id: instance.id.clone(),
            from: instance.status,
            action,
        })
    }
}

fn transition(instance: &mut PolicyInstance, to: InstanceStatus) {
    tracing::info!(
        target: "govseal::lifecycle",
        instance_id = %instance.id,
        from = %instance.status,
        to = %to,
        "policy instance transition"
    );
    instance.status = to;
}

fn generate(
    instance: &PolicyInstance,
    generator: &dyn SnapshotGenerator,
    now: OffsetDateTime,
) -> Result<(EffectivePolicySnapshot, ProofBundle), LifecycleError> {
    let version = instance.next_version();
    let snapshot_id = format!("{}:v{}", instance.id, version);

    let bundle = generator
        .generate(instance, &snapshot_id, now)
        .map_err(|source| {
            tracing::error!(
                target: "govseal::lifecycle",
                instance_id = %instance.id,
                status = %instance.status,
                error = %source,
                "snapshot generation failed"
            );
            LifecycleError::SnapshotGeneration {
                instance_id: instance.id.clone(),
                source,
            }
        })?;

    let snapshot = EffectivePolicySnapshot {
        id: snapshot_id,
        instance_id: instance.id.clone(),
        version,
        content_hash: bundle.bundle_data.policy_snapshot.content_hash.clone(),
        proof_hash: bundle.proof_hash.clone(),
        generated_at: now,
        activated_at: None,
        field_provenance: bundle
            .bundle_data
            .policy_snapshot
            .policy
            .field_provenance
            .clone(),
    };
    Ok((snapshot, bundle))
}
