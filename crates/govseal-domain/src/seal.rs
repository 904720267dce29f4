//! Snapshot sealing and proof bundle verification.
//!
//! `content_hash` covers the canonical effective policy. `proof_hash` covers the policy
//! snapshot, the approval chain and the seal descriptor; generation metadata is carried
//! alongside but never hashed, so regenerating a bundle later yields the same proof hash.

use crate::canonical::{sha256_hex, to_canonical};
use crate::error::SealError;
use govseal_types::{
    ApprovalRecord, BundleData, ConditionValue, CryptographicSeal, EffectivePolicy,
    GenerationMeta, PolicySnapshotPayload, ProofBundle, SCHEMA_PROOF_BUNDLE_V1, ids,
};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Algorithm names recorded in every bundle this crate produces.
pub fn seal_descriptor() -> CryptographicSeal {
    CryptographicSeal {
        hash_algorithm: ids::HASH_ALGORITHM_SHA256.to_string(),
        canonicalization: ids::CANONICALIZATION_JSON_SORTED_V1.to_string(),
        signature_algorithm: ids::SIGNATURE_SHA256_BOUND_V1.to_string(),
    }
}

/// Seal an effective policy and its approval chain into a proof bundle.
///
/// Fails when a condition value is not finite or the approval chain is not chronological.
/// Inputs are never mutated.
pub fn seal_snapshot(
    policy: &EffectivePolicy,
    approval_chain: &[ApprovalRecord],
    generation: GenerationMeta,
) -> Result<ProofBundle, SealError> {
    ensure_finite(policy)?;
    ensure_chronological(approval_chain)?;

    let content_hash = content_hash(policy)?;
    let cryptographic_seal = seal_descriptor();
    let policy_snapshot = PolicySnapshotPayload {
        content_hash: content_hash.clone(),
        policy: policy.clone(),
    };
    let proof_hash = proof_hash(&policy_snapshot, approval_chain, &cryptographic_seal)?;
    let proof_signature = proof_signature(
        &content_hash,
        generation.generated_at,
        &generation.snapshot_id,
    )?;

    tracing::info!(
        target: "govseal::seal",
        snapshot_id = %generation.snapshot_id,
        scope_id = %policy.scope_id,
        approvals = approval_chain.len(),
        content_hash = %content_hash,
        "sealed policy snapshot"
    );

    Ok(ProofBundle {
        schema: SCHEMA_PROOF_BUNDLE_V1.to_string(),
        proof_hash,
        proof_signature,
        bundle_data: BundleData {
            policy_snapshot,
            approval_chain: approval_chain.to_vec(),
            cryptographic_seal,
            generation,
        },
    })
}

pub fn content_hash(policy: &EffectivePolicy) -> Result<String, SealError> {
    let canonical = to_canonical(policy, "effective policy")?;
    Ok(sha256_hex(canonical.as_bytes()))
}

#[derive(Serialize)]
struct ProofPayload<'a> {
    policy_snapshot: &'a PolicySnapshotPayload,
    approval_chain: &'a [ApprovalRecord],
    cryptographic_seal: &'a CryptographicSeal,
}

fn proof_hash(
    policy_snapshot: &PolicySnapshotPayload,
    approval_chain: &[ApprovalRecord],
    cryptographic_seal: &CryptographicSeal,
) -> Result<String, SealError> {
    let payload = ProofPayload {
        policy_snapshot,
        approval_chain,
        cryptographic_seal,
    };
    let canonical = to_canonical(&payload, "proof payload")?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Second hash bound to `{content_hash, generated_at, snapshot_id}`.
fn proof_signature(
    content_hash: &str,
    generated_at: OffsetDateTime,
    snapshot_id: &str,
) -> Result<String, SealError> {
    let ts = generated_at
        .format(&Rfc3339)
        .map_err(|e| SealError::Timestamp(e.to_string()))?;
    Ok(sha256_hex(
        format!("{content_hash}|{ts}|{snapshot_id}").as_bytes(),
    ))
}

/// Effective field values are already JSON and cannot hold NaN; rule condition values can.
fn ensure_finite(policy: &EffectivePolicy) -> Result<(), SealError> {
    for rule in &policy.rules {
        let mut bad: Option<String> = None;
        rule.conditions.for_each_clause(&mut |clause| {
            if bad.is_none() {
                bad = non_finite_path(&clause.value).map(|suffix| {
                    format!(
                        "rules[{}].conditions.{}{}",
                        rule.rule_id, clause.field, suffix
                    )
                });
            }
        });
        if let Some(path) = bad {
            return Err(SealError::NonFiniteNumber { path });
        }
    }
    Ok(())
}

fn non_finite_path(value: &ConditionValue) -> Option<String> {
    match value {
        ConditionValue::Number(n) if !n.is_finite() => Some(String::new()),
        ConditionValue::List(items) => items.iter().enumerate().find_map(|(i, item)| {
            non_finite_path(item).map(|rest| format!("[{i}]{rest}"))
        }),
        _ => None,
    }
}

fn ensure_chronological(chain: &[ApprovalRecord]) -> Result<(), SealError> {
    for (index, pair) in chain.windows(2).enumerate() {
        if pair[1].decided_at < pair[0].decided_at {
            return Err(SealError::ApprovalChainOutOfOrder {
                index: index + 1,
                stage: pair[1].stage.clone(),
            });
        }
    }
    Ok(())
}

/// Outcome of recomputing a bundle's digests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BundleVerification {
    pub schema_valid: bool,
    pub content_hash_valid: bool,
    pub proof_hash_valid: bool,
    pub signature_valid: bool,
    pub mismatches: Vec<String>,
}

impl BundleVerification {
    pub fn is_valid(&self) -> bool {
        self.schema_valid
            && self.content_hash_valid
            && self.proof_hash_valid
            && self.signature_valid
    }
}

/// Recompute every digest in `bundle` from its own contents and compare.
pub fn verify_bundle(bundle: &ProofBundle) -> BundleVerification {
    let data = &bundle.bundle_data;
    let mut out = BundleVerification::default();

    out.schema_valid = bundle.schema == SCHEMA_PROOF_BUNDLE_V1;
    if !out.schema_valid {
        out.mismatches.push(format!(
            "unsupported schema '{}' (expected '{}')",
            bundle.schema, SCHEMA_PROOF_BUNDLE_V1
        ));
    }

    let recorded_content = &data.policy_snapshot.content_hash;
    out.content_hash_valid = check(
        "content_hash",
        content_hash(&data.policy_snapshot.policy),
        recorded_content,
        &mut out.mismatches,
    );
    out.proof_hash_valid = check(
        "proof_hash",
        proof_hash(
            &data.policy_snapshot,
            &data.approval_chain,
            &data.cryptographic_seal,
        ),
        &bundle.proof_hash,
        &mut out.mismatches,
    );
    out.signature_valid = check(
        "proof_signature",
        proof_signature(
            recorded_content,
            data.generation.generated_at,
            &data.generation.snapshot_id,
        ),
        &bundle.proof_signature,
        &mut out.mismatches,
    );

    if !out.is_valid() {
        tracing::warn!(
            target: "govseal::seal",
            snapshot_id = %data.generation.snapshot_id,
            mismatches = out.mismatches.len(),
            "proof bundle failed verification"
        );
    }
    out
}

fn check(
    name: &str,
    recomputed: Result<String, SealError>,
    recorded: &str,
    mismatches: &mut Vec<String>,
) -> bool {
    match recomputed {
        Ok(actual) if actual == recorded => true,
        Ok(actual) => {
            mismatches.push(format!("{name} mismatch: recorded {recorded}, recomputed {actual}"));
            false
        }
        Err(e) => {
            mismatches.push(format!("{name} could not be recomputed: {e}"));
            false
        }
    }
}
