//! The `resolve`, `seal`, `verify`, and `transition` use cases.

use crate::inputs::{LifecycleAction, ResolveInput, SealInput, TransitionInput, parse_input};
use anyhow::Context;
use govseal_domain::{
    BundleVerification, PolicyInstance, ResolvingGenerator, ScopeTree, activate_instance,
    approve_instance, deprecate_instance, resolve_effective_policy, seal_snapshot,
    submit_for_approval, verify_bundle,
};
use govseal_types::{Conflict, EffectivePolicy, GenerationMeta, ProofBundle, ToolMeta};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolveOutput {
    pub policy: EffectivePolicy,
    pub conflicts: Vec<Conflict>,
}

pub fn run_resolve(input_json: &str) -> anyhow::Result<ResolveOutput> {
    let input: ResolveInput = parse_input(input_json, "resolve")?;
    resolve(&input)
}

fn resolve(input: &ResolveInput) -> anyhow::Result<ResolveOutput> {
    let tree = ScopeTree::from_spec(&input.scope_tree).context("build scope tree")?;
    let resolution = resolve_effective_policy(&input.scope_id, &tree, &input.policies)
        .with_context(|| format!("resolve effective policy for {}", input.scope_id))?;
    Ok(ResolveOutput {
        policy: resolution.policy,
        conflicts: resolution.conflicts,
    })
}

/// Resolve the requested scope, then seal it with the supplied approval chain.
pub fn run_seal(input_json: &str, generated_at: OffsetDateTime) -> anyhow::Result<ProofBundle> {
    let input: SealInput = parse_input(input_json, "seal")?;
    let resolved = resolve(&input.source)?;

    let generation = GenerationMeta {
        snapshot_id: input.snapshot_id.clone(),
        generated_at,
        generator: tool_meta(),
    };
    seal_snapshot(&resolved.policy, &input.approval_chain, generation)
        .with_context(|| format!("seal snapshot {}", input.snapshot_id))
}

pub fn run_verify(bundle_json: &str) -> anyhow::Result<BundleVerification> {
    let bundle: ProofBundle =
        serde_json::from_str(bundle_json).context("parse proof bundle")?;
    Ok(verify_bundle(&bundle))
}

/// Map verification to exit code: 0 = valid, 2 = mismatch.
pub fn verification_exit_code(verification: &BundleVerification) -> i32 {
    if verification.is_valid() { 0 } else { 2 }
}

/// The instance after a lifecycle action, with the sealed bundle when one was produced.
///
/// `error` is set when the action failed; `instance` still reflects what was recorded
/// (an approval whose seal failed stays approved and unsealed).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransitionOutput {
    pub instance: PolicyInstance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<ProofBundle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn run_transition(
    input_json: &str,
    action: LifecycleAction,
    now: OffsetDateTime,
) -> anyhow::Result<TransitionOutput> {
    let input: TransitionInput = parse_input(input_json, "transition")?;
    let generator = ResolvingGenerator {
        scope_tree: &input.scope_tree,
        policies: &input.policies,
        approval_chain: &input.approval_chain,
        tool: tool_meta(),
    };

    let mut instance = input.instance.clone();
    let result = match action {
        LifecycleAction::Submit => submit_for_approval(&mut instance).map(|()| None),
        LifecycleAction::Approve => approve_instance(&mut instance, &generator, now).map(Some),
        LifecycleAction::Activate => activate_instance(&mut instance, &generator, now).map(Some),
        LifecycleAction::Deprecate => deprecate_instance(&mut instance).map(|()| None),
    };

    Ok(match result {
        Ok(bundle) => TransitionOutput {
            instance,
            bundle,
            error: None,
        },
        Err(e) => TransitionOutput {
            instance,
            bundle: None,
            error: Some(e.to_string()),
        },
    })
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "govseal".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govseal_domain::InstanceStatus;
    use serde_json::{Value, json};
    use time::macros::datetime;

    fn tree() -> Value {
        json!({
            "id": "acme", "scope_type": "enterprise", "scope_path": "acme",
            "children": [
                {"id": "acme-us", "scope_type": "country", "scope_path": "acme.us"}
            ]
        })
    }

    fn policies() -> Value {
        json!([
            {
                "policy_id": "p-ent",
                "scope_id": "acme",
                "fields": {"retention_days": {"mode": "override", "value": 365}}
            },
            {
                "policy_id": "p-us",
                "scope_id": "acme-us",
                "fields": {"retention_days": {"mode": "override", "value": 90}}
            }
        ])
    }

    fn approvals() -> Value {
        json!([
            {"stage": "legal", "decision": "approved", "decided_by": "u1",
             "decided_at": "2024-06-01T10:00:00Z"}
        ])
    }

    fn seal_input() -> String {
        json!({
            "scope_id": "acme-us",
            "scope_tree": tree(),
            "policies": policies(),
            "approval_chain": approvals(),
            "snapshot_id": "inst-1:v1"
        })
        .to_string()
    }

    #[test]
    fn resolve_reports_provenance() {
        let input = json!({"scope_id": "acme-us", "scope_tree": tree(), "policies": policies()});
        let out = run_resolve(&input.to_string()).expect("resolve");
        assert_eq!(out.policy.fields["retention_days"], json!(90));
        assert_eq!(
            out.policy.field_provenance["retention_days"].source_scope_path,
            "acme.us"
        );
    }

    #[test]
    fn resolve_missing_scope_has_context() {
        let input = json!({"scope_id": "nope", "scope_tree": tree(), "policies": []});
        let err = run_resolve(&input.to_string()).expect_err("missing");
        let msg = format!("{err:#}");
        assert!(msg.contains("resolve effective policy for nope"));
        assert!(msg.contains("scope not found: nope"));
    }

    #[test]
    fn seal_then_verify_round_trips_through_json() {
        let at = datetime!(2024-06-03 08:00:00 UTC);
        let bundle = run_seal(&seal_input(), at).expect("seal");
        assert_eq!(bundle, run_seal(&seal_input(), at).expect("reseal"));

        let text = serde_json::to_string(&bundle).expect("serialize");
        let verification = run_verify(&text).expect("verify");
        assert!(verification.is_valid());
        assert_eq!(verification_exit_code(&verification), 0);

        let mut tampered: Value = serde_json::from_str(&text).expect("parse");
        tampered["bundle_data"]["approval_chain"][0]["rationale"] = json!("edited");
        let verification = run_verify(&tampered.to_string()).expect("verify");
        assert!(!verification.proof_hash_valid);
        assert_eq!(verification_exit_code(&verification), 2);
    }

    fn transition_input(status: &str) -> String {
        transition_input_with_tree(status, tree())
    }

    fn transition_input_with_tree(status: &str, scope_tree: Value) -> String {
        json!({
            "instance": {
                "id": "inst-1",
                "policy_id": "p-us",
                "scope_id": "acme-us",
                "status": status
            },
            "scope_tree": scope_tree,
            "policies": policies(),
            "approval_chain": approvals()
        })
        .to_string()
    }

    fn duplicate_id_tree() -> Value {
        let mut scope_tree = tree();
        scope_tree["children"][0]["id"] = json!("acme");
        scope_tree
    }

    #[test]
    fn approve_seals_first_version() {
        let out = run_transition(
            &transition_input("in_review"),
            LifecycleAction::Approve,
            datetime!(2024-06-03 08:00:00 UTC),
        )
        .expect("transition");
        assert_eq!(out.error, None);
        assert_eq!(out.instance.status, InstanceStatus::Approved);
        assert_eq!(out.instance.snapshots.len(), 1);
        assert_eq!(
            out.bundle.expect("bundle").bundle_data.generation.snapshot_id,
            "inst-1:v1"
        );
    }

    #[test]
    fn invalid_transition_is_reported_not_raised() {
        let out = run_transition(
            &transition_input("draft"),
            LifecycleAction::Activate,
            datetime!(2024-06-03 08:00:00 UTC),
        )
        .expect("transition");
        assert_eq!(out.instance.status, InstanceStatus::Draft);
        assert_eq!(
            out.error.as_deref(),
            Some("cannot activate instance inst-1 while it is draft")
        );
    }
    #[test]
    fn approve_with_invalid_tree_records_unsealed_approval() {
        let out = run_transition(
            &transition_input_with_tree("in_review", duplicate_id_tree()),
            LifecycleAction::Approve,
            datetime!(2024-06-03 08:00:00 UTC),
        )
        .expect("transition");
        assert_eq!(out.instance.status, InstanceStatus::Approved);
        assert!(out.instance.is_unsealed());
        assert_eq!(out.bundle, None);
        let error = out.error.expect("seal error");
        assert!(error.contains("duplicate scope id 'acme'"), "{error}");
    }

    #[test]
    fn submit_and_deprecate_ignore_the_scope_tree() {
        let at = datetime!(2024-06-03 08:00:00 UTC);
        let submitted = run_transition(
            &transition_input_with_tree("draft", duplicate_id_tree()),
            LifecycleAction::Submit,
            at,
        )
        .expect("submit");
        assert_eq!(submitted.error, None);
        assert_eq!(submitted.instance.status, InstanceStatus::InReview);

        let deprecated = run_transition(
            &transition_input_with_tree("active", duplicate_id_tree()),
            LifecycleAction::Deprecate,
            at,
        )
        .expect("deprecate");
        assert_eq!(deprecated.error, None);
        assert_eq!(deprecated.instance.status, InstanceStatus::Deprecated);
    }
}
