//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Harmonization determinism and conflict bookkeeping
//! - Risk score bounds
//! - Seal determinism for resolved policies

use crate::config::RiskConfig;
use crate::harmonize::harmonize;
use crate::resolve::resolve_effective_policy;
use crate::risk::{RiskFilter, score_risk};
use crate::scope::ScopeTree;
use crate::seal::seal_snapshot;
use crate::test_support::{approvals, atom, rule, sample_policies, sample_tree, tool_is};
use govseal_types::{DecisionStatus, GenerationMeta, Outcome, PolicyRule, ToolMeta};
use proptest::prelude::*;
use time::macros::datetime;

// ============================================================================
// Strategies
// ============================================================================

fn arb_status() -> impl Strategy<Value = DecisionStatus> {
    prop_oneof![
        Just(DecisionStatus::Prohibited),
        Just(DecisionStatus::RequiresReview),
        Just(DecisionStatus::Approved),
    ]
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Pass),
        Just(Outcome::Fail),
        Just(Outcome::Remediated),
    ]
}

/// Tools from a small pool so that cross-set overlaps are common.
fn arb_rule_body() -> impl Strategy<Value = (DecisionStatus, i64, &'static str, bool)> {
    (
        arb_status(),
        -5i64..5,
        prop::sample::select(vec!["DALL-E", "Midjourney", "ChatGPT"]),
        prop::bool::weighted(0.9),
    )
}

/// Rule ids are unique per side (`a0`, `a1`, ... / `b0`, `b1`, ...).
fn arb_rules(prefix: &'static str) -> impl Strategy<Value = Vec<PolicyRule>> {
    prop::collection::vec(arb_rule_body(), 0..8).prop_map(move |bodies| {
        bodies
            .into_iter()
            .enumerate()
            .map(|(i, (status, priority, tool, active))| {
                let mut r = rule(&format!("{prefix}{i}"), status, priority, tool_is(tool));
                r.is_active = active;
                r
            })
            .collect()
    })
}

// ============================================================================
// Harmonization
// ============================================================================

proptest! {
    /// Input order never changes the merged output.
    #[test]
    fn harmonize_is_order_independent(a in arb_rules("a"), b in arb_rules("b")) {
        use rand::SeedableRng;
        use rand::seq::SliceRandom;

        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut a2 = a.clone();
        let mut b2 = b.clone();
        a2.shuffle(&mut rng);
        b2.shuffle(&mut rng);

        prop_assert_eq!(harmonize(&a, &b), harmonize(&a2, &b2));
    }

    /// A conflict's losing rule is always dropped, and survivors never exceed the active inputs.
    #[test]
    fn conflict_losers_are_dropped(a in arb_rules("a"), b in arb_rules("b")) {
        let out = harmonize(&a, &b);
        let active = a.iter().chain(&b).filter(|r| r.is_active).count();
        prop_assert!(out.combined.len() <= active);
        prop_assert_eq!(out.summary.conflict_count as usize, out.conflicts.len());
        for c in &out.conflicts {
            prop_assert!(c.rule_a != c.rule_b);
            prop_assert!(!out.combined.iter().any(|r| r.rule_id == c.rule_b));
        }
        prop_assert!(out.combined.iter().all(|r| r.is_active));
    }

    /// Identical decisions on both sides never produce a conflict.
    #[test]
    fn uniform_status_never_conflicts(status in arb_status(), n in 0usize..6) {
        let side = |prefix: &str| -> Vec<PolicyRule> {
            (0..n)
                .map(|i| rule(&format!("{prefix}{i}"), status, i as i64, tool_is("T")))
                .collect()
        };
        let (a, b) = (side("a"), side("b"));
        prop_assert!(harmonize(&a, &b).conflicts.is_empty());
    }
}

// ============================================================================
// Risk
// ============================================================================

proptest! {
    #[test]
    fn risk_stays_within_bounds(
        outcomes in prop::collection::vec((arb_outcome(), prop::bool::ANY), 0..40),
        ceiling in 0.05f64..=1.0,
        baseline in 0.0f64..=1.0,
    ) {
        let atoms: Vec<_> = outcomes
            .iter()
            .map(|(o, us)| atom("T1", if *us { "US" } else { "EU" }, *o))
            .collect();
        let cfg = RiskConfig { ceiling, baseline, ..RiskConfig::default() };
        let filter = RiskFilter { tool_id: Some("T1".to_string()), region: Some("US".to_string()) };

        for score in [score_risk(&atoms, Some(&filter), &cfg), score_risk(&atoms, None, &cfg)] {
            prop_assert!(score.is_finite());
            prop_assert!(
                (0.0..=ceiling).contains(&score),
                "score {} outside [0, {}]",
                score,
                ceiling
            );
        }
    }
}

// ============================================================================
// Sealing
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The proof hash does not depend on when or under which id a bundle was generated.
    #[test]
    fn proof_hash_ignores_generation_metadata(secs in 0i64..1_000_000, id in "[a-z]{1,8}") {
        let tree = ScopeTree::from_spec(&sample_tree()).expect("tree");
        let policy = resolve_effective_policy("acme-us-brand", &tree, &sample_policies())
            .expect("resolve")
            .policy;
        let meta = |snapshot_id: &str, at| GenerationMeta {
            snapshot_id: snapshot_id.to_string(),
            generated_at: at,
            generator: ToolMeta { name: "govseal".to_string(), version: "test".to_string() },
        };

        let base = datetime!(2024-06-03 08:00:00 UTC);
        let first = seal_snapshot(&policy, &approvals(), meta("fixed", base)).expect("seal");
        let second = seal_snapshot(
            &policy,
            &approvals(),
            meta(&id, base + time::Duration::seconds(secs)),
        )
        .expect("seal");

        prop_assert_eq!(first.proof_hash, second.proof_hash);
        prop_assert_eq!(
            first.bundle_data.policy_snapshot.content_hash,
            second.bundle_data.policy_snapshot.content_hash
        );
    }
}
