//! Rule harmonization: merge two rule sets, one winner per overlapping pair.

use crate::condition::clause_set;
use govseal_types::{Conflict, PolicyRule, ids};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HarmonizeSummary {
    pub total_rules_a: u32,
    pub total_rules_b: u32,
    pub combined_count: u32,
    pub conflict_count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Harmonized {
    pub combined: Vec<PolicyRule>,
    pub conflicts: Vec<Conflict>,
    pub summary: HarmonizeSummary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Merge `rules_a` and `rules_b`.
///
/// For every cross-set pair whose clause sets are equal, the stricter decision wins; equal
/// decisions fall back to the lower `priority`, then the lower `rule_id`, then set A. Only a
/// strictness difference is recorded as a [`Conflict`]. Inactive rules are ignored.
pub fn harmonize(rules_a: &[PolicyRule], rules_b: &[PolicyRule]) -> Harmonized {
    let keyed_a = keyed_active(rules_a);
    let keyed_b = keyed_active(rules_b);

    let mut lost_a = vec![false; keyed_a.len()];
    let mut lost_b = vec![false; keyed_b.len()];
    let mut conflicts = Vec::new();

    for (i, (a, key_a)) in keyed_a.iter().enumerate() {
        for (j, (b, key_b)) in keyed_b.iter().enumerate() {
            if key_a != key_b {
                continue;
            }

            let (winner, loser) = match pick_winner(a, b) {
                Side::A => {
                    lost_b[j] = true;
                    (*a, *b)
                }
                Side::B => {
                    lost_a[i] = true;
                    (*b, *a)
                }
            };

            if winner.decision.status != loser.decision.status {
                conflicts.push(Conflict {
                    rule_a: winner.rule_id.clone(),
                    rule_b: loser.rule_id.clone(),
                    field: ids::CONFLICT_FIELD_DECISION.to_string(),
                    detail: format!(
                        "{} overridden by {} (rule '{}' supersedes '{}')",
                        loser.decision.status,
                        winner.decision.status,
                        winner.rule_id,
                        loser.rule_id
                    ),
                });
            }
        }
    }

    let mut combined: Vec<PolicyRule> = keyed_a
        .iter()
        .zip(&lost_a)
        .chain(keyed_b.iter().zip(&lost_b))
        .filter(|(_, lost)| !**lost)
        .map(|((rule, _), _)| (*rule).clone())
        .collect();

    // Deterministic ordering regardless of input order.
    combined.sort_by(compare_rules);
    conflicts.sort_by(|x, y| {
        x.rule_a
            .cmp(&y.rule_a)
            .then(x.rule_b.cmp(&y.rule_b))
            .then(x.detail.cmp(&y.detail))
    });

    let summary = HarmonizeSummary {
        total_rules_a: rules_a.len() as u32,
        total_rules_b: rules_b.len() as u32,
        combined_count: combined.len() as u32,
        conflict_count: conflicts.len() as u32,
    };

    tracing::debug!(
        target: "govseal::harmonize",
        rules_a = summary.total_rules_a,
        rules_b = summary.total_rules_b,
        combined = summary.combined_count,
        conflicts = summary.conflict_count,
        "harmonized rule sets"
    );

    Harmonized {
        combined,
        conflicts,
        summary,
    }
}

fn keyed_active(rules: &[PolicyRule]) -> Vec<(&PolicyRule, BTreeSet<String>)> {
    rules
        .iter()
        .filter(|r| r.is_active)
        .map(|r| (r, clause_set(&r.conditions)))
        .collect()
}

fn pick_winner(a: &PolicyRule, b: &PolicyRule) -> Side {
    let ordering = b
        .decision
        .status
        .strictness()
        .cmp(&a.decision.status.strictness())
        .then(a.priority.cmp(&b.priority))
        .then(a.rule_id.cmp(&b.rule_id));
    match ordering {
        Ordering::Greater => Side::B,
        Ordering::Less | Ordering::Equal => Side::A,
    }
}

pub(crate) fn compare_rules(a: &PolicyRule, b: &PolicyRule) -> Ordering {
    a.rule_id
        .cmp(&b.rule_id)
        .then(a.context_id.cmp(&b.context_id))
        .then(a.priority.cmp(&b.priority))
}
