//! Fuzz target for condition tree evaluation.
//!
//! Goal: evaluation should **never panic**, whatever the tree and facts look like.
//! Type mismatches, unknown operators and missing facts must degrade to `false`.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_condition_eval
//! ```

#![no_main]

use arbitrary::Arbitrary;
use govseal_types::{ConditionNode, FactContext};
use libfuzzer_sys::fuzz_target;

/// Two independent JSON documents: a condition tree and a fact map.
#[derive(Arbitrary, Debug)]
struct EvalInput {
    tree: String,
    facts: String,
}

fuzz_target!(|input: EvalInput| {
    if input.tree.len() > 4096 || input.facts.len() > 4096 {
        return;
    }

    let Ok(tree) = serde_json::from_str::<ConditionNode>(&input.tree) else {
        return;
    };
    let facts: FactContext = serde_json::from_str(&input.facts).unwrap_or_default();

    let evaluation = govseal_domain::evaluate_with_warnings(&tree, &facts);

    // Evaluation is pure: the same inputs give the same answer.
    assert_eq!(evaluation.matched, govseal_domain::evaluate(&tree, &facts));
});
