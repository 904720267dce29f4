//! Condition tree evaluation against a fact context.
//!
//! Evaluation fails closed: a leaf that cannot be evaluated (unknown operator, missing fact,
//! incompatible types) is `false` and yields a [`ConditionWarning`] instead of an error.

use govseal_types::{
    ConditionClause, ConditionNode, ConditionOperator, ConditionValue, FactContext,
    GroupOperator, ids,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A clause that could not be evaluated and was treated as `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionWarning {
    pub code: &'static str,
    pub field: String,
    pub detail: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub matched: bool,
    pub warnings: Vec<ConditionWarning>,
}

/// Evaluate a condition tree, logging any warnings.
pub fn evaluate(tree: &ConditionNode, facts: &FactContext) -> bool {
    let evaluation = evaluate_with_warnings(tree, facts);
    for w in &evaluation.warnings {
        tracing::warn!(
            target: "govseal::condition",
            code = w.code,
            field = %w.field,
            "{}",
            w.detail
        );
    }
    evaluation.matched
}

/// Evaluate a condition tree and return the collected warnings alongside the result.
pub fn evaluate_with_warnings(tree: &ConditionNode, facts: &FactContext) -> Evaluation {
    let mut warnings = Vec::new();
    let matched = eval_node(tree, facts, &mut warnings);
    Evaluation { matched, warnings }
}

fn eval_node(node: &ConditionNode, facts: &FactContext, out: &mut Vec<ConditionWarning>) -> bool {
    match node {
        ConditionNode::Leaf(clause) => eval_clause(clause, facts, out),
        // Every child is visited so that all malformed clauses get reported.
        ConditionNode::Group(group) => match group.operator {
            GroupOperator::And => group
                .conditions
                .iter()
                .fold(true, |acc, c| eval_node(c, facts, out) && acc),
            GroupOperator::Or => group
                .conditions
                .iter()
                .fold(false, |acc, c| eval_node(c, facts, out) || acc),
        },
    }
}

fn eval_clause(
    clause: &ConditionClause,
    facts: &FactContext,
    out: &mut Vec<ConditionWarning>,
) -> bool {
    if let ConditionOperator::Unknown(raw) = &clause.operator {
        out.push(warning(
            ids::WARN_UNKNOWN_OPERATOR,
            clause,
            format!("unknown operator '{raw}' on field '{}'", clause.field),
        ));
        return false;
    }

    let Some(fact) = facts.get(&clause.field) else {
        out.push(warning(
            ids::WARN_MISSING_FIELD,
            clause,
            format!("field '{}' is not present in the fact context", clause.field),
        ));
        return false;
    };

    let expected = &clause.value;
    let result = match &clause.operator {
        ConditionOperator::Equals => Some(fact == expected),
        ConditionOperator::NotEquals => Some(fact != expected),
        ConditionOperator::In => match expected {
            ConditionValue::List(items) => Some(items.contains(fact)),
            _ => None,
        },
        ConditionOperator::NotIn => match expected {
            ConditionValue::List(items) => Some(!items.contains(fact)),
            _ => None,
        },
        ConditionOperator::Contains => match (fact, expected) {
            (ConditionValue::List(items), needle) => Some(items.contains(needle)),
            (ConditionValue::String(hay), ConditionValue::String(needle)) => {
                Some(hay.contains(needle.as_str()))
            }
            _ => None,
        },
        ConditionOperator::GreaterThan => compare(fact, expected, |o| o == Ordering::Greater),
        ConditionOperator::GreaterThanOrEqual => {
            compare(fact, expected, |o| o != Ordering::Less)
        }
        ConditionOperator::LessThan => compare(fact, expected, |o| o == Ordering::Less),
        ConditionOperator::LessThanOrEqual => compare(fact, expected, |o| o != Ordering::Greater),
        // Reported above.
        ConditionOperator::Unknown(_) => Some(false),
    };

    match result {
        Some(matched) => matched,
        None => {
            out.push(warning(
                ids::WARN_TYPE_MISMATCH,
                clause,
                format!(
                    "operator '{}' cannot compare {} fact with {} value on field '{}'",
                    clause.operator,
                    fact.kind(),
                    expected.kind(),
                    clause.field
                ),
            ));
            false
        }
    }
}

fn compare(
    fact: &ConditionValue,
    expected: &ConditionValue,
    accept: impl Fn(Ordering) -> bool,
) -> Option<bool> {
    match (fact, expected) {
        (ConditionValue::Number(a), ConditionValue::Number(b)) => a.partial_cmp(b).map(accept),
        _ => None,
    }
}

fn warning(code: &'static str, clause: &ConditionClause, detail: String) -> ConditionWarning {
    ConditionWarning {
        code,
        field: clause.field.clone(),
        detail,
    }
}

/// Sorted, de-duplicated leaf clauses of a tree in canonical text form.
///
/// Two rules overlap when their clause sets are equal. This is a structural approximation;
/// it does not decide satisfiability of nested `AND`/`OR` trees.
pub fn clause_set(tree: &ConditionNode) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    tree.for_each_clause(&mut |clause| {
        set.insert(format!(
            "{}|{}|{}",
            clause.field,
            clause.operator.as_str(),
            value_key(&clause.value)
        ));
    });
    set
}

fn value_key(value: &ConditionValue) -> String {
    match value {
        ConditionValue::Bool(b) => b.to_string(),
        ConditionValue::Number(n) => {
            if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        ConditionValue::String(s) => format!("{s:?}"),
        ConditionValue::List(items) => {
            let inner: Vec<String> = items.iter().map(value_key).collect();
            format!("[{}]", inner.join(","))
        }
    }
}
