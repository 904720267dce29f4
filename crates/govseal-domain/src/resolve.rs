//! Effective policy resolution over the scope tree.
//!
//! Fields are resolved per inheritance mode, where the mode declared by the root-most scope
//! governs. Rules are harmonized root to leaf so a descendant can only tighten a decision
//! through strictness, never silently replace it.

use crate::error::ResolveError;
use crate::harmonize::harmonize;
use crate::scope::{ScopeIdx, ScopeTree};
use govseal_types::{
    Conflict, EffectivePolicy, FieldProvenance, InheritanceMode, PolicyField, PolicyRule,
    ScopedPolicy, ids,
};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// Resolved policy plus every conflict recorded while folding rules down the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub policy: EffectivePolicy,
    pub conflicts: Vec<Conflict>,
}

struct Declaration<'a> {
    scope: ScopeIdx,
    field: &'a PolicyField,
}

/// Resolve the effective policy for `scope_id`.
///
/// Only policies attached to the target scope or its ancestors apply. Policies sharing a
/// scope are applied in `policy_id` order.
pub fn resolve_effective_policy(
    scope_id: &str,
    tree: &ScopeTree,
    policies: &[ScopedPolicy],
) -> Result<Resolution, ResolveError> {
    let target = tree.find(scope_id)?;
    let mut chain = tree.ancestry(target);
    chain.reverse();

    let layers: Vec<(ScopeIdx, Vec<&ScopedPolicy>)> = chain
        .iter()
        .map(|&idx| {
            let id = &tree.node(idx).id;
            let mut attached: Vec<&ScopedPolicy> =
                policies.iter().filter(|p| &p.scope_id == id).collect();
            attached.sort_by(|a, b| a.policy_id.cmp(&b.policy_id));
            (idx, attached)
        })
        .collect();

    let mut declarations: BTreeMap<&str, Vec<Declaration<'_>>> = BTreeMap::new();
    for (idx, attached) in &layers {
        for p in attached {
            for (name, field) in &p.fields {
                check_field_name(name, tree, *idx)?;
                declarations
                    .entry(name.as_str())
                    .or_default()
                    .push(Declaration { scope: *idx, field });
            }
        }
    }

    let mut fields = BTreeMap::new();
    let mut field_provenance = BTreeMap::new();
    for (name, decls) in &declarations {
        let value = resolve_field(name, decls, tree, &mut field_provenance)?;
        fields.insert(name.to_string(), value);
    }

    let mut rules: Vec<PolicyRule> = Vec::new();
    let mut conflicts = Vec::new();
    for (_, attached) in &layers {
        let mut scope_rules: Vec<PolicyRule> = Vec::new();
        for p in attached {
            let merged = harmonize(&scope_rules, &p.rules);
            scope_rules = merged.combined;
            conflicts.extend(merged.conflicts);
        }
        let merged = harmonize(&rules, &scope_rules);
        rules = merged.combined;
        conflicts.extend(merged.conflicts);
    }

    for rule in &rules {
        // Most specific scope that authored an identical rule.
        let origin = layers
            .iter()
            .rev()
            .find(|(_, attached)| attached.iter().any(|p| p.rules.contains(rule)))
            .map(|(idx, _)| *idx)
            .unwrap_or(target);
        let key = rule_provenance_key(&rule.rule_id, &tree.node(origin).scope_path);
        field_provenance.insert(key, provenance(tree, origin, InheritanceMode::Override));
    }

    let node = tree.node(target);
    tracing::debug!(
        target: "govseal::resolve",
        scope_id = %node.id,
        depth = chain.len(),
        fields = fields.len(),
        rules = rules.len(),
        conflicts = conflicts.len(),
        "resolved effective policy"
    );

    Ok(Resolution {
        policy: EffectivePolicy {
            scope_id: node.id.clone(),
            scope_path: node.scope_path.clone(),
            fields,
            rules,
            field_provenance,
        },
        conflicts,
    })
}

/// Provenance key of an effective rule. Rule ids are only unique per authoring scope.
fn rule_provenance_key(rule_id: &str, scope_path: &str) -> String {
    format!("{}.{rule_id}@{scope_path}", ids::PROVENANCE_RULES_PREFIX)
}

/// Field names are provenance keys too: no `.` (merged object keys) and not the rules prefix.
fn check_field_name(name: &str, tree: &ScopeTree, idx: ScopeIdx) -> Result<(), ResolveError> {
    let reason = if name.is_empty() {
        "field name is empty"
    } else if name.contains('.') {
        "field names must not contain '.'"
    } else if name == ids::PROVENANCE_RULES_PREFIX {
        "field name is reserved for rule provenance"
    } else {
        return Ok(());
    };
    Err(ResolveError::InvalidFieldName {
        field: name.to_string(),
        scope_path: tree.node(idx).scope_path.clone(),
        reason,
    })
}

fn resolve_field(
    name: &str,
    decls: &[Declaration<'_>],
    tree: &ScopeTree,
    provenance_out: &mut BTreeMap<String, FieldProvenance>,
) -> Result<JsonValue, ResolveError> {
    let Some(first) = decls.first() else {
        return Ok(JsonValue::Null);
    };
    let governing = first.field.mode;

    for d in decls.iter().filter(|d| d.field.mode != governing) {
        tracing::debug!(
            target: "govseal::resolve",
            field = name,
            scope_path = %tree.node(d.scope).scope_path,
            declared = %d.field.mode,
            governing = %governing,
            "descendant mode ignored; root-most declaration governs"
        );
    }

    match governing {
        InheritanceMode::Override => {
            let last = &decls[decls.len() - 1];
            provenance_out.insert(
                name.to_string(),
                provenance(tree, last.scope, InheritanceMode::Override),
            );
            Ok(last.field.value.clone())
        }
        InheritanceMode::InheritOnly => {
            let honored = decls
                .iter()
                .rev()
                .find(|d| d.scope == first.scope)
                .unwrap_or(first);
            let mut advisory: Vec<String> = Vec::new();
            for d in decls.iter().filter(|d| d.scope != first.scope) {
                let path = &tree.node(d.scope).scope_path;
                if !advisory.contains(path) {
                    advisory.push(path.clone());
                }
            }
            let mut prov = provenance(tree, first.scope, InheritanceMode::InheritOnly);
            prov.advisory_scopes = advisory;
            provenance_out.insert(name.to_string(), prov);
            Ok(honored.field.value.clone())
        }
        InheritanceMode::Merge => merge_field(name, decls, tree, provenance_out),
    }
}

enum Merged {
    List(Vec<JsonValue>),
    Object(Map<String, JsonValue>, BTreeMap<String, ScopeIdx>),
    Scalar(JsonValue),
}

impl Merged {
    fn kind(&self) -> &'static str {
        match self {
            Merged::List(_) => "list",
            Merged::Object(..) => "object",
            Merged::Scalar(_) => "scalar",
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
        _ => "scalar",
    }
}

/// Lists: order-preserving union. Objects: per-key last writer wins. Scalars: override.
fn merge_field(
    name: &str,
    decls: &[Declaration<'_>],
    tree: &ScopeTree,
    provenance_out: &mut BTreeMap<String, FieldProvenance>,
) -> Result<JsonValue, ResolveError> {
    let mut acc: Option<Merged> = None;
    let mut last_scope = None;

    for d in decls {
        let value = &d.field.value;
        acc = Some(match (acc.take(), value) {
            (None, JsonValue::Array(items)) => {
                let mut out = Vec::new();
                push_unique(&mut out, items);
                Merged::List(out)
            }
            (None, JsonValue::Object(map)) => Merged::Object(
                map.clone(),
                map.keys().map(|k| (k.clone(), d.scope)).collect(),
            ),
            (None, other) => Merged::Scalar(other.clone()),
            (Some(Merged::List(mut out)), JsonValue::Array(items)) => {
                push_unique(&mut out, items);
                Merged::List(out)
            }
            (Some(Merged::Object(mut out, mut writers)), JsonValue::Object(map)) => {
                for (k, v) in map {
                    out.insert(k.clone(), v.clone());
                    writers.insert(k.clone(), d.scope);
                }
                Merged::Object(out, writers)
            }
            (Some(Merged::Scalar(_)), other)
                if !matches!(other, JsonValue::Array(_) | JsonValue::Object(_)) =>
            {
                Merged::Scalar(other.clone())
            }
            (Some(merged), other) => {
                return Err(ResolveError::MergeTypeMismatch {
                    field: name.to_string(),
                    scope_path: tree.node(d.scope).scope_path.clone(),
                    expected: merged.kind(),
                    found: json_kind(other),
                });
            }
        });
        last_scope = Some(d.scope);
    }

    if let Some(scope) = last_scope {
        provenance_out.insert(
            name.to_string(),
            provenance(tree, scope, InheritanceMode::Merge),
        );
    }

    Ok(match acc {
        Some(Merged::List(items)) => JsonValue::Array(items),
        Some(Merged::Object(map, writers)) => {
            for (key, scope) in writers {
                provenance_out.insert(
                    format!("{name}.{key}"),
                    provenance(tree, scope, InheritanceMode::Merge),
                );
            }
            JsonValue::Object(map)
        }
        Some(Merged::Scalar(value)) => value,
        None => JsonValue::Null,
    })
}

fn push_unique(out: &mut Vec<JsonValue>, items: &[JsonValue]) {
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
}

fn provenance(tree: &ScopeTree, idx: ScopeIdx, mode: InheritanceMode) -> FieldProvenance {
    let node = tree.node(idx);
    FieldProvenance {
        source_scope_path: node.scope_path.clone(),
        source_scope_type: node.scope_type,
        inheritance_mode: mode,
        advisory_scopes: Vec::new(),
    }
}
