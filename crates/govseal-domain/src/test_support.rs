use govseal_types::{
    ApprovalDecision, ApprovalRecord, ConditionNode, ConditionOperator, ConditionValue, Decision,
    DecisionStatus, FactContext, InheritanceMode, Outcome, PolicyField, PolicyRule, ScopeSpec,
    ScopeType, ScopedPolicy, TelemetryAtom,
};
use serde_json::{Value as JsonValue, json};
use time::macros::datetime;

pub fn facts(pairs: &[(&str, ConditionValue)]) -> FactContext {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn tool_is(name: &str) -> ConditionNode {
    ConditionNode::leaf("tool.name", ConditionOperator::Equals, name.into())
}

pub fn rule(
    id: &str,
    status: DecisionStatus,
    priority: i64,
    conditions: ConditionNode,
) -> PolicyRule {
    PolicyRule {
        rule_id: id.to_string(),
        name: format!("rule {id}"),
        description: String::new(),
        priority,
        is_active: true,
        context_id: "ctx".to_string(),
        conditions,
        decision: Decision {
            status,
            reason: String::new(),
            audit_trigger: false,
        },
    }
}

pub fn atom(tool: &str, region: &str, outcome: Outcome) -> TelemetryAtom {
    TelemetryAtom {
        ts: datetime!(2024-05-01 09:30:00 UTC),
        tool_id: tool.to_string(),
        tool_version: "1.0".to_string(),
        use_case_id: "uc-1".to_string(),
        outcome,
        remediation_id: matches!(outcome, Outcome::Remediated).then(|| "rem-1".to_string()),
        region_id: region.to_string(),
    }
}

pub fn scope(id: &str, scope_type: ScopeType, path: &str) -> ScopeSpec {
    ScopeSpec {
        id: id.to_string(),
        scope_type,
        name: id.to_string(),
        scope_path: path.to_string(),
        children: Vec::new(),
    }
}

/// `acme -> {na -> us -> brand, eu -> de}`.
pub fn sample_tree() -> ScopeSpec {
    let mut us = scope("acme-us", ScopeType::Country, "acme.na.us");
    us.children
        .push(scope("acme-us-brand", ScopeType::Brand, "acme.na.us.brand"));
    let mut na = scope("acme-na", ScopeType::Region, "acme.na");
    na.children.push(us);

    let mut eu = scope("acme-eu", ScopeType::Region, "acme.eu");
    eu.children.push(scope("acme-de", ScopeType::Country, "acme.eu.de"));

    let mut root = scope("acme", ScopeType::Enterprise, "acme");
    root.children.push(na);
    root.children.push(eu);
    root
}

pub fn field(mode: InheritanceMode, value: JsonValue) -> PolicyField {
    PolicyField { mode, value }
}

pub fn policy(
    id: &str,
    scope_id: &str,
    fields: Vec<(&str, PolicyField)>,
    rules: Vec<PolicyRule>,
) -> ScopedPolicy {
    ScopedPolicy {
        policy_id: id.to_string(),
        scope_id: scope_id.to_string(),
        fields: fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        rules,
    }
}

/// Enterprise, country, and brand policies over [`sample_tree`].
pub fn sample_policies() -> Vec<ScopedPolicy> {
    use InheritanceMode::*;
    vec![
        policy(
            "p-enterprise",
            "acme",
            vec![
                ("data_retention_days", field(Override, json!(365))),
                ("approved_tools", field(Merge, json!(["ChatGPT"]))),
                ("disclosure_required", field(InheritOnly, json!(true))),
                (
                    "review_contacts",
                    field(Merge, json!({"legal": "ent-legal", "privacy": "ent-privacy"})),
                ),
            ],
            vec![rule("r-ent-dalle", DecisionStatus::Approved, 10, tool_is("DALL-E"))],
        ),
        policy(
            "p-us",
            "acme-us",
            vec![
                ("data_retention_days", field(Override, json!(180))),
                ("approved_tools", field(Merge, json!(["Copilot"]))),
                ("disclosure_required", field(InheritOnly, json!(false))),
                ("review_contacts", field(Merge, json!({"legal": "us-legal"}))),
            ],
            Vec::new(),
        ),
        policy(
            "p-brand",
            "acme-us-brand",
            vec![("approved_tools", field(Merge, json!(["ChatGPT", "Midjourney"])))],
            vec![rule("r-brand-dalle", DecisionStatus::Prohibited, 20, tool_is("DALL-E"))],
        ),
    ]
}

pub fn approvals() -> Vec<ApprovalRecord> {
    vec![
        ApprovalRecord {
            stage: "legal".to_string(),
            decision: ApprovalDecision::Approved,
            decided_by: "reviewer-1".to_string(),
            decided_at: datetime!(2024-06-01 10:00:00 UTC),
            rationale: "meets retention policy".to_string(),
        },
        ApprovalRecord {
            stage: "compliance".to_string(),
            decision: ApprovalDecision::Approved,
            decided_by: "lead-2".to_string(),
            decided_at: datetime!(2024-06-02 15:30:00 UTC),
            rationale: String::new(),
        },
    ]
}
