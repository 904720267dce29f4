//! The `harmonize` and `assess` use cases.

use crate::inputs::{AssessInput, HarmonizeInput, parse_input};
use govseal_domain::{
    EngineConfig, Harmonized, RiskAssessment, RiskFilter, assess_risk, escalate_if_needed,
    harmonize,
};
use govseal_types::{Conflict, Escalation};
use serde::Serialize;

pub fn run_harmonize(input_json: &str) -> anyhow::Result<Harmonized> {
    let input: HarmonizeInput = parse_input(input_json, "harmonize")?;
    Ok(harmonize(&input.rules_a, &input.rules_b))
}

/// Result of a governance assessment: conflicts, telemetry risk, and the escalation decision.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssessOutput {
    pub profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harmonized: Option<Harmonized>,
    pub conflicts: Vec<Conflict>,
    pub risk: RiskAssessment,
    pub escalation: Option<Escalation>,
}

pub fn run_assess(input_json: &str, cfg: &EngineConfig) -> anyhow::Result<AssessOutput> {
    let input: AssessInput = parse_input(input_json, "assess")?;

    let mut conflicts = input.conflicts;
    let harmonized = if input.rules_a.is_empty() && input.rules_b.is_empty() {
        None
    } else {
        let merged = harmonize(&input.rules_a, &input.rules_b);
        conflicts.extend(merged.conflicts.iter().cloned());
        Some(merged)
    };

    let filter = RiskFilter {
        tool_id: input.tool_id.clone(),
        region: input.region.clone(),
    };
    let risk = assess_risk(&input.telemetry, Some(&filter), &cfg.risk);
    let escalation = escalate_if_needed(&conflicts, risk.score, &cfg.escalation);

    tracing::info!(
        target: "govseal::assess",
        profile = %cfg.profile,
        risk = risk.score,
        samples = risk.sample_size,
        conflicts = conflicts.len(),
        escalation = ?escalation.as_ref().map(|e| e.level),
        "assessment complete"
    );

    Ok(AssessOutput {
        profile: cfg.profile.clone(),
        tool_id: input.tool_id,
        region: input.region,
        harmonized,
        conflicts,
        risk,
        escalation,
    })
}

/// Map an escalation to exit code: 0 = no review needed, 2 = human review required.
pub fn escalation_exit_code(escalation: Option<&Escalation>) -> i32 {
    match escalation {
        None => 0,
        Some(_) => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govseal_types::EscalationLevel;
    use serde_json::json;

    fn atoms(outcomes: &[&str]) -> serde_json::Value {
        json!(outcomes
            .iter()
            .map(|o| json!({
                "ts": "2024-05-01T09:30:00Z",
                "tool_id": "T1",
                "outcome": o,
                "region_id": "US"
            }))
            .collect::<Vec<_>>())
    }

    fn rule(id: &str, status: &str) -> serde_json::Value {
        json!({
            "rule_id": id,
            "priority": 1,
            "conditions": {"field": "tool.name", "operator": "equals", "value": "DALL-E"},
            "decision": {"status": status}
        })
    }

    #[test]
    fn harmonize_parses_camel_case_aliases() {
        let input = json!({
            "rulesA": [rule("a1", "Approved")],
            "rulesB": [rule("b1", "Prohibited")]
        });
        let out = run_harmonize(&input.to_string()).expect("harmonize");
        assert_eq!(out.combined.len(), 1);
        assert_eq!(out.combined[0].rule_id, "b1");
        assert_eq!(out.summary.conflict_count, 1);
    }

    #[test]
    fn assess_scores_filtered_telemetry() {
        let mut telemetry = atoms(&[
            "fail",
            "fail",
            "fail",
            "remediated",
            "pass",
            "pass",
            "pass",
            "pass",
        ]);
        telemetry.as_array_mut().expect("array").push(json!({
            "ts": "2024-05-01T09:30:00Z",
            "tool_id": "T2",
            "outcome": "fail",
            "region_id": "US"
        }));
        let input = json!({"telemetry": telemetry, "tool_id": "T1", "region": "US"});

        let out = run_assess(&input.to_string(), &EngineConfig::default()).expect("assess");
        assert_eq!(out.risk.sample_size, 8);
        assert!((out.risk.score - 0.6125).abs() < 1e-9);
        let escalation = out.escalation.expect("escalation");
        assert_eq!(escalation.level, EscalationLevel::Reviewer);
        assert_eq!(escalation_exit_code(Some(&escalation)), 2);
    }

    #[test]
    fn conflicts_from_rule_sets_escalate_to_lead() {
        let input = json!({
            "telemetry": [],
            "rules_a": [rule("a1", "Approved")],
            "rules_b": [rule("b1", "Prohibited")]
        });
        let out = run_assess(&input.to_string(), &EngineConfig::default()).expect("assess");
        assert!(out.risk.baseline_applied);
        assert_eq!(out.conflicts.len(), 1);
        let escalation = out.escalation.expect("escalation");
        assert_eq!(escalation.level, EscalationLevel::ComplianceLead);
        assert!(escalation.reason.starts_with("Policy conflict detected: 1 conflict(s)"));
    }

    #[test]
    fn quiet_telemetry_needs_no_review() {
        let input = json!({"telemetry": atoms(&["pass", "pass", "pass", "remediated"])});
        let out = run_assess(&input.to_string(), &EngineConfig::default()).expect("assess");
        // fail_rate 0.25, remediated_rate 0.25: 0.175 + 0.225 = 0.4
        assert!((out.risk.score - 0.4).abs() < 1e-9);
        assert_eq!(out.escalation, None);
        assert_eq!(escalation_exit_code(None), 0);
    }

    #[test]
    fn malformed_input_reports_context() {
        let err = run_assess("{", &EngineConfig::default()).expect_err("bad json");
        assert!(format!("{err:#}").contains("parse assess input"));
    }
}
