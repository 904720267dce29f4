use crate::{RenderableAssessment, RenderableConflict, RenderableLevel, RenderablePolicy};

pub fn render_assessment_markdown(report: &RenderableAssessment) -> String {
    let mut out = String::new();

    out.push_str("# Govseal assessment\n\n");
    let escalation = match &report.escalation {
        None => "NONE",
        Some(e) => match e.level {
            RenderableLevel::Reviewer => "REVIEWER",
            RenderableLevel::ComplianceLead => "COMPLIANCE LEAD",
        },
    };
    out.push_str(&format!(
        "- Escalation: **{}**\n- Profile: `{}`\n- Subject: {}\n\n",
        escalation,
        report.profile,
        subject(report.tool_id.as_deref(), report.region.as_deref())
    ));

    if let Some(e) = &report.escalation {
        out.push_str(&format!("> {}\n\n", e.reason));
    }

    out.push_str("## Risk\n\n");
    out.push_str(&format!("- Score: {:.4}\n", report.risk_score));
    if report.baseline_applied {
        out.push_str("- Samples: 0 (baseline applied)\n\n");
    } else {
        out.push_str(&format!(
            "- Samples: {}\n- Fail rate: {:.4}\n- Remediated rate: {:.4}\n\n",
            report.sample_size, report.fail_rate, report.remediated_rate
        ));
    }

    push_conflicts(&mut out, &report.conflicts);
    out
}

pub fn render_provenance_markdown(policy: &RenderablePolicy) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Effective policy: `{}`\n\n", policy.scope_path));
    out.push_str(&format!(
        "- Scope id: `{}`\n- Fields: {}\n- Rules: {}\n\n",
        policy.scope_id,
        policy.rows.len(),
        policy.rule_count
    ));

    if policy.rows.is_empty() {
        out.push_str("No provenance entries.\n\n");
    } else {
        out.push_str("## Provenance\n\n");
        out.push_str("| Field | Source scope | Type | Mode | Advisory |\n");
        out.push_str("|---|---|---|---|---|\n");
        for row in &policy.rows {
            let advisory = if row.advisory_scopes.is_empty() {
                "-".to_string()
            } else {
                row.advisory_scopes.join(", ")
            };
            out.push_str(&format!(
                "| `{}` | `{}` | {} | {} | {} |\n",
                row.field,
                row.source_scope_path,
                row.source_scope_type,
                row.inheritance_mode,
                advisory
            ));
        }
        out.push('\n');
    }

    push_conflicts(&mut out, &policy.conflicts);
    out
}

fn subject(tool_id: Option<&str>, region: Option<&str>) -> String {
    format!(
        "tool `{}`, region `{}`",
        tool_id.unwrap_or("*"),
        region.unwrap_or("*")
    )
}

fn push_conflicts(out: &mut String, conflicts: &[RenderableConflict]) {
    if conflicts.is_empty() {
        out.push_str("No conflicts.\n");
        return;
    }

    out.push_str("## Conflicts\n\n");
    for c in conflicts {
        out.push_str(&format!(
            "- `{}` over `{}`: {}\n",
            c.winner, c.loser, c.detail
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderableAssessment, RenderableEscalation, RenderableProvenanceRow};

    fn assessment() -> RenderableAssessment {
        RenderableAssessment {
            profile: "standard".to_string(),
            tool_id: Some("T1".to_string()),
            region: None,
            risk_score: 0.6125,
            sample_size: 8,
            fail_rate: 0.5,
            remediated_rate: 0.125,
            baseline_applied: false,
            conflicts: Vec::new(),
            escalation: Some(RenderableEscalation {
                level: RenderableLevel::Reviewer,
                reason: "Medium predicted failure risk".to_string(),
            }),
        }
    }

    #[test]
    fn renders_escalation_and_rates() {
        let md = render_assessment_markdown(&assessment());
        assert!(md.contains("Escalation: **REVIEWER**"));
        assert!(md.contains("> Medium predicted failure risk"));
        assert!(md.contains("tool `T1`, region `*`"));
        assert!(md.contains("- Score: 0.6125"));
        assert!(md.contains("- Samples: 8"));
        assert!(md.contains("No conflicts."));
    }

    #[test]
    fn renders_baseline_and_conflicts() {
        let mut report = assessment();
        report.baseline_applied = true;
        report.sample_size = 0;
        report.escalation = None;
        report.conflicts.push(RenderableConflict {
            winner: "b1".to_string(),
            loser: "a1".to_string(),
            detail: "approved overridden by prohibited".to_string(),
        });

        let md = render_assessment_markdown(&report);
        assert!(md.contains("Escalation: **NONE**"));
        assert!(md.contains("baseline applied"));
        assert!(md.contains("## Conflicts"));
        assert!(md.contains("- `b1` over `a1`: approved overridden by prohibited"));
    }

    #[test]
    fn renders_provenance_table() {
        let policy = RenderablePolicy {
            scope_id: "acme-us".to_string(),
            scope_path: "acme.na.us".to_string(),
            rule_count: 2,
            rows: vec![
                RenderableProvenanceRow {
                    field: "disclosure_required".to_string(),
                    source_scope_path: "acme".to_string(),
                    source_scope_type: "enterprise".to_string(),
                    inheritance_mode: "inherit-only".to_string(),
                    advisory_scopes: vec!["acme.na.us".to_string()],
                },
                RenderableProvenanceRow {
                    field: "retention".to_string(),
                    source_scope_path: "acme.na.us".to_string(),
                    source_scope_type: "country".to_string(),
                    inheritance_mode: "override".to_string(),
                    advisory_scopes: Vec::new(),
                },
            ],
            conflicts: Vec::new(),
        };

        let md = render_provenance_markdown(&policy);
        assert!(md.contains("# Effective policy: `acme.na.us`"));
        assert!(md.contains("- Rules: 2"));
        assert!(md.contains(
            "| `disclosure_required` | `acme` | enterprise | inherit-only | acme.na.us |"
        ));
        assert!(md.contains("| `retention` | `acme.na.us` | country | override | - |"));
    }

    #[test]
    fn renders_empty_policy() {
        let policy = RenderablePolicy {
            scope_id: "acme".to_string(),
            scope_path: "acme".to_string(),
            rule_count: 0,
            rows: Vec::new(),
            conflicts: Vec::new(),
        };
        let md = render_provenance_markdown(&policy);
        assert!(md.contains("No provenance entries."));
        assert!(md.contains("No conflicts."));
    }
}
