//! Render use cases: Markdown views and JSON output.

use crate::assess::AssessOutput;
use crate::policy::ResolveOutput;
use anyhow::Context;
use camino::Utf8Path;
use govseal_render::{
    RenderableAssessment, RenderableConflict, RenderableEscalation, RenderableLevel,
    RenderablePolicy, RenderableProvenanceRow,
};
use govseal_types::{Conflict, EscalationLevel};
use serde::Serialize;

pub fn assessment_markdown(out: &AssessOutput) -> String {
    let report = RenderableAssessment {
        profile: out.profile.clone(),
        tool_id: out.tool_id.clone(),
        region: out.region.clone(),
        risk_score: out.risk.score,
        sample_size: out.risk.sample_size,
        fail_rate: out.risk.fail_rate,
        remediated_rate: out.risk.remediated_rate,
        baseline_applied: out.risk.baseline_applied,
        conflicts: out.conflicts.iter().map(renderable_conflict).collect(),
        escalation: out.escalation.as_ref().map(|e| RenderableEscalation {
            level: match e.level {
                EscalationLevel::Reviewer => RenderableLevel::Reviewer,
                EscalationLevel::ComplianceLead => RenderableLevel::ComplianceLead,
            },
            reason: e.reason.clone(),
        }),
    };
    govseal_render::render_assessment_markdown(&report)
}

pub fn provenance_markdown(out: &ResolveOutput) -> String {
    let policy = RenderablePolicy {
        scope_id: out.policy.scope_id.clone(),
        scope_path: out.policy.scope_path.clone(),
        rule_count: out.policy.rules.len() as u32,
        rows: out
            .policy
            .field_provenance
            .iter()
            .map(|(field, p)| RenderableProvenanceRow {
                field: field.clone(),
                source_scope_path: p.source_scope_path.clone(),
                source_scope_type: p.source_scope_type.to_string(),
                inheritance_mode: p.inheritance_mode.to_string(),
                advisory_scopes: p.advisory_scopes.clone(),
            })
            .collect(),
        conflicts: out.conflicts.iter().map(renderable_conflict).collect(),
    };
    govseal_render::render_provenance_markdown(&policy)
}

fn renderable_conflict(c: &Conflict) -> RenderableConflict {
    RenderableConflict {
        winner: c.rule_a.clone(),
        loser: c.rule_b.clone(),
        detail: c.detail.clone(),
    }
}

/// Pretty JSON with a trailing newline.
pub fn serialize_json<T: Serialize>(value: &T) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value).context("serialize json output")?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write `bytes` to `path` (creating parent directories), or to stdout when `path` is `None`.
pub fn write_output(path: Option<&Utf8Path>, bytes: &[u8]) -> anyhow::Result<()> {
    use std::io::Write;

    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir {parent}"))?;
            }
            std::fs::write(path, bytes).with_context(|| format!("write {path}"))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("write stdout")?;
            stdout.flush().context("flush stdout")
        }
    }
}
