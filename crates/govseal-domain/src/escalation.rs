use crate::config::EscalationConfig;
use govseal_types::{Conflict, Escalation, EscalationLevel, ids};

/// Decide whether a harmonization result needs human review before activation.
///
/// First match wins: conflicts, non-finite risk, lead threshold, reviewer threshold.
/// A conflict always escalates, however favorable the risk score.
pub fn escalate_if_needed(
    conflicts: &[Conflict],
    risk: f64,
    cfg: &EscalationConfig,
) -> Option<Escalation> {
    if let Some(first) = conflicts.first() {
        return Some(Escalation {
            level: EscalationLevel::ComplianceLead,
            reason: format!(
                "{}: {} conflict(s); {}",
                ids::REASON_POLICY_CONFLICT,
                conflicts.len(),
                first.detail
            ),
        });
    }

    if !risk.is_finite() {
        return Some(Escalation {
            level: EscalationLevel::ComplianceLead,
            reason: ids::REASON_RISK_UNAVAILABLE.to_string(),
        });
    }

    if risk >= cfg.lead_threshold {
        return Some(Escalation {
            level: EscalationLevel::ComplianceLead,
            reason: ids::REASON_HIGH_RISK.to_string(),
        });
    }

    if risk >= cfg.reviewer_threshold {
        return Some(Escalation {
            level: EscalationLevel::Reviewer,
            reason: ids::REASON_MEDIUM_RISK.to_string(),
        });
    }

    None
}
