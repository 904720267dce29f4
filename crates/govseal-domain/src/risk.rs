//! Telemetry-driven risk scoring for a (tool, region) pair.

use crate::config::RiskConfig;
use govseal_types::{Outcome, TelemetryAtom, ids};
use serde::Serialize;

/// Optional selection of atoms; an absent key matches any atom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RiskFilter {
    pub tool_id: Option<String>,
    pub region: Option<String>,
}

impl RiskFilter {
    pub fn matches(&self, atom: &TelemetryAtom) -> bool {
        self.tool_id.as_deref().is_none_or(|t| t == atom.tool_id)
            && self.region.as_deref().is_none_or(|r| r == atom.region_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub sample_size: u32,
    pub fail_rate: f64,
    pub remediated_rate: f64,
    pub baseline_applied: bool,
}

/// Score risk in `[0, cfg.ceiling]`.
pub fn score_risk(atoms: &[TelemetryAtom], filter: Option<&RiskFilter>, cfg: &RiskConfig) -> f64 {
    assess_risk(atoms, filter, cfg).score
}

/// Score risk and keep the intermediate rates for audit.
///
/// `fail_rate` counts both `fail` and `remediated` outcomes: a remediation is evidence that
/// a failure occurred.
pub fn assess_risk(
    atoms: &[TelemetryAtom],
    filter: Option<&RiskFilter>,
    cfg: &RiskConfig,
) -> RiskAssessment {
    let mut total = 0u32;
    let mut failed = 0u32;
    let mut remediated = 0u32;

    for atom in atoms
        .iter()
        .filter(|a| filter.is_none_or(|f| f.matches(a)))
    {
        total += 1;
        match atom.outcome {
            Outcome::Fail => failed += 1,
            Outcome::Remediated => {
                failed += 1;
                remediated += 1;
            }
            Outcome::Pass => {}
        }
    }

    if total == 0 {
        tracing::debug!(
            target: "govseal::risk",
            code = ids::NOTE_EMPTY_TELEMETRY,
            baseline = cfg.baseline,
            "no matching telemetry; using baseline risk"
        );
        return RiskAssessment {
            score: cfg.baseline.clamp(0.0, cfg.ceiling),
            sample_size: 0,
            fail_rate: 0.0,
            remediated_rate: 0.0,
            baseline_applied: true,
        };
    }

    let fail_rate = f64::from(failed) / f64::from(total);
    let remediated_rate = f64::from(remediated) / f64::from(total);
    let raw = fail_rate * cfg.fail_weight + (1.0 - remediated_rate) * cfg.remediation_weight;

    RiskAssessment {
        score: raw.clamp(0.0, cfg.ceiling),
        sample_size: total,
        fail_rate,
        remediated_rate,
        baseline_applied: false,
    }
}
