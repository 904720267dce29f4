use crate::{model::GovsealConfigV1, presets};
use anyhow::Context;
use govseal_domain::EngineConfig;

/// Command-line overrides; each beats the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub reviewer_threshold: Option<f64>,
    pub lead_threshold: Option<f64>,
    pub risk_ceiling: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EngineConfig,
}

pub fn resolve_config(
    cfg: GovsealConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "standard".to_string());

    let mut effective = presets::preset(&profile).context("resolve profile")?;

    // Escalation thresholds
    if let Some(v) = overrides
        .reviewer_threshold
        .or(cfg.escalation.reviewer_threshold)
    {
        effective.escalation.reviewer_threshold = v;
    }
    if let Some(v) = overrides.lead_threshold.or(cfg.escalation.lead_threshold) {
        effective.escalation.lead_threshold = v;
    }

    // Risk formula
    if let Some(v) = overrides.risk_ceiling.or(cfg.risk.ceiling) {
        effective.risk.ceiling = v;
    }
    if let Some(v) = cfg.risk.baseline {
        effective.risk.baseline = v;
    }

    validate(&effective).with_context(|| format!("invalid configuration (profile {profile})"))?;

    Ok(ResolvedConfig { effective })
}

fn validate(cfg: &EngineConfig) -> anyhow::Result<()> {
    let esc = &cfg.escalation;
    unit_interval("escalation.reviewer_threshold", esc.reviewer_threshold)?;
    unit_interval("escalation.lead_threshold", esc.lead_threshold)?;
    if esc.reviewer_threshold > esc.lead_threshold {
        anyhow::bail!(
            "escalation.reviewer_threshold ({}) must not exceed escalation.lead_threshold ({})",
            esc.reviewer_threshold,
            esc.lead_threshold
        );
    }

    let risk = &cfg.risk;
    if !(risk.ceiling > 0.0 && risk.ceiling <= 1.0) {
        anyhow::bail!("risk.ceiling must be in (0, 1], got {}", risk.ceiling);
    }
    if !(0.0..=risk.ceiling).contains(&risk.baseline) {
        anyhow::bail!(
            "risk.baseline must be in [0, {}], got {}",
            risk.ceiling,
            risk.baseline
        );
    }
    Ok(())
}

fn unit_interval(key: &str, v: f64) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&v) {
        anyhow::bail!("{key} must be in [0, 1], got {v}");
    }
    Ok(())
}
