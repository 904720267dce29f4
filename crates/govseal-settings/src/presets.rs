use govseal_domain::{EngineConfig, EscalationConfig, RiskConfig};

/// Known profile names, default first.
pub const PROFILES: &[&str] = &["standard", "strict", "relaxed"];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything site-specific belongs in `govseal.toml`.
pub fn preset(profile: &str) -> anyhow::Result<EngineConfig> {
    match profile {
        "standard" => Ok(standard_profile()),
        "strict" => Ok(with_thresholds("strict", 0.4, 0.6)),
        "relaxed" => Ok(with_thresholds("relaxed", 0.6, 0.8)),
        other => anyhow::bail!(
            "unknown profile: {other} (expected {})",
            PROFILES.join("|")
        ),
    }
}

fn standard_profile() -> EngineConfig {
    EngineConfig::default()
}

fn with_thresholds(name: &str, reviewer: f64, lead: f64) -> EngineConfig {
    EngineConfig {
        profile: name.to_string(),
        escalation: EscalationConfig {
            reviewer_threshold: reviewer,
            lead_threshold: lead,
        },
        risk: RiskConfig::default(),
    }
}
