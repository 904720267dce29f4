/// Thresholds used by the escalation advisor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EscalationConfig {
    /// Risk at or above this escalates to a reviewer.
    pub reviewer_threshold: f64,
    /// Risk at or above this escalates to the compliance lead.
    pub lead_threshold: f64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            reviewer_threshold: 0.5,
            lead_threshold: 0.7,
        }
    }
}

/// Parameters of the telemetry risk formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiskConfig {
    /// Upper clamp; risk is never reported as certainty.
    pub ceiling: f64,
    /// Score returned when no telemetry matches.
    pub baseline: f64,
    pub fail_weight: f64,
    pub remediation_weight: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            ceiling: 0.95,
            baseline: 0.2,
            fail_weight: 0.7,
            remediation_weight: 0.3,
        }
    }
}

/// Resolved engine configuration handed to the pure components.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub profile: String,
    pub escalation: EscalationConfig,
    pub risk: RiskConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: "standard".to_string(),
            escalation: EscalationConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}
