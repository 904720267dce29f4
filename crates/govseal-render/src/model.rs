#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableLevel {
    Reviewer,
    ComplianceLead,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableEscalation {
    pub level: RenderableLevel,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableConflict {
    pub winner: String,
    pub loser: String,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableAssessment {
    pub profile: String,
    pub tool_id: Option<String>,
    pub region: Option<String>,
    pub risk_score: f64,
    pub sample_size: u32,
    pub fail_rate: f64,
    pub remediated_rate: f64,
    pub baseline_applied: bool,
    pub conflicts: Vec<RenderableConflict>,
    pub escalation: Option<RenderableEscalation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableProvenanceRow {
    pub field: String,
    pub source_scope_path: String,
    pub source_scope_type: String,
    pub inheritance_mode: String,
    pub advisory_scopes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderablePolicy {
    pub scope_id: String,
    pub scope_path: String,
    pub rule_count: u32,
    pub rows: Vec<RenderableProvenanceRow>,
    pub conflicts: Vec<RenderableConflict>,
}
