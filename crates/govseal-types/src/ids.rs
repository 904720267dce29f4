//! Stable identifiers for warning codes, conflict fields, and seal algorithms.
//!
//! Codes are short snake_case discriminators. Algorithm names are versioned so that a
//! future upgrade is visible in the sealed artifact itself.

// Condition evaluation warnings
pub const WARN_UNKNOWN_OPERATOR: &str = "unknown_operator";
pub const WARN_MISSING_FIELD: &str = "missing_field";
pub const WARN_TYPE_MISMATCH: &str = "type_mismatch";

// Risk scoring
pub const NOTE_EMPTY_TELEMETRY: &str = "empty_telemetry";

// Conflict fields
pub const CONFLICT_FIELD_DECISION: &str = "decision";

// Provenance key prefix for effective rules
pub const PROVENANCE_RULES_PREFIX: &str = "rules";

// Seal descriptor
pub const HASH_ALGORITHM_SHA256: &str = "sha256";
pub const CANONICALIZATION_JSON_SORTED_V1: &str = "json-sorted-keys/v1";
pub const SIGNATURE_SHA256_BOUND_V1: &str = "sha256-bound/v1";

// Escalation reasons
pub const REASON_POLICY_CONFLICT: &str = "Policy conflict detected";
pub const REASON_HIGH_RISK: &str = "High predicted failure risk";
pub const REASON_MEDIUM_RISK: &str = "Medium predicted failure risk";
pub const REASON_RISK_UNAVAILABLE: &str = "Risk score unavailable";
