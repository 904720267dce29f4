use crate::lifecycle::InstanceStatus;
use thiserror::Error;

/// Failures of a single effective-policy resolution. Not retried internally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("scope not found: {scope_id}")]
    ScopeNotFound { scope_id: String },

    #[error("invalid scope tree: {reason}")]
    InvalidScopeTree { reason: String },

    #[error("invalid field name '{field}' at scope {scope_path}: {reason}")]
    InvalidFieldName {
        field: String,
        scope_path: String,
        reason: &'static str,
    },

    #[error(
        "field '{field}' cannot be merged: scope {scope_path} declares a {found} value where a {expected} was being merged"
    )]
    MergeTypeMismatch {
        field: String,
        scope_path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// The snapshot could not be canonicalized, hashed, or sealed (EPS generation failure).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SealError {
    #[error("non-finite number at {path}; snapshot values must be finite")]
    NonFiniteNumber { path: String },

    #[error(
        "approval chain is not chronological: entry {index} (stage '{stage}') is earlier than the entry before it"
    )]
    ApprovalChainOutOfOrder { index: usize, stage: String },

    #[error("failed to serialize {context}: {message}")]
    Serialize {
        context: &'static str,
        message: String,
    },

    #[error("failed to format generation timestamp: {0}")]
    Timestamp(String),

    #[error("failed to resolve effective policy: {0}")]
    Resolve(#[from] ResolveError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot {action} instance {instance_id} while it is {from}")]
    InvalidTransition {
        instance_id: String,
        from: InstanceStatus,
        action: &'static str,
    },

    #[error("cannot {action} instance {instance_id}: approved but unsealed, retry approval first")]
    Unsealed {
        instance_id: String,
        action: &'static str,
    },

    #[error("snapshot generation failed for instance {instance_id}: {source}")]
    SnapshotGeneration {
        instance_id: String,
        #[source]
        source: SealError,
    },
}
