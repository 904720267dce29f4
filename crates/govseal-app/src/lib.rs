//! Use case orchestration for govseal.
//!
//! This crate provides the application layer: use cases that coordinate the settings, domain,
//! and render layers. It is intentionally thin and delegates heavy lifting to the domain.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod assess;
mod config;
mod inputs;
mod policy;
mod render;

pub use assess::{AssessOutput, escalation_exit_code, run_assess, run_harmonize};
pub use config::{load_config, read_config_file};
pub use inputs::{
    AssessInput, HarmonizeInput, LifecycleAction, ResolveInput, SealInput, TransitionInput,
};
pub use policy::{
    ResolveOutput, TransitionOutput, run_resolve, run_seal, run_transition, run_verify,
    verification_exit_code,
};
pub use render::{assessment_markdown, provenance_markdown, serialize_json, write_output};
