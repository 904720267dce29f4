//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{EscalationSection, GovsealConfigV1, RiskSection};
pub use presets::PROFILES;
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `govseal.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<GovsealConfigV1> {
    let cfg: GovsealConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective engine config (profile preset, then file values, then overrides).
pub fn resolve_config(
    cfg: GovsealConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
