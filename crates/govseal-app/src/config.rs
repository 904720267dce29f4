use anyhow::Context;
use camino::Utf8Path;
use govseal_settings::{GovsealConfigV1, Overrides, ResolvedConfig};

/// Read a config file; a missing file is an empty config.
pub fn read_config_file(path: &Utf8Path) -> anyhow::Result<String> {
    if !path.exists() {
        tracing::debug!(
            target: "govseal::config",
            path = %path,
            "config file not found; using defaults"
        );
        return Ok(String::new());
    }
    std::fs::read_to_string(path).with_context(|| format!("read config {path}"))
}

/// Parse and resolve configuration text (empty is allowed, defaults apply).
pub fn load_config(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        GovsealConfigV1::default()
    } else {
        govseal_settings::parse_config_toml(config_text).context("parse config")?
    };

    let resolved = govseal_settings::resolve_config(cfg, overrides).context("resolve config")?;
    tracing::debug!(
        target: "govseal::config",
        profile = %resolved.effective.profile,
        reviewer_threshold = resolved.effective.escalation.reviewer_threshold,
        lead_threshold = resolved.effective.escalation.lead_threshold,
        "resolved configuration"
    );
    Ok(resolved)
}
