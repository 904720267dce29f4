//! CLI entry point for govseal.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `govseal-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use govseal_app::{
    LifecycleAction, assessment_markdown, escalation_exit_code, load_config, provenance_markdown,
    read_config_file, run_assess, run_harmonize, run_resolve, run_seal, run_transition,
    run_verify, serialize_json, verification_exit_code, write_output,
};
use govseal_settings::{Overrides, ResolvedConfig};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "govseal",
    version,
    about = "AI-usage policy harmonization, risk escalation, and sealed policy snapshots"
)]
struct Cli {
    /// Path to govseal config TOML (missing file means defaults).
    #[arg(long, default_value = "govseal.toml")]
    config: Utf8PathBuf,

    /// Override profile (standard|strict|relaxed).
    #[arg(long)]
    profile: Option<String>,

    /// Override the reviewer escalation threshold.
    #[arg(long)]
    reviewer_threshold: Option<f64>,

    /// Override the compliance-lead escalation threshold.
    #[arg(long)]
    lead_threshold: Option<f64>,

    /// Override the risk score ceiling.
    #[arg(long)]
    risk_ceiling: Option<f64>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge two rule sets, resolving overlaps by strictness then priority.
    Harmonize {
        /// JSON file with `rules_a` and `rules_b`.
        #[arg(long)]
        input: Utf8PathBuf,
        /// Where to write the JSON result (stdout if omitted).
        #[arg(long)]
        out: Option<Utf8PathBuf>,
    },

    /// Score telemetry risk and decide whether human review is required.
    ///
    /// Exits 2 when an escalation is required.
    Assess {
        /// JSON file with `telemetry` and optional filter, conflicts, or rule sets.
        #[arg(long)]
        input: Utf8PathBuf,
        #[arg(long)]
        out: Option<Utf8PathBuf>,
        /// Also write a Markdown summary.
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,
    },

    /// Resolve the effective policy of one scope with field provenance.
    Resolve {
        /// JSON file with `scope_id`, `scope_tree`, and `policies`.
        #[arg(long)]
        input: Utf8PathBuf,
        #[arg(long)]
        out: Option<Utf8PathBuf>,
        /// Also write a Markdown provenance table.
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,
    },

    /// Resolve and seal an effective policy into a proof bundle.
    Seal {
        /// JSON file with the resolve input plus `approval_chain` and `snapshot_id`.
        #[arg(long)]
        input: Utf8PathBuf,
        #[arg(long)]
        out: Option<Utf8PathBuf>,
        /// Generation timestamp (RFC 3339); defaults to now.
        #[arg(long)]
        generated_at: Option<String>,
    },

    /// Recompute and check every digest in a proof bundle.
    ///
    /// Exits 2 when the bundle does not verify.
    Verify {
        #[arg(long)]
        bundle: Utf8PathBuf,
        #[arg(long)]
        out: Option<Utf8PathBuf>,
    },

    /// Apply a lifecycle action to a policy instance.
    Transition {
        /// JSON file with `instance`, `scope_tree`, `policies`, and `approval_chain`.
        #[arg(long)]
        input: Utf8PathBuf,
        #[arg(long, value_enum)]
        action: Action,
        #[arg(long)]
        out: Option<Utf8PathBuf>,
        /// Transition timestamp (RFC 3339); defaults to now.
        #[arg(long)]
        now: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Action {
    Submit,
    Approve,
    Activate,
    Deprecate,
}

impl From<Action> for LifecycleAction {
    fn from(action: Action) -> Self {
        match action {
            Action::Submit => LifecycleAction::Submit,
            Action::Approve => LifecycleAction::Approve,
            Action::Activate => LifecycleAction::Activate,
            Action::Deprecate => LifecycleAction::Deprecate,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("govseal error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.cmd {
        Commands::Harmonize { input, out } => {
            let text = read_input(input)?;
            let merged = run_harmonize(&text)?;
            write_output(out.as_deref(), &serialize_json(&merged)?)?;
            Ok(0)
        }
        Commands::Assess {
            input,
            out,
            markdown_out,
        } => {
            let resolved = resolve_config(cli)?;
            let text = read_input(input)?;
            let assessment = run_assess(&text, &resolved.effective)?;
            write_output(out.as_deref(), &serialize_json(&assessment)?)?;
            if let Some(path) = markdown_out {
                write_output(Some(path.as_path()), assessment_markdown(&assessment).as_bytes())
                    .context("write markdown")?;
            }
            Ok(escalation_exit_code(assessment.escalation.as_ref()))
        }
        Commands::Resolve {
            input,
            out,
            markdown_out,
        } => {
            let text = read_input(input)?;
            let resolved = run_resolve(&text)?;
            write_output(out.as_deref(), &serialize_json(&resolved)?)?;
            if let Some(path) = markdown_out {
                write_output(Some(path.as_path()), provenance_markdown(&resolved).as_bytes())
                    .context("write markdown")?;
            }
            Ok(0)
        }
        Commands::Seal {
            input,
            out,
            generated_at,
        } => {
            let text = read_input(input)?;
            let at = timestamp_or_now(generated_at.as_deref(), "--generated-at")?;
            let bundle = run_seal(&text, at)?;
            write_output(out.as_deref(), &serialize_json(&bundle)?)?;
            Ok(0)
        }
        Commands::Verify { bundle, out } => {
            let text = read_input(bundle)?;
            let verification = run_verify(&text)?;
            write_output(out.as_deref(), &serialize_json(&verification)?)?;
            Ok(verification_exit_code(&verification))
        }
        Commands::Transition {
            input,
            action,
            out,
            now,
        } => {
            let text = read_input(input)?;
            let at = timestamp_or_now(now.as_deref(), "--now")?;
            let result = run_transition(&text, (*action).into(), at)?;
            // The instance is written even on failure so its recorded status is not lost.
            write_output(out.as_deref(), &serialize_json(&result)?)?;
            match result.error {
                Some(error) => anyhow::bail!("{error}"),
                None => Ok(0),
            }
        }
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<ResolvedConfig> {
    let text = read_config_file(&cli.config)?;
    let overrides = Overrides {
        profile: cli.profile.clone(),
        reviewer_threshold: cli.reviewer_threshold,
        lead_threshold: cli.lead_threshold,
        risk_ceiling: cli.risk_ceiling,
    };
    load_config(&text, overrides)
}

fn read_input(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read input: {path}"))
}

fn timestamp_or_now(value: Option<&str>, flag: &str) -> anyhow::Result<OffsetDateTime> {
    match value {
        Some(raw) => OffsetDateTime::parse(raw, &Rfc3339)
            .with_context(|| format!("invalid {flag} timestamp: {raw}")),
        None => Ok(OffsetDateTime::now_utc()),
    }
}
