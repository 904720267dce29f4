//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;
use time::macros::datetime;

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(PathBuf::from)
            .context("xtask has no parent")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "govseal.proof_bundle.v1.json",
            generate: || schema_for!(govseal_types::ProofBundle),
        },
        SchemaSpec {
            filename: "govseal.snapshot.v1.json",
            generate: || schema_for!(govseal_types::EffectivePolicySnapshot),
        },
        SchemaSpec {
            filename: "govseal.policy_rule.v1.json",
            generate: || schema_for!(govseal_types::PolicyRule),
        },
        SchemaSpec {
            filename: "govseal.scope_tree.v1.json",
            generate: || schema_for!(govseal_types::ScopeSpec),
        },
        SchemaSpec {
            filename: "govseal.telemetry_atom.v1.json",
            generate: || schema_for!(govseal_types::TelemetryAtom),
        },
        SchemaSpec {
            filename: "govseal.config.v1.json",
            generate: || schema_for!(govseal_settings::GovsealConfigV1),
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas/ matches what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Seal every `seal_*` fixture and check the resulting bundle.
///
/// Each bundle must:
/// 1. validate against the generated proof bundle schema
/// 2. pass `verify_bundle`
/// 3. be byte-identical when sealed twice with the same timestamp
fn conform() -> anyhow::Result<()> {
    let schema_value = serde_json::to_value(schema_for!(govseal_types::ProofBundle))
        .context("Failed to serialize proof bundle schema")?;
    let compiled = jsonschema::draft202012::new(&schema_value)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {}", e))?;
    println!("✓ govseal.proof_bundle.v1 schema compiles");

    let fixtures = fixtures_dir()?;
    let generated_at = datetime!(2024-06-03 08:00:00 UTC);
    let mut fixture_count = 0;
    let mut errors = Vec::new();

    for entry in fs::read_dir(&fixtures).context("Failed to read tests/fixtures/")? {
        let dir = entry?.path();
        let name = dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if !dir.is_dir() || !name.starts_with("seal_") {
            continue;
        }

        let input = fs::read_to_string(dir.join("input.json"))
            .with_context(|| format!("Failed to read {name}/input.json"))?;

        let first = govseal_app::run_seal(&input, generated_at)
            .with_context(|| format!("Failed to seal {name}"))?;
        let second = govseal_app::run_seal(&input, generated_at)
            .with_context(|| format!("Failed to seal {name}"))?;

        let first_json = govseal_app::serialize_json(&first)?;
        if first_json != govseal_app::serialize_json(&second)? {
            errors.push(format!("{name}: sealing is not deterministic"));
        }

        let value = serde_json::to_value(&first)?;
        for err in compiled.iter_errors(&value) {
            errors.push(format!("{name}: schema validation: {err}"));
        }

        let report = govseal_app::run_verify(&String::from_utf8_lossy(&first_json))?;
        for mismatch in &report.mismatches {
            errors.push(format!("{name}: {mismatch}"));
        }

        fixture_count += 1;
        println!("  ✓ {} seals and verifies", name);
    }

    if fixture_count == 0 {
        bail!("No seal_* fixtures found in {}", fixtures.display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} seal fixtures pass conformance checks!", fixture_count);
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Seal fixtures and validate bundles against the schema");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "print-schema-ids" => {
            println!("{}", govseal_types::SCHEMA_PROOF_BUNDLE_V1);
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
