//! Developer tasks (schema generation, reason code coverage, config fixtures).
//!
//! Keeping this separate keeps the library crates free of tooling dependencies.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
    };

    // If we're in the xtask directory, go up one level
    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        return Ok(parent.to_path_buf());
    }
    Ok(manifest_dir)
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn config_fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures").join("config"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

/// Generate the NavguardConfigV1 schema.
fn generate_config_schema() -> schemars::Schema {
    schema_for!(navguard_settings::NavguardConfigV1)
}

/// Generate the ValidationResult schema.
fn generate_decision_schema() -> schemars::Schema {
    schema_for!(navguard_types::ValidationResult)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "navguard.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "navguard.decision.v1.json",
            generate: generate_decision_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
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

/// Validate that schemas in the repo match what would be generated.
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
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// `evaluator.token`, where `token` is lowercase ASCII, digits, and underscores.
fn is_valid_code(code: &str) -> bool {
    let Some((evaluator, token)) = code.split_once('.') else {
        return false;
    };
    let known_evaluator = [
        navguard_types::ids::EVALUATOR_PINNING,
        navguard_types::ids::EVALUATOR_HTTPS,
        navguard_types::ids::EVALUATOR_URL,
    ]
    .contains(&evaluator);

    let mut chars = token.chars();
    let starts_lower = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    known_evaluator
        && starts_lower
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Validate that every decision code is well-formed, unique, and explained.
fn reason_coverage() -> anyhow::Result<()> {
    let codes = navguard_types::ids::all_codes();
    let mut errors = Vec::new();
    let mut seen = std::collections::BTreeSet::new();

    for code in codes {
        if !seen.insert(*code) {
            errors.push(format!("Code '{code}' is listed twice"));
        }
        if !is_valid_code(code) {
            errors.push(format!("Code '{code}' is not of the form evaluator.token"));
        }
        match navguard_types::lookup_explanation(code) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("Code '{code}' has empty title"));
                }
                if exp.description.is_empty() {
                    errors.push(format!("Code '{code}' has empty description"));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("Code '{code}' has empty remediation"));
                }
            }
            None => errors.push(format!("Code '{code}' has no explanation")),
        }
    }

    if errors.is_empty() {
        println!("✓ {} codes are well-formed and explained", codes.len());
        return Ok(());
    }

    for error in &errors {
        eprintln!("  - {error}");
    }
    bail!(
        "Reason coverage validation failed with {} errors",
        errors.len()
    )
}

fn toml_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Check config fixtures: everything under `valid/` must match the config
/// schema and resolve; everything under `invalid/` must fail to resolve.
fn check_configs(root: &Path) -> anyhow::Result<()> {
    let schema = serde_json::to_value(generate_config_schema())
        .context("Failed to serialize config schema")?;
    let validator = jsonschema::draft202012::new(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile config schema: {e}"))?;

    let valid = toml_files(&root.join("valid"))?;
    let invalid = toml_files(&root.join("invalid"))?;
    if valid.is_empty() && invalid.is_empty() {
        bail!("no config fixtures found under {}", root.display());
    }

    let mut errors = Vec::new();

    for path in &valid {
        let name = path.display();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {name}"))?;

        let as_json: serde_json::Value = match toml::from_str(&content) {
            Ok(v) => v,
            Err(e) => {
                errors.push(format!("{name}: not TOML: {e}"));
                continue;
            }
        };
        for err in validator.iter_errors(&as_json) {
            errors.push(format!("{name}: schema validation: {err}"));
        }

        let resolved = navguard_settings::parse_config_toml(&content)
            .and_then(|cfg| navguard_settings::resolve_config(cfg, Default::default()));
        match resolved {
            Ok(_) => println!("  ✓ {name} resolves"),
            Err(e) => errors.push(format!("{name}: expected to resolve: {e:#}")),
        }
    }

    for path in &invalid {
        let name = path.display();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {name}"))?;
        let resolved = navguard_settings::parse_config_toml(&content)
            .and_then(|cfg| navguard_settings::resolve_config(cfg, Default::default()));
        match resolved {
            Ok(_) => errors.push(format!("{name}: expected an error, but it resolved")),
            Err(e) => println!("  ✓ {name} rejected: {e:#}"),
        }
    }

    if errors.is_empty() {
        println!(
            "\n✓ {} valid and {} invalid config fixtures checked",
            valid.len(),
            invalid.len()
        );
        return Ok(());
    }

    eprintln!("\nConfig fixture errors:");
    for err in &errors {
        eprintln!("  - {err}");
    }
    bail!("Config fixture check failed with {} errors", errors.len())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help                 Show this message");
    eprintln!("  emit-schemas         Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas     Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids     Print known schema IDs");
    eprintln!("  reason-coverage      Validate all decision codes are well-formed and explained");
    eprintln!("  check-configs [DIR]  Validate config fixtures (default: tests/fixtures/config)");
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
        "reason-coverage" => reason_coverage(),
        "check-configs" => match args.get(2) {
            Some(dir) => check_configs(Path::new(dir)),
            None => config_fixtures_dir().and_then(|dir| check_configs(&dir)),
        },
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_shape() {
        assert!(is_valid_code("pin.mismatch"));
        assert!(is_valid_code("url.file_traversal"));
        assert!(!is_valid_code("mismatch"));
        assert!(!is_valid_code("tls.mismatch"));
        assert!(!is_valid_code("pin.Mismatch"));
        assert!(!is_valid_code("pin."));
    }

    #[test]
    fn every_shipped_code_is_covered() {
        reason_coverage().expect("coverage");
    }
}
