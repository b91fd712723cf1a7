//! Every fixture under `tests/fixtures/config/valid` resolves; every one under
//! `invalid` is rejected.

use navguard_settings::{Overrides, parse_config_toml, resolve_config};
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures(kind: &str) -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures/config")
        .join(kind);
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("read {}: {e}", dir.display()))
        .map(|entry| entry.expect("dir entry").path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();
    assert!(!files.is_empty(), "no fixtures in {}", dir.display());
    files
}

fn resolve_file(path: &Path) -> anyhow::Result<navguard_settings::ResolvedConfig> {
    let content = fs::read_to_string(path)?;
    resolve_config(parse_config_toml(&content)?, Overrides::default())
}

#[test]
fn valid_fixtures_resolve() {
    for path in fixtures("valid") {
        if let Err(e) = resolve_file(&path) {
            panic!("{}: {e:#}", path.display());
        }
    }
}

#[test]
fn invalid_fixtures_are_rejected() {
    for path in fixtures("invalid") {
        assert!(resolve_file(&path).is_err(), "{} resolved", path.display());
    }
}

#[test]
fn strict_pinned_fixture_contents() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures/config/valid/strict_pinned.toml");
    let resolved = resolve_file(&path).expect("resolves");
    let pins = resolved.snapshot.pinning.configurations();
    assert_eq!(pins.len(), 2);
    assert!(
        resolved
            .snapshot
            .pinning
            .resolve("cdn.example.org")
            .is_some_and(|c| c.allow_expired_certificates)
    );
    assert!(resolved.snapshot.pinning.resolve("www.api.example.com").is_none());
}
