//! Config parsing and profile/preset resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{HttpsConfig, NavguardConfigV1, PinConfig, PinningConfig, SchemesConfig};
pub use presets::{Profile, preset};
pub use resolve::{Overrides, ResolvedConfig};

/// Schema identifier accepted in the `schema` key.
pub const SCHEMA_CONFIG_V1: &str = "navguard.config.v1";

/// Parse `navguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<NavguardConfigV1> {
    let cfg: NavguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the policy snapshot used by the evaluators (profile + document + overrides).
pub fn resolve_config(
    cfg: NavguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
