use crate::model::{NavguardConfigV1, PinConfig};
use crate::presets::{self, Profile};
use crate::SCHEMA_CONFIG_V1;
use anyhow::Context;
use base64::prelude::*;
use navguard_domain::{PinConfiguration, PolicySnapshot};
use navguard_types::HttpsStrategy;
use std::collections::BTreeSet;

/// SHA-256 digest length a pin must decode to.
const PIN_DIGEST_LEN: usize = 32;

/// Programmatic overrides, applied on top of the document.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub https_mode: Option<HttpsStrategy>,
    pub pinning_enabled: Option<bool>,
    pub audit_logging: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub profile: Profile,
    pub snapshot: PolicySnapshot,
    pub audit_logging: bool,
}

pub fn resolve_config(
    cfg: NavguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let profile = match overrides.profile.as_deref().or(cfg.profile.as_deref()) {
        Some(p) => Profile::parse(p)?,
        None => Profile::default(),
    };
    let mut snapshot = presets::preset(profile);

    // Pinning
    if let Some(enabled) = overrides.pinning_enabled.or(cfg.pinning.enabled) {
        snapshot.pinning.enabled = enabled;
    }
    for pin in &cfg.pinning.pins {
        let config =
            pin_configuration(pin).with_context(|| format!("invalid pin for {}", pin.hostname))?;
        if snapshot.pinning.insert(config).is_some() {
            anyhow::bail!("duplicate pin hostname: {}", pin.hostname);
        }
    }

    // HTTPS
    if let Some(mode) = cfg.https.mode.as_deref() {
        snapshot.https.strategy = parse_https_mode(mode)?;
    }
    if let Some(mode) = overrides.https_mode {
        snapshot.https.strategy = mode;
    }
    for host in &cfg.https.allowed_http_hosts {
        validate_hostname(host).context("invalid allowed_http_hosts entry")?;
        snapshot.https.allow_http_host(host);
    }

    // Schemes
    let safe = lowercase_set(&cfg.schemes.safe);
    let blocked = lowercase_set(&cfg.schemes.blocked);
    if let Some(both) = safe.intersection(&blocked).next() {
        anyhow::bail!("scheme listed as both safe and blocked: {both}");
    }
    for scheme in &safe {
        validate_scheme(scheme)?;
        snapshot.schemes.add_safe(scheme);
    }
    for scheme in &blocked {
        validate_scheme(scheme)?;
        snapshot.schemes.add_blocked(scheme);
    }

    let audit_logging = overrides
        .audit_logging
        .or(cfg.audit_logging)
        .unwrap_or(true);

    Ok(ResolvedConfig {
        profile,
        snapshot,
        audit_logging,
    })
}

fn pin_configuration(pin: &PinConfig) -> anyhow::Result<PinConfiguration> {
    validate_hostname(&pin.hostname)?;
    if pin.public_key_hashes.is_empty() {
        anyhow::bail!("public_key_hashes is empty (the host could never match)");
    }
    for hash in &pin.public_key_hashes {
        validate_pin(hash)?;
    }

    Ok(
        PinConfiguration::new(pin.hostname.to_lowercase(), pin.public_key_hashes.iter().cloned())
            .include_subdomains(pin.include_subdomains)
            .allow_expired_certificates(pin.allow_expired_certificates),
    )
}

fn validate_pin(hash: &str) -> anyhow::Result<()> {
    let raw = BASE64_STANDARD
        .decode(hash)
        .with_context(|| format!("pin is not standard base64: {hash}"))?;
    if raw.len() != PIN_DIGEST_LEN {
        anyhow::bail!(
            "pin decodes to {} bytes, expected {PIN_DIGEST_LEN}: {hash}",
            raw.len()
        );
    }
    Ok(())
}

fn validate_hostname(host: &str) -> anyhow::Result<()> {
    if host.is_empty() {
        anyhow::bail!("hostname is empty");
    }
    if host.starts_with('.') || host.ends_with('.') {
        anyhow::bail!("hostname has a leading or trailing dot: {host}");
    }
    if let Some(bad) = host
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | '*'))
    {
        anyhow::bail!("hostname contains {bad:?}: {host}");
    }
    Ok(())
}

fn validate_scheme(scheme: &str) -> anyhow::Result<()> {
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_alpha
        || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        anyhow::bail!("invalid scheme name: {scheme:?}");
    }
    Ok(())
}

fn lowercase_set(values: &[String]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

fn parse_https_mode(v: &str) -> anyhow::Result<HttpsStrategy> {
    v.parse::<HttpsStrategy>().context("invalid https.mode")
}
