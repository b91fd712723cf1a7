use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `navguard.toml` schema v1.
///
/// Every key is optional; anything left out comes from the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NavguardConfigV1 {
    /// Optional schema string for tooling (`navguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `permissive` (default), `balanced`, or `strict`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Emit audit events for decisions and configuration changes (default: on).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_logging: Option<bool>,

    #[serde(default)]
    pub pinning: PinningConfig,

    #[serde(default)]
    pub https: HttpsConfig,

    #[serde(default)]
    pub schemes: SchemesConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PinningConfig {
    /// Override the profile's global pinning switch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub pins: Vec<PinConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PinConfig {
    pub hostname: String,

    /// Base64 (standard alphabet) SHA-256 digests of SubjectPublicKeyInfo DER.
    pub public_key_hashes: Vec<String>,

    #[serde(default)]
    pub include_subdomains: bool,

    /// Passed through to the TLS trust layer; pin matching ignores it.
    #[serde(default)]
    pub allow_expired_certificates: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HttpsConfig {
    /// `disabled`, `upgrade`, or `strict`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Hosts exempt from HTTPS enforcement.
    #[serde(default)]
    pub allowed_http_hosts: Vec<String>,
}

/// Additions to the default scheme sets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemesConfig {
    #[serde(default)]
    pub safe: Vec<String>,

    #[serde(default)]
    pub blocked: Vec<String>,
}
