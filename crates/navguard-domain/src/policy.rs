use crate::pinning::hash_public_key;
use crate::scheme::{DEFAULT_BLOCKED_SCHEMES, DEFAULT_SAFE_SCHEMES};
use navguard_types::{HttpsStrategy, SchemeClass, ValidationResult};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied URL rule, consulted before the built-in scheme rules.
pub type CustomValidator = Arc<dyn Fn(&str) -> ValidationResult + Send + Sync>;

/// Pinning rule for one hostname.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinConfiguration {
    /// Lookup key. Case-sensitive, exactly as configured.
    pub hostname: String,
    /// Base64 SHA-256 digests of SubjectPublicKeyInfo DER.
    pub public_key_hashes: BTreeSet<String>,
    pub include_subdomains: bool,
    /// Stored for the TLS trust layer. Chain matching never reads it.
    pub allow_expired_certificates: bool,
}

impl PinConfiguration {
    pub fn new<I, S>(hostname: impl Into<String>, hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hostname: hostname.into(),
            public_key_hashes: hashes.into_iter().map(Into::into).collect(),
            include_subdomains: false,
            allow_expired_certificates: false,
        }
    }

    pub fn include_subdomains(mut self, include: bool) -> Self {
        self.include_subdomains = include;
        self
    }

    pub fn allow_expired_certificates(mut self, allow: bool) -> Self {
        self.allow_expired_certificates = allow;
        self
    }

    /// Build a single-pin configuration from a DER certificate.
    ///
    /// Returns `None` when no public key can be extracted.
    pub fn from_certificate(
        hostname: impl Into<String>,
        certificate_der: &[u8],
        include_subdomains: bool,
    ) -> Option<Self> {
        let pin = hash_public_key(certificate_der)?;
        Some(Self::new(hostname, [pin]).include_subdomains(include_subdomains))
    }

    pub fn pins(&self, hash: &str) -> bool {
        self.public_key_hashes.contains(hash)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PinPolicy {
    pub enabled: bool,
    configurations: BTreeMap<String, PinConfiguration>,
}

impl PinPolicy {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            configurations: BTreeMap::new(),
        }
    }

    /// Add or replace the configuration keyed by its hostname.
    pub fn insert(&mut self, config: PinConfiguration) -> Option<PinConfiguration> {
        self.configurations.insert(config.hostname.clone(), config)
    }

    pub fn remove(&mut self, hostname: &str) -> Option<PinConfiguration> {
        self.configurations.remove(hostname)
    }

    pub fn clear(&mut self) {
        self.configurations.clear();
    }

    pub fn configurations(&self) -> &BTreeMap<String, PinConfiguration> {
        &self.configurations
    }

    pub fn get(&self, hostname: &str) -> Option<&PinConfiguration> {
        self.configurations.get(hostname)
    }

    /// Find the configuration that applies to `hostname`.
    ///
    /// Exact key first, then parent domains from the most specific one down
    /// (`a.b.c` tries `b.c`, then `c`). A parent only applies when it was
    /// configured with `include_subdomains`.
    pub fn resolve(&self, hostname: &str) -> Option<&PinConfiguration> {
        if let Some(config) = self.configurations.get(hostname) {
            return Some(config);
        }

        let mut rest = hostname;
        while let Some((_, parent)) = rest.split_once('.') {
            if let Some(config) = self.configurations.get(parent)
                && config.include_subdomains
            {
                return Some(config);
            }
            rest = parent;
        }

        None
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpsPolicy {
    pub strategy: HttpsStrategy,
    allowed_http_hosts: BTreeSet<String>,
}

impl HttpsPolicy {
    pub fn new(strategy: HttpsStrategy) -> Self {
        Self {
            strategy,
            allowed_http_hosts: BTreeSet::new(),
        }
    }

    pub fn allow_http_host(&mut self, host: &str) -> bool {
        self.allowed_http_hosts.insert(host.to_lowercase())
    }

    pub fn remove_http_host(&mut self, host: &str) -> bool {
        self.allowed_http_hosts.remove(&host.to_lowercase())
    }

    pub fn clear_http_hosts(&mut self) {
        self.allowed_http_hosts.clear();
    }

    pub fn allowed_http_hosts(&self) -> &BTreeSet<String> {
        &self.allowed_http_hosts
    }

    pub fn is_whitelisted(&self, host: &str) -> bool {
        self.allowed_http_hosts.contains(&host.to_lowercase())
    }

    pub fn is_enforcing(&self) -> bool {
        self.strategy.is_enforcing()
    }
}

/// Safe and blocked scheme sets plus the optional custom rule.
///
/// The two sets stay disjoint: adding a scheme to one evicts it from the other.
#[derive(Clone)]
pub struct SchemePolicy {
    safe: BTreeSet<String>,
    blocked: BTreeSet<String>,
    custom_validator: Option<CustomValidator>,
}

impl Default for SchemePolicy {
    fn default() -> Self {
        let mut policy = Self::empty();
        for scheme in DEFAULT_SAFE_SCHEMES {
            policy.add_safe(scheme);
        }
        for scheme in DEFAULT_BLOCKED_SCHEMES {
            policy.add_blocked(scheme);
        }
        policy
    }
}

impl fmt::Debug for SchemePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemePolicy")
            .field("safe", &self.safe)
            .field("blocked", &self.blocked)
            .field("custom_validator", &self.custom_validator.is_some())
            .finish()
    }
}

impl SchemePolicy {
    /// No safe schemes, no blocked schemes: every scheme is unknown.
    pub fn empty() -> Self {
        Self {
            safe: BTreeSet::new(),
            blocked: BTreeSet::new(),
            custom_validator: None,
        }
    }

    pub fn add_safe(&mut self, scheme: &str) {
        let lower = scheme.to_lowercase();
        self.blocked.remove(&lower);
        self.safe.insert(lower);
    }

    pub fn add_blocked(&mut self, scheme: &str) {
        let lower = scheme.to_lowercase();
        self.safe.remove(&lower);
        self.blocked.insert(lower);
    }

    pub fn remove_safe(&mut self, scheme: &str) -> bool {
        self.safe.remove(&scheme.to_lowercase())
    }

    pub fn remove_blocked(&mut self, scheme: &str) -> bool {
        self.blocked.remove(&scheme.to_lowercase())
    }

    pub fn set_custom_validator(&mut self, validator: CustomValidator) {
        self.custom_validator = Some(validator);
    }

    pub fn clear_custom_validator(&mut self) {
        self.custom_validator = None;
    }

    pub fn custom_validator(&self) -> Option<&CustomValidator> {
        self.custom_validator.as_ref()
    }

    pub fn safe_schemes(&self) -> &BTreeSet<String> {
        &self.safe
    }

    pub fn blocked_schemes(&self) -> &BTreeSet<String> {
        &self.blocked
    }

    pub fn classify(&self, scheme: &str) -> SchemeClass {
        let lower = scheme.to_lowercase();
        if self.blocked.contains(&lower) {
            SchemeClass::Blocked
        } else if self.safe.contains(&lower) {
            SchemeClass::Safe
        } else {
            SchemeClass::Unknown
        }
    }
}

/// Everything the evaluators read, as one immutable value.
#[derive(Clone, Debug, Default)]
pub struct PolicySnapshot {
    pub pinning: PinPolicy,
    pub https: HttpsPolicy,
    pub schemes: SchemePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scheme_sets_match_documented_defaults() {
        let policy = SchemePolicy::default();
        let safe: Vec<&str> = policy.safe_schemes().iter().map(String::as_str).collect();
        let blocked: Vec<&str> = policy.blocked_schemes().iter().map(String::as_str).collect();
        assert_eq!(
            safe,
            vec!["about", "blob", "content", "data", "file", "http", "https"]
        );
        assert_eq!(blocked, vec!["jar", "javascript", "vbscript", "wyciwyg"]);
    }

    #[test]
    fn adding_to_one_set_evicts_from_the_other() {
        let mut policy = SchemePolicy::default();
        policy.add_blocked("HTTP");
        assert!(!policy.safe_schemes().contains("http"));
        assert_eq!(policy.classify("http"), SchemeClass::Blocked);

        policy.add_safe("javascript");
        assert!(!policy.blocked_schemes().contains("javascript"));
        assert_eq!(policy.classify("JavaScript"), SchemeClass::Safe);
    }

    #[test]
    fn removing_leaves_scheme_unknown() {
        let mut policy = SchemePolicy::default();
        assert!(policy.remove_safe("about"));
        assert!(!policy.remove_safe("about"));
        assert_eq!(policy.classify("about"), SchemeClass::Unknown);
        assert!(policy.remove_blocked("jar"));
        assert_eq!(policy.classify("jar"), SchemeClass::Unknown);
    }

    #[test]
    fn insert_replaces_existing_configuration() {
        let mut pins = PinPolicy::new(true);
        assert!(pins.insert(PinConfiguration::new("example.com", ["a"])).is_none());
        let previous = pins.insert(PinConfiguration::new("example.com", ["b"]));
        assert_eq!(previous.map(|c| c.public_key_hashes.len()), Some(1));
        assert_eq!(pins.configurations().len(), 1);
        assert!(pins.get("example.com").is_some_and(|c| c.pins("b") && !c.pins("a")));
    }

    #[test]
    fn resolve_walks_parents_and_respects_include_subdomains() {
        let mut pins = PinPolicy::new(true);
        pins.insert(PinConfiguration::new("example.com", ["a"]).include_subdomains(true));
        pins.insert(PinConfiguration::new("other.org", ["b"]));

        assert!(pins.resolve("example.com").is_some());
        assert!(pins.resolve("api.example.com").is_some());
        assert!(pins.resolve("a.b.example.com").is_some());
        assert!(pins.resolve("other.org").is_some());
        assert!(pins.resolve("www.other.org").is_none());
        assert!(pins.resolve("example.net").is_none());
    }

    #[test]
    fn resolve_prefers_most_specific_parent() {
        let mut pins = PinPolicy::new(true);
        pins.insert(PinConfiguration::new("example.com", ["outer"]).include_subdomains(true));
        pins.insert(PinConfiguration::new("api.example.com", ["inner"]).include_subdomains(true));

        let config = pins.resolve("v1.api.example.com").expect("pinned");
        assert_eq!(config.hostname, "api.example.com");
    }

    #[test]
    fn resolve_skips_parent_without_flag_and_keeps_walking() {
        let mut pins = PinPolicy::new(true);
        pins.insert(PinConfiguration::new("api.example.com", ["inner"]));
        pins.insert(PinConfiguration::new("example.com", ["outer"]).include_subdomains(true));

        let config = pins.resolve("v1.api.example.com").expect("pinned");
        assert_eq!(config.hostname, "example.com");
    }

    #[test]
    fn hostname_keys_are_case_sensitive() {
        let mut pins = PinPolicy::new(true);
        pins.insert(PinConfiguration::new("Example.com", ["a"]));
        assert!(pins.resolve("example.com").is_none());
        assert!(pins.resolve("Example.com").is_some());
    }

    #[test]
    fn http_hosts_are_lowercased() {
        let mut https = HttpsPolicy::new(HttpsStrategy::Strict);
        https.allow_http_host("LocalHost");
        assert!(https.is_whitelisted("localhost"));
        assert!(https.is_whitelisted("LOCALHOST"));
        assert!(https.remove_http_host("LOCALHOST"));
        assert!(https.allowed_http_hosts().is_empty());
    }
}
