use crate::audit;
use navguard_domain::{PinConfiguration, PinOutcome, PolicySnapshot, https, pinning, scheme};
use navguard_settings::ResolvedConfig;
use navguard_types::{HttpsStrategy, SchemeClass, ValidationResult};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Shared, mutable security policy.
///
/// Validations evaluate against an immutable [`PolicySnapshot`]; a mutation
/// builds a successor snapshot and swaps it in whole, so a concurrent
/// validation sees either the old or the new policy, never a mix.
///
/// Share it with `Arc<PolicyHolder>`.
pub struct PolicyHolder {
    current: RwLock<Arc<PolicySnapshot>>,
    /// Serializes mutations so no update is lost between clone and swap.
    writer: Mutex<()>,
    audit_logging: AtomicBool,
}

impl Default for PolicyHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PolicyHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyHolder")
            .field("snapshot", &self.snapshot())
            .field("audit_logging", &self.audit_logging())
            .finish()
    }
}

impl PolicyHolder {
    /// Default policy: pinning off, HTTPS not enforced, default scheme sets.
    pub fn new() -> Self {
        Self::from_snapshot(PolicySnapshot::default())
    }

    pub fn from_snapshot(snapshot: PolicySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(()),
            audit_logging: AtomicBool::new(true),
        }
    }

    pub fn from_resolved(resolved: ResolvedConfig) -> Self {
        let holder = Self::from_snapshot(resolved.snapshot);
        holder.set_audit_logging(resolved.audit_logging);
        holder
    }

    /// Parse and resolve a `navguard.toml` document.
    pub fn from_config_toml(input: &str) -> anyhow::Result<Self> {
        let cfg = navguard_settings::parse_config_toml(input)?;
        let resolved = navguard_settings::resolve_config(cfg, Default::default())?;
        Ok(Self::from_resolved(resolved))
    }

    /// The current snapshot. Holding it does not block mutations.
    pub fn snapshot(&self) -> Arc<PolicySnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn set_audit_logging(&self, enabled: bool) {
        self.audit_logging.store(enabled, Ordering::Relaxed);
    }

    pub fn audit_logging(&self) -> bool {
        self.audit_logging.load(Ordering::Relaxed)
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// `true` if the leaf-first DER chain is acceptable for `hostname`.
    pub fn validate_certificate_chain<C: AsRef<[u8]>>(&self, chain: &[C], hostname: &str) -> bool {
        self.evaluate_certificate_chain(chain, hostname).is_trusted()
    }

    pub fn evaluate_certificate_chain<C: AsRef<[u8]>>(
        &self,
        chain: &[C],
        hostname: &str,
    ) -> PinOutcome {
        let snapshot = self.snapshot();
        let outcome = pinning::evaluate(&snapshot.pinning, chain, hostname);
        if self.audit_logging() {
            audit::pin_decision(hostname, &outcome);
        }
        outcome
    }

    pub fn validate_https(&self, url: &str) -> ValidationResult {
        let result = https::validate(&self.snapshot().https, url);
        if self.audit_logging() {
            audit::url_decision("https_enforcement", url, &result);
        }
        result
    }

    pub fn is_https_enforcing(&self) -> bool {
        self.snapshot().https.is_enforcing()
    }

    pub fn validate_url(&self, url: &str) -> ValidationResult {
        let result = scheme::validate(&self.snapshot().schemes, url);
        if self.audit_logging() {
            audit::url_decision("url_validation", url, &result);
        }
        result
    }

    /// Like [`validate_url`](Self::validate_url), after a raw-string scan for
    /// script-injection tokens.
    pub fn validate_url_with_prefilter(&self, url: &str) -> ValidationResult {
        let result = scheme::validate_with_pattern_prefilter(&self.snapshot().schemes, url);
        if self.audit_logging() {
            audit::url_decision("url_validation", url, &result);
        }
        result
    }

    // ------------------------------------------------------------------
    // Certificate pinning configuration
    // ------------------------------------------------------------------

    pub fn set_pinning_enabled(&self, enabled: bool) {
        self.update("pinning_enabled", if enabled { "on" } else { "off" }, |s| {
            s.pinning.enabled = enabled;
        });
    }

    pub fn is_pinning_enabled(&self) -> bool {
        self.snapshot().pinning.enabled
    }

    /// Add a configuration, replacing any existing one for the same hostname.
    pub fn add_pin_configuration(&self, config: PinConfiguration) -> Option<PinConfiguration> {
        let host = audit::sanitize_host(&config.hostname);
        self.update("pin_added", &host, |s| s.pinning.insert(config))
    }

    pub fn remove_pin_configuration(&self, hostname: &str) -> Option<PinConfiguration> {
        self.update("pin_removed", &audit::sanitize_host(hostname), |s| {
            s.pinning.remove(hostname)
        })
    }

    pub fn clear_pin_configurations(&self) {
        self.update("pins_cleared", "", |s| s.pinning.clear());
    }

    /// All configurations, ordered by hostname.
    pub fn pin_configurations(&self) -> Vec<PinConfiguration> {
        self.snapshot()
            .pinning
            .configurations()
            .values()
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------
    // HTTPS enforcement configuration
    // ------------------------------------------------------------------

    pub fn set_https_strategy(&self, strategy: HttpsStrategy) {
        self.update("https_strategy", strategy.as_str(), |s| {
            s.https.strategy = strategy;
        });
    }

    pub fn https_strategy(&self) -> HttpsStrategy {
        self.snapshot().https.strategy
    }

    pub fn add_allowed_http_host(&self, host: &str) -> bool {
        self.update("http_host_allowed", &audit::sanitize_host(host), |s| {
            s.https.allow_http_host(host)
        })
    }

    pub fn remove_allowed_http_host(&self, host: &str) -> bool {
        self.update("http_host_removed", &audit::sanitize_host(host), |s| {
            s.https.remove_http_host(host)
        })
    }

    pub fn clear_allowed_http_hosts(&self) {
        self.update("http_hosts_cleared", "", |s| s.https.clear_http_hosts());
    }

    pub fn allowed_http_hosts(&self) -> BTreeSet<String> {
        self.snapshot().https.allowed_http_hosts().clone()
    }

    // ------------------------------------------------------------------
    // URL scheme configuration
    // ------------------------------------------------------------------

    pub fn add_safe_scheme(&self, scheme: &str) {
        self.update("scheme_safe", scheme, |s| s.schemes.add_safe(scheme));
    }

    pub fn add_blocked_scheme(&self, scheme: &str) {
        self.update("scheme_blocked", scheme, |s| s.schemes.add_blocked(scheme));
    }

    pub fn remove_safe_scheme(&self, scheme: &str) -> bool {
        self.update("scheme_safe_removed", scheme, |s| s.schemes.remove_safe(scheme))
    }

    pub fn remove_blocked_scheme(&self, scheme: &str) -> bool {
        self.update("scheme_blocked_removed", scheme, |s| {
            s.schemes.remove_blocked(scheme)
        })
    }

    /// Install a rule that runs before the built-in scheme checks.
    ///
    /// A denial from it is returned as-is; an allow falls through to the
    /// built-in checks.
    pub fn set_custom_validator<F>(&self, validator: F)
    where
        F: Fn(&str) -> ValidationResult + Send + Sync + 'static,
    {
        self.update("custom_validator_set", "", |s| {
            s.schemes.set_custom_validator(Arc::new(validator));
        });
    }

    pub fn clear_custom_validator(&self) {
        self.update("custom_validator_cleared", "", |s| {
            s.schemes.clear_custom_validator();
        });
    }

    pub fn classify_scheme(&self, scheme: &str) -> SchemeClass {
        self.snapshot().schemes.classify(scheme)
    }

    pub fn safe_schemes(&self) -> BTreeSet<String> {
        self.snapshot().schemes.safe_schemes().clone()
    }

    pub fn blocked_schemes(&self) -> BTreeSet<String> {
        self.snapshot().schemes.blocked_schemes().clone()
    }

    // ------------------------------------------------------------------
    // Whole-snapshot operations
    // ------------------------------------------------------------------

    /// Swap in a complete policy, e.g. one freshly resolved from config.
    pub fn replace_snapshot(&self, snapshot: PolicySnapshot) -> Arc<PolicySnapshot> {
        let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let previous = self.swap(Arc::new(snapshot));
        if self.audit_logging() {
            audit::config_change("snapshot_replaced", "");
        }
        previous
    }

    /// Clone the current snapshot, apply `mutate`, and publish the result.
    fn update<R>(
        &self,
        event: &'static str,
        detail: &str,
        mutate: impl FnOnce(&mut PolicySnapshot) -> R,
    ) -> R {
        let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        let mut next = (*self.snapshot()).clone();
        let out = mutate(&mut next);
        self.swap(Arc::new(next));

        if self.audit_logging() {
            audit::config_change(event, detail);
        }
        out
    }

    fn swap(&self, next: Arc<PolicySnapshot>) -> Arc<PolicySnapshot> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holder_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PolicyHolder>();
    }

    #[test]
    fn old_snapshot_survives_mutation() {
        let holder = PolicyHolder::new();
        let before = holder.snapshot();
        holder.set_https_strategy(HttpsStrategy::Strict);
        assert_eq!(before.https.strategy, HttpsStrategy::Disabled);
        assert_eq!(holder.https_strategy(), HttpsStrategy::Strict);
    }

    #[test]
    fn replace_snapshot_returns_previous() {
        let holder = PolicyHolder::new();
        holder.add_blocked_scheme("ftp");
        let previous = holder.replace_snapshot(PolicySnapshot::default());
        assert!(previous.schemes.blocked_schemes().contains("ftp"));
        assert!(!holder.blocked_schemes().contains("ftp"));
    }

    #[test]
    fn config_toml_sets_audit_flag() {
        let holder = PolicyHolder::from_config_toml("audit_logging = false").expect("valid");
        assert!(!holder.audit_logging());
        assert!(PolicyHolder::from_config_toml("profile = \"x\"").is_err());
    }
}
