use crate::policy::{
    CustomValidator, HttpsPolicy, PinConfiguration, PinPolicy, PolicySnapshot, SchemePolicy,
};
use navguard_types::{HttpsStrategy, Reason, ValidationResult, ids};
use std::sync::Arc;

pub fn pin_policy(configs: Vec<PinConfiguration>) -> PinPolicy {
    let mut policy = PinPolicy::new(true);
    for config in configs {
        policy.insert(config);
    }
    policy
}

pub fn pinned(host: &str, pins: &[&str], include_subdomains: bool) -> PinConfiguration {
    PinConfiguration::new(host, pins.iter().copied()).include_subdomains(include_subdomains)
}

pub fn https_policy(strategy: HttpsStrategy, allowed: &[&str]) -> HttpsPolicy {
    let mut policy = HttpsPolicy::new(strategy);
    for host in allowed {
        policy.allow_http_host(host);
    }
    policy
}

/// Rejects any URL containing `needle`, allows everything else.
pub fn rejecting_validator(needle: &'static str) -> CustomValidator {
    Arc::new(move |url: &str| {
        if url.contains(needle) {
            ValidationResult::deny(Reason::new(
                ids::CODE_URL_CUSTOM_RULE,
                format!("custom rule rejected '{needle}'"),
            ))
        } else {
            ValidationResult::allow()
        }
    })
}

pub fn snapshot(pinning: PinPolicy, https: HttpsPolicy, schemes: SchemePolicy) -> PolicySnapshot {
    PolicySnapshot {
        pinning,
        https,
        schemes,
    }
}
