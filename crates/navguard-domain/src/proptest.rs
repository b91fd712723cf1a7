//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Evaluators returning a decision (never panicking) for arbitrary input
//! - Scheme set disjointness under arbitrary mutation sequences
//! - Pin resolution for subdomains
//! - Upgrade rewriting

use crate::pinning::{self, PinOutcome};
use crate::policy::{PinConfiguration, PinPolicy, SchemePolicy};
use crate::test_support::https_policy;
use crate::{https, scheme};
use navguard_types::{HttpsStrategy, SchemeClass, ids};
use proptest::prelude::*;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_label() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9-]{0,12}").unwrap()
}

fn arb_host() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_label(), 1..4).prop_map(|labels| labels.join("."))
}

fn arb_strategy() -> impl Strategy<Value = HttpsStrategy> {
    prop_oneof![
        Just(HttpsStrategy::Disabled),
        Just(HttpsStrategy::Upgrade),
        Just(HttpsStrategy::Strict),
    ]
}

fn arb_scheme() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("http".to_string()),
        Just("JavaScript".to_string()),
        Just("file".to_string()),
        Just("data".to_string()),
        prop::string::string_regex("[a-zA-Z][a-zA-Z0-9+.-]{0,8}").unwrap(),
    ]
}

/// Either a full URL-ish string or raw noise.
fn arb_url_input() -> impl Strategy<Value = String> {
    prop_oneof![
        (arb_scheme(), arb_host(), "[ -~]{0,40}")
            .prop_map(|(s, h, rest)| format!("{s}://{h}/{rest}")),
        (arb_scheme(), "[ -~]{0,40}").prop_map(|(s, rest)| format!("{s}:{rest}")),
        any::<String>(),
    ]
}

#[derive(Clone, Debug)]
enum SchemeOp {
    AddSafe(String),
    AddBlocked(String),
    RemoveSafe(String),
    RemoveBlocked(String),
}

fn arb_scheme_op() -> impl Strategy<Value = SchemeOp> {
    prop_oneof![
        arb_scheme().prop_map(SchemeOp::AddSafe),
        arb_scheme().prop_map(SchemeOp::AddBlocked),
        arb_scheme().prop_map(SchemeOp::RemoveSafe),
        arb_scheme().prop_map(SchemeOp::RemoveBlocked),
    ]
}

// ============================================================================
// Evaluators are total
// ============================================================================

proptest! {
    #[test]
    fn url_validation_never_panics(input in arb_url_input()) {
        let policy = SchemePolicy::default();
        let _ = scheme::validate(&policy, &input);
        let _ = scheme::validate_with_pattern_prefilter(&policy, &input);
    }

    #[test]
    fn https_validation_never_panics(input in arb_url_input(), strategy in arb_strategy()) {
        let policy = https_policy(strategy, &["localhost"]);
        let result = https::validate(&policy, &input);
        // An upgrade is only ever reported on an allowed result.
        if result.upgraded_url().is_some() {
            prop_assert!(result.is_allowed());
        }
    }

    #[test]
    fn pinning_never_panics_on_garbage(
        chain in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..4),
        host in arb_host(),
    ) {
        let mut policy = PinPolicy::new(true);
        policy.insert(PinConfiguration::new(host.clone(), ["AAAA"]));
        let outcome = pinning::evaluate(&policy, &chain, &host);
        prop_assert!(!outcome.is_trusted());
    }
}

// ============================================================================
// Policy invariants
// ============================================================================

proptest! {
    #[test]
    fn scheme_sets_stay_disjoint(ops in prop::collection::vec(arb_scheme_op(), 0..24)) {
        let mut policy = SchemePolicy::default();
        for op in ops {
            match op {
                SchemeOp::AddSafe(s) => policy.add_safe(&s),
                SchemeOp::AddBlocked(s) => policy.add_blocked(&s),
                SchemeOp::RemoveSafe(s) => { policy.remove_safe(&s); }
                SchemeOp::RemoveBlocked(s) => { policy.remove_blocked(&s); }
            }
        }
        for s in policy.safe_schemes() {
            prop_assert!(!policy.blocked_schemes().contains(s));
            prop_assert_eq!(s.to_lowercase(), s.clone());
        }
    }

    #[test]
    fn blocked_scheme_is_always_denied(name in "[a-z][a-z0-9]{0,8}", host in arb_host()) {
        let mut policy = SchemePolicy::default();
        policy.add_blocked(&name);
        prop_assert_eq!(policy.classify(&name), SchemeClass::Blocked);
        let result = scheme::validate(&policy, &format!("{name}://{host}/"));
        prop_assert!(!result.is_allowed());
    }

    #[test]
    fn subdomains_resolve_to_parent_only_with_flag(
        parent in arb_host(),
        prefix in prop::collection::vec(arb_label(), 1..3),
        include in any::<bool>(),
    ) {
        let mut policy = PinPolicy::new(true);
        policy.insert(PinConfiguration::new(parent.clone(), ["AAAA"]).include_subdomains(include));
        let host = format!("{}.{}", prefix.join("."), parent);

        let resolved = policy.resolve(&host).map(|c| c.hostname.clone());
        if include {
            prop_assert_eq!(resolved, Some(parent));
        } else {
            prop_assert_eq!(resolved, None);
        }
    }

    #[test]
    fn disabled_pinning_trusts_every_chain(
        chain in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..4),
        host in arb_host(),
    ) {
        let mut policy = PinPolicy::new(false);
        policy.insert(PinConfiguration::new(host.clone(), ["AAAA"]));
        prop_assert_eq!(pinning::evaluate(&policy, &chain, &host), PinOutcome::PinningDisabled);
    }

    #[test]
    fn upgrade_keeps_the_query(
        host in arb_host(),
        path in "[a-z0-9/]{0,20}",
        query in "[a-z0-9=&]{0,20}",
    ) {
        let policy = https_policy(HttpsStrategy::Upgrade, &[]);
        let input = format!("http://{host}/{path}?{query}");
        let result = https::validate(&policy, &input);
        prop_assert_eq!(result.code(), Some(ids::CODE_HTTPS_UPGRADED));
        let upgraded = result.upgraded_url().unwrap_or_default();
        prop_assert!(upgraded.starts_with("https://"));
        let tail = format!("?{query}");
        prop_assert!(upgraded.ends_with(&tail));
    }
}
