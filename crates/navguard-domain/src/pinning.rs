//! Certificate public-key pinning.
//!
//! A pin is `base64(sha256(SubjectPublicKeyInfo DER))`, standard alphabet, no wrapping.
//! Pinning fails open: when it is disabled, or no configuration applies to the
//! host, any non-empty chain is accepted.

use crate::policy::PinPolicy;
use base64::prelude::*;
use navguard_types::ids;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    #[error("malformed certificate: {0}")]
    Malformed(String),

    #[error("{0} trailing bytes after certificate")]
    TrailingData(usize),
}

/// Borrow the SubjectPublicKeyInfo DER out of an X.509 DER certificate.
pub fn subject_public_key_info(der: &[u8]) -> Result<&[u8], CertificateError> {
    let (rest, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|e| CertificateError::Malformed(e.to_string()))?;
    if !rest.is_empty() {
        return Err(CertificateError::TrailingData(rest.len()));
    }
    Ok(cert.tbs_certificate.subject_pki.raw)
}

/// Pin value for an already-extracted SubjectPublicKeyInfo.
pub fn spki_pin(spki_der: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(spki_der);
    let digest = hasher.finalize();
    BASE64_STANDARD.encode(digest)
}

/// Pin value for a DER certificate, or `None` if no public key can be extracted.
pub fn hash_public_key(certificate_der: &[u8]) -> Option<String> {
    subject_public_key_info(certificate_der)
        .ok()
        .map(spki_pin)
}

/// Why a chain was accepted or rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PinOutcome {
    PinningDisabled,
    EmptyChain,
    NotPinned,
    NoExtractableKeys { pinned_host: String },
    Matched { pinned_host: String },
    Mismatch { pinned_host: String },
}

impl PinOutcome {
    pub fn is_trusted(&self) -> bool {
        match self {
            PinOutcome::PinningDisabled | PinOutcome::NotPinned | PinOutcome::Matched { .. } => {
                true
            }
            PinOutcome::EmptyChain
            | PinOutcome::NoExtractableKeys { .. }
            | PinOutcome::Mismatch { .. } => false,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PinOutcome::PinningDisabled => ids::CODE_PIN_DISABLED,
            PinOutcome::EmptyChain => ids::CODE_PIN_EMPTY_CHAIN,
            PinOutcome::NotPinned => ids::CODE_PIN_NOT_PINNED,
            PinOutcome::NoExtractableKeys { .. } => ids::CODE_PIN_NO_EXTRACTABLE_KEYS,
            PinOutcome::Matched { .. } => ids::CODE_PIN_MATCHED,
            PinOutcome::Mismatch { .. } => ids::CODE_PIN_MISMATCH,
        }
    }

    /// The configuration key that applied, if any.
    pub fn pinned_host(&self) -> Option<&str> {
        match self {
            PinOutcome::NoExtractableKeys { pinned_host }
            | PinOutcome::Matched { pinned_host }
            | PinOutcome::Mismatch { pinned_host } => Some(pinned_host),
            PinOutcome::PinningDisabled | PinOutcome::EmptyChain | PinOutcome::NotPinned => None,
        }
    }
}

/// Evaluate a leaf-first DER chain against the pins for `hostname`.
pub fn evaluate<C: AsRef<[u8]>>(policy: &PinPolicy, chain: &[C], hostname: &str) -> PinOutcome {
    if !policy.enabled {
        return PinOutcome::PinningDisabled;
    }

    if chain.is_empty() {
        return PinOutcome::EmptyChain;
    }

    let Some(config) = policy.resolve(hostname) else {
        return PinOutcome::NotPinned;
    };
    let pinned_host = config.hostname.clone();

    // A certificate without an extractable key simply contributes nothing.
    let candidates: BTreeSet<String> = chain
        .iter()
        .filter_map(|cert| hash_public_key(cert.as_ref()))
        .collect();

    if candidates.is_empty() {
        return PinOutcome::NoExtractableKeys { pinned_host };
    }

    if candidates.iter().any(|hash| config.pins(hash)) {
        PinOutcome::Matched { pinned_host }
    } else {
        PinOutcome::Mismatch { pinned_host }
    }
}

/// `evaluate(..).is_trusted()`.
pub fn validate<C: AsRef<[u8]>>(policy: &PinPolicy, chain: &[C], hostname: &str) -> bool {
    evaluate(policy, chain, hostname).is_trusted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use navguard_test_util::certs;

    #[test]
    fn hash_matches_independently_computed_spki_pin() {
        let cert = certs::self_signed("pin.example.com");
        assert_eq!(hash_public_key(&cert.der).as_deref(), Some(cert.pin.as_str()));
    }

    #[test]
    fn pin_is_standard_base64_of_32_bytes() {
        let cert = certs::self_signed("pin.example.com");
        let pin = hash_public_key(&cert.der).expect("pin");
        assert_eq!(pin.len(), 44);
        assert!(pin.ends_with('='));
        assert!(!pin.contains('\n'));
        let raw = BASE64_STANDARD.decode(&pin).expect("decodes");
        assert_eq!(raw.len(), 32);
    }

    #[test]
    fn spki_is_the_key_pair_public_key_der() {
        let cert = certs::self_signed("spki.example.com");
        let spki = subject_public_key_info(&cert.der).expect("spki");
        assert_eq!(spki, cert.spki_der.as_slice());
    }

    #[test]
    fn garbage_yields_no_hash() {
        assert!(hash_public_key(&certs::garbage()).is_none());
        assert!(hash_public_key(&[]).is_none());
        assert!(matches!(
            subject_public_key_info(&certs::garbage()),
            Err(CertificateError::Malformed(_))
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut der = certs::self_signed("trail.example.com").der;
        der.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(
            subject_public_key_info(&der),
            Err(CertificateError::TrailingData(3))
        ));
    }

    #[test]
    fn outcome_codes_are_stable() {
        assert_eq!(PinOutcome::PinningDisabled.code(), "pin.disabled");
        assert_eq!(
            PinOutcome::Mismatch {
                pinned_host: "h".into()
            }
            .code(),
            "pin.mismatch"
        );
        assert_eq!(PinOutcome::NotPinned.pinned_host(), None);
    }
}
