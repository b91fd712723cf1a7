//! Generated X.509 fixtures.

use base64::prelude::*;
use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};
use sha2::{Digest, Sha256};

/// A DER certificate with its SubjectPublicKeyInfo and expected pin.
#[derive(Clone, Debug)]
pub struct CertFixture {
    pub der: Vec<u8>,
    pub spki_der: Vec<u8>,
    pub pin: String,
}

/// A leaf signed by a freshly generated CA.
#[derive(Clone, Debug)]
pub struct ChainFixture {
    pub leaf: Vec<u8>,
    pub leaf_pin: String,
    pub ca: Vec<u8>,
    pub ca_pin: String,
}

impl ChainFixture {
    /// Leaf first, as a TLS stack presents it.
    pub fn ders(&self) -> Vec<Vec<u8>> {
        vec![self.leaf.clone(), self.ca.clone()]
    }
}

/// `base64(sha256(spki_der))`.
pub fn expected_pin(spki_der: &[u8]) -> String {
    BASE64_STANDARD.encode(Sha256::digest(spki_der))
}

fn params(common_name: &str) -> CertificateParams {
    let mut params =
        CertificateParams::new(vec![common_name.to_string()]).expect("valid subject alt name");
    params
        .distinguished_name
        .push(DnType::CommonName, common_name);
    params
}

/// Generates a self-signed certificate with a new key pair.
///
/// # Panics
///
/// Panics if certificate generation fails (test-only).
pub fn self_signed(common_name: &str) -> CertFixture {
    let key = KeyPair::generate().expect("key generation should succeed");
    let cert = params(common_name)
        .self_signed(&key)
        .expect("self-signing should succeed");
    let spki_der = key.public_key_der();

    CertFixture {
        der: cert.der().to_vec(),
        pin: expected_pin(&spki_der),
        spki_der,
    }
}

/// Generates a CA and a leaf for `common_name` signed by it.
///
/// # Panics
///
/// Panics if certificate generation fails (test-only).
pub fn chain(common_name: &str) -> ChainFixture {
    let ca_key = KeyPair::generate().expect("CA key generation should succeed");
    let mut ca_params = CertificateParams::default();
    ca_params
        .distinguished_name
        .push(DnType::CommonName, "Navguard Test CA");
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let ca_cert = ca_params
        .self_signed(&ca_key)
        .expect("CA self-signing should succeed");

    let leaf_key = KeyPair::generate().expect("leaf key generation should succeed");
    let leaf_cert = params(common_name)
        .signed_by(&leaf_key, &ca_cert, &ca_key)
        .expect("leaf signing should succeed");

    ChainFixture {
        leaf: leaf_cert.der().to_vec(),
        leaf_pin: expected_pin(&leaf_key.public_key_der()),
        ca: ca_cert.der().to_vec(),
        ca_pin: expected_pin(&ca_key.public_key_der()),
    }
}

/// Bytes that are not a certificate.
pub fn garbage() -> Vec<u8> {
    b"definitely not DER".to_vec()
}
