//! Pure request security policy evaluation (no IO).
//!
//! Input: a request fact (certificate chain, URL string) and an immutable policy value.
//! Output: an allow/deny decision with a stable code.
//!
//! The three evaluators are independent; none calls another.

#![forbid(unsafe_code)]

pub mod https;
pub mod pinning;
pub mod policy;
pub mod scheme;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use pinning::{CertificateError, PinOutcome, hash_public_key};
pub use policy::{
    CustomValidator, HttpsPolicy, PinConfiguration, PinPolicy, PolicySnapshot, SchemePolicy,
};
