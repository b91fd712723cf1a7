use navguard_domain::{HttpsPolicy, PinPolicy, PolicySnapshot, SchemePolicy};
use navguard_types::HttpsStrategy;
use std::fmt;

/// Preset profiles are opinionated starting points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    /// Pinning off, HTTP allowed.
    #[default]
    Permissive,
    /// Pinning on, HTTP upgraded.
    Balanced,
    /// Pinning on, HTTP blocked.
    Strict,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Permissive => "permissive",
            Profile::Balanced => "balanced",
            Profile::Strict => "strict",
        }
    }

    pub fn parse(v: &str) -> anyhow::Result<Self> {
        match v {
            "permissive" => Ok(Profile::Permissive),
            "balanced" => Ok(Profile::Balanced),
            "strict" => Ok(Profile::Strict),
            other => anyhow::bail!("unknown profile: {other} (expected permissive|balanced|strict)"),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot for a profile. Every profile starts from the default scheme sets.
pub fn preset(profile: Profile) -> PolicySnapshot {
    match profile {
        Profile::Permissive => permissive_profile(),
        Profile::Balanced => balanced_profile(),
        Profile::Strict => strict_profile(),
    }
}

fn permissive_profile() -> PolicySnapshot {
    PolicySnapshot::default()
}

fn balanced_profile() -> PolicySnapshot {
    PolicySnapshot {
        pinning: PinPolicy::new(true),
        https: HttpsPolicy::new(HttpsStrategy::Upgrade),
        schemes: SchemePolicy::default(),
    }
}

fn strict_profile() -> PolicySnapshot {
    PolicySnapshot {
        pinning: PinPolicy::new(true),
        https: HttpsPolicy::new(HttpsStrategy::Strict),
        schemes: SchemePolicy::default(),
    }
}
