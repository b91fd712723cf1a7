use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How plain-HTTP requests are treated.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum HttpsStrategy {
    /// Allow both HTTP and HTTPS.
    #[default]
    Disabled,
    /// Rewrite HTTP to HTTPS.
    Upgrade,
    /// Block HTTP outright.
    Strict,
}

impl HttpsStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpsStrategy::Disabled => "disabled",
            HttpsStrategy::Upgrade => "upgrade",
            HttpsStrategy::Strict => "strict",
        }
    }

    /// `true` for `Upgrade` and `Strict`.
    pub fn is_enforcing(self) -> bool {
        match self {
            HttpsStrategy::Disabled => false,
            HttpsStrategy::Upgrade | HttpsStrategy::Strict => true,
        }
    }
}

impl fmt::Display for HttpsStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown https strategy: {} (expected disabled|upgrade|strict)",
            self.0
        )
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for HttpsStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" => Ok(HttpsStrategy::Disabled),
            "upgrade" => Ok(HttpsStrategy::Upgrade),
            "strict" => Ok(HttpsStrategy::Strict),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Classification of a lowercase scheme against the configured sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SchemeClass {
    Safe,
    Blocked,
    Unknown,
}
