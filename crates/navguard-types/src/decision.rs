use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decision code paired with its advisory message.
///
/// `message` is loggable text and must never carry query strings or fragments
/// from the evaluated URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Reason {
    pub code: String,
    pub message: String,
}

impl Reason {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Outcome of a URL-level evaluation.
///
/// An upgraded URL can only exist on `Allowed`, and a denial always carries a
/// reason. Allowed results may still carry a `note` (e.g. the host was
/// whitelisted, or the URL was upgraded).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum ValidationResult {
    Allowed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upgraded_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<Reason>,
    },
    Denied {
        reason: Reason,
    },
}

impl ValidationResult {
    pub fn allow() -> Self {
        ValidationResult::Allowed {
            upgraded_url: None,
            note: None,
        }
    }

    pub fn allow_with_note(note: Reason) -> Self {
        ValidationResult::Allowed {
            upgraded_url: None,
            note: Some(note),
        }
    }

    pub fn upgraded(url: impl Into<String>, note: Reason) -> Self {
        ValidationResult::Allowed {
            upgraded_url: Some(url.into()),
            note: Some(note),
        }
    }

    pub fn deny(reason: Reason) -> Self {
        ValidationResult::Denied { reason }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, ValidationResult::Allowed { .. })
    }

    pub fn upgraded_url(&self) -> Option<&str> {
        match self {
            ValidationResult::Allowed { upgraded_url, .. } => upgraded_url.as_deref(),
            ValidationResult::Denied { .. } => None,
        }
    }

    /// The denial reason, or the note attached to an allowed result.
    pub fn reason(&self) -> Option<&Reason> {
        match self {
            ValidationResult::Allowed { note, .. } => note.as_ref(),
            ValidationResult::Denied { reason } => Some(reason),
        }
    }

    /// The denial reason only.
    pub fn denial(&self) -> Option<&Reason> {
        match self {
            ValidationResult::Allowed { .. } => None,
            ValidationResult::Denied { reason } => Some(reason),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.reason().map(|r| r.code.as_str())
    }
}
