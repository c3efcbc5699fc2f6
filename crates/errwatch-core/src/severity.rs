//! Severity tiers and the mapping from raw error codes onto them.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::signal::ErrorCode;

/// Normalised severity attached to every forwarded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    /// Informational findings such as deprecations.
    Notice,
    /// Recoverable problems.
    Warning,
    /// Errors, and the fallback for anything unclassified.
    Error,
}

impl SeverityTier {
    /// Lowercase label used in structured output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Display for SeverityTier {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Classify a raw error code into a severity tier.
///
/// Codes that are not explicitly notice- or warning-class land on
/// [`SeverityTier::Error`], including codes this crate does not know about.
/// `Other` values carrying a known bit classify as that code.
#[must_use]
pub const fn classify(code: ErrorCode) -> SeverityTier {
    match code.canonical() {
        ErrorCode::Notice
        | ErrorCode::UserNotice
        | ErrorCode::Strict
        | ErrorCode::Deprecated
        | ErrorCode::UserDeprecated => SeverityTier::Notice,
        ErrorCode::Warning
        | ErrorCode::CoreWarning
        | ErrorCode::CompileWarning
        | ErrorCode::UserWarning => SeverityTier::Warning,
        _ => SeverityTier::Error,
    }
}

/// Capability for mapping error codes onto severity tiers.
pub trait Classifier: Send + Sync {
    /// Classify `code`. Implementations must be total and side-effect free.
    fn classify(&self, code: ErrorCode) -> SeverityTier;
}

/// Classifier backed by [`classify`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl Classifier for DefaultClassifier {
    fn classify(&self, code: ErrorCode) -> SeverityTier {
        classify(code)
    }
}
