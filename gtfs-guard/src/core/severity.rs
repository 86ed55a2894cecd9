//! Notice severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity of a notice.
///
/// Every notice kind has exactly one severity. Severities are ordered:
/// `Error > Warning > Info`.
///
/// # Usage Guidelines
///
/// - **Error**: the feed violates the GTFS reference and consumers may reject
///   or misinterpret it
///   - Broken references between tables
///   - Service ranges that end before they start
///   - Required files missing
///
/// - **Warning**: the feed is usable but likely wrong or wasteful
///   - Shapes no trip uses
///   - Required files present but empty
///
/// - **Info**: observations that need no action
///
/// # Comparison
///
/// ```rust
/// use gtfs_guard::core::Severity;
///
/// assert!(Severity::Error > Severity::Warning);
/// assert!(Severity::Warning > Severity::Info);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Informational observation
    Info = 0,
    /// Likely problem that does not break consumers
    #[default]
    Warning = 1,
    /// Violation of the GTFS reference
    Error = 2,
}

impl Severity {
    /// Returns the string representation of the severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }

    /// Checks if this severity is at least as high as another.
    ///
    /// ```rust
    /// use gtfs_guard::core::Severity;
    ///
    /// assert!(Severity::Error.is_at_least(Severity::Warning));
    /// assert!(Severity::Warning.is_at_least(Severity::Warning));
    /// assert!(!Severity::Info.is_at_least(Severity::Error));
    /// ```
    pub fn is_at_least(&self, other: Severity) -> bool {
        *self >= other
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
