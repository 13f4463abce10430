//! Form toolkit error types.

use thiserror::Error;

/// Errors raised while constructing a validation schema.
///
/// Validation itself never errors: rule evaluation is pure and reports
/// failures as [`ErrorMap`](crate::ErrorMap) entries, not as `Err`.
#[derive(Debug, Error)]
pub enum FormsError {
    /// A pattern rule was given an invalid regular expression.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
