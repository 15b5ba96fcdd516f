//! Engine error types.

use thiserror::Error;

/// Errors raised while merging configuration contributions.
///
/// These are fatal to the unit being resolved and are propagated to the
/// caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilerError {
    /// A dict-union field was given something other than a mapping.
    #[error("Invalid config field: \"{field}\" must be a dict")]
    InvalidConfigField { field: String },
}

impl CompilerError {
    pub(crate) fn invalid_field(field: &str) -> Self {
        CompilerError::InvalidConfigField {
            field: field.to_string(),
        }
    }

    /// Name of the offending configuration field.
    pub fn field(&self) -> &str {
        match self {
            CompilerError::InvalidConfigField { field } => field,
        }
    }
}
