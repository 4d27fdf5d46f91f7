// Generation errors
// Failures of the code generator to realize a partiture

use thiserror::Error;

/// Errors raised while instantiating an artifact from a partiture
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Objective family with no registered numeric realization
    #[error("no numeric realization registered for family '{family}' (term {term})")]
    NoRealization { family: String, term: usize },

    /// Schedule kind with no registered combinator
    #[error("no combinator registered for schedule kind '{kind}' (edge {edge})")]
    NoCombinator { kind: String, edge: usize },

    /// The artifact does not satisfy the agent skeleton's capability
    #[error("capability '{found}' is not compatible with '{expected}'")]
    CapabilityMismatch {
        expected: &'static str,
        found: String,
    },
}

impl GenerationError {
    /// The offending family, kind or capability
    pub fn fragment(&self) -> String {
        match self {
            GenerationError::NoRealization { family, .. } => family.clone(),
            GenerationError::NoCombinator { kind, .. } => kind.clone(),
            GenerationError::CapabilityMismatch { found, .. } => found.clone(),
        }
    }
}
