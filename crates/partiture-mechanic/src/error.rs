// Evaluation errors
// Failures of a generated objective at training time

use thiserror::Error;

/// Errors an artifact reports while evaluating or reconfiguring
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("cannot evaluate an empty batch")]
    EmptyBatch,

    #[error("sample {sample} has {found} {field} entries, expected {expected}")]
    DimensionMismatch {
        sample: usize,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("sample {sample} has no action probabilities, required by {family}")]
    MissingActionProbabilities { sample: usize, family: &'static str },

    #[error("{what} evaluated to a non-finite value")]
    NonFinite { what: String },

    #[error("unknown hyperparameter '{name}'")]
    UnknownHyperparameter { name: String },

    #[error("invalid value {value} for hyperparameter '{name}'")]
    InvalidValue { name: String, value: f64 },
}
