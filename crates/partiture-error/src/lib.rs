// Partiture Error Handling
// Central location for the error taxonomy shared by every pipeline stage

use std::fmt;
use thiserror::Error;

// Re-export for crates that only need the derive
pub use thiserror;

mod generation;
mod integrity;
mod parse;
mod traits;

pub use generation::GenerationError;
pub use integrity::IntegrityError;
pub use parse::{ParseError, Span};
pub use traits::Validate;

/// Error kinds, one per failure class a pipeline stage can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Parse,
    UnresolvedSymbol,
    UnresolvedSchedule,
    CompileIntegrity,
    Generation,
    Codec,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Parse => write!(f, "ParseError"),
            ErrorKind::UnresolvedSymbol => write!(f, "UnresolvedSymbol"),
            ErrorKind::UnresolvedSchedule => write!(f, "UnresolvedSchedule"),
            ErrorKind::CompileIntegrity => write!(f, "CompileIntegrityError"),
            ErrorKind::Generation => write!(f, "GenerationError"),
            ErrorKind::Codec => write!(f, "CodecError"),
        }
    }
}

/// The error every stage of the pipeline returns.
///
/// A stage either produces its full output or exactly one of these kinds;
/// there are no partial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A leaf whose symbol is outside the closed vocabulary, or whose family
    /// disagrees with the symbol table
    #[error("unresolved symbol '{symbol}' at node {node}")]
    UnresolvedSymbol { symbol: String, node: usize },

    /// Operator/operand pair absent from the resolution table in strict mode
    #[error("no schedule for '{left} {operator} {right}' at node {node}")]
    UnresolvedSchedule {
        operator: String,
        left: String,
        right: String,
        node: usize,
    },

    #[error("partiture integrity violation: {0}")]
    CompileIntegrity(#[from] IntegrityError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// A persisted partiture could not be decoded
    #[error("partiture codec error: {0}")]
    Codec(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) => ErrorKind::Parse,
            Error::UnresolvedSymbol { .. } => ErrorKind::UnresolvedSymbol,
            Error::UnresolvedSchedule { .. } => ErrorKind::UnresolvedSchedule,
            Error::CompileIntegrity(_) => ErrorKind::CompileIntegrity,
            Error::Generation(_) => ErrorKind::Generation,
            Error::Codec(_) => ErrorKind::Codec,
        }
    }

    /// Returns a unique static string code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Parse(_) => "PARSE_ERROR",
            Error::UnresolvedSymbol { .. } => "UNRESOLVED_SYMBOL",
            Error::UnresolvedSchedule { .. } => "UNRESOLVED_SCHEDULE",
            Error::CompileIntegrity(_) => "COMPILE_INTEGRITY_ERROR",
            Error::Generation(_) => "GENERATION_ERROR",
            Error::Codec(_) => "CODEC_ERROR",
        }
    }

    /// The offending fragment (symbol, operator, node or term index), if any
    pub fn fragment(&self) -> Option<String> {
        match self {
            Error::Parse(err) => err.fragment(),
            Error::UnresolvedSymbol { symbol, .. } => Some(symbol.clone()),
            Error::UnresolvedSchedule { operator, left, right, .. } => {
                Some(format!("{} {} {}", left, operator, right))
            }
            Error::CompileIntegrity(err) => err.fragment(),
            Error::Generation(err) => Some(err.fragment()),
            Error::Codec(_) => None,
        }
    }

    /// Build the serializable report the outer application presents
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.error_code().to_string(),
            kind: self.kind(),
            message: self.to_string(),
            fragment: self.fragment(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

/// Standard error message format for serialization
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ErrorReport {
    pub code: String,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
}
