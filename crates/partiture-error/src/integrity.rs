// Integrity errors
// Referential-integrity violations found in scheduled trees and partitures

use thiserror::Error;

/// Structured integrity violation: always names the offending node, term or edge
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrityError {
    #[error("unsupported partiture version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("partiture has no terms")]
    NoTerms,

    #[error("term {term} has invalid weight {weight}")]
    InvalidTermWeight { term: usize, weight: f64 },

    #[error("term {term} declares family {family} but symbol {symbol}")]
    SymbolFamilyMismatch {
        term: usize,
        symbol: String,
        family: String,
    },

    #[error("term {term} is missing parameter '{name}'")]
    MissingTermParam { term: usize, name: String },

    #[error("term {term} has unknown or non-finite parameter '{name}' = {value}")]
    InvalidTermParam { term: usize, name: String, value: f64 },

    #[error("expected {expected} schedule edges for the term list, found {found}")]
    EdgeCount { expected: usize, found: usize },

    #[error("edge {edge} has an empty operand")]
    EmptyOperand { edge: usize },

    #[error("edge {edge} references term {index} but only {terms} terms exist")]
    DanglingTermIndex {
        edge: usize,
        index: usize,
        terms: usize,
    },

    #[error("edge {edge} uses term {index} more than once")]
    OverlappingOperands { edge: usize, index: usize },

    /// Operand set that is neither a single term nor exactly another edge
    #[error("edge {edge} has an operand that is not a term or a nested edge")]
    UnanchoredOperand { edge: usize },

    #[error("edge {edge} is nested under more than one parent")]
    SharedOperand { edge: usize },

    #[error("edge {edge} is not reachable from the root edge")]
    DetachedEdge { edge: usize },

    #[error("edge {edge} sits at depth {expected} but records depth {found}")]
    DepthMismatch {
        edge: usize,
        expected: usize,
        found: usize,
    },

    #[error("root edge {edge} does not cover every term")]
    RootCoverage { edge: usize },

    #[error("edge {edge} has a composite schedule with fewer than two distinct kinds")]
    InvalidComposite { edge: usize },

    #[error("edge {edge} is missing schedule parameter '{name}'")]
    MissingKindParam { edge: usize, name: &'static str },

    #[error("edge {edge} has invalid schedule parameter '{name}' = {value}")]
    InvalidKindParam {
        edge: usize,
        name: &'static str,
        value: f64,
    },

    #[error("edge {edge} has invalid weight {weight}")]
    InvalidEdgeWeight { edge: usize, weight: f64 },

    #[error("relation node {node} has no schedule assignment")]
    UnassignedNode { node: usize },

    #[error("node {node} carries a schedule assignment but is not a relation")]
    StrayAssignment { node: usize },

    #[error("node {node} has a malformed schedule assignment")]
    MalformedAssignment { node: usize },

    #[error("node {node} has invalid coefficient {value}")]
    InvalidCoefficient { node: usize, value: f64 },
}

impl IntegrityError {
    /// The offending node, term or edge, rendered for presentation
    pub fn fragment(&self) -> Option<String> {
        match self {
            IntegrityError::UnsupportedVersion { found, .. } => Some(format!("version {}", found)),
            IntegrityError::NoTerms | IntegrityError::EdgeCount { .. } => None,
            IntegrityError::InvalidTermWeight { term, .. }
            | IntegrityError::SymbolFamilyMismatch { term, .. }
            | IntegrityError::MissingTermParam { term, .. }
            | IntegrityError::InvalidTermParam { term, .. } => Some(format!("term {}", term)),
            IntegrityError::DanglingTermIndex { index, .. }
            | IntegrityError::OverlappingOperands { index, .. } => Some(format!("term {}", index)),
            IntegrityError::EmptyOperand { edge }
            | IntegrityError::UnanchoredOperand { edge }
            | IntegrityError::SharedOperand { edge }
            | IntegrityError::DetachedEdge { edge }
            | IntegrityError::DepthMismatch { edge, .. }
            | IntegrityError::RootCoverage { edge }
            | IntegrityError::InvalidComposite { edge }
            | IntegrityError::MissingKindParam { edge, .. }
            | IntegrityError::InvalidKindParam { edge, .. }
            | IntegrityError::InvalidEdgeWeight { edge, .. } => Some(format!("edge {}", edge)),
            IntegrityError::UnassignedNode { node }
            | IntegrityError::StrayAssignment { node }
            | IntegrityError::MalformedAssignment { node }
            | IntegrityError::InvalidCoefficient { node, .. } => Some(format!("node {}", node)),
        }
    }
}
