//! Cognitive algebra front half of the partiture pipeline
//!
//! Tokenizes and parses algebra text into a validated [`AlgebraTree`], then
//! resolves every relation to a schedule with the [`ScheduleResolver`].

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod table;

pub use ast::{AlgebraNode, AlgebraTree, Leaf, NodeId, NodeKind, Relation};
pub use lexer::{tokenize, SpannedToken, Token};
pub use parser::{parse, MAX_ACCELERATION, MAX_NESTING_DEPTH, MAX_TREE_HEIGHT};
pub use resolver::{Resolution, ResolutionMode, ResolutionSource, ScheduleResolver, ScheduledTree};
pub use table::{ResolutionKey, ResolutionTable};
