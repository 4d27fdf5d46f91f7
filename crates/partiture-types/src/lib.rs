//! Partiture core types
//!
//! The closed vocabulary of the cognitive algebra: the eight function symbols and
//! the objective families they map to, the relation operators, the schedule kinds
//! a relation can resolve to, and the pipeline configuration.

pub mod config;
pub mod family;
pub mod operator;
pub mod schedule;
pub mod symbol;

pub use config::{CompilerConfig, ConfigError, PipelineConfig, ResolverConfig, MIN_DEPTH_DECAY};
pub use family::{ObjectiveFamily, Params};
pub use operator::RelationOperator;
pub use schedule::{ScheduleAssignment, ScheduleKind, ScheduleParams};
pub use symbol::{Attitude, Axis, CognitiveFunction, Process, SymbolEntry, SymbolTable};

// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
