//! Partiture
//!
//! Compiles cognitive algebra into Mathematical Partitures and generates
//! executable training objectives from them. The pipeline runs in four
//! stages, each of which either produces its whole output or one [`Error`]:
//!
//! 1. [`parse`] algebra text into an [`AlgebraTree`]
//! 2. resolve every relation to a schedule with the [`ScheduleResolver`]
//! 3. compile the scheduled tree into a [`Partiture`]
//! 4. generate a [`PartitureObjective`] with the [`Mechanic`]
//!
//! [`Pipeline`] runs the stages with one configuration.

pub mod pipeline;

pub use pipeline::{compile, Pipeline};

pub use partiture_algebra::{
    parse, AlgebraNode, AlgebraTree, ResolutionMode, ScheduleResolver, ScheduledTree,
};
pub use partiture_error::{Error, ErrorKind, ErrorReport, Result};
pub use partiture_ir::{render_report, Partiture, PartitureCompiler, PARTITURE_VERSION};
pub use partiture_mechanic::{
    batch_from_json, AgentSkeleton, EvaluationError, Mechanic, PartitureObjective, Sample,
    StepReport, TrainingObjective,
};
pub use partiture_types::{
    CognitiveFunction, ConfigError, ObjectiveFamily, PipelineConfig, ScheduleAssignment,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
