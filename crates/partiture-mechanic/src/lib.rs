//! Partiture Mechanic
//!
//! Generates executable training objectives from Mathematical Partitures and
//! hosts them in a minimal agent skeleton.

pub mod artifact;
pub mod combinator;
pub mod error;
pub mod generator;
pub mod realization;
pub mod sample;
pub mod skeleton;

pub use artifact::{PartitureObjective, TrainingObjective, AGENT_SKELETON_CAPABILITY};
pub use combinator::{Combinator, CombinatorRegistry, Drag, Orbital, Switching};
pub use error::EvaluationError;
pub use generator::Mechanic;
pub use realization::{
    ComplexityMinimization, ContrastDiscrimination, EntropyMaximization, EntropyValueBalance,
    GroupMeanAggregation, NoveltyMaximization, ObjectiveRealization, RealizationRegistry,
    RegressionFit, TrajectoryAlignment,
};
pub use sample::{batch_from_json, check_batch, Sample};
pub use skeleton::{AgentSkeleton, StepReport};
