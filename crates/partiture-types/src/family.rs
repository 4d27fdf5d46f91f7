// Objective families
// The numeric objective each cognitive function is bound to

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::symbol::CognitiveFunction;

/// Named hyperparameters of a term, ordered for deterministic encoding
pub type Params = BTreeMap<String, f64>;

/// Numeric objective family. Every symbol maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveFamily {
    /// Maximize policy entropy (Se)
    EntropyMaximization,
    /// Minimize dispersion around the state centroid (Si)
    ComplexityMinimization,
    /// Maximize distance from the state centroid (Ne)
    NoveltyMaximization,
    /// Align step directions with the overall trajectory (Ni)
    TrajectoryAlignment,
    /// Fit value predictions to observed returns (Te)
    RegressionFit,
    /// Maximize the margin between the two most likely actions (Ti)
    ContrastDiscrimination,
    /// Balance entropy against value (Fe)
    EntropyValueBalance,
    /// Group-mean reward aggregation (Fi)
    GroupMeanAggregation,
}

impl ObjectiveFamily {
    pub const ALL: [ObjectiveFamily; 8] = [
        ObjectiveFamily::EntropyMaximization,
        ObjectiveFamily::ComplexityMinimization,
        ObjectiveFamily::NoveltyMaximization,
        ObjectiveFamily::TrajectoryAlignment,
        ObjectiveFamily::RegressionFit,
        ObjectiveFamily::ContrastDiscrimination,
        ObjectiveFamily::EntropyValueBalance,
        ObjectiveFamily::GroupMeanAggregation,
    ];

    /// Wire name, identical to the serde encoding
    pub fn name(&self) -> &'static str {
        match self {
            ObjectiveFamily::EntropyMaximization => "entropy_maximization",
            ObjectiveFamily::ComplexityMinimization => "complexity_minimization",
            ObjectiveFamily::NoveltyMaximization => "novelty_maximization",
            ObjectiveFamily::TrajectoryAlignment => "trajectory_alignment",
            ObjectiveFamily::RegressionFit => "regression_fit",
            ObjectiveFamily::ContrastDiscrimination => "contrast_discrimination",
            ObjectiveFamily::EntropyValueBalance => "entropy_value_balance",
            ObjectiveFamily::GroupMeanAggregation => "group_mean_aggregation",
        }
    }

    /// The symbol bound to this family (the mapping is a bijection)
    pub fn symbol(&self) -> CognitiveFunction {
        match self {
            ObjectiveFamily::EntropyMaximization => CognitiveFunction::Se,
            ObjectiveFamily::ComplexityMinimization => CognitiveFunction::Si,
            ObjectiveFamily::NoveltyMaximization => CognitiveFunction::Ne,
            ObjectiveFamily::TrajectoryAlignment => CognitiveFunction::Ni,
            ObjectiveFamily::RegressionFit => CognitiveFunction::Te,
            ObjectiveFamily::ContrastDiscrimination => CognitiveFunction::Ti,
            ObjectiveFamily::EntropyValueBalance => CognitiveFunction::Fe,
            ObjectiveFamily::GroupMeanAggregation => CognitiveFunction::Fi,
        }
    }

    /// Objective class name used by the training-agent skeleton
    pub fn objective_class(&self) -> &'static str {
        match self {
            ObjectiveFamily::EntropyMaximization => "ExplorationObjective",
            ObjectiveFamily::ComplexityMinimization => "GatheringObjective",
            ObjectiveFamily::NoveltyMaximization => "ExtrapolationObjective",
            ObjectiveFamily::TrajectoryAlignment => "InterpolationObjective",
            ObjectiveFamily::RegressionFit => "ExploitationObjective",
            ObjectiveFamily::ContrastDiscrimination => "ContrastObjective",
            ObjectiveFamily::EntropyValueBalance => "IntegrationObjective",
            ObjectiveFamily::GroupMeanAggregation => "SelectionObjective",
        }
    }

    /// LaTeX form of the objective
    pub fn formula(&self) -> &'static str {
        match self {
            ObjectiveFamily::EntropyMaximization => r"\tau \cdot \mathcal{H}(\pi(a|s))",
            ObjectiveFamily::ComplexityMinimization => r"e^{-\|s - \mu\| / h}",
            ObjectiveFamily::NoveltyMaximization => r"k \cdot \|s - \mu\|",
            ObjectiveFamily::TrajectoryAlignment => r"\cos(\Delta s_t, \vec{v})",
            ObjectiveFamily::RegressionFit => r"-k \cdot (V(s) - R)^2",
            ObjectiveFamily::ContrastDiscrimination => r"k \cdot (\pi_{(1)} - \pi_{(2)})",
            ObjectiveFamily::EntropyValueBalance => r"\mathcal{H} + \alpha V(s)",
            ObjectiveFamily::GroupMeanAggregation => r"\bar{R}_{group} - b",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ObjectiveFamily::EntropyMaximization => "maximize policy entropy",
            ObjectiveFamily::ComplexityMinimization => "pull states toward their centroid",
            ObjectiveFamily::NoveltyMaximization => "push states away from their centroid",
            ObjectiveFamily::TrajectoryAlignment => "keep steps aligned with the trajectory",
            ObjectiveFamily::RegressionFit => "fit value estimates to returns",
            ObjectiveFamily::ContrastDiscrimination => "sharpen the choice between top actions",
            ObjectiveFamily::EntropyValueBalance => "balance entropy against value",
            ObjectiveFamily::GroupMeanAggregation => "aggregate the group-mean reward",
        }
    }

    /// Names of the hyperparameters this family reads
    pub fn param_names(&self) -> &'static [&'static str] {
        match self {
            ObjectiveFamily::EntropyMaximization => &["temperature"],
            ObjectiveFamily::ComplexityMinimization => &["bandwidth"],
            ObjectiveFamily::NoveltyMaximization => &["scale"],
            ObjectiveFamily::TrajectoryAlignment => &["epsilon"],
            ObjectiveFamily::RegressionFit => &["scale"],
            ObjectiveFamily::ContrastDiscrimination => &["scale"],
            ObjectiveFamily::EntropyValueBalance => &["alpha"],
            ObjectiveFamily::GroupMeanAggregation => &["baseline"],
        }
    }

    pub fn default_params(&self) -> Params {
        let defaults: &[(&str, f64)] = match self {
            ObjectiveFamily::EntropyMaximization => &[("temperature", 1.0)],
            ObjectiveFamily::ComplexityMinimization => &[("bandwidth", 1.0)],
            ObjectiveFamily::NoveltyMaximization => &[("scale", 1.0)],
            ObjectiveFamily::TrajectoryAlignment => &[("epsilon", 1e-8)],
            ObjectiveFamily::RegressionFit => &[("scale", 1.0)],
            ObjectiveFamily::ContrastDiscrimination => &[("scale", 1.0)],
            ObjectiveFamily::EntropyValueBalance => &[("alpha", 0.5)],
            ObjectiveFamily::GroupMeanAggregation => &[("baseline", 0.0)],
        };

        defaults
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }
}

impl fmt::Display for ObjectiveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
