// Agent skeleton
// Minimal training loop that drives a generated objective

use partiture_error::{GenerationError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::artifact::{TrainingObjective, AGENT_SKELETON_CAPABILITY};
use crate::error::EvaluationError;
use crate::sample::Sample;

/// Outcome of one training step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Schedule step the batch was evaluated at
    pub step: u64,
    pub objective: f64,
    /// Quantity the optimizer minimizes, the negated objective
    pub loss: f64,
}

/// Host for a training objective
#[derive(Debug)]
pub struct AgentSkeleton {
    objective: Box<dyn TrainingObjective>,
}

impl AgentSkeleton {
    /// Attach an objective, refusing any that does not declare the skeleton's capability
    pub fn new(objective: Box<dyn TrainingObjective>) -> Result<Self> {
        let found = objective.capability();
        if found != AGENT_SKELETON_CAPABILITY {
            return Err(GenerationError::CapabilityMismatch {
                expected: AGENT_SKELETON_CAPABILITY,
                found: found.to_string(),
            }
            .into());
        }
        info!(capability = found, "attached training objective");
        Ok(Self { objective })
    }

    pub fn train_step(&mut self, batch: &[Sample]) -> std::result::Result<StepReport, EvaluationError> {
        let step = self.objective.step();
        let objective = self.objective.evaluate(batch)?;
        let report = StepReport {
            step,
            objective,
            loss: -objective,
        };
        debug!(step, objective, loss = report.loss, "training step");
        Ok(report)
    }

    pub fn objective(&self) -> &dyn TrainingObjective {
        self.objective.as_ref()
    }

    pub fn objective_mut(&mut self) -> &mut dyn TrainingObjective {
        self.objective.as_mut()
    }
}
