// Training samples
// The batch shape every generated objective evaluates

use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;

/// One transition observed by the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// State feature vector
    pub state: Vec<f64>,

    /// Policy distribution over actions, if the agent recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_probs: Option<Vec<f64>>,

    /// Value estimate for the state
    #[serde(default)]
    pub value: f64,

    /// Observed reward or return
    #[serde(default)]
    pub reward: f64,
}

impl Sample {
    pub fn new(state: Vec<f64>, value: f64, reward: f64) -> Self {
        Self {
            state,
            action_probs: None,
            value,
            reward,
        }
    }

    pub fn with_action_probs(mut self, action_probs: Vec<f64>) -> Self {
        self.action_probs = Some(action_probs);
        self
    }
}

/// Decode a JSON array of samples
pub fn batch_from_json(json: &str) -> Result<Vec<Sample>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Check a batch is non-empty and shape-consistent
pub fn check_batch(batch: &[Sample]) -> Result<(), EvaluationError> {
    let first = batch.first().ok_or(EvaluationError::EmptyBatch)?;
    let state_dim = first.state.len();
    let action_dim = batch.iter().find_map(|sample| sample.action_probs.as_ref().map(Vec::len));

    for (index, sample) in batch.iter().enumerate() {
        if sample.state.len() != state_dim {
            return Err(EvaluationError::DimensionMismatch {
                sample: index,
                field: "state",
                expected: state_dim,
                found: sample.state.len(),
            });
        }

        if let (Some(probs), Some(expected)) = (&sample.action_probs, action_dim) {
            if probs.len() != expected {
                return Err(EvaluationError::DimensionMismatch {
                    sample: index,
                    field: "action_probs",
                    expected,
                    found: probs.len(),
                });
            }
        }
    }
    Ok(())
}
