//! Numeric realizations of the objective families
//!
//! Each realization reduces a batch of samples to one scalar objective value,
//! higher being better. Batches are shape-checked before they get here.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use partiture_types::{ObjectiveFamily, Params};

use crate::error::EvaluationError;
use crate::sample::Sample;

/// Numeric form of one objective family
pub trait ObjectiveRealization: fmt::Debug + Send + Sync {
    /// The family this realizes
    fn family(&self) -> ObjectiveFamily;

    /// Reduce a batch to the objective value
    fn evaluate(&self, params: &Params, batch: &[Sample]) -> Result<f64, EvaluationError>;
}

//-----------------------------------------------------------------------------
// Batch statistics
//-----------------------------------------------------------------------------

fn param(params: &Params, name: &str) -> f64 {
    params.get(name).copied().unwrap_or_default()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn centroid(batch: &[Sample]) -> Vec<f64> {
    let dim = batch.first().map(|sample| sample.state.len()).unwrap_or_default();
    (0..dim)
        .map(|axis| mean(batch.iter().map(|sample| sample.state[axis])))
        .collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn entropy(probs: &[f64]) -> f64 {
    -probs
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| p * p.ln())
        .sum::<f64>()
}

fn action_probs<'a>(
    batch: &'a [Sample],
    family: ObjectiveFamily,
) -> Result<Vec<&'a [f64]>, EvaluationError> {
    batch
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            sample
                .action_probs
                .as_deref()
                .ok_or(EvaluationError::MissingActionProbabilities {
                    sample: index,
                    family: family.name(),
                })
        })
        .collect()
}

//-----------------------------------------------------------------------------
// Realizations
//-----------------------------------------------------------------------------

/// Se: temperature-scaled mean policy entropy
#[derive(Debug, Default)]
pub struct EntropyMaximization;

impl ObjectiveRealization for EntropyMaximization {
    fn family(&self) -> ObjectiveFamily {
        ObjectiveFamily::EntropyMaximization
    }

    fn evaluate(&self, params: &Params, batch: &[Sample]) -> Result<f64, EvaluationError> {
        let probs = action_probs(batch, self.family())?;
        Ok(param(params, "temperature") * mean(probs.into_iter().map(entropy)))
    }
}

/// Si: kernel density of states around their centroid
#[derive(Debug, Default)]
pub struct ComplexityMinimization;

impl ObjectiveRealization for ComplexityMinimization {
    fn family(&self) -> ObjectiveFamily {
        ObjectiveFamily::ComplexityMinimization
    }

    fn evaluate(&self, params: &Params, batch: &[Sample]) -> Result<f64, EvaluationError> {
        let bandwidth = param(params, "bandwidth");
        let mu = centroid(batch);
        Ok(mean(
            batch
                .iter()
                .map(|sample| (-distance(&sample.state, &mu) / bandwidth).exp()),
        ))
    }
}

/// Ne: scaled mean distance from the centroid
#[derive(Debug, Default)]
pub struct NoveltyMaximization;

impl ObjectiveRealization for NoveltyMaximization {
    fn family(&self) -> ObjectiveFamily {
        ObjectiveFamily::NoveltyMaximization
    }

    fn evaluate(&self, params: &Params, batch: &[Sample]) -> Result<f64, EvaluationError> {
        let mu = centroid(batch);
        Ok(param(params, "scale") * mean(batch.iter().map(|sample| distance(&sample.state, &mu))))
    }
}

/// Ni: mean cosine between each step and the overall displacement
#[derive(Debug, Default)]
pub struct TrajectoryAlignment;

impl ObjectiveRealization for TrajectoryAlignment {
    fn family(&self) -> ObjectiveFamily {
        ObjectiveFamily::TrajectoryAlignment
    }

    fn evaluate(&self, params: &Params, batch: &[Sample]) -> Result<f64, EvaluationError> {
        let epsilon = param(params, "epsilon");
        let (Some(first), Some(last)) = (batch.first(), batch.last()) else {
            return Ok(0.0);
        };
        let direction: Vec<f64> = last.state.iter().zip(&first.state).map(|(b, a)| b - a).collect();
        let direction_norm = distance(&direction, &vec![0.0; direction.len()]);

        Ok(mean(batch.windows(2).map(|pair| {
            let step: Vec<f64> = pair[1].state.iter().zip(&pair[0].state).map(|(b, a)| b - a).collect();
            let step_norm = distance(&step, &vec![0.0; step.len()]);
            let dot: f64 = step.iter().zip(&direction).map(|(x, y)| x * y).sum();
            dot / (step_norm * direction_norm + epsilon)
        })))
    }
}

/// Te: negative scaled squared error between value and reward
#[derive(Debug, Default)]
pub struct RegressionFit;

impl ObjectiveRealization for RegressionFit {
    fn family(&self) -> ObjectiveFamily {
        ObjectiveFamily::RegressionFit
    }

    fn evaluate(&self, params: &Params, batch: &[Sample]) -> Result<f64, EvaluationError> {
        Ok(-param(params, "scale") * mean(batch.iter().map(|sample| (sample.value - sample.reward).powi(2))))
    }
}

/// Ti: scaled margin between the two most likely actions
#[derive(Debug, Default)]
pub struct ContrastDiscrimination;

impl ObjectiveRealization for ContrastDiscrimination {
    fn family(&self) -> ObjectiveFamily {
        ObjectiveFamily::ContrastDiscrimination
    }

    fn evaluate(&self, params: &Params, batch: &[Sample]) -> Result<f64, EvaluationError> {
        let probs = action_probs(batch, self.family())?;
        let margin = mean(probs.into_iter().map(|p| {
            let mut sorted = p.to_vec();
            sorted.sort_by(|a, b| b.total_cmp(a));
            sorted.first().copied().unwrap_or_default() - sorted.get(1).copied().unwrap_or_default()
        }));
        Ok(param(params, "scale") * margin)
    }
}

/// Fe: mean entropy plus alpha-weighted mean value
#[derive(Debug, Default)]
pub struct EntropyValueBalance;

impl ObjectiveRealization for EntropyValueBalance {
    fn family(&self) -> ObjectiveFamily {
        ObjectiveFamily::EntropyValueBalance
    }

    fn evaluate(&self, params: &Params, batch: &[Sample]) -> Result<f64, EvaluationError> {
        let probs = action_probs(batch, self.family())?;
        let h = mean(probs.into_iter().map(entropy));
        Ok(h + param(params, "alpha") * mean(batch.iter().map(|sample| sample.value)))
    }
}

/// Fi: group-mean reward above a baseline
#[derive(Debug, Default)]
pub struct GroupMeanAggregation;

impl ObjectiveRealization for GroupMeanAggregation {
    fn family(&self) -> ObjectiveFamily {
        ObjectiveFamily::GroupMeanAggregation
    }

    fn evaluate(&self, params: &Params, batch: &[Sample]) -> Result<f64, EvaluationError> {
        Ok(mean(batch.iter().map(|sample| sample.reward)) - param(params, "baseline"))
    }
}

//-----------------------------------------------------------------------------
// Registry
//-----------------------------------------------------------------------------

/// Realizations keyed by family
#[derive(Debug, Clone, Default)]
pub struct RealizationRegistry {
    realizations: BTreeMap<ObjectiveFamily, Arc<dyn ObjectiveRealization>>,
}

impl RealizationRegistry {
    /// A registry with nothing registered
    pub fn empty() -> Self {
        Self::default()
    }

    /// Realizations for all eight families
    pub fn standard() -> Self {
        Self::empty()
            .with(EntropyMaximization)
            .with(ComplexityMinimization)
            .with(NoveltyMaximization)
            .with(TrajectoryAlignment)
            .with(RegressionFit)
            .with(ContrastDiscrimination)
            .with(EntropyValueBalance)
            .with(GroupMeanAggregation)
    }

    /// Register a realization, replacing any for the same family
    pub fn with(mut self, realization: impl ObjectiveRealization + 'static) -> Self {
        self.realizations.insert(realization.family(), Arc::new(realization));
        self
    }

    pub fn get(&self, family: ObjectiveFamily) -> Option<Arc<dyn ObjectiveRealization>> {
        self.realizations.get(&family).cloned()
    }

    pub fn families(&self) -> impl Iterator<Item = ObjectiveFamily> + '_ {
        self.realizations.keys().copied()
    }
}
