//! Generated training objective
//!
//! [`PartitureObjective`] is the one artifact type the Mechanic produces. Its
//! behaviour comes entirely from the terms and schedule graph it was planned
//! from: term values are weighted realizations, and each edge combines its two
//! operands with the combinators of its schedule, innermost edge first.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use partiture_ir::Operand;
use partiture_types::{ObjectiveFamily, Params, ScheduleKind, ScheduleParams};
use tracing::trace;

use crate::combinator::Combinator;
use crate::error::EvaluationError;
use crate::realization::ObjectiveRealization;
use crate::sample::{check_batch, Sample};

/// Capability every artifact must declare to plug into the agent skeleton
pub const AGENT_SKELETON_CAPABILITY: &str = "partiture.training-objective/v1";

/// Contract between a generated artifact and the training loop
pub trait TrainingObjective: fmt::Debug + Send {
    /// Objective value for a batch; advances the schedule step on success
    fn evaluate(&mut self, batch: &[Sample]) -> Result<f64, EvaluationError>;

    /// Every tunable value by name
    fn hyperparameters(&self) -> BTreeMap<String, f64>;

    fn hyperparameter(&self, name: &str) -> Option<f64> {
        self.hyperparameters().get(name).copied()
    }

    fn set_hyperparameter(&mut self, name: &str, value: f64) -> Result<(), EvaluationError>;

    /// Schedule step the next evaluation runs at
    fn step(&self) -> u64;

    /// Rewind the schedule to step 0
    fn reset(&mut self);

    fn capability(&self) -> &str;
}

/// A term ready to evaluate
#[derive(Debug, Clone)]
pub(crate) struct PlannedTerm {
    pub family: ObjectiveFamily,
    pub params: Params,
    pub weight: f64,
    pub realization: Arc<dyn ObjectiveRealization>,
}

/// An edge ready to evaluate
#[derive(Debug, Clone)]
pub(crate) struct PlannedEdge {
    pub operands: [Operand; 2],
    pub components: Vec<(ScheduleKind, Arc<dyn Combinator>)>,
    pub kind_params: ScheduleParams,
    pub weight: f64,
}

/// Training objective instantiated from a partiture
#[derive(Debug, Clone)]
pub struct PartitureObjective {
    source: String,
    content_hash: String,
    terms: Vec<PlannedTerm>,
    edges: Vec<PlannedEdge>,
    step: u64,
}

/// Which tunable value a hyperparameter name points at
enum Slot {
    TermWeight(usize),
    EdgeWeight(usize),
    EdgeParam(usize, ScheduleKind),
}

impl PartitureObjective {
    pub(crate) fn new(
        source: String,
        content_hash: String,
        terms: Vec<PlannedTerm>,
        edges: Vec<PlannedEdge>,
    ) -> Self {
        Self {
            source,
            content_hash,
            terms,
            edges,
            step: 0,
        }
    }

    /// Algebra text the objective was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Content hash of the partiture the objective was generated from
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Evaluate at an explicit step without advancing the schedule
    pub fn evaluate_at(&self, batch: &[Sample], step: u64) -> Result<f64, EvaluationError> {
        check_batch(batch)?;

        let mut term_values = Vec::with_capacity(self.terms.len());
        for (index, term) in self.terms.iter().enumerate() {
            let value = term.weight * term.realization.evaluate(&term.params, batch)?;
            if !value.is_finite() {
                return Err(EvaluationError::NonFinite {
                    what: format!("term {} ({})", index, term.family),
                });
            }
            term_values.push(value);
        }

        if self.edges.is_empty() {
            // a lone term is its own objective
            return Ok(term_values.first().copied().unwrap_or_default());
        }

        // nested edges always come after their parent
        let mut edge_values = vec![0.0; self.edges.len()];
        for (index, edge) in self.edges.iter().enumerate().rev() {
            let value_of = |operand: Operand| match operand {
                Operand::Term(term) => term_values[term],
                Operand::Edge(child) => edge_values[child],
            };
            let (left, right) = (value_of(edge.operands[0]), value_of(edge.operands[1]));

            let mut combined = left;
            for (position, (kind, combinator)) in edge.components.iter().enumerate() {
                // parameters for every component are present after planning
                let param = edge.kind_params.get(*kind).unwrap_or(f64::NAN);
                let inner = if position == 0 { left } else { combined };
                combined = combinator.combine(inner, right, param, step);
            }

            let value = edge.weight * combined;
            if !value.is_finite() {
                return Err(EvaluationError::NonFinite {
                    what: format!("edge {}", index),
                });
            }
            edge_values[index] = value;
        }

        trace!(step, value = edge_values[0], "evaluated objective");
        Ok(edge_values[0])
    }

    fn slot(&self, name: &str) -> Option<Slot> {
        let mut parts = name.split('.');
        let (scope, index, field) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        let index: usize = index.parse().ok()?;

        match scope {
            "term" if index < self.terms.len() && field == "weight" => Some(Slot::TermWeight(index)),
            "edge" if index < self.edges.len() => {
                if field == "weight" {
                    return Some(Slot::EdgeWeight(index));
                }
                self.edges[index]
                    .components
                    .iter()
                    .map(|(kind, _)| *kind)
                    .find(|kind| kind.param_name() == field)
                    .map(|kind| Slot::EdgeParam(index, kind))
            }
            _ => None,
        }
    }
}

impl TrainingObjective for PartitureObjective {
    fn evaluate(&mut self, batch: &[Sample]) -> Result<f64, EvaluationError> {
        let value = self.evaluate_at(batch, self.step)?;
        self.step += 1;
        Ok(value)
    }

    fn hyperparameters(&self) -> BTreeMap<String, f64> {
        let mut surface = BTreeMap::new();
        for (index, term) in self.terms.iter().enumerate() {
            surface.insert(format!("term.{}.weight", index), term.weight);
        }
        for (index, edge) in self.edges.iter().enumerate() {
            surface.insert(format!("edge.{}.weight", index), edge.weight);
            for (kind, _) in &edge.components {
                if let Some(value) = edge.kind_params.get(*kind) {
                    surface.insert(format!("edge.{}.{}", index, kind.param_name()), value);
                }
            }
        }
        surface
    }

    fn set_hyperparameter(&mut self, name: &str, value: f64) -> Result<(), EvaluationError> {
        let slot = self.slot(name).ok_or_else(|| EvaluationError::UnknownHyperparameter {
            name: name.to_string(),
        })?;

        let valid = match slot {
            Slot::TermWeight(_) | Slot::EdgeWeight(_) => value.is_finite() && value > 0.0,
            Slot::EdgeParam(_, ScheduleKind::Orbital) => value.is_finite() && value > 0.0,
            Slot::EdgeParam(_, ScheduleKind::Drag) => value.is_finite() && value >= 0.0,
            Slot::EdgeParam(_, ScheduleKind::Switching) => {
                value.is_finite() && value >= 1.0 && value.fract() == 0.0
            }
        };
        if !valid {
            return Err(EvaluationError::InvalidValue {
                name: name.to_string(),
                value,
            });
        }

        match slot {
            Slot::TermWeight(index) => self.terms[index].weight = value,
            Slot::EdgeWeight(index) => self.edges[index].weight = value,
            Slot::EdgeParam(index, kind) => {
                let params = &mut self.edges[index].kind_params;
                match kind {
                    ScheduleKind::Orbital => params.period = Some(value),
                    ScheduleKind::Drag => params.damping = Some(value),
                    ScheduleKind::Switching => params.switch_interval = Some(value as u64),
                }
            }
        }
        Ok(())
    }

    fn step(&self) -> u64 {
        self.step
    }

    fn reset(&mut self) {
        self.step = 0;
    }

    fn capability(&self) -> &str {
        AGENT_SKELETON_CAPABILITY
    }
}
