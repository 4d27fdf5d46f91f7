//! The Mechanic
//!
//! Turns a [`Partiture`] into a [`PartitureObjective`] by binding every term to
//! a registered realization and every schedule kind to a registered combinator.

use partiture_error::{Error, GenerationError, Result, Validate};
use partiture_ir::{resolve_operands, Partiture};
use tracing::debug;

use crate::artifact::{PartitureObjective, PlannedEdge, PlannedTerm};
use crate::combinator::CombinatorRegistry;
use crate::realization::RealizationRegistry;

/// Code generator for partitures
#[derive(Debug, Clone)]
pub struct Mechanic {
    realizations: RealizationRegistry,
    combinators: CombinatorRegistry,
}

impl Default for Mechanic {
    fn default() -> Self {
        Self::new()
    }
}

impl Mechanic {
    /// A generator with the standard realizations and combinators
    pub fn new() -> Self {
        Self::with_registries(RealizationRegistry::standard(), CombinatorRegistry::standard())
    }

    pub fn with_registries(realizations: RealizationRegistry, combinators: CombinatorRegistry) -> Self {
        Self {
            realizations,
            combinators,
        }
    }

    /// Check a partiture can be generated without building the artifact
    pub fn check(&self, partiture: &Partiture) -> Result<()> {
        self.plan(partiture).map(|_| ())
    }

    /// Instantiate the training objective for a partiture
    pub fn generate(&self, partiture: &Partiture) -> Result<PartitureObjective> {
        let (terms, edges) = self.plan(partiture)?;
        let objective = PartitureObjective::new(
            partiture.source.clone(),
            partiture.content_hash()?,
            terms,
            edges,
        );

        debug!(
            terms = objective.term_count(),
            edges = objective.edge_count(),
            hash = objective.content_hash(),
            "generated training objective"
        );
        Ok(objective)
    }

    fn plan(&self, partiture: &Partiture) -> Result<(Vec<PlannedTerm>, Vec<PlannedEdge>)> {
        partiture.validate()?;
        let operands = resolve_operands(partiture).map_err(Error::CompileIntegrity)?;

        let terms = partiture
            .terms
            .iter()
            .enumerate()
            .map(|(index, term)| {
                let realization = self.realizations.get(term.family).ok_or_else(|| {
                    GenerationError::NoRealization {
                        family: term.family.name().to_string(),
                        term: index,
                    }
                })?;
                Ok(PlannedTerm {
                    family: term.family,
                    params: term.params.clone(),
                    weight: term.weight,
                    realization,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let edges = partiture
            .schedule_graph
            .iter()
            .zip(operands)
            .enumerate()
            .map(|(index, (edge, operands))| {
                let components = edge
                    .kind
                    .components()
                    .into_iter()
                    .map(|kind| {
                        self.combinators
                            .get(kind)
                            .map(|combinator| (kind, combinator))
                            .ok_or_else(|| {
                                Error::from(GenerationError::NoCombinator {
                                    kind: kind.name().to_string(),
                                    edge: index,
                                })
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(PlannedEdge {
                    operands,
                    components,
                    kind_params: edge.kind_params,
                    weight: edge.weight,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((terms, edges))
    }
}
