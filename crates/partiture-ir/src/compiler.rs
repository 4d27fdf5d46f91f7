//! Partiture Compiler
//!
//! Flattens a [`ScheduledTree`] into a [`Partiture`]. Leaves become terms in
//! pre-order; relation nodes become schedule edges in pre-order, each joining
//! the contiguous term ranges of its two subtrees.

use std::ops::Range;

use partiture_algebra::{AlgebraNode, NodeKind, ScheduledTree};
use partiture_error::{IntegrityError, Result, Validate};
use partiture_types::{CompilerConfig, ScheduleAssignment, ScheduleKind, ScheduleParams};
use tracing::{debug, trace};

use crate::graph::{ScheduleEdge, ScheduleGraph};
use crate::partiture::Partiture;
use crate::term::Term;

/// Compiles scheduled trees into partitures
#[derive(Debug, Clone, Default)]
pub struct PartitureCompiler {
    config: CompilerConfig,
}

impl PartitureCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a scheduled tree; the result is integrity-checked
    pub fn compile(&self, scheduled: &ScheduledTree) -> Result<Partiture> {
        let tree = scheduled.tree();
        let mut terms = Vec::with_capacity(tree.root().leaf_count());
        let mut edges = Vec::with_capacity(tree.root().leaf_count().saturating_sub(1));

        self.flatten(scheduled, tree.root(), 0, 1.0, &mut terms, &mut edges)?;

        let partiture = Partiture::new(tree.source(), terms, ScheduleGraph::new(edges));
        partiture.validate()?;

        debug!(
            terms = partiture.terms.len(),
            edges = partiture.schedule_graph.len(),
            "compiled partiture"
        );
        Ok(partiture)
    }

    /// Emit terms and edges for a subtree, returning its term range
    fn flatten(
        &self,
        scheduled: &ScheduledTree,
        node: &AlgebraNode,
        depth: usize,
        rate: f64,
        terms: &mut Vec<Term>,
        edges: &mut Vec<ScheduleEdge>,
    ) -> Result<Range<usize>> {
        let rate = rate * node.acceleration;

        let relation = match &node.kind {
            NodeKind::Leaf(leaf) => {
                let index = terms.len();
                terms.push(Term::new(leaf.symbol, leaf.mass));
                return Ok(index..index + 1);
            }
            NodeKind::Relation(relation) => relation,
        };

        // children are pushed after this slot, so inserting here keeps pre-order
        let slot = edges.len();
        let left = self.flatten(scheduled, &relation.left, depth + 1, rate, terms, edges)?;
        let right = self.flatten(scheduled, &relation.right, depth + 1, rate, terms, edges)?;

        let resolution = scheduled
            .resolution(node.id)
            .ok_or(IntegrityError::UnassignedNode { node: node.id.0 })?;
        let kind = resolution.assignment.clone();
        let kind_params = self.kind_params(&kind, rate);

        trace!(node = node.id.0, edge = slot, depth, rate, kind = %kind, "emitting schedule edge");

        let span = left.start..right.end;
        // the leading operand drives the schedule
        let (left, right) = if resolution.swapped { (right, left) } else { (left, right) };
        edges.insert(
            slot,
            ScheduleEdge {
                left_indices: left.collect(),
                right_indices: right.collect(),
                kind,
                kind_params,
                weight: self.config.depth_decay.powi(depth as i32),
                depth,
            },
        );
        Ok(span)
    }

    /// Base schedule parameters scaled by the effective acceleration
    fn kind_params(&self, kind: &ScheduleAssignment, rate: f64) -> ScheduleParams {
        let mut params = ScheduleParams::default();
        for component in kind.components() {
            match component {
                ScheduleKind::Orbital => params.period = Some(self.config.orbital_period / rate),
                ScheduleKind::Drag => params.damping = Some(self.config.drag_damping * rate),
                ScheduleKind::Switching => {
                    let interval = (self.config.switch_interval as f64 / rate).ceil() as u64;
                    params.switch_interval = Some(interval.max(1));
                }
            }
        }
        params
    }
}
