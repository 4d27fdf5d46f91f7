//! Schedule graph
//!
//! Edges connect two disjoint sets of term indices. Each operand set is either a
//! single term or exactly the union of a later edge's operands, so the graph is
//! the laminar image of the binary algebra tree. Edge 0 is the root.

use partiture_types::{ScheduleAssignment, ScheduleParams};
use serde::{Deserialize, Serialize};

/// A scheduled combination of two operand sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleEdge {
    pub left_indices: Vec<usize>,
    pub right_indices: Vec<usize>,
    pub kind: ScheduleAssignment,
    pub kind_params: ScheduleParams,
    pub weight: f64,
    /// Nesting depth of the relation, 0 at the root
    pub depth: usize,
}

impl ScheduleEdge {
    /// Every term index this edge covers, left operand first
    pub fn covered(&self) -> Vec<usize> {
        self.left_indices
            .iter()
            .chain(self.right_indices.iter())
            .copied()
            .collect()
    }

    pub fn operand(&self, side: Side) -> &[usize] {
        match side {
            Side::Left => &self.left_indices,
            Side::Right => &self.right_indices,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// What an operand set stands for once the graph is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Term(usize),
    Edge(usize),
}

/// Ordered schedule edges, pre-order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleGraph {
    edges: Vec<ScheduleEdge>,
}

impl ScheduleGraph {
    pub fn new(edges: Vec<ScheduleEdge>) -> Self {
        Self { edges }
    }

    pub fn edges(&self) -> &[ScheduleEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [ScheduleEdge] {
        &mut self.edges
    }

    pub fn get(&self, index: usize) -> Option<&ScheduleEdge> {
        self.edges.get(index)
    }

    pub fn root(&self) -> Option<&ScheduleEdge> {
        self.edges.first()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleEdge> {
        self.edges.iter()
    }
}

impl From<Vec<ScheduleEdge>> for ScheduleGraph {
    fn from(edges: Vec<ScheduleEdge>) -> Self {
        Self::new(edges)
    }
}
