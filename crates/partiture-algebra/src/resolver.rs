//! Schedule Resolver
//!
//! Attaches exactly one [`ScheduleAssignment`] to every relation node of an
//! [`AlgebraTree`]. Relations are resolved bottom-up against the
//! [`ResolutionTable`]; an internal operand stands in with its dominant leaf,
//! the one with the highest mass (leftmost on ties).
//!
//! Opposition always drags: the operand with the heavier dominant leaf is the
//! drag source and is emitted first. With no heavier side the two alternate
//! as `Composite(Drag, Switching)`.

use std::collections::BTreeMap;

use partiture_error::{Error, IntegrityError, Result, Validate};
use partiture_types::{
    ObjectiveFamily, RelationOperator, ResolverConfig, ScheduleAssignment, ScheduleKind,
};
use serde::Serialize;
use tracing::{debug, trace};

use crate::ast::{AlgebraNode, AlgebraTree, Leaf, NodeId, NodeKind};
use crate::table::ResolutionTable;

/// What to do with a relation the table has no entry for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ResolutionMode {
    /// Fall back to Switching
    #[default]
    Lenient,
    /// Fail with `UnresolvedSchedule`
    Strict,
}

/// Where an assignment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Table,
    Default,
}

/// The schedule chosen for one relation node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub operator: RelationOperator,
    pub left_family: ObjectiveFamily,
    pub right_family: ObjectiveFamily,
    pub assignment: ScheduleAssignment,
    pub source: ResolutionSource,
    /// The right operand outweighs the left and leads the schedule
    pub swapped: bool,
}

/// An algebra tree with a schedule on every relation node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledTree {
    tree: AlgebraTree,
    resolutions: BTreeMap<NodeId, Resolution>,
}

impl ScheduledTree {
    /// Pair a tree with its resolutions, checking coverage
    pub fn new(tree: AlgebraTree, resolutions: BTreeMap<NodeId, Resolution>) -> Result<Self> {
        let scheduled = Self { tree, resolutions };
        scheduled.validate()?;
        Ok(scheduled)
    }

    pub fn tree(&self) -> &AlgebraTree {
        &self.tree
    }

    pub fn assignment(&self, id: NodeId) -> Option<&ScheduleAssignment> {
        self.resolutions.get(&id).map(|resolution| &resolution.assignment)
    }

    pub fn resolution(&self, id: NodeId) -> Option<&Resolution> {
        self.resolutions.get(&id)
    }

    pub fn resolutions(&self) -> &BTreeMap<NodeId, Resolution> {
        &self.resolutions
    }
}

impl Validate for ScheduledTree {
    fn validate(&self) -> Result<()> {
        self.tree.validate()?;

        let relations = self.tree.relations();
        for node in &relations {
            let resolution = self
                .resolutions
                .get(&node.id)
                .ok_or(IntegrityError::UnassignedNode { node: node.id.0 })?;

            let operator_matches = node
                .as_relation()
                .map(|relation| relation.operator == resolution.operator)
                .unwrap_or(false);
            if !operator_matches || !resolution.assignment.is_well_formed() {
                return Err(IntegrityError::MalformedAssignment { node: node.id.0 }.into());
            }
        }

        if let Some(stray) = self
            .resolutions
            .keys()
            .find(|id| !relations.iter().any(|node| node.id == **id))
        {
            return Err(IntegrityError::StrayAssignment { node: stray.0 }.into());
        }

        Ok(())
    }
}

/// Resolves every relation of a tree to a schedule
#[derive(Debug, Clone, Copy)]
pub struct ScheduleResolver {
    mode: ResolutionMode,
    table: &'static ResolutionTable,
}

impl Default for ScheduleResolver {
    fn default() -> Self {
        Self::new(ResolutionMode::Lenient)
    }
}

impl ScheduleResolver {
    pub fn new(mode: ResolutionMode) -> Self {
        Self {
            mode,
            table: ResolutionTable::global(),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(if config.strict {
            ResolutionMode::Strict
        } else {
            ResolutionMode::Lenient
        })
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Assign a schedule to every relation node, post-order
    pub fn resolve(&self, tree: AlgebraTree) -> Result<ScheduledTree> {
        tree.validate()?;

        let mut resolutions = BTreeMap::new();
        self.resolve_node(tree.root(), &mut resolutions)?;

        debug!(
            relations = resolutions.len(),
            defaulted = resolutions
                .values()
                .filter(|r: &&Resolution| r.source == ResolutionSource::Default)
                .count(),
            "resolved schedules"
        );
        ScheduledTree::new(tree, resolutions)
    }

    /// Resolve a subtree and return its dominant leaf
    fn resolve_node<'a>(
        &self,
        node: &'a AlgebraNode,
        resolutions: &mut BTreeMap<NodeId, Resolution>,
    ) -> Result<&'a Leaf> {
        let relation = match &node.kind {
            NodeKind::Leaf(leaf) => return Ok(leaf),
            NodeKind::Relation(relation) => relation,
        };

        let left = self.resolve_node(&relation.left, resolutions)?;
        let right = self.resolve_node(&relation.right, resolutions)?;

        let (assignment, source) = match self.table.lookup(relation.operator, left.family, right.family) {
            Some(assignment) => (assignment.clone(), ResolutionSource::Table),
            None if self.mode == ResolutionMode::Strict => {
                return Err(Error::UnresolvedSchedule {
                    operator: relation.operator.token().to_string(),
                    left: left.family.name().to_string(),
                    right: right.family.name().to_string(),
                    node: node.id.0,
                });
            }
            None => (ScheduleAssignment::Switching, ResolutionSource::Default),
        };

        let mut swapped = false;
        let assignment = match assignment {
            ScheduleAssignment::Drag if relation.operator == RelationOperator::Opposition => {
                if left.mass == right.mass {
                    ScheduleAssignment::Composite(vec![ScheduleKind::Drag, ScheduleKind::Switching])
                } else {
                    swapped = right.mass > left.mass;
                    ScheduleAssignment::Drag
                }
            }
            other => other,
        };

        trace!(
            node = node.id.0,
            operator = relation.operator.name(),
            left = left.family.name(),
            right = right.family.name(),
            assignment = %assignment,
            swapped,
            "resolved relation"
        );

        resolutions.insert(
            node.id,
            Resolution {
                operator: relation.operator,
                left_family: left.family,
                right_family: right.family,
                assignment,
                source,
                swapped,
            },
        );

        Ok(if right.mass > left.mass { right } else { left })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use partiture_error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn root_resolution(text: &str, mode: ResolutionMode) -> Result<Resolution> {
        let scheduled = ScheduleResolver::new(mode).resolve(parse(text)?)?;
        Ok(scheduled.resolution(NodeId(0)).cloned().unwrap())
    }

    #[test]
    fn test_tension_same_axis_is_drag() {
        let resolution = root_resolution("Se ~ Si", ResolutionMode::Strict).unwrap();
        assert_eq!(resolution.assignment, ScheduleAssignment::Drag);
        assert_eq!(resolution.source, ResolutionSource::Table);
        assert_eq!(resolution.left_family, ObjectiveFamily::EntropyMaximization);
    }

    #[test]
    fn test_compound_is_orbital() {
        let resolution = root_resolution("Fi -> Te", ResolutionMode::Strict).unwrap();
        assert_eq!(resolution.assignment, ScheduleAssignment::Orbital);
    }

    #[test]
    fn test_gap_defaults_in_lenient_mode() {
        let resolution = root_resolution("Se | Te", ResolutionMode::Lenient).unwrap();
        assert_eq!(resolution.assignment, ScheduleAssignment::Switching);
        assert_eq!(resolution.source, ResolutionSource::Default);
    }

    #[test]
    fn test_gap_fails_in_strict_mode() {
        let err = root_resolution("Se | Te", ResolutionMode::Strict).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedSchedule);
        assert_eq!(
            err,
            Error::UnresolvedSchedule {
                operator: "|".to_string(),
                left: "entropy_maximization".to_string(),
                right: "regression_fit".to_string(),
                node: 0,
            }
        );
    }

    #[test]
    fn test_dominant_leaf_represents_subtree() {
        // (Fi oo 3Fe) is represented by Fe, and Fe ~ Ne is a cross-axis orbit
        let scheduled = ScheduleResolver::new(ResolutionMode::Strict)
            .resolve(parse("(Fi oo 3Fe) ~ Ne").unwrap())
            .unwrap();
        let root = scheduled.resolution(NodeId(0)).unwrap();
        assert_eq!(root.left_family, ObjectiveFamily::EntropyValueBalance);
        assert_eq!(root.assignment, ScheduleAssignment::Orbital);

        // ties go to the leftmost leaf
        let scheduled = ScheduleResolver::default()
            .resolve(parse("(Fi oo Fe) ~ Ne").unwrap())
            .unwrap();
        assert_eq!(
            scheduled.resolution(NodeId(0)).unwrap().left_family,
            ObjectiveFamily::GroupMeanAggregation
        );
    }

    #[test]
    fn test_heavier_opposition_operand_drags() {
        let resolution = root_resolution("7Se oo 3Si", ResolutionMode::Strict).unwrap();
        assert_eq!(resolution.assignment, ScheduleAssignment::Drag);
        assert!(!resolution.swapped);

        let resolution = root_resolution("3Se oo 7Si", ResolutionMode::Strict).unwrap();
        assert_eq!(resolution.assignment, ScheduleAssignment::Drag);
        assert!(resolution.swapped);
        assert_eq!(resolution.left_family, ObjectiveFamily::EntropyMaximization);

        // groups compare by their dominant leaves
        let resolution = root_resolution("(Se ~ 2Si) oo 5Ne", ResolutionMode::Strict).unwrap();
        assert!(resolution.swapped);
    }

    #[test]
    fn test_balanced_opposition_alternates() {
        let resolution = root_resolution("Fi oo Fe", ResolutionMode::Strict).unwrap();
        assert_eq!(
            resolution.assignment,
            ScheduleAssignment::Composite(vec![ScheduleKind::Drag, ScheduleKind::Switching])
        );
        assert!(!resolution.swapped);

        // self-opposition has no table entry
        let err = root_resolution("Se oo Se", ResolutionMode::Strict).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedSchedule);
    }

    #[test]
    fn test_every_relation_is_assigned() {
        let scheduled = ScheduleResolver::default()
            .resolve(parse("(Se ~ Si) -> (Ne | Si)").unwrap())
            .unwrap();
        assert_eq!(scheduled.resolutions().len(), 3);
        for node in scheduled.tree().relations() {
            assert!(scheduled.assignment(node.id).is_some());
        }
        assert!(scheduled.validate().is_ok());
    }

    #[test]
    fn test_leaf_only_tree_has_no_assignments() {
        let scheduled = ScheduleResolver::default().resolve(parse("Ni").unwrap()).unwrap();
        assert!(scheduled.resolutions().is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_coverage() {
        let tree = parse("Se ~ Si").unwrap();

        let err = ScheduledTree::new(tree.clone(), BTreeMap::new()).unwrap_err();
        assert_eq!(err, Error::CompileIntegrity(IntegrityError::UnassignedNode { node: 0 }));

        let stray = Resolution {
            operator: RelationOperator::Tension,
            left_family: ObjectiveFamily::EntropyMaximization,
            right_family: ObjectiveFamily::ComplexityMinimization,
            assignment: ScheduleAssignment::Drag,
            source: ResolutionSource::Table,
            swapped: false,
        };
        let mut resolutions = BTreeMap::new();
        resolutions.insert(NodeId(0), stray.clone());
        resolutions.insert(NodeId(2), stray.clone());
        let err = ScheduledTree::new(tree.clone(), resolutions).unwrap_err();
        assert_eq!(err, Error::CompileIntegrity(IntegrityError::StrayAssignment { node: 2 }));

        let mut malformed = stray;
        malformed.assignment = ScheduleAssignment::Composite(vec![]);
        let mut resolutions = BTreeMap::new();
        resolutions.insert(NodeId(0), malformed);
        let err = ScheduledTree::new(tree, resolutions).unwrap_err();
        assert_eq!(err, Error::CompileIntegrity(IntegrityError::MalformedAssignment { node: 0 }));
    }
}
