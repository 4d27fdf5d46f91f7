// Schedule resolution table
// Explicit (operator, left family, right family) -> schedule map, built once from a rule list

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use partiture_types::{CognitiveFunction, ObjectiveFamily, RelationOperator, ScheduleAssignment};

/// Lookup key: operator and the two operand families, in written order
pub type ResolutionKey = (RelationOperator, ObjectiveFamily, ObjectiveFamily);

/// A rule admits an ordered pair of symbols for one operator
struct Rule {
    operator: RelationOperator,
    admits: fn(CognitiveFunction, CognitiveFunction) -> bool,
    assignment: fn() -> ScheduleAssignment,
}

fn opposite_attitude_same_axis(l: CognitiveFunction, r: CognitiveFunction) -> bool {
    l.axis() == r.axis() && l.attitude() != r.attitude()
}

fn cross_axis(l: CognitiveFunction, r: CognitiveFunction) -> bool {
    l.axis() != r.axis()
}

fn distinct(l: CognitiveFunction, r: CognitiveFunction) -> bool {
    l != r
}

fn same_attitude_same_axis(l: CognitiveFunction, r: CognitiveFunction) -> bool {
    l != r && l.axis() == r.axis() && l.attitude() == r.attitude()
}

fn drag() -> ScheduleAssignment {
    ScheduleAssignment::Drag
}

fn orbital() -> ScheduleAssignment {
    ScheduleAssignment::Orbital
}

fn switching() -> ScheduleAssignment {
    ScheduleAssignment::Switching
}

// First matching rule wins
const RULES: &[Rule] = &[
    Rule {
        operator: RelationOperator::Tension,
        admits: opposite_attitude_same_axis,
        assignment: drag,
    },
    Rule {
        operator: RelationOperator::Tension,
        admits: cross_axis,
        assignment: orbital,
    },
    Rule {
        operator: RelationOperator::Compound,
        admits: distinct,
        assignment: orbital,
    },
    Rule {
        operator: RelationOperator::Switch,
        admits: same_attitude_same_axis,
        assignment: switching,
    },
    Rule {
        operator: RelationOperator::Opposition,
        admits: distinct,
        assignment: drag,
    },
];

/// Immutable map from operator/operand families to schedule assignments
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionTable {
    entries: BTreeMap<ResolutionKey, ScheduleAssignment>,
}

static RESOLUTION_TABLE: Lazy<ResolutionTable> = Lazy::new(ResolutionTable::standard);

impl ResolutionTable {
    /// The process-wide table, built once on first use
    pub fn global() -> &'static ResolutionTable {
        &RESOLUTION_TABLE
    }

    /// Enumerate every operator and symbol pair against the rule list
    pub fn standard() -> Self {
        let mut entries = BTreeMap::new();
        for operator in RelationOperator::ALL {
            for left in CognitiveFunction::ALL {
                for right in CognitiveFunction::ALL {
                    let rule = RULES
                        .iter()
                        .find(|rule| rule.operator == operator && (rule.admits)(left, right));
                    if let Some(rule) = rule {
                        entries.insert((operator, left.family(), right.family()), (rule.assignment)());
                    }
                }
            }
        }
        Self { entries }
    }

    pub fn lookup(
        &self,
        operator: RelationOperator,
        left: ObjectiveFamily,
        right: ObjectiveFamily,
    ) -> Option<&ScheduleAssignment> {
        self.entries.get(&(operator, left, right))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ResolutionKey, &ScheduleAssignment)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lookup(op: RelationOperator, l: CognitiveFunction, r: CognitiveFunction) -> Option<ScheduleAssignment> {
        ResolutionTable::global().lookup(op, l.family(), r.family()).cloned()
    }

    #[test]
    fn test_anchor_entries() {
        use CognitiveFunction::*;
        assert_eq!(lookup(RelationOperator::Tension, Se, Si), Some(ScheduleAssignment::Drag));
        assert_eq!(lookup(RelationOperator::Compound, Fi, Te), Some(ScheduleAssignment::Orbital));
        assert_eq!(lookup(RelationOperator::Tension, Ne, Fe), Some(ScheduleAssignment::Orbital));
        assert_eq!(lookup(RelationOperator::Switch, Si, Ni), Some(ScheduleAssignment::Switching));
        assert_eq!(lookup(RelationOperator::Opposition, Fi, Fe), Some(ScheduleAssignment::Drag));
        assert_eq!(lookup(RelationOperator::Opposition, Se, Ne), Some(ScheduleAssignment::Drag));
    }

    #[test]
    fn test_gaps() {
        use CognitiveFunction::*;
        assert_eq!(lookup(RelationOperator::Tension, Se, Se), None);
        assert_eq!(lookup(RelationOperator::Tension, Se, Ne), None);
        assert_eq!(lookup(RelationOperator::Compound, Te, Te), None);
        assert_eq!(lookup(RelationOperator::Switch, Si, Se), None);
        assert_eq!(lookup(RelationOperator::Opposition, Fi, Fi), None);
    }

    #[test]
    fn test_entry_counts() {
        let table = ResolutionTable::global();
        let count = |op: RelationOperator| table.entries().filter(|((o, _, _), _)| *o == op).count();

        // 16 same-axis opposite-attitude pairs plus 32 cross-axis pairs
        assert_eq!(count(RelationOperator::Tension), 48);
        assert_eq!(count(RelationOperator::Compound), 56);
        assert_eq!(count(RelationOperator::Switch), 8);
        assert_eq!(count(RelationOperator::Opposition), 56);
        assert_eq!(table.len(), 168);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_every_entry_is_well_formed() {
        for (_, assignment) in ResolutionTable::global().entries() {
            assert!(assignment.is_well_formed());
        }
        assert_eq!(ResolutionTable::standard(), *ResolutionTable::global());
    }
}
