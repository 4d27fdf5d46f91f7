// Integration tests for schedule resolution

use partiture_algebra::{parse, NodeId, ResolutionMode, ResolutionTable, ScheduleResolver};
use partiture_error::{Error, ErrorKind};
use partiture_types::{CognitiveFunction, RelationOperator, ScheduleAssignment};
use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;

fn symbol(index: u8) -> CognitiveFunction {
    CognitiveFunction::ALL[index as usize % CognitiveFunction::ALL.len()]
}

fn operator(index: u8) -> RelationOperator {
    RelationOperator::ALL[index as usize % RelationOperator::ALL.len()]
}

#[test]
fn test_se_tension_si_is_drag() {
    let scheduled = ScheduleResolver::new(ResolutionMode::Strict)
        .resolve(parse("Se ~ Si").unwrap())
        .unwrap();
    assert_eq!(scheduled.assignment(NodeId(0)), Some(&ScheduleAssignment::Drag));
}

#[test]
fn test_fi_compound_te_is_orbital() {
    let scheduled = ScheduleResolver::new(ResolutionMode::Strict)
        .resolve(parse("Fi -> Te").unwrap())
        .unwrap();
    assert_eq!(scheduled.assignment(NodeId(0)), Some(&ScheduleAssignment::Orbital));
}

#[test]
fn test_balanced_opposition_is_composite() {
    let scheduled = ScheduleResolver::default().resolve(parse("Ne oo Ni").unwrap()).unwrap();
    let assignment = scheduled.assignment(NodeId(0)).unwrap();
    assert!(assignment.is_composite());
    assert_eq!(assignment.to_string(), "Composite(Drag+Switching)");
}

#[test]
fn test_weighted_opposition_is_drag() {
    let scheduled = ScheduleResolver::new(ResolutionMode::Strict)
        .resolve(parse("7Se oo 3Si").unwrap())
        .unwrap();
    assert_eq!(scheduled.assignment(NodeId(0)), Some(&ScheduleAssignment::Drag));
    assert!(!scheduled.resolution(NodeId(0)).unwrap().swapped);
}

#[test]
fn test_nested_relations_resolve_independently() {
    let scheduled = ScheduleResolver::new(ResolutionMode::Strict)
        .resolve(parse("(Se ~ Si) -> (Ti | Fi)").unwrap())
        .unwrap();

    // pre-order: 0 root, 1 (Se ~ Si), 4 (Ti | Fi)
    assert_eq!(scheduled.assignment(NodeId(0)), Some(&ScheduleAssignment::Orbital));
    assert_eq!(scheduled.assignment(NodeId(1)), Some(&ScheduleAssignment::Drag));
    assert_eq!(scheduled.assignment(NodeId(4)), Some(&ScheduleAssignment::Switching));
    assert_eq!(scheduled.resolutions().len(), 3);
}

#[test]
fn test_strict_mode_reports_innermost_gap_first() {
    let err = ScheduleResolver::new(ResolutionMode::Strict)
        .resolve(parse("(Se | Te) ~ Ni").unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedSchedule { node: 1, .. }));
}

#[quickcheck]
fn prop_resolution_is_total(l: u8, op: u8, r: u8, strict: bool) -> bool {
    let (l, op, r) = (symbol(l), operator(op), symbol(r));
    let mode = if strict {
        ResolutionMode::Strict
    } else {
        ResolutionMode::Lenient
    };
    let tree = parse(&format!("{} {} {}", l, op, r)).unwrap();
    let in_table = ResolutionTable::global()
        .lookup(op, l.family(), r.family())
        .is_some();

    match ScheduleResolver::new(mode).resolve(tree) {
        Ok(scheduled) => {
            scheduled.resolutions().len() == 1 && (in_table || mode == ResolutionMode::Lenient)
        }
        Err(err) => err.kind() == ErrorKind::UnresolvedSchedule && strict && !in_table,
    }
}
