// Validation module for the Mathematical Partiture
// Referential-integrity checks run after compiling and after decoding

use std::collections::BTreeSet;

use partiture_error::IntegrityError;
use partiture_types::ScheduleKind;

use crate::graph::{Operand, Side};
use crate::partiture::{Partiture, PARTITURE_VERSION};

type Result<T> = std::result::Result<T, IntegrityError>;

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Validate the encoding version
pub fn validate_version(partiture: &Partiture) -> Result<()> {
    if partiture.version == 0 || partiture.version > PARTITURE_VERSION {
        return Err(IntegrityError::UnsupportedVersion {
            found: partiture.version,
            supported: PARTITURE_VERSION,
        });
    }
    Ok(())
}

/// Validate weights, families and parameters of every term
pub fn validate_terms(partiture: &Partiture) -> Result<()> {
    if partiture.terms.is_empty() {
        return Err(IntegrityError::NoTerms);
    }

    for (index, term) in partiture.terms.iter().enumerate() {
        if !positive(term.weight) {
            return Err(IntegrityError::InvalidTermWeight {
                term: index,
                weight: term.weight,
            });
        }

        if term.symbol.family() != term.family {
            return Err(IntegrityError::SymbolFamilyMismatch {
                term: index,
                symbol: term.symbol.to_string(),
                family: term.family.name().to_string(),
            });
        }

        let names = term.family.param_names();
        if let Some(missing) = names.iter().find(|name| !term.params.contains_key(**name)) {
            return Err(IntegrityError::MissingTermParam {
                term: index,
                name: missing.to_string(),
            });
        }

        for (name, value) in &term.params {
            if !names.contains(&name.as_str()) || !value.is_finite() {
                return Err(IntegrityError::InvalidTermParam {
                    term: index,
                    name: name.clone(),
                    value: *value,
                });
            }
        }
    }
    Ok(())
}

/// Validate edge weights, schedule kinds and schedule parameters
pub fn validate_edges(partiture: &Partiture) -> Result<()> {
    for (index, edge) in partiture.schedule_graph.iter().enumerate() {
        if !positive(edge.weight) {
            return Err(IntegrityError::InvalidEdgeWeight {
                edge: index,
                weight: edge.weight,
            });
        }

        if !edge.kind.is_well_formed() {
            return Err(IntegrityError::InvalidComposite { edge: index });
        }

        for kind in ScheduleKind::ALL {
            let name = kind.param_name();
            let value = edge.kind_params.get(kind);
            match (edge.kind.uses(kind), value) {
                (true, None) => return Err(IntegrityError::MissingKindParam { edge: index, name }),
                (true, Some(value)) => {
                    let in_range = match kind {
                        ScheduleKind::Orbital => positive(value),
                        ScheduleKind::Drag => value.is_finite() && value >= 0.0,
                        ScheduleKind::Switching => value >= 1.0,
                    };
                    if !in_range {
                        return Err(IntegrityError::InvalidKindParam { edge: index, name, value });
                    }
                }
                // parameters for kinds the edge does not use
                (false, Some(value)) => {
                    return Err(IntegrityError::InvalidKindParam { edge: index, name, value })
                }
                (false, None) => {}
            }
        }
    }
    Ok(())
}

/// Resolve every operand set to the term or nested edge it stands for.
///
/// Confirms the schedule graph is the laminar image of a binary tree rooted at
/// edge 0: operands are non-empty, in range and disjoint; a multi-term operand
/// is exactly the cover of a later edge; every non-root edge hangs under
/// exactly one parent; the root covers every term; depths count from the root.
pub fn resolve_operands(partiture: &Partiture) -> Result<Vec<[Operand; 2]>> {
    let terms = partiture.terms.len();
    let edges = partiture.schedule_graph.edges();

    let mut covers: Vec<BTreeSet<usize>> = Vec::with_capacity(edges.len());
    for (index, edge) in edges.iter().enumerate() {
        let mut cover = BTreeSet::new();
        for side in [Side::Left, Side::Right] {
            let operand = edge.operand(side);
            if operand.is_empty() {
                return Err(IntegrityError::EmptyOperand { edge: index });
            }
            for &term in operand {
                if term >= terms {
                    return Err(IntegrityError::DanglingTermIndex {
                        edge: index,
                        index: term,
                        terms,
                    });
                }
                if !cover.insert(term) {
                    return Err(IntegrityError::OverlappingOperands { edge: index, index: term });
                }
            }
        }
        covers.push(cover);
    }

    if let Some(root) = covers.first() {
        if root.len() != terms {
            return Err(IntegrityError::RootCoverage { edge: 0 });
        }
    }

    let mut parents: Vec<Option<usize>> = vec![None; edges.len()];
    let mut operands = Vec::with_capacity(edges.len());
    for (index, edge) in edges.iter().enumerate() {
        let mut resolved = [Operand::Term(0); 2];
        for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
            let operand = edge.operand(side);
            resolved[slot] = if let [term] = operand {
                Operand::Term(*term)
            } else {
                let set: BTreeSet<usize> = operand.iter().copied().collect();
                let child = (index + 1..edges.len())
                    .find(|candidate| covers[*candidate] == set)
                    .ok_or(IntegrityError::UnanchoredOperand { edge: index })?;
                if parents[child].replace(index).is_some() {
                    return Err(IntegrityError::SharedOperand { edge: child });
                }
                Operand::Edge(child)
            };
        }
        operands.push(resolved);
    }

    let mut depths = vec![0usize; edges.len()];
    for (index, edge) in edges.iter().enumerate() {
        let expected = match parents[index] {
            Some(parent) => depths[parent] + 1,
            None if index == 0 => 0,
            None => return Err(IntegrityError::DetachedEdge { edge: index }),
        };
        if edge.depth != expected {
            return Err(IntegrityError::DepthMismatch {
                edge: index,
                expected,
                found: edge.depth,
            });
        }
        depths[index] = expected;
    }

    Ok(operands)
}

/// Run all validators on a partiture
pub fn validate_partiture(partiture: &Partiture) -> Result<()> {
    validate_version(partiture)?;
    validate_terms(partiture)?;

    let expected = partiture.terms.len() - 1;
    if partiture.schedule_graph.len() != expected {
        return Err(IntegrityError::EdgeCount {
            expected,
            found: partiture.schedule_graph.len(),
        });
    }

    validate_edges(partiture)?;
    resolve_operands(partiture)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ScheduleEdge, ScheduleGraph};
    use crate::term::Term;
    use partiture_types::{CognitiveFunction, ScheduleAssignment, ScheduleParams};
    use pretty_assertions::assert_eq;

    fn edge(left: Vec<usize>, right: Vec<usize>, depth: usize) -> ScheduleEdge {
        ScheduleEdge {
            left_indices: left,
            right_indices: right,
            kind: ScheduleAssignment::Switching,
            kind_params: ScheduleParams {
                switch_interval: Some(50),
                ..Default::default()
            },
            weight: 0.5f64.powi(depth as i32),
            depth,
        }
    }

    fn three_terms(edges: Vec<ScheduleEdge>) -> Partiture {
        Partiture::new(
            "(Se | Ne) | Te",
            vec![
                Term::new(CognitiveFunction::Se, 1.0),
                Term::new(CognitiveFunction::Ne, 1.0),
                Term::new(CognitiveFunction::Te, 1.0),
            ],
            ScheduleGraph::new(edges),
        )
    }

    #[test]
    fn test_well_formed_graph_resolves() {
        let partiture = three_terms(vec![edge(vec![0, 1], vec![2], 0), edge(vec![0], vec![1], 1)]);
        assert_eq!(
            resolve_operands(&partiture).unwrap(),
            vec![
                [Operand::Edge(1), Operand::Term(2)],
                [Operand::Term(0), Operand::Term(1)]
            ]
        );
        assert!(validate_partiture(&partiture).is_ok());
    }

    #[test]
    fn test_single_term_has_no_edges() {
        let partiture = Partiture::new(
            "Ni",
            vec![Term::new(CognitiveFunction::Ni, 1.0)],
            ScheduleGraph::default(),
        );
        assert!(validate_partiture(&partiture).is_ok());
    }

    #[test]
    fn test_structural_violations() {
        let cases = vec![
            (
                vec![edge(vec![0, 1], vec![2], 0)],
                IntegrityError::EdgeCount { expected: 2, found: 1 },
            ),
            (
                vec![edge(vec![0, 1], vec![], 0), edge(vec![0], vec![1], 1)],
                IntegrityError::EmptyOperand { edge: 0 },
            ),
            (
                vec![edge(vec![0, 1], vec![2], 0), edge(vec![0], vec![0], 1)],
                IntegrityError::OverlappingOperands { edge: 1, index: 0 },
            ),
            (
                vec![edge(vec![0], vec![1], 0), edge(vec![1], vec![2], 1)],
                IntegrityError::RootCoverage { edge: 0 },
            ),
            (
                vec![edge(vec![0, 2], vec![1], 0), edge(vec![0], vec![1], 1)],
                IntegrityError::UnanchoredOperand { edge: 0 },
            ),
            (
                vec![edge(vec![0, 1], vec![2], 0), edge(vec![0], vec![1], 2)],
                IntegrityError::DepthMismatch {
                    edge: 1,
                    expected: 1,
                    found: 2,
                },
            ),
        ];

        for (edges, expected) in cases {
            assert_eq!(validate_partiture(&three_terms(edges)).unwrap_err(), expected);
        }
    }

    #[test]
    fn test_term_violations() {
        let mut partiture = three_terms(vec![edge(vec![0, 1], vec![2], 0), edge(vec![0], vec![1], 1)]);
        partiture.terms[1].weight = 0.0;
        assert_eq!(
            validate_partiture(&partiture).unwrap_err(),
            IntegrityError::InvalidTermWeight { term: 1, weight: 0.0 }
        );

        partiture.terms[1].weight = 1.0;
        partiture.terms[2].params.clear();
        assert_eq!(
            validate_partiture(&partiture).unwrap_err(),
            IntegrityError::MissingTermParam {
                term: 2,
                name: "scale".to_string()
            }
        );

        partiture.terms[2] = Term::new(CognitiveFunction::Te, 1.0);
        partiture.terms[2].params.insert("bogus".to_string(), 1.0);
        assert!(matches!(
            validate_partiture(&partiture).unwrap_err(),
            IntegrityError::InvalidTermParam { term: 2, .. }
        ));

        partiture.terms[2] = Term::new(CognitiveFunction::Te, 1.0);
        partiture.terms[2].symbol = CognitiveFunction::Ti;
        assert!(matches!(
            validate_partiture(&partiture).unwrap_err(),
            IntegrityError::SymbolFamilyMismatch { term: 2, .. }
        ));
    }

    #[test]
    fn test_kind_param_violations() {
        let mut partiture = three_terms(vec![edge(vec![0, 1], vec![2], 0), edge(vec![0], vec![1], 1)]);
        partiture.schedule_graph.edges_mut()[1].kind = ScheduleAssignment::Orbital;
        assert_eq!(
            validate_partiture(&partiture).unwrap_err(),
            IntegrityError::MissingKindParam { edge: 1, name: "period" }
        );

        partiture.schedule_graph.edges_mut()[1].kind_params.period = Some(-1.0);
        assert!(matches!(
            validate_partiture(&partiture).unwrap_err(),
            IntegrityError::InvalidKindParam { edge: 1, name: "period", .. }
        ));

        partiture.schedule_graph.edges_mut()[1].kind_params.period = Some(10.0);
        assert_eq!(
            validate_partiture(&partiture).unwrap_err(),
            IntegrityError::InvalidKindParam {
                edge: 1,
                name: "switch_interval",
                value: 50.0
            }
        );

        partiture.schedule_graph.edges_mut()[1].kind = ScheduleAssignment::Composite(vec![ScheduleKind::Drag]);
        assert_eq!(
            validate_partiture(&partiture).unwrap_err(),
            IntegrityError::InvalidComposite { edge: 1 }
        );
    }
}
