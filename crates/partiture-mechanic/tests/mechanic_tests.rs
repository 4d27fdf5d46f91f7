use std::collections::BTreeMap;

use partiture_algebra::{parse, ResolutionMode, ScheduleResolver};
use partiture_error::{Error, GenerationError};
use partiture_ir::{Partiture, PartitureCompiler};
use partiture_mechanic::{
    AgentSkeleton, CombinatorRegistry, EvaluationError, Mechanic, ObjectiveRealization,
    PartitureObjective, RealizationRegistry, Sample, TrainingObjective,
    AGENT_SKELETON_CAPABILITY,
};
use partiture_types::{CognitiveFunction, ObjectiveFamily, Params};
use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;

/// Realization returning a constant, so schedules can be checked by hand
#[derive(Debug)]
struct Fixed {
    family: ObjectiveFamily,
    value: f64,
}

impl ObjectiveRealization for Fixed {
    fn family(&self) -> ObjectiveFamily {
        self.family
    }

    fn evaluate(&self, _params: &Params, _batch: &[Sample]) -> Result<f64, EvaluationError> {
        Ok(self.value)
    }
}

fn fixed(values: &[(CognitiveFunction, f64)]) -> Mechanic {
    let realizations = values.iter().fold(RealizationRegistry::empty(), |registry, (symbol, value)| {
        registry.with(Fixed {
            family: symbol.family(),
            value: *value,
        })
    });
    Mechanic::with_registries(realizations, CombinatorRegistry::standard())
}

fn partiture(text: &str) -> Partiture {
    let scheduled = ScheduleResolver::new(ResolutionMode::Lenient)
        .resolve(parse(text).unwrap())
        .unwrap();
    PartitureCompiler::default().compile(&scheduled).unwrap()
}

fn batch() -> Vec<Sample> {
    vec![
        Sample::new(vec![0.0, 1.0], 1.0, 1.0).with_action_probs(vec![0.25, 0.75]),
        Sample::new(vec![1.0, 0.5], 0.0, 0.5).with_action_probs(vec![0.5, 0.5]),
        Sample::new(vec![2.0, 0.0], 0.5, 0.0).with_action_probs(vec![0.9, 0.1]),
    ]
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

//-----------------------------------------------------------------------------
// Generation
//-----------------------------------------------------------------------------

#[test]
fn test_drag_edge_exposes_damping() {
    let objective = Mechanic::new().generate(&partiture("Se ~ Si")).unwrap();

    let expected: BTreeMap<String, f64> = [
        ("edge.0.damping", 0.5),
        ("edge.0.weight", 1.0),
        ("term.0.weight", 1.0),
        ("term.1.weight", 1.0),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect();
    assert_eq!(objective.hyperparameters(), expected);
}

#[test]
fn test_orbital_edge_exposes_period() {
    let objective = Mechanic::new().generate(&partiture("Fi -> Te")).unwrap();
    assert_eq!(objective.hyperparameter("edge.0.period"), Some(100.0));
    assert_eq!(objective.hyperparameter("edge.0.damping"), None);

    let accelerated = Mechanic::new().generate(&partiture("4(Fi -> Te)")).unwrap();
    assert_eq!(accelerated.hyperparameter("edge.0.period"), Some(25.0));
}

#[test]
fn test_composite_edge_exposes_both_params() {
    let objective = Mechanic::new().generate(&partiture("Fi oo Fe")).unwrap();
    assert_eq!(objective.hyperparameter("edge.0.damping"), Some(0.5));
    assert_eq!(objective.hyperparameter("edge.0.switch_interval"), Some(50.0));
}

#[test]
fn test_generation_is_deterministic() {
    let partiture = partiture("(Se ~ Si) -> 2Ne");
    let first = Mechanic::new().generate(&partiture).unwrap();
    let second = Mechanic::new().generate(&partiture).unwrap();
    assert_eq!(first.content_hash(), second.content_hash());
    assert_eq!(first.hyperparameters(), second.hyperparameters());
    assert_eq!(first.evaluate_at(&batch(), 7).unwrap(), second.evaluate_at(&batch(), 7).unwrap());
}

#[test]
fn test_generates_from_decoded_partiture() {
    let original = partiture("(Se ~ Si) -> Ne");
    let decoded = Partiture::from_json(&original.to_json().unwrap()).unwrap();
    let objective = Mechanic::new().generate(&decoded).unwrap();
    assert_eq!(objective.content_hash(), original.content_hash().unwrap());
}

#[test]
fn test_missing_realization_names_family() {
    let mechanic = fixed(&[(CognitiveFunction::Se, 1.0)]);
    let err = mechanic.generate(&partiture("Se ~ Si")).unwrap_err();
    assert_eq!(
        err,
        Error::Generation(GenerationError::NoRealization {
            family: "complexity_minimization".to_string(),
            term: 1,
        })
    );
}

//-----------------------------------------------------------------------------
// Evaluation
//-----------------------------------------------------------------------------

#[test]
fn test_single_term_objective() {
    let mut objective = fixed(&[(CognitiveFunction::Ni, 3.0)])
        .generate(&partiture("2Ni"))
        .unwrap();
    assert_eq!(objective.edge_count(), 0);
    assert_eq!(objective.hyperparameters().len(), 1);
    assert_eq!(objective.evaluate(&batch()).unwrap(), 6.0);
}

#[test]
fn test_drag_evaluation() {
    let mut objective = fixed(&[(CognitiveFunction::Se, 2.0), (CognitiveFunction::Si, 6.0)])
        .generate(&partiture("Se ~ Si"))
        .unwrap();
    // 2 + 6 / (1 + 0.5 * 2)
    assert_eq!(objective.evaluate(&batch()).unwrap(), 5.0);

    objective.set_hyperparameter("edge.0.damping", 0.0).unwrap();
    assert_eq!(objective.evaluate(&batch()).unwrap(), 8.0);
}

#[test]
fn test_orbital_evaluation_is_periodic() {
    let objective = fixed(&[(CognitiveFunction::Fi, 1.0), (CognitiveFunction::Te, 3.0)])
        .generate(&partiture("Fi -> Te"))
        .unwrap();
    assert!(close(objective.evaluate_at(&batch(), 0).unwrap(), 1.0));
    assert!(close(objective.evaluate_at(&batch(), 25).unwrap(), 2.0));
    assert!(close(objective.evaluate_at(&batch(), 50).unwrap(), 3.0));
    assert!(close(objective.evaluate_at(&batch(), 100).unwrap(), 1.0));
}

#[test]
fn test_composite_applies_drag_then_switching() {
    let objective = fixed(&[(CognitiveFunction::Fi, 2.0), (CognitiveFunction::Fe, 6.0)])
        .generate(&partiture("Fi oo Fe"))
        .unwrap();
    // drag gives 5, switching then picks between 5 and the right operand
    assert_eq!(objective.evaluate_at(&batch(), 0).unwrap(), 5.0);
    assert_eq!(objective.evaluate_at(&batch(), 49).unwrap(), 5.0);
    assert_eq!(objective.evaluate_at(&batch(), 50).unwrap(), 6.0);
    assert_eq!(objective.evaluate_at(&batch(), 100).unwrap(), 5.0);
}

#[test]
fn test_heavier_opposition_operand_drags_the_lighter() {
    let objective = fixed(&[(CognitiveFunction::Fi, 2.0), (CognitiveFunction::Fe, 6.0)])
        .generate(&partiture("Fi oo 3Fe"))
        .unwrap();
    assert_eq!(objective.hyperparameter("edge.0.switch_interval"), None);
    // 3 * 6 leads and damps Fi: 18 + 2 / (1 + 0.5 * 18)
    assert!(close(objective.evaluate_at(&batch(), 0).unwrap(), 18.2));
    assert!(close(objective.evaluate_at(&batch(), 50).unwrap(), 18.2));
}

#[test]
fn test_nested_edges_decay_by_depth() {
    let objective = fixed(&[
        (CognitiveFunction::Se, 2.0),
        (CognitiveFunction::Si, 6.0),
        (CognitiveFunction::Ne, 10.0),
    ])
    .generate(&partiture("(Se ~ Si) -> Ne"))
    .unwrap();
    assert_eq!(objective.hyperparameter("edge.1.weight"), Some(0.5));
    // the inner drag edge is worth 0.5 * 5 and the orbital root starts on it
    assert!(close(objective.evaluate_at(&batch(), 0).unwrap(), 2.5));
    assert!(close(objective.evaluate_at(&batch(), 50).unwrap(), 10.0));
}

#[test]
fn test_standard_realizations_are_finite() {
    let mut objective = Mechanic::new()
        .generate(&partiture("((Se ~ Si) -> (Ne ~ Ni)) -> ((Te ~ Ti) -> (Fe ~ Fi))"))
        .unwrap();
    for _ in 0..10 {
        assert!(objective.evaluate(&batch()).unwrap().is_finite());
    }
}

#[test]
fn test_empty_batch_does_not_advance() {
    let mut objective = Mechanic::new().generate(&partiture("Se ~ Si")).unwrap();
    assert_eq!(objective.evaluate(&[]).unwrap_err(), EvaluationError::EmptyBatch);
    assert_eq!(objective.step(), 0);
}

#[test]
fn test_step_advances_and_resets() {
    let mut objective = Mechanic::new().generate(&partiture("Fi -> Te")).unwrap();
    let first = objective.evaluate(&batch()).unwrap();
    objective.evaluate(&batch()).unwrap();
    objective.evaluate(&batch()).unwrap();
    assert_eq!(objective.step(), 3);

    objective.reset();
    assert_eq!(objective.step(), 0);
    assert_eq!(objective.evaluate(&batch()).unwrap(), first);
}

#[test]
fn test_set_hyperparameter_rejects_bad_input() {
    let mut objective: PartitureObjective = Mechanic::new().generate(&partiture("Fi oo Fe")).unwrap();

    for name in ["edge.0.period", "edge.1.weight", "term.2.weight", "term.0.mass", "weight", "edge.x.weight"] {
        assert_eq!(
            objective.set_hyperparameter(name, 1.0).unwrap_err(),
            EvaluationError::UnknownHyperparameter {
                name: name.to_string()
            }
        );
    }

    for (name, value) in [
        ("term.0.weight", 0.0),
        ("edge.0.weight", f64::NAN),
        ("edge.0.damping", -0.1),
        ("edge.0.switch_interval", 2.5),
        ("edge.0.switch_interval", 0.0),
    ] {
        assert!(matches!(
            objective.set_hyperparameter(name, value),
            Err(EvaluationError::InvalidValue { .. })
        ));
    }

    objective.set_hyperparameter("edge.0.switch_interval", 3.0).unwrap();
    assert_eq!(objective.hyperparameter("edge.0.switch_interval"), Some(3.0));
}

#[quickcheck]
fn prop_evaluate_at_is_pure(step: u16) -> bool {
    let objective = Mechanic::new().generate(&partiture("(Fi oo Fe) -> Te")).unwrap();
    let step = u64::from(step);
    objective.evaluate_at(&batch(), step).unwrap() == objective.evaluate_at(&batch(), step).unwrap()
}

#[quickcheck]
fn prop_switching_picks_an_operand(step: u16) -> bool {
    let objective = fixed(&[(CognitiveFunction::Se, 1.0), (CognitiveFunction::Ne, 4.0)])
        .generate(&partiture("Se | Ne"))
        .unwrap();
    let value = objective.evaluate_at(&batch(), u64::from(step)).unwrap();
    value == 1.0 || value == 4.0
}

//-----------------------------------------------------------------------------
// Agent skeleton
//-----------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Foreign {
    step: u64,
}

impl TrainingObjective for Foreign {
    fn evaluate(&mut self, _batch: &[Sample]) -> Result<f64, EvaluationError> {
        self.step += 1;
        Ok(0.0)
    }

    fn hyperparameters(&self) -> BTreeMap<String, f64> {
        BTreeMap::new()
    }

    fn set_hyperparameter(&mut self, name: &str, _value: f64) -> Result<(), EvaluationError> {
        Err(EvaluationError::UnknownHyperparameter {
            name: name.to_string(),
        })
    }

    fn step(&self) -> u64 {
        self.step
    }

    fn reset(&mut self) {
        self.step = 0;
    }

    fn capability(&self) -> &str {
        "foreign.objective/v0"
    }
}

#[test]
fn test_skeleton_rejects_foreign_capability() {
    let err = AgentSkeleton::new(Box::new(Foreign::default())).unwrap_err();
    assert_eq!(
        err,
        Error::Generation(GenerationError::CapabilityMismatch {
            expected: AGENT_SKELETON_CAPABILITY,
            found: "foreign.objective/v0".to_string(),
        })
    );
}

#[test]
fn test_skeleton_reports_loss() {
    let objective = fixed(&[(CognitiveFunction::Se, 2.0), (CognitiveFunction::Si, 6.0)])
        .generate(&partiture("Se ~ Si"))
        .unwrap();
    let mut skeleton = AgentSkeleton::new(Box::new(objective)).unwrap();

    let first = skeleton.train_step(&batch()).unwrap();
    assert_eq!(first.step, 0);
    assert_eq!(first.objective, 5.0);
    assert_eq!(first.loss, -5.0);

    let second = skeleton.train_step(&batch()).unwrap();
    assert_eq!(second.step, 1);
    assert_eq!(skeleton.objective().step(), 2);

    skeleton.objective_mut().reset();
    assert_eq!(skeleton.train_step(&batch()).unwrap().step, 0);
}
