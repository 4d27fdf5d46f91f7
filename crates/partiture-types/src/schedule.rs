// Schedule kinds
// How two objective terms are combined over training time

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// Periodic re-weighting between the two terms
    Orbital,
    /// The right term damped by the left term's magnitude
    Drag,
    /// Hard alternation between the terms
    Switching,
}

impl ScheduleKind {
    pub const ALL: [ScheduleKind; 3] = [
        ScheduleKind::Orbital,
        ScheduleKind::Drag,
        ScheduleKind::Switching,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScheduleKind::Orbital => "orbital",
            ScheduleKind::Drag => "drag",
            ScheduleKind::Switching => "switching",
        }
    }

    /// The schedule parameter this kind reads
    pub fn param_name(&self) -> &'static str {
        match self {
            ScheduleKind::Orbital => "period",
            ScheduleKind::Drag => "damping",
            ScheduleKind::Switching => "switch_interval",
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleKind::Orbital => f.write_str("Orbital"),
            ScheduleKind::Drag => f.write_str("Drag"),
            ScheduleKind::Switching => f.write_str("Switching"),
        }
    }
}

/// Schedule attached to a relation: a primitive kind or a nested composite
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleAssignment {
    Orbital,
    Drag,
    Switching,
    /// Two or more distinct primitives, applied innermost first
    Composite(Vec<ScheduleKind>),
}

impl ScheduleAssignment {
    /// Build a composite, or `None` if fewer than two distinct kinds are given
    pub fn composite(kinds: Vec<ScheduleKind>) -> Option<Self> {
        let assignment = ScheduleAssignment::Composite(kinds);
        assignment.is_well_formed().then_some(assignment)
    }

    /// Primitive kinds in application order
    pub fn components(&self) -> Vec<ScheduleKind> {
        match self {
            ScheduleAssignment::Orbital => vec![ScheduleKind::Orbital],
            ScheduleAssignment::Drag => vec![ScheduleKind::Drag],
            ScheduleAssignment::Switching => vec![ScheduleKind::Switching],
            ScheduleAssignment::Composite(kinds) => kinds.clone(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, ScheduleAssignment::Composite(_))
    }

    pub fn uses(&self, kind: ScheduleKind) -> bool {
        self.components().contains(&kind)
    }

    /// Composites need at least two kinds and no repeats
    pub fn is_well_formed(&self) -> bool {
        match self {
            ScheduleAssignment::Composite(kinds) => {
                kinds.len() >= 2
                    && kinds
                        .iter()
                        .enumerate()
                        .all(|(i, kind)| !kinds[..i].contains(kind))
            }
            _ => true,
        }
    }
}

impl From<ScheduleKind> for ScheduleAssignment {
    fn from(kind: ScheduleKind) -> Self {
        match kind {
            ScheduleKind::Orbital => ScheduleAssignment::Orbital,
            ScheduleKind::Drag => ScheduleAssignment::Drag,
            ScheduleKind::Switching => ScheduleAssignment::Switching,
        }
    }
}

impl fmt::Display for ScheduleAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleAssignment::Orbital => f.write_str("Orbital"),
            ScheduleAssignment::Drag => f.write_str("Drag"),
            ScheduleAssignment::Switching => f.write_str("Switching"),
            ScheduleAssignment::Composite(kinds) => {
                let names: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
                write!(f, "Composite({})", names.join("+"))
            }
        }
    }
}

/// Schedule-specific parameters of one edge
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleParams {
    /// Orbital period, in evaluation steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<f64>,

    /// Drag damping coefficient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damping: Option<f64>,

    /// Switching interval, in evaluation steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_interval: Option<u64>,
}

impl ScheduleParams {
    /// Value of the parameter a kind reads, as a float
    pub fn get(&self, kind: ScheduleKind) -> Option<f64> {
        match kind {
            ScheduleKind::Orbital => self.period,
            ScheduleKind::Drag => self.damping,
            ScheduleKind::Switching => self.switch_interval.map(|interval| interval as f64),
        }
    }
}
