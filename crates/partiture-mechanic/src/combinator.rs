// Schedule combinators
// Time-dependent binary combination of two operand values

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use partiture_types::ScheduleKind;

/// Combines a left and right value at a schedule step
pub trait Combinator: fmt::Debug + Send + Sync {
    fn kind(&self) -> ScheduleKind;

    /// `param` is the edge's value for this kind's schedule parameter
    fn combine(&self, left: f64, right: f64, param: f64, step: u64) -> f64;
}

/// Cosine re-weighting between the operands over one period
#[derive(Debug, Default)]
pub struct Orbital;

impl Combinator for Orbital {
    fn kind(&self) -> ScheduleKind {
        ScheduleKind::Orbital
    }

    fn combine(&self, left: f64, right: f64, period: f64, step: u64) -> f64 {
        let a = (1.0 + (2.0 * PI * step as f64 / period).cos()) / 2.0;
        a * left + (1.0 - a) * right
    }
}

/// Right operand damped by the magnitude of the left
#[derive(Debug, Default)]
pub struct Drag;

impl Combinator for Drag {
    fn kind(&self) -> ScheduleKind {
        ScheduleKind::Drag
    }

    fn combine(&self, left: f64, right: f64, damping: f64, _step: u64) -> f64 {
        left + right / (1.0 + damping * left.abs())
    }
}

/// Alternates between the operands every interval
#[derive(Debug, Default)]
pub struct Switching;

impl Combinator for Switching {
    fn kind(&self) -> ScheduleKind {
        ScheduleKind::Switching
    }

    fn combine(&self, left: f64, right: f64, interval: f64, step: u64) -> f64 {
        let interval = interval.max(1.0) as u64;
        if (step / interval) % 2 == 0 {
            left
        } else {
            right
        }
    }
}

/// Combinators keyed by schedule kind
#[derive(Debug, Clone, Default)]
pub struct CombinatorRegistry {
    combinators: BTreeMap<ScheduleKind, Arc<dyn Combinator>>,
}

impl CombinatorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Combinators for every primitive kind
    pub fn standard() -> Self {
        Self::empty().with(Orbital).with(Drag).with(Switching)
    }

    pub fn with(mut self, combinator: impl Combinator + 'static) -> Self {
        self.combinators.insert(combinator.kind(), Arc::new(combinator));
        self
    }

    pub fn get(&self, kind: ScheduleKind) -> Option<Arc<dyn Combinator>> {
        self.combinators.get(&kind).cloned()
    }
}
