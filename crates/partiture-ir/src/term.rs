// Partiture terms
// One weighted objective instance per algebra leaf

use partiture_types::{CognitiveFunction, ObjectiveFamily, Params, SymbolTable};
use serde::{Deserialize, Serialize};

/// A weighted instance of one objective family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Term {
    pub symbol: CognitiveFunction,
    pub family: ObjectiveFamily,
    pub params: Params,
    pub weight: f64,
}

impl Term {
    /// Term for a symbol with its family's default parameters
    pub fn new(symbol: CognitiveFunction, weight: f64) -> Self {
        let entry = SymbolTable::global().entry(symbol);
        Self {
            symbol,
            family: entry.family,
            params: entry.default_params.clone(),
            weight,
        }
    }

    /// Read one family parameter
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }
}
