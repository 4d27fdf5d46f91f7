// Cognitive function symbols
// The eight closed-vocabulary symbols and the process-wide symbol table

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::family::{ObjectiveFamily, Params};

/// Orientation of a cognitive function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attitude {
    Introverted,
    Extraverted,
}

/// Perceiving (S/N) or judging (T/F) functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Perception,
    Judgment,
}

/// The function letter shared by an introverted/extraverted pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Process {
    Sensing,
    Intuition,
    Thinking,
    Feeling,
}

impl Process {
    pub fn axis(&self) -> Axis {
        match self {
            Process::Sensing | Process::Intuition => Axis::Perception,
            Process::Thinking | Process::Feeling => Axis::Judgment,
        }
    }
}

/// One of the eight cognitive-function symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CognitiveFunction {
    Fi,
    Fe,
    Ni,
    Ne,
    Ti,
    Te,
    Si,
    Se,
}

impl CognitiveFunction {
    /// Every symbol, in canonical order
    pub const ALL: [CognitiveFunction; 8] = [
        CognitiveFunction::Fi,
        CognitiveFunction::Fe,
        CognitiveFunction::Ni,
        CognitiveFunction::Ne,
        CognitiveFunction::Ti,
        CognitiveFunction::Te,
        CognitiveFunction::Si,
        CognitiveFunction::Se,
    ];

    /// The symbol as written in algebra text
    pub fn as_str(&self) -> &'static str {
        match self {
            CognitiveFunction::Fi => "Fi",
            CognitiveFunction::Fe => "Fe",
            CognitiveFunction::Ni => "Ni",
            CognitiveFunction::Ne => "Ne",
            CognitiveFunction::Ti => "Ti",
            CognitiveFunction::Te => "Te",
            CognitiveFunction::Si => "Si",
            CognitiveFunction::Se => "Se",
        }
    }

    /// Look up a symbol by its exact spelling
    pub fn from_symbol(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|symbol| symbol.as_str() == text)
    }

    pub fn attitude(&self) -> Attitude {
        match self {
            CognitiveFunction::Fi
            | CognitiveFunction::Ni
            | CognitiveFunction::Ti
            | CognitiveFunction::Si => Attitude::Introverted,
            CognitiveFunction::Fe
            | CognitiveFunction::Ne
            | CognitiveFunction::Te
            | CognitiveFunction::Se => Attitude::Extraverted,
        }
    }

    pub fn process(&self) -> Process {
        match self {
            CognitiveFunction::Fi | CognitiveFunction::Fe => Process::Feeling,
            CognitiveFunction::Ni | CognitiveFunction::Ne => Process::Intuition,
            CognitiveFunction::Ti | CognitiveFunction::Te => Process::Thinking,
            CognitiveFunction::Si | CognitiveFunction::Se => Process::Sensing,
        }
    }

    pub fn axis(&self) -> Axis {
        self.process().axis()
    }

    /// The objective family this symbol is bound to
    pub fn family(&self) -> ObjectiveFamily {
        match self {
            CognitiveFunction::Se => ObjectiveFamily::EntropyMaximization,
            CognitiveFunction::Si => ObjectiveFamily::ComplexityMinimization,
            CognitiveFunction::Ne => ObjectiveFamily::NoveltyMaximization,
            CognitiveFunction::Ni => ObjectiveFamily::TrajectoryAlignment,
            CognitiveFunction::Te => ObjectiveFamily::RegressionFit,
            CognitiveFunction::Ti => ObjectiveFamily::ContrastDiscrimination,
            CognitiveFunction::Fe => ObjectiveFamily::EntropyValueBalance,
            CognitiveFunction::Fi => ObjectiveFamily::GroupMeanAggregation,
        }
    }
}

impl fmt::Display for CognitiveFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symbol bound to its objective family and default hyperparameters
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub symbol: CognitiveFunction,
    pub family: ObjectiveFamily,
    pub default_params: Params,
}

/// Static registry of the eight symbols
#[derive(Debug)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

static SYMBOL_TABLE: Lazy<SymbolTable> = Lazy::new(|| SymbolTable {
    entries: CognitiveFunction::ALL
        .iter()
        .map(|symbol| SymbolEntry {
            symbol: *symbol,
            family: symbol.family(),
            default_params: symbol.family().default_params(),
        })
        .collect(),
});

impl SymbolTable {
    /// The process-wide table, built once on first use
    pub fn global() -> &'static SymbolTable {
        &SYMBOL_TABLE
    }

    /// Resolve symbol text to its entry
    pub fn lookup(&self, text: &str) -> Option<&SymbolEntry> {
        self.entries.iter().find(|entry| entry.symbol.as_str() == text)
    }

    pub fn entry(&self, symbol: CognitiveFunction) -> &SymbolEntry {
        // entries are built from ALL in declaration order
        &self.entries[symbol as usize]
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }
}
