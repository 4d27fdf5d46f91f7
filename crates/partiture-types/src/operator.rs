// Relation operators
// The closed set of connectives between cognitive-function operands

use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary connective over two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationOperator {
    /// `~`: one function held in tension with, or orbiting, another
    Tension,
    /// `->` (or `→`): one function compounding into another
    Compound,
    /// `|`: oscillation between two non-interacting functions
    Switch,
    /// `oo`: two functions in conflict, the heavier one dragging the other
    Opposition,
}

impl RelationOperator {
    pub const ALL: [RelationOperator; 4] = [
        RelationOperator::Tension,
        RelationOperator::Compound,
        RelationOperator::Switch,
        RelationOperator::Opposition,
    ];

    /// Canonical spelling
    pub fn token(&self) -> &'static str {
        match self {
            RelationOperator::Tension => "~",
            RelationOperator::Compound => "->",
            RelationOperator::Switch => "|",
            RelationOperator::Opposition => "oo",
        }
    }

    /// Every accepted spelling, canonical first
    pub fn spellings(&self) -> &'static [&'static str] {
        match self {
            RelationOperator::Tension => &["~"],
            RelationOperator::Compound => &["->", "→"],
            RelationOperator::Switch => &["|"],
            RelationOperator::Opposition => &["oo"],
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.spellings().contains(&token))
    }

    pub fn name(&self) -> &'static str {
        match self {
            RelationOperator::Tension => "tension",
            RelationOperator::Compound => "compound",
            RelationOperator::Switch => "switch",
            RelationOperator::Opposition => "opposition",
        }
    }
}

impl fmt::Display for RelationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spellings_round_trip() {
        for op in RelationOperator::ALL {
            for spelling in op.spellings() {
                assert_eq!(RelationOperator::from_token(spelling), Some(op));
            }
            assert_eq!(op.spellings()[0], op.token());
        }
        assert_eq!(RelationOperator::from_token("→"), Some(RelationOperator::Compound));
        assert_eq!(RelationOperator::from_token("=>"), None);
    }
}
