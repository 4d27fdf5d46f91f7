// The Mathematical Partiture
// Versioned IR handed from the compiler to the code generator, with its JSON codec

use partiture_error::{Error, Result, Validate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::ScheduleGraph;
use crate::term::Term;
use crate::validation::validate_partiture;

/// Current encoding version
pub const PARTITURE_VERSION: u32 = 1;

/// Terms and the schedule graph that combines them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Partiture {
    pub version: u32,
    /// Algebra text the partiture was compiled from
    pub source: String,
    pub terms: Vec<Term>,
    pub schedule_graph: ScheduleGraph,
}

impl Partiture {
    pub fn new(source: impl Into<String>, terms: Vec<Term>, schedule_graph: ScheduleGraph) -> Self {
        Self {
            version: PARTITURE_VERSION,
            source: source.into(),
            terms,
            schedule_graph,
        }
    }

    /// Compact JSON, the canonical encoding
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode and integrity-check a persisted partiture
    pub fn from_json(json: &str) -> Result<Self> {
        let partiture: Partiture = serde_json::from_str(json)?;
        partiture.validate()?;
        debug!(
            terms = partiture.terms.len(),
            edges = partiture.schedule_graph.len(),
            "decoded partiture"
        );
        Ok(partiture)
    }

    /// blake3 of the canonical encoding, hex encoded
    pub fn content_hash(&self) -> Result<String> {
        let json = self.to_json()?;
        Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
    }
}

impl Validate for Partiture {
    fn validate(&self) -> Result<()> {
        validate_partiture(self).map_err(Error::CompileIntegrity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ScheduleEdge;
    use partiture_error::{ErrorKind, IntegrityError};
    use partiture_types::{CognitiveFunction, ScheduleAssignment, ScheduleParams};
    use pretty_assertions::assert_eq;

    fn se_drag_si() -> Partiture {
        Partiture::new(
            "Se ~ Si",
            vec![
                Term::new(CognitiveFunction::Se, 1.0),
                Term::new(CognitiveFunction::Si, 1.0),
            ],
            ScheduleGraph::new(vec![ScheduleEdge {
                left_indices: vec![0],
                right_indices: vec![1],
                kind: ScheduleAssignment::Drag,
                kind_params: ScheduleParams {
                    damping: Some(0.5),
                    ..Default::default()
                },
                weight: 1.0,
                depth: 0,
            }]),
        )
    }

    #[test]
    fn test_json_round_trip() {
        let partiture = se_drag_si();
        let json = partiture.to_json().unwrap();
        assert_eq!(Partiture::from_json(&json).unwrap(), partiture);

        let pretty = partiture.to_json_pretty().unwrap();
        assert_eq!(Partiture::from_json(&pretty).unwrap(), partiture);
    }

    #[test]
    fn test_wire_shape() {
        let json = se_drag_si().to_json().unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"version":1,"source":"Se ~ Si","terms":["#,
                r#"{"symbol":"Se","family":"entropy_maximization","params":{"temperature":1.0},"weight":1.0},"#,
                r#"{"symbol":"Si","family":"complexity_minimization","params":{"bandwidth":1.0},"weight":1.0}],"#,
                r#""schedule_graph":[{"left_indices":[0],"right_indices":[1],"kind":"drag","#,
                r#""kind_params":{"damping":0.5},"weight":1.0,"depth":0}]}"#
            )
        );
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = se_drag_si().content_hash().unwrap();
        let b = se_drag_si().content_hash().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let mut other = se_drag_si();
        other.terms[0].weight = 2.0;
        assert_ne!(other.content_hash().unwrap(), a);
    }

    #[test]
    fn test_decode_rejects_unknown_family_and_kind() {
        let json = se_drag_si().to_json().unwrap();

        let bad_family = json.replace("entropy_maximization", "curiosity");
        assert_eq!(Partiture::from_json(&bad_family).unwrap_err().kind(), ErrorKind::Codec);

        let bad_kind = json.replace("\"drag\"", "\"spiral\"");
        assert_eq!(Partiture::from_json(&bad_kind).unwrap_err().kind(), ErrorKind::Codec);

        let missing = json.replace("\"depth\":0", "\"extra\":0");
        assert_eq!(Partiture::from_json(&missing).unwrap_err().kind(), ErrorKind::Codec);
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let json = se_drag_si().to_json().unwrap().replace("\"version\":1", "\"version\":2");
        assert_eq!(
            Partiture::from_json(&json).unwrap_err(),
            Error::CompileIntegrity(IntegrityError::UnsupportedVersion {
                found: 2,
                supported: PARTITURE_VERSION,
            })
        );
    }

    #[test]
    fn test_decode_runs_integrity_checks() {
        let json = se_drag_si().to_json().unwrap().replace("\"right_indices\":[1]", "\"right_indices\":[5]");
        assert_eq!(
            Partiture::from_json(&json).unwrap_err(),
            Error::CompileIntegrity(IntegrityError::DanglingTermIndex {
                edge: 0,
                index: 5,
                terms: 2,
            })
        );
    }
}
