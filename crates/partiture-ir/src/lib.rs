// Mathematical Partiture intermediate representation
// Compiler, codec, integrity checks and report rendering for the partiture IR

pub mod compiler;
pub mod graph;
pub mod partiture;
pub mod report;
pub mod term;
pub mod validation;

pub use compiler::PartitureCompiler;
pub use graph::{Operand, ScheduleEdge, ScheduleGraph, Side};
pub use partiture::{Partiture, PARTITURE_VERSION};
pub use report::render_report;
pub use term::Term;
pub use validation::{resolve_operands, validate_partiture};
