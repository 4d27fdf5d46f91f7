// Validation seam
// Implemented by every value that crosses a stage boundary

use crate::Result;

/// Trait for pipeline values that can check their own referential integrity
pub trait Validate {
    /// Confirm the value is safe to hand to the next stage
    fn validate(&self) -> Result<()>;
}
