use thiserror::Error;

/// Errors raised when constructing or mutating simulation bodies.
///
/// The solver divides by mass and assumes non-negative material
/// coefficients, so bad values are rejected up front instead of
/// surfacing later as NaN positions.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PhysicsError {
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    #[error("{name} coefficient must be non-negative and finite, got {value}")]
    InvalidCoefficient { name: &'static str, value: f32 },
}
