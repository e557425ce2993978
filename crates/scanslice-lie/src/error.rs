/// An error type for the lie module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum LieError {
    /// The time ratio used to interpolate a motion is outside `[0, 1]` or not a number.
    #[error("Time ratio must be within [0, 1]. Got: {0}")]
    InvalidTimeRatio(f64),

    /// One of the motion vector components is NaN or infinite.
    #[error("Motion vector has non-finite components: {0:?}")]
    NonFiniteMotion([f64; 6]),
}
