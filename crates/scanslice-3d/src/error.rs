/// An error type for the slicing and sorting modules.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SliceError {
    /// The angular width of a slice is not a finite value in `(0, 360]`.
    #[error("Granularity must be within (0, 360] degrees. Got: {0}")]
    InvalidGranularity(f64),

    /// The snapping bands are not ordered fractions of the granularity.
    #[error("Snapping bands must satisfy 0 <= low <= high <= 1. Got: low={low}, high={high}")]
    InvalidBands {
        /// Fraction of the granularity below which a point snaps to the lower edge.
        low: f64,
        /// Fraction of the granularity above which a point snaps to the upper edge.
        high: f64,
    },

    /// A point row holds fewer than the three x, y, z coordinates.
    #[error("Point {index} has {len} fields, expected at least 3")]
    PointTooShort {
        /// Position of the row in the input.
        index: usize,
        /// Number of fields in the row.
        len: usize,
    },

    /// The requested sort column does not exist in a row.
    #[error("Column {column} is out of range for row {index} with {len} fields")]
    ColumnOutOfRange {
        /// Position of the row in the input.
        index: usize,
        /// Requested column.
        column: usize,
        /// Number of fields in the row.
        len: usize,
    },
}
