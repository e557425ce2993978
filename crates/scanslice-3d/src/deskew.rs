use glam::DVec3;
use scanslice_lie::{
    se3::{InterpolatedMotion, MotionVector},
    LieError,
};
use serde::{Deserialize, Serialize};

use crate::slicing::bin_azimuth_deg;

/// Error types for the deskew module.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DeskewError {
    /// Failed to evaluate the sweep motion
    #[error("Failed to evaluate the sweep motion")]
    Motion(#[from] LieError),

    /// A point row holds fewer than the three x, y, z coordinates.
    #[error("Point {index} of slice {slice} has {len} fields, expected at least 3")]
    PointTooShort {
        /// Index of the slice holding the row.
        slice: usize,
        /// Position of the row inside the slice.
        index: usize,
        /// Number of fields in the row.
        len: usize,
    },

    /// The azimuth where the sweep starts is not finite.
    #[error("Invalid sweep start azimuth. Got: {0}")]
    InvalidStartAzimuth(f64),
}

/// Which way the sweep motion is applied to the points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeskewDirection {
    /// Move points from the sweep start frame into the frame at their capture time.
    Forward,
    /// Move points from the frame at their capture time back into the sweep start frame.
    #[default]
    Backward,
}

/// Parameters of the sweep deskewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskewConfig {
    /// Which way the motion is applied.
    pub direction: DeskewDirection,
    /// Azimuth, in degrees on the `[0, 360)` slicer scale, captured at the start of the sweep.
    pub start_azimuth_deg: f64,
}

impl Default for DeskewConfig {
    fn default() -> Self {
        Self {
            direction: DeskewDirection::Backward,
            start_azimuth_deg: 0.0,
        }
    }
}

/// Fraction of the sweep elapsed when the slice at `index` was captured.
///
/// The sensor is assumed to turn at constant speed, starting at `start_azimuth_deg`.
///
/// # Arguments
///
/// * `index` - The slice index.
/// * `num_slices` - The number of slices in a full turn.
/// * `start_azimuth_deg` - The azimuth at the start of the sweep.
///
/// # Returns
///
/// The time ratio in `[0, 1]`.
///
/// PRECONDITION: `num_slices > 0`.
pub fn slice_time_ratio(index: usize, num_slices: usize, start_azimuth_deg: f64) -> f64 {
    let azimuth = bin_azimuth_deg(index, 360.0 / num_slices as f64);
    ((azimuth - start_azimuth_deg).rem_euclid(360.0) / 360.0).clamp(0.0, 1.0)
}

/// Move the x, y, z of a row with a rigid transform, copying every other field.
fn deskew_row(row: &[f64], transform: &InterpolatedMotion, direction: DeskewDirection) -> Vec<f64> {
    let point = DVec3::new(row[0], row[1], row[2]);
    let moved = match direction {
        DeskewDirection::Forward => transform.apply(point),
        DeskewDirection::Backward => transform.apply_inverse(point),
    };

    let mut out = Vec::with_capacity(row.len());
    out.extend_from_slice(&moved.to_array());
    out.extend_from_slice(&row[3..]);
    out
}

/// Compensate the sensor motion of a sliced sweep.
///
/// The motion is evaluated once per slice at the slice time ratio (see [`slice_time_ratio`]) and
/// applied to every point of the slice. The slice layout and the order of the points inside each
/// slice are kept, so the z order of a slice may change for tilted motions.
///
/// # Arguments
///
/// * `slices` - The slices as returned by the slicer, indexed by azimuth.
/// * `motion` - The sensor motion over the full sweep.
/// * `config` - The deskew configuration.
///
/// # Returns
///
/// New slices holding the compensated rows.
///
/// # Errors
///
/// * [`DeskewError::InvalidStartAzimuth`] if the start azimuth is not finite.
/// * [`DeskewError::Motion`] if the motion has non-finite components.
/// * [`DeskewError::PointTooShort`] if a row has fewer than 3 fields.
///
/// Example:
///
/// ```
/// use scanslice_3d::deskew::{deskew_slices, DeskewConfig, DeskewDirection};
/// use scanslice_lie::se3::MotionVector;
///
/// let slices = vec![vec![vec![1.0, 0.0, 0.0, 0.3]], vec![vec![0.0, 1.0, 0.0, 0.4]]];
/// let motion = MotionVector::from_array([2.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
/// let config = DeskewConfig {
///     direction: DeskewDirection::Forward,
///     start_azimuth_deg: 0.0,
/// };
///
/// let out = deskew_slices(&slices, &motion, &config).unwrap();
/// assert_eq!(out[0][0], vec![1.0, 0.0, 0.0, 0.3]);
/// assert_eq!(out[1][0], vec![1.0, 1.0, 0.0, 0.4]);
/// ```
pub fn deskew_slices<P>(
    slices: &[Vec<P>],
    motion: &MotionVector,
    config: &DeskewConfig,
) -> Result<Vec<Vec<Vec<f64>>>, DeskewError>
where
    P: AsRef<[f64]>,
{
    if !config.start_azimuth_deg.is_finite() {
        return Err(DeskewError::InvalidStartAzimuth(config.start_azimuth_deg));
    }

    let num_slices = slices.len();
    let mut deskewed = Vec::with_capacity(num_slices);
    for (slice_idx, slice) in slices.iter().enumerate() {
        if slice.is_empty() {
            deskewed.push(Vec::new());
            continue;
        }

        let ratio = slice_time_ratio(slice_idx, num_slices, config.start_azimuth_deg);
        let transform = motion.interpolate(ratio)?;

        let mut out = Vec::with_capacity(slice.len());
        for (index, point) in slice.iter().enumerate() {
            let row = point.as_ref();
            if row.len() < 3 {
                return Err(DeskewError::PointTooShort {
                    slice: slice_idx,
                    index,
                    len: row.len(),
                });
            }
            out.push(deskew_row(row, &transform, config.direction));
        }
        deskewed.push(out);
    }

    log::debug!(
        "Deskewed {} points over {} slices",
        deskewed.iter().map(|s| s.len()).sum::<usize>(),
        num_slices
    );

    Ok(deskewed)
}
