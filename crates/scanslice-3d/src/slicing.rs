use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{sort::sort_by_column, SliceError};

/// Largest number of slices a configuration may ask for, 0.0001 degree slices.
pub const MAX_SLICES: usize = 3_600_000;

/// Parameters of the angular slicer.
///
/// A point is kept only when its azimuth lies close to a slice edge: within `low_band *
/// granularity` above the lower edge, or within `(1 - high_band) * granularity` below the upper
/// edge. Points in the interior of a slice are dropped. With the defaults about 60% of a uniformly
/// spread sweep is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicerConfig {
    /// Angular width of a slice in degrees.
    pub granularity: f64,
    /// Fraction of the granularity below which a point snaps to the lower edge.
    pub low_band: f64,
    /// Fraction of the granularity above which a point snaps to the upper edge.
    pub high_band: f64,
    /// Column used to order the points inside a slice (z by default).
    pub sort_column: usize,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            granularity: 0.5,
            low_band: 0.2,
            high_band: 0.8,
            sort_column: 2,
        }
    }
}

impl SlicerConfig {
    /// Create a configuration with the default bands for a given slice width.
    pub fn with_granularity(granularity: f64) -> Self {
        Self {
            granularity,
            ..Default::default()
        }
    }

    /// Number of slices covering a full turn.
    #[inline]
    pub fn num_slices(&self) -> usize {
        (360.0 / self.granularity).round() as usize
    }

    /// Residual, in degrees, below which a point snaps to the lower edge of its slice.
    #[inline]
    pub fn low_threshold(&self) -> f64 {
        self.low_band * self.granularity
    }

    /// Residual, in degrees, above which a point snaps to the upper edge of its slice.
    #[inline]
    pub fn high_threshold(&self) -> f64 {
        self.high_band * self.granularity
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// * [`SliceError::InvalidGranularity`] if the granularity is not finite, not in `(0, 360]`
    ///   or yields more than [`MAX_SLICES`] slices.
    /// * [`SliceError::InvalidBands`] unless `0 <= low_band <= high_band <= 1`.
    pub fn validate(&self) -> Result<(), SliceError> {
        if !(self.granularity > 0.0 && self.granularity <= 360.0) {
            return Err(SliceError::InvalidGranularity(self.granularity));
        }
        if !(1..=MAX_SLICES).contains(&self.num_slices()) {
            return Err(SliceError::InvalidGranularity(self.granularity));
        }
        let bands_ok = (0.0..=1.0).contains(&self.low_band)
            && (0.0..=1.0).contains(&self.high_band)
            && self.low_band <= self.high_band;
        if !bands_ok {
            return Err(SliceError::InvalidBands {
                low: self.low_band,
                high: self.high_band,
            });
        }
        Ok(())
    }
}

/// Azimuth of a point in degrees, shifted from `[-180, 180]` to `[0, 360]`.
///
/// # Arguments
///
/// * `x` - The x coordinate of the point.
/// * `y` - The y coordinate of the point.
#[inline]
pub fn azimuth_deg(x: f64, y: f64) -> f64 {
    y.atan2(x).to_degrees() + 180.0
}

/// Lower edge, in degrees, of the slice at `index`.
#[inline]
pub fn bin_azimuth_deg(index: usize, granularity: f64) -> f64 {
    index as f64 * granularity
}

/// Find the slice a given azimuth snaps to.
///
/// # Arguments
///
/// * `theta` - Azimuth in degrees, as returned by [`azimuth_deg`].
/// * `config` - The slicer configuration.
///
/// # Returns
///
/// The slice index in `0..config.num_slices()`, or `None` when the azimuth falls in the interior
/// band of a slice (or is NaN).
///
/// PRECONDITION: `config` is valid.
///
/// Example:
///
/// ```
/// use scanslice_3d::slicing::{classify_azimuth, SlicerConfig};
///
/// let config = SlicerConfig::default();
/// assert_eq!(classify_azimuth(90.05, &config), Some(180));
/// assert_eq!(classify_azimuth(90.45, &config), Some(181));
/// assert_eq!(classify_azimuth(90.25, &config), None);
/// ```
pub fn classify_azimuth(theta: f64, config: &SlicerConfig) -> Option<usize> {
    let granularity = config.granularity;
    let num_slices = config.num_slices() as i64;
    let residual = theta.rem_euclid(granularity);

    // derive the edge index from the residual so that both agree on which edge is below theta
    let lower_edge = ((theta - residual) / granularity).round() as i64;

    if residual < config.low_threshold() {
        Some(lower_edge.rem_euclid(num_slices) as usize)
    } else if residual > config.high_threshold() {
        Some((lower_edge + 1).rem_euclid(num_slices) as usize)
    } else {
        None
    }
}

/// Distribute point rows into azimuth slices without ordering them.
///
/// Rows keep their input order inside each slice. Rows whose azimuth falls in the interior band
/// of a slice are dropped.
///
/// # Arguments
///
/// * `points` - Point rows with at least x, y, z. Further fields are carried along untouched.
/// * `config` - The slicer configuration.
///
/// # Returns
///
/// `config.num_slices()` slices, indexed by their lower edge.
///
/// # Errors
///
/// * Configuration errors from [`SlicerConfig::validate`].
/// * [`SliceError::PointTooShort`] if a row has fewer than 3 fields.
pub fn bin_points<P, I>(points: I, config: &SlicerConfig) -> Result<Vec<Vec<P>>, SliceError>
where
    P: AsRef<[f64]>,
    I: IntoIterator<Item = P>,
{
    config.validate()?;

    let mut slices: Vec<Vec<P>> = Vec::new();
    slices.resize_with(config.num_slices(), Vec::new);

    let mut num_points = 0;
    let mut num_dropped = 0;
    for (index, point) in points.into_iter().enumerate() {
        let row = point.as_ref();
        if row.len() < 3 {
            return Err(SliceError::PointTooShort {
                index,
                len: row.len(),
            });
        }
        num_points += 1;

        match classify_azimuth(azimuth_deg(row[0], row[1]), config) {
            Some(idx) => slices[idx].push(point),
            None => num_dropped += 1,
        }
    }

    log::debug!(
        "Sliced {} points into {} slices, kept: {}, dropped: {}",
        num_points,
        slices.len(),
        num_points - num_dropped,
        num_dropped
    );
    if num_points > 0 && num_dropped == num_points {
        log::warn!("All {} points fell inside slice interiors", num_points);
    }

    Ok(slices)
}

/// Organize a raw sweep into azimuth slices ordered bottom to top.
///
/// Each slice is sorted ascending and stable by `config.sort_column` with
/// [`sort_by_column`].
///
/// # Arguments
///
/// * `points` - Point rows with at least x, y, z. Further fields are carried along untouched.
/// * `config` - The slicer configuration.
///
/// # Returns
///
/// `round(360 / granularity)` sorted slices.
///
/// Example:
///
/// ```
/// use scanslice_3d::slicing::{organize_points, SlicerConfig};
///
/// let points = vec![
///     vec![1.0, 0.0, 2.0, 0.5],
///     vec![1.0, 0.0, -1.0, 0.7],
///     vec![0.0, 1.0, 0.0, 0.1],
/// ];
/// let slices = organize_points(points, &SlicerConfig::default()).unwrap();
/// assert_eq!(slices.len(), 720);
/// assert_eq!(slices[360], vec![vec![1.0, 0.0, -1.0, 0.7], vec![1.0, 0.0, 2.0, 0.5]]);
/// ```
pub fn organize_points<P, I>(points: I, config: &SlicerConfig) -> Result<Vec<Vec<P>>, SliceError>
where
    P: AsRef<[f64]> + Clone,
    I: IntoIterator<Item = P>,
{
    let mut slices = bin_points(points, config)?;
    for slice in slices.iter_mut() {
        sort_by_column(slice, config.sort_column)?;
    }
    Ok(slices)
}

/// Same as [`organize_points`] but sorting the slices in parallel.
///
/// The slices are independent so each one is sorted by a single rayon task. The result is
/// identical to the sequential version.
pub fn par_organize_points<P, I>(
    points: I,
    config: &SlicerConfig,
) -> Result<Vec<Vec<P>>, SliceError>
where
    P: AsRef<[f64]> + Clone + Send,
    I: IntoIterator<Item = P>,
{
    let mut slices = bin_points(points, config)?;
    slices
        .par_iter_mut()
        .try_for_each(|slice| sort_by_column(slice, config.sort_column))?;
    Ok(slices)
}
