use glam::{DMat3, DMat4, DVec3, DVec4};
use serde::{Deserialize, Serialize};

use crate::{so3, LieError};

/// Rigid sweep motion in exponential coordinates.
///
/// The first three components are the translation and the last three the angle-axis rotation,
/// whose norm is the rotation angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionVector {
    /// Translation accumulated over the full sweep.
    pub translation: DVec3,
    /// Angle-axis rotation accumulated over the full sweep.
    pub rotation: DVec3,
}

impl MotionVector {
    /// The motion that leaves every point in place.
    pub const ZERO: Self = Self {
        translation: DVec3::ZERO,
        rotation: DVec3::ZERO,
    };

    /// Create a new motion vector from a translation and an angle-axis rotation.
    pub fn new(translation: DVec3, rotation: DVec3) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Create a motion vector from `[tx, ty, tz, wx, wy, wz]`.
    pub fn from_array(v: [f64; 6]) -> Self {
        Self {
            translation: DVec3::new(v[0], v[1], v[2]),
            rotation: DVec3::new(v[3], v[4], v[5]),
        }
    }

    /// Get the motion as `[tx, ty, tz, wx, wy, wz]`.
    pub fn to_array(&self) -> [f64; 6] {
        let t = self.translation;
        let w = self.rotation;
        [t.x, t.y, t.z, w.x, w.y, w.z]
    }

    /// The rotation angle of the full motion in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.rotation.length()
    }

    /// Whether the rotation is too small to have a well-defined axis.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.angle() <= so3::SINGULARITY_EPS
    }

    /// Evaluate the motion at a fractional time position.
    ///
    /// The rotation angle and the translation are both scaled linearly by `time_ratio` before the
    /// rotation matrix is rebuilt.
    ///
    /// # Arguments
    ///
    /// * `time_ratio` - Fraction of the sweep, `0` is the start and `1` the full motion.
    ///
    /// # Errors
    ///
    /// * [`LieError::InvalidTimeRatio`] if `time_ratio` is outside `[0, 1]` or NaN.
    /// * [`LieError::NonFiniteMotion`] if the motion has NaN or infinite components.
    pub fn interpolate(&self, time_ratio: f64) -> Result<InterpolatedMotion, LieError> {
        if !(0.0..=1.0).contains(&time_ratio) {
            return Err(LieError::InvalidTimeRatio(time_ratio));
        }
        if !(self.translation.is_finite() && self.rotation.is_finite()) {
            return Err(LieError::NonFiniteMotion(self.to_array()));
        }

        Ok(InterpolatedMotion {
            rotation: so3::exp_scaled(self.rotation, time_ratio),
            translation: self.translation * time_ratio,
        })
    }
}

/// A rigid transform `p -> R p + t` obtained by evaluating a [`MotionVector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedMotion {
    /// Orthonormal rotation matrix.
    pub rotation: DMat3,
    /// Translation vector.
    pub translation: DVec3,
}

impl InterpolatedMotion {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rotation: DMat3::IDENTITY,
        translation: DVec3::ZERO,
    };

    /// Map a point from the sweep start frame into the frame at the interpolated time.
    #[inline]
    pub fn apply(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Map a point from the interpolated frame back into the sweep start frame.
    #[inline]
    pub fn apply_inverse(&self, point: DVec3) -> DVec3 {
        self.rotation.transpose() * (point - self.translation)
    }

    /// Invert the transform.
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.transpose();
        Self {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    /// Get the (4,4) homogeneous transformation matrix.
    pub fn as_matrix(&self) -> DMat4 {
        DMat4::from_cols(
            self.rotation.x_axis.extend(0.0),
            self.rotation.y_axis.extend(0.0),
            self.rotation.z_axis.extend(0.0),
            DVec4::new(self.translation.x, self.translation.y, self.translation.z, 1.0),
        )
    }
}

/// Apply a fraction of the sweep motion to a point.
///
/// Computes `R p + t'` where `R` and `t'` are the rotation and translation of `motion` scaled by
/// `time_ratio`.
///
/// # Arguments
///
/// * `point` - The point in the sweep start frame.
/// * `motion` - The motion over the full sweep.
/// * `time_ratio` - The fraction of the motion to apply, in `[0, 1]`.
///
/// # Returns
///
/// The point expressed in the frame at `time_ratio`.
///
/// Example:
///
/// ```
/// use scanslice_lie::se3::{forward_transform, MotionVector};
///
/// let motion = MotionVector::from_array([2.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
/// let p = forward_transform(&[1.0, 1.0, 1.0], &motion, 0.5).unwrap();
/// assert_eq!(p, [2.0, 1.0, 1.0]);
/// ```
pub fn forward_transform(
    point: &[f64; 3],
    motion: &MotionVector,
    time_ratio: f64,
) -> Result<[f64; 3], LieError> {
    let transform = motion.interpolate(time_ratio)?;
    Ok(transform.apply(DVec3::from_array(*point)).to_array())
}

/// Undo a fraction of the sweep motion on a point.
///
/// Computes `R^T (p - t')`, the exact inverse of [`forward_transform`] for the same motion and
/// time ratio.
///
/// # Arguments
///
/// * `point` - The point in the frame at `time_ratio`.
/// * `motion` - The motion over the full sweep.
/// * `time_ratio` - The fraction of the motion to remove, in `[0, 1]`.
///
/// # Returns
///
/// The point expressed in the sweep start frame.
pub fn back_transform(
    point: &[f64; 3],
    motion: &MotionVector,
    time_ratio: f64,
) -> Result<[f64; 3], LieError> {
    let transform = motion.interpolate(time_ratio)?;
    Ok(transform.apply_inverse(DVec3::from_array(*point)).to_array())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;

    fn random_motion(rng: &mut impl Rng) -> MotionVector {
        let mut v = [0.0; 6];
        for (i, x) in v.iter_mut().enumerate() {
            *x = match i < 3 {
                true => rng.random_range(-5.0..5.0),
                false => rng.random_range(-1.5..1.5),
            };
        }
        MotionVector::from_array(v)
    }

    #[test]
    fn test_motion_vector_array() {
        let v = [1.0, 2.0, 3.0, 0.1, 0.2, 0.3];
        let m = MotionVector::from_array(v);
        assert_eq!(m.translation, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.rotation, DVec3::new(0.1, 0.2, 0.3));
        assert_eq!(m.to_array(), v);
        assert!(MotionVector::ZERO.is_degenerate());
        assert!(!m.is_degenerate());
    }

    #[test]
    fn test_round_trip() -> Result<(), LieError> {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let motion = random_motion(&mut rng);
            let ratio = rng.random_range(0.0..=1.0);
            let p = [
                rng.random_range(-50.0..50.0),
                rng.random_range(-50.0..50.0),
                rng.random_range(-5.0..5.0),
            ];

            let moved = forward_transform(&p, &motion, ratio)?;
            let restored = back_transform(&moved, &motion, ratio)?;
            for i in 0..3 {
                assert_relative_eq!(restored[i], p[i], epsilon = 1e-9, max_relative = 1e-9);
            }

            let restored = forward_transform(&back_transform(&p, &motion, ratio)?, &motion, ratio)?;
            for i in 0..3 {
                assert_relative_eq!(restored[i], p[i], epsilon = 1e-9, max_relative = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_identity_motion() -> Result<(), LieError> {
        let p = [3.5, -1.25, 0.75];
        for ratio in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(
                MotionVector::ZERO.interpolate(ratio)?,
                InterpolatedMotion::IDENTITY
            );
            assert_eq!(forward_transform(&p, &MotionVector::ZERO, ratio)?, p);
            assert_eq!(back_transform(&p, &MotionVector::ZERO, ratio)?, p);
        }
        Ok(())
    }

    #[test]
    fn test_singularity_is_pure_translation() -> Result<(), LieError> {
        let motion = MotionVector::from_array([1.0, -2.0, 0.5, 5e-6, -3e-6, 1e-6]);
        let p = [10.0, 20.0, -3.0];
        let ratio = 0.5;

        let transform = motion.interpolate(ratio)?;
        assert_eq!(transform.rotation, DMat3::IDENTITY);

        let moved = forward_transform(&p, &motion, ratio)?;
        assert_eq!(moved, [10.5, 19.0, -2.75]);

        let restored = back_transform(&moved, &motion, ratio)?;
        assert_eq!(restored, p);
        Ok(())
    }

    #[test]
    fn test_forward_quarter_turn() -> Result<(), LieError> {
        let motion = MotionVector::from_array([0.0, 0.0, 1.0, 0.0, 0.0, std::f64::consts::PI]);
        let p = forward_transform(&[1.0, 0.0, 0.0], &motion, 0.5)?;
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 0.5, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_rotation_validity() -> Result<(), LieError> {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let motion = random_motion(&mut rng);
            let transform = motion.interpolate(rng.random_range(0.0..=1.0))?;
            assert!(crate::so3::is_rotation(&transform.rotation, 1e-12));
        }
        Ok(())
    }

    #[test]
    fn test_inverse_and_matrix() -> Result<(), LieError> {
        let motion = MotionVector::from_array([0.3, -0.4, 1.2, 0.2, -0.7, 0.1]);
        let transform = motion.interpolate(0.8)?;
        let p = DVec3::new(4.0, -2.0, 1.0);

        let a = transform.apply_inverse(p);
        let b = transform.inverse().apply(p);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-12);

        let h = transform.as_matrix() * p.extend(1.0);
        let q = transform.apply(p);
        assert_relative_eq!(h.x, q.x, epsilon = 1e-12);
        assert_relative_eq!(h.y, q.y, epsilon = 1e-12);
        assert_relative_eq!(h.z, q.z, epsilon = 1e-12);
        assert_eq!(h.w, 1.0);
        Ok(())
    }

    #[test]
    fn test_invalid_time_ratio() {
        let p = [1.0, 2.0, 3.0];
        let motion = MotionVector::from_array([1.0, 0.0, 0.0, 0.0, 0.0, 0.5]);
        assert_eq!(
            forward_transform(&p, &motion, 1.5),
            Err(LieError::InvalidTimeRatio(1.5))
        );
        assert_eq!(
            back_transform(&p, &motion, -0.1),
            Err(LieError::InvalidTimeRatio(-0.1))
        );
        assert!(forward_transform(&p, &motion, f64::NAN).is_err());
    }

    #[test]
    fn test_non_finite_motion() {
        let motion = MotionVector::from_array([f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.5]);
        assert!(matches!(
            motion.interpolate(0.5),
            Err(LieError::NonFiniteMotion(_))
        ));
    }
}
