use glam::{DMat3, DVec3};

/// Rotation magnitude, in radians, at or below which the exponential map returns the identity.
///
/// Below this value the rotation axis `w / |w|` is not well defined.
pub const SINGULARITY_EPS: f64 = 1e-4;

/// Build the skew-symmetric matrix of a 3-vector.
///
/// The returned matrix `K` satisfies `K * u == v.cross(u)` for any `u`.
///
/// # Arguments
///
/// * `v` - The vector to convert.
///
/// # Returns
///
/// The 3x3 cross-product matrix
///
/// ```text
/// |  0   -v2   v1 |
/// |  v2   0   -v0 |
/// | -v1   v0   0  |
/// ```
///
/// Example:
///
/// ```
/// use glam::DVec3;
/// use scanslice_lie::so3::skew;
///
/// let k = skew(DVec3::new(1.0, 2.0, 3.0));
/// assert_eq!(k.row(0), DVec3::new(0.0, -3.0, 2.0));
/// ```
pub fn skew(v: DVec3) -> DMat3 {
    // NOTE: glam matrices are column-major
    DMat3::from_cols(
        DVec3::new(0.0, v.z, -v.y),
        DVec3::new(-v.z, 0.0, v.x),
        DVec3::new(v.y, -v.x, 0.0),
    )
}

/// Compute the rotation matrix of an angle-axis vector with its angle scaled by `time_ratio`.
///
/// Uses the Rodrigues formula `R = I + K sin(a) + K^2 (1 - cos(a))` where `K` is the skew matrix
/// of the unit axis and `a = |w| * time_ratio`. When `|w| <= SINGULARITY_EPS` the result is exactly
/// [`DMat3::IDENTITY`].
///
/// # Arguments
///
/// * `w` - The angle-axis rotation vector. Its norm is the angle in radians.
/// * `time_ratio` - The fraction of the rotation angle to apply.
///
/// PRECONDITION: `w` is finite.
pub fn exp_scaled(w: DVec3, time_ratio: f64) -> DMat3 {
    let theta = w.length();
    if theta <= SINGULARITY_EPS {
        log::debug!(
            "Degenerate rotation |w| = {:e} <= {:e}, using identity",
            theta,
            SINGULARITY_EPS
        );
        return DMat3::IDENTITY;
    }

    let axis = w / theta;
    let angle = theta * time_ratio;
    let k = skew(axis);

    DMat3::IDENTITY + k * angle.sin() + (k * k) * (1.0 - angle.cos())
}

/// Lie algebra -> Lie group, the full rotation of an angle-axis vector.
pub fn exp(w: DVec3) -> DMat3 {
    exp_scaled(w, 1.0)
}

/// Check whether a matrix is a proper rotation, i.e. `R^T R = I` and `det(R) = 1`.
pub fn is_rotation(r: &DMat3, tolerance: f64) -> bool {
    let residual = r.transpose() * *r - DMat3::IDENTITY;
    let max_diff = residual
        .to_cols_array()
        .iter()
        .map(|x| x.abs())
        .fold(0.0, f64::max);
    max_diff <= tolerance && (r.determinant() - 1.0).abs() <= tolerance
}
