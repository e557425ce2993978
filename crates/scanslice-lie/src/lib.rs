#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Scanslice Lie Groups
//!
//! Closed-form SO(3) and SE(3) helpers used to compensate the motion of a rotating range sensor
//! during one sweep. A sweep motion is given in exponential coordinates as a [`se3::MotionVector`]
//! and evaluated at a fractional time position in `[0, 1]`.
//!
//! ## Example
//!
//! ```rust
//! use scanslice_lie::se3::{back_transform, forward_transform, MotionVector};
//!
//! let motion = MotionVector::from_array([1.0, 0.0, 0.0, 0.0, 0.0, std::f64::consts::FRAC_PI_2]);
//!
//! let moved = forward_transform(&[1.0, 0.0, 0.0], &motion, 0.5).unwrap();
//! let restored = back_transform(&moved, &motion, 0.5).unwrap();
//! assert!((restored[0] - 1.0).abs() < 1e-12);
//! ```

/// Error types for the lie module.
pub mod error;

/// Special Euclidean group SE(3): sweep motion vectors and interpolated rigid transforms.
pub mod se3;

/// Special Orthogonal group SO(3): skew matrices and the exponential map.
pub mod so3;

pub use error::LieError;
