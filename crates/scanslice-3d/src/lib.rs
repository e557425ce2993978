#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Motion compensation of sorted slices.
pub mod deskew;

/// Error types shared by the slicing and sorting modules.
pub mod error;

/// I/O utilities for reading and writing sweep logs.
pub mod io;

/// Azimuth binning of point rows.
pub mod slicing;

/// Stable ordering of point rows by a column.
pub mod sort;

pub use error::SliceError;
