#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use scanslice_3d as s3d;

#[doc(inline)]
pub use scanslice_lie as lie;
