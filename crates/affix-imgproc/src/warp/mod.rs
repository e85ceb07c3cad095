//! Geometric image transformations using affine warps.
//!
//! This module provides functions for applying 2D affine transformations to images:
//!
//! - Affine transform estimation from three point correspondences
//! - Affine transform inversion
//! - Image warping with a 2x3 matrix
//!
//! # Examples
//!
//! Mapping a rectangle onto a sheared parallelogram:
//!
//! ```
//! use affix_imgproc::warp::get_affine_transform;
//!
//! let src = [[0.0, 0.0], [100.0, 0.0], [0.0, 50.0]];
//! let dst = [[0.0, 20.0], [100.0, 0.0], [0.0, 70.0]];
//! let m = get_affine_transform(&src, &dst).unwrap();
//! assert!((m[5] - 20.0).abs() < 1e-4);
//! ```

mod affine;

pub use affine::{get_affine_transform, invert_affine_transform, transform_point, warp_affine};
