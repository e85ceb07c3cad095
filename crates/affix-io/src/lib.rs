#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access, encoding/decoding failures,
/// and format-specific errors.
pub mod error;

/// High-level image reading and writing functions.
///
/// Decodes any supported format from raw bytes and picks the encoder from the
/// output file extension. See [`functional::read_image_any`].
pub mod functional;

/// JPEG image encoding.
///
/// Decoding goes through [`functional::decode_image_any`].
pub mod jpeg;

/// PNG image encoding.
pub mod png;

pub use crate::error::IoError;
pub use crate::functional::{
    decode_image_any, read_image_any, write_image_any_rgba8, DecodedImage,
};
