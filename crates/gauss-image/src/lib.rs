#![deny(missing_docs)]
//! Packed RGB bitmap buffers with 4-byte aligned rows

/// packed rgb image representation.
pub mod image;

/// Error types for the image module.
pub mod error;

/// row stride and pixel offset helpers.
pub mod layout;

pub use crate::error::ImageError;
pub use crate::image::{ImageSize, PackedRgbImage};
pub use crate::layout::{pixel_offset, required_len, row_offset, row_padding, row_stride};
