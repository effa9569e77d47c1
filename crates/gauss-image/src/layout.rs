use crate::image::ImageSize;

/// Number of bytes per packed pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// Row alignment of the bitmap buffer in bytes.
pub const ROW_ALIGNMENT: usize = 4;

/// Compute the row stride in bytes for a packed RGB row of `width` pixels.
///
/// The stride is the smallest multiple of 4 that is greater or equal to `width * 3`.
///
/// # Examples
///
/// ```
/// use gauss_image::row_stride;
///
/// assert_eq!(row_stride(4), 12);
/// assert_eq!(row_stride(5), 16);
/// assert_eq!(row_stride(1), 4);
/// ```
pub fn row_stride(width: usize) -> usize {
    (width * BYTES_PER_PIXEL + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1)
}

/// Number of trailing padding bytes in each row.
pub fn row_padding(width: usize) -> usize {
    row_stride(width) - width * BYTES_PER_PIXEL
}

/// Number of bytes needed to hold an image of the given size, padding included.
pub fn required_len(size: ImageSize) -> usize {
    row_stride(size.width) * size.height
}

/// Byte offset of the first pixel of row `y`.
pub fn row_offset(width: usize, y: usize) -> usize {
    row_stride(width) * y
}

/// Byte offset of the first channel of pixel `(x, y)`.
pub fn pixel_offset(width: usize, x: usize, y: usize) -> usize {
    row_offset(width, y) + x * BYTES_PER_PIXEL
}
