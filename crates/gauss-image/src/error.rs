/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    /// Error when the buffer length does not match the padded image size.
    #[error("Data length ({0}) does not match the padded image size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when a pixel coordinate falls outside the image.
    #[error("Pixel index ({0}, {1}) is out of bounds for image of size {2}x{3}")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a row index falls outside the image.
    #[error("Row index {0} is out of bounds for image of height {1}")]
    RowIndexOutOfBounds(usize, usize),
}
