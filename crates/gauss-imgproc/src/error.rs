use gauss_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filtering operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    /// The kernel size is even or zero.
    #[error("Kernel size must be odd and at least 1, got {0}")]
    InvalidKernelSize(usize),

    /// The kernel size overflows the integer binomial recurrence.
    #[error("Kernel size {0} exceeds the maximum supported size {1}")]
    KernelSizeTooLarge(usize, usize),

    /// The kernel does not match the strip descriptor.
    #[error("Strip expects a kernel of size {0}, got {1}")]
    KernelMismatch(usize, usize),

    /// The strip index is not smaller than the strip count.
    #[error("Strip index {0} is out of range for {1} strips")]
    InvalidStripIndex(usize, usize),

    /// The requested number of strips is zero.
    #[error("Number of strips must be > 0, got {0}")]
    InvalidStripCount(usize),

    /// The strip rows fall outside the image.
    #[error("Strip rows [{0}, {1}) exceed the image height {2}")]
    StripOutOfBounds(usize, usize, usize),

    /// A buffer is too small for the requested geometry.
    #[error("Buffer too small: expected at least {expected} bytes, got {actual}")]
    BufferTooSmall {
        /// The number of bytes required.
        expected: usize,
        /// The number of bytes provided.
        actual: usize,
    },

    /// The destination slice does not match the strip output rows.
    #[error("Destination must span exactly {expected} bytes, got {actual}")]
    DestinationMismatch {
        /// The number of bytes of the strip output rows.
        expected: usize,
        /// The number of bytes provided.
        actual: usize,
    },

    /// Image error.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Parallel execution error.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
