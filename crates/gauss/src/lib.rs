//! Strip-parallel binomial Gaussian blur for packed RGB bitmaps.
//!
//! ```
//! use gauss::image::PackedRgbImage;
//! use gauss::imgproc::filter::{binomial_blur, BinomialBlurConfig};
//! use gauss::imgproc::parallel::ExecutionStrategy;
//!
//! let mut image = PackedRgbImage::from_size_val([64, 48].into(), [40, 80, 120]);
//! let config = BinomialBlurConfig::new(7)
//!     .with_num_strips(4)
//!     .with_strategy(ExecutionStrategy::ParallelStrips);
//! binomial_blur(&mut image, &config).unwrap();
//! ```

#[doc(inline)]
pub use gauss_image as image;

#[doc(inline)]
pub use gauss_imgproc as imgproc;
