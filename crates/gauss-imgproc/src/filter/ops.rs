use gauss_image::{required_len, ImageSize, PackedRgbImage};

use super::kernels::BinomialKernel;
use super::partition::partition_strips;
use super::strip::{horizontal_pass, vertical_pass, StripDescriptor, StripScratch};
use crate::error::FilterError;
use crate::parallel::{for_each_strip, map_strips, ExecutionStrategy};

/// Parameters of the strip based binomial blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinomialBlurConfig {
    /// The odd size of the binomial kernel.
    pub kernel_size: usize,
    /// The requested number of horizontal strips.
    pub num_strips: usize,
    /// How many times the blur is applied.
    pub iterations: usize,
    /// How the strips are scheduled.
    pub strategy: ExecutionStrategy,
}

impl Default for BinomialBlurConfig {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            num_strips: 1,
            iterations: 1,
            strategy: ExecutionStrategy::Serial,
        }
    }
}

impl BinomialBlurConfig {
    /// Create a single strip, single iteration configuration with the given kernel size.
    pub fn new(kernel_size: usize) -> Self {
        Self {
            kernel_size,
            ..Default::default()
        }
    }

    /// Set the requested number of strips.
    pub fn with_num_strips(mut self, num_strips: usize) -> Self {
        self.num_strips = num_strips;
        self
    }

    /// Set the number of blur iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Blur an image in place with a binomial approximation of a Gaussian kernel.
///
/// # Arguments
///
/// * `image` - The image to blur.
/// * `config` - The kernel size, strip count, iterations and execution strategy.
///
/// # Examples
///
/// ```
/// use gauss_image::PackedRgbImage;
/// use gauss_imgproc::filter::{binomial_blur, BinomialBlurConfig};
///
/// let mut image = PackedRgbImage::from_size_val([8, 8].into(), [10, 20, 30]);
/// let config = BinomialBlurConfig::new(5).with_num_strips(2);
/// binomial_blur(&mut image, &config).unwrap();
///
/// assert_eq!(image.pixel(4, 4).unwrap(), [10, 20, 30]);
/// ```
pub fn binomial_blur(
    image: &mut PackedRgbImage,
    config: &BinomialBlurConfig,
) -> Result<(), FilterError> {
    let size = image.size();
    binomial_blur_slice(image.as_slice_mut(), size, config)
}

/// Blur a raw padded RGB buffer in place with a binomial approximation of a Gaussian kernel.
///
/// The image is split into strips. All vertical passes run first, reading the shared buffer into
/// private scratch buffers. The horizontal passes then write the disjoint output rows of each strip.
///
/// # Arguments
///
/// * `data` - The padded pixel buffer, at least `row_stride(width) * height` bytes.
/// * `image_size` - The size of the image in pixels.
/// * `config` - The kernel size, strip count, iterations and execution strategy.
pub fn binomial_blur_slice(
    data: &mut [u8],
    image_size: ImageSize,
    config: &BinomialBlurConfig,
) -> Result<(), FilterError> {
    let kernel = BinomialKernel::new(config.kernel_size)?;

    let expected = required_len(image_size);
    if data.len() < expected {
        return Err(FilterError::BufferTooSmall {
            expected,
            actual: data.len(),
        });
    }

    let strips = partition_strips(image_size, config.kernel_size, config.num_strips)?;
    log::debug!(
        "blurring {} with kernel size {} over {} strips ({:?})",
        image_size,
        config.kernel_size,
        strips.len(),
        config.strategy
    );

    for iteration in 0..config.iterations {
        let start = std::time::Instant::now();

        let src: &[u8] = data;
        let scratches = map_strips(config.strategy, &strips, |strip| {
            let mut scratch = StripScratch::for_strip(strip);
            vertical_pass(src, strip, &kernel, &mut scratch)?;
            log::trace!("{strip}: vertical pass done");
            Ok::<_, FilterError>(scratch)
        })?;

        let passes = strips
            .iter()
            .copied()
            .zip(scratches)
            .collect::<Vec<_>>();
        let jobs = passes
            .iter()
            .zip(split_output_rows(data, &strips))
            .collect::<Vec<_>>();

        for_each_strip(config.strategy, jobs, |(strip, scratch), dst_rows| {
            horizontal_pass(scratch, strip, &kernel, dst_rows)
        })?;

        log::debug!("iteration {} elapsed: {:?}", iteration, start.elapsed());
    }

    Ok(())
}

/// Split the buffer into the output rows of each strip.
///
/// PRECONDITION: the output byte ranges are sorted and disjoint.
fn split_output_rows<'a>(data: &'a mut [u8], strips: &[StripDescriptor]) -> Vec<&'a mut [u8]> {
    let mut chunks = Vec::with_capacity(strips.len());
    let mut rest = data;
    let mut consumed = 0;
    for strip in strips {
        let range = strip.output_byte_range();
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(range.start - consumed);
        let (chunk, tail) = tail.split_at_mut(range.len());
        chunks.push(chunk);
        rest = tail;
        consumed = range.end;
    }
    chunks
}
