use std::ops::Range;

use gauss_image::{required_len, row_stride, ImageSize};

use super::kernels::BinomialKernel;
use crate::error::FilterError;

const CHANNELS: usize = 3;

/// Describes the slice of the image assigned to one blur invocation.
///
/// The assigned rows `[first_row, first_row + rows)` include the halo rows shared with the
/// neighbouring strips. Only the trimmed [`StripDescriptor::output_rows`] are written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripDescriptor {
    image_size: ImageSize,
    kernel_size: usize,
    first_row: usize,
    rows: usize,
    index: usize,
    count: usize,
}

impl StripDescriptor {
    /// Create a new strip descriptor.
    ///
    /// # Arguments
    ///
    /// * `image_size` - The size of the whole image.
    /// * `kernel_size` - The size of the blur kernel.
    /// * `first_row` - The first assigned row, in whole image coordinates.
    /// * `rows` - The number of assigned rows, halo included.
    /// * `index` - The ordinal of this strip.
    /// * `count` - The total number of strips.
    ///
    /// # Errors
    ///
    /// Fails if `index >= count` or if the assigned rows exceed the image height.
    pub fn new(
        image_size: ImageSize,
        kernel_size: usize,
        first_row: usize,
        rows: usize,
        index: usize,
        count: usize,
    ) -> Result<Self, FilterError> {
        if index >= count {
            return Err(FilterError::InvalidStripIndex(index, count));
        }
        if first_row + rows > image_size.height {
            return Err(FilterError::StripOutOfBounds(
                first_row,
                first_row + rows,
                image_size.height,
            ));
        }
        Ok(Self {
            image_size,
            kernel_size,
            first_row,
            rows,
            index,
            count,
        })
    }

    /// A single strip covering the whole image.
    pub fn whole_image(image_size: ImageSize, kernel_size: usize) -> Self {
        Self {
            image_size,
            kernel_size,
            first_row: 0,
            rows: image_size.height,
            index: 0,
            count: 1,
        }
    }

    /// The size of the whole image.
    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// The size of the blur kernel.
    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    /// The first assigned row in whole image coordinates.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// The number of assigned rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The ordinal of this strip.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The total number of strips.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The number of kernel taps on each side of the center.
    pub fn half(&self) -> usize {
        self.kernel_size / 2
    }

    /// The row stride of the image in bytes.
    pub fn row_stride(&self) -> usize {
        row_stride(self.image_size.width)
    }

    /// The byte offset of the first assigned row in the shared buffer.
    pub fn byte_offset(&self) -> usize {
        self.first_row * self.row_stride()
    }

    /// Whether this strip holds the top edge of the image.
    pub fn owns_top_edge(&self) -> bool {
        self.index == 0
    }

    /// Whether this strip holds the bottom edge of the image.
    pub fn owns_bottom_edge(&self) -> bool {
        self.index + 1 == self.count
    }

    /// The rows written by the horizontal pass, relative to `first_row`.
    ///
    /// Interior sides drop `half` rows, which belong to the neighbouring strip.
    pub fn output_rows(&self) -> Range<usize> {
        let half = self.half();
        let begin = if self.owns_top_edge() { 0 } else { half };
        let end = if self.owns_bottom_edge() {
            self.rows
        } else {
            self.rows.saturating_sub(half)
        };
        begin..end.max(begin)
    }

    /// The bytes of the shared buffer written by the horizontal pass.
    pub fn output_byte_range(&self) -> Range<usize> {
        let stride = self.row_stride();
        let rows = self.output_rows();
        (self.first_row + rows.start) * stride..(self.first_row + rows.end) * stride
    }

    /// The number of scratch bytes needed by the vertical pass.
    pub fn scratch_len(&self) -> usize {
        self.rows * self.row_stride()
    }
}

impl std::fmt::Display for StripDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Strip {{ index: {}, count: {}, width: {}, height: {}, offset: {} }}",
            self.index,
            self.count,
            self.image_size.width,
            self.image_size.height,
            self.byte_offset()
        )
    }
}

/// The private buffer holding the vertically blurred rows of one strip.
///
/// Rows keep the padded layout of the shared image.
#[derive(Clone, Debug)]
pub struct StripScratch {
    data: Vec<u8>,
}

impl StripScratch {
    /// Allocate a zeroed scratch buffer for the given strip.
    pub fn for_strip(strip: &StripDescriptor) -> Self {
        Self {
            data: vec![0u8; strip.scratch_len()],
        }
    }

    /// The scratch bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The number of scratch bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the scratch buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn check_kernel(strip: &StripDescriptor, kernel: &BinomialKernel) -> Result<(), FilterError> {
    if kernel.size() != strip.kernel_size() {
        return Err(FilterError::KernelMismatch(
            strip.kernel_size(),
            kernel.size(),
        ));
    }
    Ok(())
}

fn check_len(expected: usize, actual: usize) -> Result<(), FilterError> {
    if actual < expected {
        return Err(FilterError::BufferTooSmall { expected, actual });
    }
    Ok(())
}

/// Blur the assigned rows of a strip along the columns into its scratch buffer.
///
/// Rows closer than `half` to the top or bottom of the image are copied unchanged. The window
/// checks use the full image height, so halo rows are read from the neighbouring strips in `src`.
///
/// # Arguments
///
/// * `src` - The shared padded image buffer.
/// * `strip` - The strip to process.
/// * `kernel` - The binomial kernel, of size `strip.kernel_size()`.
/// * `scratch` - The private buffer receiving the blurred rows.
pub fn vertical_pass(
    src: &[u8],
    strip: &StripDescriptor,
    kernel: &BinomialKernel,
    scratch: &mut StripScratch,
) -> Result<(), FilterError> {
    check_kernel(strip, kernel)?;
    check_len(required_len(strip.image_size()), src.len())?;
    check_len(strip.scratch_len(), scratch.len())?;

    let ImageSize { width, height } = strip.image_size();
    let stride = strip.row_stride();
    let row_bytes = width * CHANNELS;
    let kernel_size = kernel.size();
    let half = kernel.half();
    let sum = kernel.sum();

    let mut acc = vec![0u64; row_bytes];

    for local in 0..strip.rows() {
        let y = strip.first_row() + local;
        let dst_row = &mut scratch.data[local * stride..local * stride + row_bytes];

        if y < half || y - half + kernel_size > height {
            // no full window fits, keep the source row
            let offset = y * stride;
            dst_row.copy_from_slice(&src[offset..offset + row_bytes]);
            continue;
        }

        let window_start = y - half;
        acc.iter_mut().for_each(|a| *a = 0);
        for (k, &w) in kernel.weights().iter().enumerate() {
            let offset = (window_start + k) * stride;
            let src_row = &src[offset..offset + row_bytes];
            acc.iter_mut()
                .zip(src_row.iter())
                .for_each(|(a, &s)| *a += s as u64 * w as u64);
        }

        dst_row
            .iter_mut()
            .zip(acc.iter())
            .for_each(|(d, &a)| *d = (a / sum) as u8);
    }

    Ok(())
}

/// Blur the output rows of a strip along the rows, from its scratch buffer into the image.
///
/// Pixels closer than `half` to the left or right border are copied unchanged. Padding bytes of
/// `dst_rows` are never written.
///
/// # Arguments
///
/// * `scratch` - The buffer filled by [`vertical_pass`].
/// * `strip` - The strip to process.
/// * `kernel` - The binomial kernel, of size `strip.kernel_size()`.
/// * `dst_rows` - The bytes of the shared image given by `strip.output_byte_range()`.
pub fn horizontal_pass(
    scratch: &StripScratch,
    strip: &StripDescriptor,
    kernel: &BinomialKernel,
    dst_rows: &mut [u8],
) -> Result<(), FilterError> {
    check_kernel(strip, kernel)?;
    check_len(strip.scratch_len(), scratch.len())?;

    let output_rows = strip.output_rows();
    let expected = output_rows.len() * strip.row_stride();
    if dst_rows.len() != expected {
        return Err(FilterError::DestinationMismatch {
            expected,
            actual: dst_rows.len(),
        });
    }
    if expected == 0 {
        return Ok(());
    }

    let width = strip.image_size().width;
    let stride = strip.row_stride();
    let row_bytes = width * CHANNELS;
    let kernel_size = kernel.size();
    let half = kernel.half();
    let sum = kernel.sum();

    for (local, dst_row) in output_rows.zip(dst_rows.chunks_exact_mut(stride)) {
        let src_row = &scratch.data[local * stride..local * stride + row_bytes];

        for x in 0..width {
            let dst_px = &mut dst_row[x * CHANNELS..(x + 1) * CHANNELS];

            if x < half || x - half + kernel_size > width {
                dst_px.copy_from_slice(&src_row[x * CHANNELS..(x + 1) * CHANNELS]);
                continue;
            }

            let window = &src_row[(x - half) * CHANNELS..(x - half + kernel_size) * CHANNELS];
            let mut acc = [0u64; CHANNELS];
            for (px, &w) in window.chunks_exact(CHANNELS).zip(kernel.weights().iter()) {
                for (a, &s) in acc.iter_mut().zip(px.iter()) {
                    *a += s as u64 * w as u64;
                }
            }

            for (d, a) in dst_px.iter_mut().zip(acc.iter()) {
                *d = (a / sum) as u8;
            }
        }
    }

    Ok(())
}

/// Blur one strip of the shared image in place.
///
/// Generates the kernel, allocates the scratch buffer and runs both passes. The kernel is
/// validated before any buffer is touched.
///
/// PRECONDITION: the halo rows read from the neighbouring strips must not have been blurred yet.
/// [`crate::filter::binomial_blur`] orders the passes of all strips accordingly.
///
/// # Arguments
///
/// * `image` - The shared padded image buffer.
/// * `strip` - The strip to process.
pub fn blur_strip(image: &mut [u8], strip: &StripDescriptor) -> Result<(), FilterError> {
    let kernel = BinomialKernel::new(strip.kernel_size())?;
    check_len(required_len(strip.image_size()), image.len())?;

    let mut scratch = StripScratch::for_strip(strip);
    vertical_pass(image, strip, &kernel, &mut scratch)?;

    log::trace!("{strip}: vertical pass done");

    let range = strip.output_byte_range();
    horizontal_pass(&scratch, strip, &kernel, &mut image[range])
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauss_image::{PackedRgbImage, ImageError};

    fn size(width: usize, height: usize) -> ImageSize {
        ImageSize { width, height }
    }

    /// 5x5 image where pixel (x, y) holds distinct values per channel.
    fn ramp_5x5() -> Result<PackedRgbImage, ImageError> {
        let pixels = (0..25)
            .map(|i| [(i * 10) as u8, (i * 3 + 1) as u8, (250 - i * 7) as u8])
            .collect::<Vec<_>>();
        PackedRgbImage::from_pixels(size(5, 5), &pixels)
    }

    #[test]
    fn test_row_example() -> Result<(), FilterError> {
        let mut image = PackedRgbImage::from_size_val(size(5, 1), [10, 10, 10]);
        let strip = StripDescriptor::whole_image(image.size(), 3);
        blur_strip(image.as_slice_mut(), &strip)?;
        for x in 0..5 {
            assert_eq!(image.pixel(x, 0)?, [10, 10, 10]);
        }
        Ok(())
    }

    #[test]
    fn test_horizontal_interior_value() -> Result<(), FilterError> {
        // single row: vertical pass is a passthrough, horizontal blurs the interior
        let pixels = [[0, 0, 0], [4, 8, 0], [8, 0, 4], [0, 4, 8], [4, 4, 4]];
        let mut image = PackedRgbImage::from_pixels(size(5, 1), &pixels)?;
        let strip = StripDescriptor::whole_image(image.size(), 3);
        blur_strip(image.as_slice_mut(), &strip)?;

        assert_eq!(image.pixel(0, 0)?, [0, 0, 0]);
        // (0 + 2*4 + 8) / 4 = 4, (0 + 16 + 0) / 4 = 4, (0 + 0 + 4) / 4 = 1
        assert_eq!(image.pixel(1, 0)?, [4, 4, 1]);
        // (4 + 16 + 0) / 4 = 5, (8 + 0 + 4) / 4 = 3, (0 + 8 + 8) / 4 = 4
        assert_eq!(image.pixel(2, 0)?, [5, 3, 4]);
        // (8 + 0 + 4) / 4 = 3, (0 + 8 + 4) / 4 = 3, (4 + 16 + 4) / 4 = 6
        assert_eq!(image.pixel(3, 0)?, [3, 3, 6]);
        assert_eq!(image.pixel(4, 0)?, [4, 4, 4]);
        Ok(())
    }

    #[test]
    fn test_division_truncates() -> Result<(), FilterError> {
        // (1 + 2*1 + 2) / 4 = 1.25 -> 1, (3 + 2*3 + 2) / 4 = 2.75 -> 2
        let pixels = [[1, 3, 0], [1, 3, 0], [2, 2, 0]];
        let mut image = PackedRgbImage::from_pixels(size(3, 1), &pixels)?;
        let strip = StripDescriptor::whole_image(image.size(), 3);
        blur_strip(image.as_slice_mut(), &strip)?;
        assert_eq!(image.pixel(1, 0)?, [1, 2, 0]);
        Ok(())
    }

    #[test]
    fn test_edges_pass_through() -> Result<(), FilterError> {
        let src = ramp_5x5()?;
        let stride = src.row_stride();

        for kernel_size in [3, 5, 7] {
            let half = kernel_size / 2;
            let near_edge = |i: usize| i < half || i + half >= 5;

            let strip = StripDescriptor::whole_image(src.size(), kernel_size);
            let kernel = BinomialKernel::new(kernel_size)?;
            let mut scratch = StripScratch::for_strip(&strip);
            vertical_pass(src.as_slice(), &strip, &kernel, &mut scratch)?;

            let mut dst = src.clone();
            let range = strip.output_byte_range();
            horizontal_pass(&scratch, &strip, &kernel, &mut dst.as_slice_mut()[range])?;

            for y in 0..5 {
                if near_edge(y) {
                    assert_eq!(
                        &scratch.as_slice()[y * stride..y * stride + 15],
                        src.row(y)?
                    );
                }
                for x in 0..5 {
                    if near_edge(x) {
                        let offset = y * stride + x * 3;
                        assert_eq!(dst.pixel(x, y)?, [
                            scratch.as_slice()[offset],
                            scratch.as_slice()[offset + 1],
                            scratch.as_slice()[offset + 2],
                        ]);
                    }
                    if near_edge(x) && near_edge(y) {
                        assert_eq!(dst.pixel(x, y)?, src.pixel(x, y)?);
                    }
                }
            }

            if kernel_size == 7 {
                // a 7 tap window never fits in 5 rows or columns
                assert_eq!(dst, src);
            }
        }
        Ok(())
    }

    #[test]
    fn test_vertical_pass_edge_rows_copied() -> Result<(), FilterError> {
        let src = ramp_5x5()?;
        let strip = StripDescriptor::whole_image(src.size(), 5);
        let kernel = BinomialKernel::new(5)?;
        let mut scratch = StripScratch::for_strip(&strip);
        vertical_pass(src.as_slice(), &strip, &kernel, &mut scratch)?;

        let stride = strip.row_stride();
        for y in [0, 1, 3, 4] {
            assert_eq!(
                &scratch.as_slice()[y * stride..y * stride + 15],
                src.row(y)?
            );
        }

        // center row: (r0 + 4 r1 + 6 r2 + 4 r3 + r4) / 16 for the first channel of column 0
        let col0 = [0u64, 50, 100, 150, 200];
        let expected = (col0[0] + 4 * col0[1] + 6 * col0[2] + 4 * col0[3] + col0[4]) / 16;
        assert_eq!(scratch.as_slice()[2 * stride] as u64, expected);
        Ok(())
    }

    #[test]
    fn test_padding_untouched() -> Result<(), FilterError> {
        // width 5 -> 15 pixel bytes, 1 padding byte per row
        let mut image = PackedRgbImage::from_size_val(size(5, 5), [90, 120, 30]);
        let stride = image.row_stride();
        assert_eq!(stride, (5 * 3 + 3) & !3);
        for y in 0..5 {
            image.as_slice_mut()[y * stride + 15] = 0xAB;
        }

        let strip = StripDescriptor::whole_image(image.size(), 3);
        blur_strip(image.as_slice_mut(), &strip)?;

        for y in 0..5 {
            assert_eq!(image.as_slice()[y * stride + 15], 0xAB);
            for x in 0..5 {
                assert_eq!(image.pixel(x, y)?, [90, 120, 30]);
            }
        }
        Ok(())
    }

    #[test]
    fn test_output_rows_trimming() -> Result<(), FilterError> {
        let image_size = size(4, 20);
        let top = StripDescriptor::new(image_size, 5, 0, 9, 0, 3)?;
        let middle = StripDescriptor::new(image_size, 5, 5, 10, 1, 3)?;
        let bottom = StripDescriptor::new(image_size, 5, 11, 9, 2, 3)?;

        assert_eq!(top.output_rows(), 0..7);
        assert_eq!(middle.output_rows(), 2..8);
        assert_eq!(bottom.output_rows(), 2..9);

        assert_eq!(top.output_byte_range(), 0..7 * 12);
        assert_eq!(middle.output_byte_range(), 7 * 12..13 * 12);
        assert_eq!(bottom.output_byte_range(), 13 * 12..20 * 12);
        assert_eq!(middle.byte_offset(), 5 * 12);
        assert_eq!(middle.scratch_len(), 10 * 12);
        Ok(())
    }

    #[test]
    fn test_output_rows_short_interior_strip() -> Result<(), FilterError> {
        let strip = StripDescriptor::new(size(4, 20), 7, 5, 4, 1, 3)?;
        assert!(strip.output_rows().is_empty());
        assert!(strip.output_byte_range().is_empty());
        Ok(())
    }

    #[test]
    fn test_descriptor_validation() {
        assert_eq!(
            StripDescriptor::new(size(4, 10), 3, 0, 5, 2, 2),
            Err(FilterError::InvalidStripIndex(2, 2))
        );
        assert_eq!(
            StripDescriptor::new(size(4, 10), 3, 6, 5, 1, 2),
            Err(FilterError::StripOutOfBounds(6, 11, 10))
        );
    }

    #[test]
    fn test_descriptor_display() -> Result<(), FilterError> {
        let strip = StripDescriptor::new(size(5, 10), 3, 4, 6, 1, 2)?;
        assert_eq!(
            strip.to_string(),
            "Strip { index: 1, count: 2, width: 5, height: 10, offset: 64 }"
        );
        Ok(())
    }

    #[test]
    fn test_invalid_kernel_leaves_image_untouched() -> Result<(), FilterError> {
        let src = ramp_5x5()?;
        let mut dst = src.clone();
        let strip = StripDescriptor::whole_image(src.size(), 4);
        assert_eq!(
            blur_strip(dst.as_slice_mut(), &strip),
            Err(FilterError::InvalidKernelSize(4))
        );
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_buffer_checks() -> Result<(), FilterError> {
        let strip = StripDescriptor::whole_image(size(5, 5), 3);
        let kernel = BinomialKernel::new(3)?;
        let mut scratch = StripScratch::for_strip(&strip);

        assert_eq!(
            vertical_pass(&[0u8; 10], &strip, &kernel, &mut scratch),
            Err(FilterError::BufferTooSmall {
                expected: 80,
                actual: 10
            })
        );

        let wrong_kernel = BinomialKernel::new(5)?;
        assert_eq!(
            vertical_pass(&[0u8; 80], &strip, &wrong_kernel, &mut scratch),
            Err(FilterError::KernelMismatch(3, 5))
        );

        let mut dst = [0u8; 16];
        assert_eq!(
            horizontal_pass(&scratch, &strip, &kernel, &mut dst),
            Err(FilterError::DestinationMismatch {
                expected: 80,
                actual: 16
            })
        );
        Ok(())
    }
}
