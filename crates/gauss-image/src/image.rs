use crate::error::ImageError;
use crate::layout::{pixel_offset, required_len, row_offset, row_stride, BYTES_PER_PIXEL};

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use gauss_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// A packed 3-byte-per-pixel bitmap with rows padded to a 4-byte boundary.
///
/// The component order of a pixel is left to the producer of the data (BMP files store BGR)
/// and is never reordered by this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedRgbImage {
    size: ImageSize,
    data: Vec<u8>,
}

impl PackedRgbImage {
    /// Create a new image from padded pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The row padded pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match `row_stride(width) * height`, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use gauss_image::{ImageSize, PackedRgbImage};
    ///
    /// let image = PackedRgbImage::new(
    ///     ImageSize {
    ///         width: 5,
    ///         height: 2,
    ///     },
    ///     vec![0u8; 16 * 2],
    /// ).unwrap();
    ///
    /// assert_eq!(image.row_stride(), 16);
    /// ```
    pub fn new(size: ImageSize, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = required_len(size);
        if data.len() != expected {
            return Err(ImageError::InvalidDataLength(data.len(), expected));
        }
        Ok(Self { size, data })
    }

    /// Create a new image where every pixel holds `val`.
    ///
    /// Padding bytes are set to zero.
    pub fn from_size_val(size: ImageSize, val: [u8; 3]) -> Self {
        let stride = row_stride(size.width);
        let mut data = vec![0u8; required_len(size)];
        for row in data.chunks_exact_mut(stride.max(1)).take(size.height) {
            row.chunks_exact_mut(BYTES_PER_PIXEL)
                .take(size.width)
                .for_each(|px| px.copy_from_slice(&val));
        }
        Self { size, data }
    }

    /// Create a new image from tightly packed pixels in row-major order.
    ///
    /// # Errors
    ///
    /// If `pixels.len()` is not `width * height`, an error is returned.
    pub fn from_pixels(size: ImageSize, pixels: &[[u8; 3]]) -> Result<Self, ImageError> {
        let num_pixels = size.width * size.height;
        if pixels.len() != num_pixels {
            return Err(ImageError::InvalidDataLength(
                pixels.len() * BYTES_PER_PIXEL,
                num_pixels * BYTES_PER_PIXEL,
            ));
        }

        let mut image = Self::from_size_val(size, [0, 0, 0]);
        if size.width == 0 {
            return Ok(image);
        }
        for (y, row) in pixels.chunks_exact(size.width).enumerate() {
            let offset = row_offset(size.width, y);
            image.data[offset..offset + size.width * BYTES_PER_PIXEL]
                .chunks_exact_mut(BYTES_PER_PIXEL)
                .zip(row.iter())
                .for_each(|(dst, src)| dst.copy_from_slice(src));
        }
        Ok(image)
    }

    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// The number of bytes between the starts of two consecutive rows.
    pub fn row_stride(&self) -> usize {
        row_stride(self.size.width)
    }

    /// The raw padded buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The raw padded buffer, mutable.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the image and return the raw padded buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// The pixel bytes of row `y`, excluding the row padding.
    pub fn row(&self, y: usize) -> Result<&[u8], ImageError> {
        if y >= self.size.height {
            return Err(ImageError::RowIndexOutOfBounds(y, self.size.height));
        }
        let offset = row_offset(self.size.width, y);
        Ok(&self.data[offset..offset + self.size.width * BYTES_PER_PIXEL])
    }

    /// The three components of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Result<[u8; 3], ImageError> {
        let offset = self.checked_pixel_offset(x, y)?;
        Ok([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ])
    }

    /// Overwrite the three components of pixel `(x, y)`.
    pub fn set_pixel(&mut self, x: usize, y: usize, val: [u8; 3]) -> Result<(), ImageError> {
        let offset = self.checked_pixel_offset(x, y)?;
        self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&val);
        Ok(())
    }

    fn checked_pixel_offset(&self, x: usize, y: usize) -> Result<usize, ImageError> {
        if x >= self.size.width || y >= self.size.height {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.size.width,
                self.size.height,
            ));
        }
        Ok(pixel_offset(self.size.width, x, y))
    }
}
