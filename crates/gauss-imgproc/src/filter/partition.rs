use gauss_image::ImageSize;

use super::strip::StripDescriptor;
use crate::error::FilterError;

/// Split an image into horizontal strips for independent blurring.
///
/// The rows are divided into `count` owned ranges whose lengths differ by at most one row. Each
/// strip is assigned its owned range plus `kernel_size / 2` halo rows on every side that does not
/// touch the image border, so that the trimmed output rows of the strips are exactly the owned
/// ranges.
///
/// The number of strips is reduced when the image is too short to give every strip boundary
/// `kernel_size / 2` rows on both sides.
///
/// # Arguments
///
/// * `image_size` - The size of the whole image.
/// * `kernel_size` - The size of the blur kernel.
/// * `num_strips` - The requested number of strips.
///
/// # Returns
///
/// The strip descriptors ordered from top to bottom.
pub fn partition_strips(
    image_size: ImageSize,
    kernel_size: usize,
    num_strips: usize,
) -> Result<Vec<StripDescriptor>, FilterError> {
    if num_strips == 0 {
        return Err(FilterError::InvalidStripCount(num_strips));
    }

    let height = image_size.height;
    let half = kernel_size / 2;
    let max_strips = (height / half.max(1)).max(1);
    let count = num_strips.min(max_strips);
    if count < num_strips {
        log::debug!(
            "reducing strips from {} to {} for height {} and kernel size {}",
            num_strips,
            count,
            height,
            kernel_size
        );
    }

    let base = height / count;
    let extra = height % count;

    let mut strips = Vec::with_capacity(count);
    let mut owned_start = 0;
    for index in 0..count {
        let owned_end = owned_start + base + usize::from(index < extra);

        let first_row = if index == 0 {
            owned_start
        } else {
            owned_start - half
        };
        let end_row = if index + 1 == count {
            owned_end
        } else {
            owned_end + half
        };

        strips.push(StripDescriptor::new(
            image_size,
            kernel_size,
            first_row,
            end_row - first_row,
            index,
            count,
        )?);
        owned_start = owned_end;
    }

    Ok(strips)
}
