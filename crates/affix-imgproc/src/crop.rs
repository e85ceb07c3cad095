use affix_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

fn check_region<T, const C: usize>(
    image: &Image<T, C>,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Result<(), ImageError> {
    if x + width > image.cols() || y + height > image.rows() {
        return Err(ImageError::RegionOutOfBounds(
            x,
            y,
            width,
            height,
            image.cols(),
            image.rows(),
        ));
    }
    Ok(())
}

/// Crop an image to a specified region.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Examples
///
/// ```rust
/// use affix_image::{Image, ImageSize};
/// use affix_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    check_region(src, x, y, dst.cols(), dst.rows())?;

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            // get the slice at the top left corner
            let offset = (y + i) * src.cols() * C + x * C;
            dst_row.copy_from_slice(&src.as_slice()[offset..offset + dst_cols * C]);
        });

    Ok(())
}

/// Paste an image into a region of another image, in place.
///
/// # Arguments
///
/// * `src` - The image to paste.
/// * `dst` - The image receiving the pixels.
/// * `x` - The x-coordinate of the top-left corner of the region in `dst`.
/// * `y` - The y-coordinate of the top-left corner of the region in `dst`.
///
/// # Errors
///
/// Returns an error when `src` placed at `(x, y)` does not fit inside `dst`.
pub fn paste_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    check_region(dst, x, y, src.cols(), src.rows())?;

    let (src_cols, dst_cols) = (src.cols(), dst.cols());
    if src_cols == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .skip(y)
        .take(src.rows())
        .enumerate()
        .for_each(|(i, dst_row)| {
            let src_row = &src.as_slice()[i * src_cols * C..(i + 1) * src_cols * C];
            dst_row[x * C..(x + src_cols) * C].copy_from_slice(src_row);
        });

    Ok(())
}
