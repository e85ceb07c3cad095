use crate::{Image, ImageError};

/// Split a four channel image into its colour channels and its alpha plane.
///
/// # Arguments
///
/// * `src` - The source image with the alpha channel last.
///
/// # Returns
///
/// A tuple with the three channel colour image and the single channel alpha image.
///
/// # Example
///
/// ```
/// use affix_image::{Image, ImageSize};
/// use affix_image::ops::split_alpha;
///
/// let image = Image::<u8, 4>::new(
///     ImageSize { width: 2, height: 1 },
///     vec![1, 2, 3, 4, 5, 6, 7, 8],
/// ).unwrap();
///
/// let (color, alpha) = split_alpha(&image).unwrap();
///
/// assert_eq!(color.as_slice(), &[1, 2, 3, 5, 6, 7]);
/// assert_eq!(alpha.as_slice(), &[4, 8]);
/// ```
pub fn split_alpha<T: Copy>(src: &Image<T, 4>) -> Result<(Image<T, 3>, Image<T, 1>), ImageError> {
    Ok((drop_alpha(src)?, src.channel(3)?))
}

/// Merge a colour image and an alpha plane into a four channel image.
///
/// # Errors
///
/// Returns an error if the two images do not have the same size.
pub fn merge_alpha<T: Copy>(
    color: &Image<T, 3>,
    alpha: &Image<T, 1>,
) -> Result<Image<T, 4>, ImageError> {
    if color.size() != alpha.size() {
        return Err(ImageError::InvalidImageSize(
            color.width(),
            color.height(),
            alpha.width(),
            alpha.height(),
        ));
    }

    let mut data = Vec::with_capacity(color.size().area() * 4);
    for (px, a) in color.as_slice().chunks_exact(3).zip(alpha.as_slice()) {
        data.extend_from_slice(px);
        data.push(*a);
    }

    Image::new(color.size(), data)
}

/// Drop the alpha channel of a four channel image.
pub fn drop_alpha<T: Copy>(src: &Image<T, 4>) -> Result<Image<T, 3>, ImageError> {
    let data = src
        .as_slice()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    Image::new(src.size(), data)
}
