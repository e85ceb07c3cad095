use crate::interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode};
use crate::parallel;
use affix_image::{Image, ImageError, ImageSize};
use fast_image_resize as fr;
use rayon::prelude::*;

/// Resize an image to a new size.
///
/// The function resizes an image to the size of `dst` using the specified interpolation mode.
/// It supports any number of channels. Sample positions follow the pixel-centre convention,
/// so resizing to the same size is the identity.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use affix_image::{Image, ImageSize};
/// use affix_imgproc::resize::resize_native;
/// use affix_imgproc::interpolation::InterpolationMode;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0.0).unwrap();
///
/// resize_native(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
pub fn resize_native<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.size().is_empty() || dst.size().is_empty() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    if src.size() == dst.size() {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    if interpolation == InterpolationMode::Area {
        return resize_area(src, dst);
    }

    let scale_x = src.width() as f32 / dst.width() as f32;
    let scale_y = src.height() as f32 / dst.height() as f32;
    let (max_u, max_v) = ((src.width() - 1) as f32, (src.height() - 1) as f32);

    let (map_x, map_y) = meshgrid_from_fn(dst.cols(), dst.rows(), |x, y| {
        let u = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, max_u);
        let v = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, max_v);
        Ok((u, v))
    })?;

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&u, &v, dst_pixel| {
        dst_pixel.copy_from_slice(&interpolate_pixel(src, u, v, interpolation));
    });

    Ok(())
}

/// Per output index, the covered source indices and their normalised coverage weights.
fn area_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src_len as f64 / dst_len as f64;

    (0..dst_len)
        .map(|i| {
            let start = i as f64 * scale;
            let end = ((i + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);

            (first..last)
                .filter_map(|j| {
                    let overlap = (end.min((j + 1) as f64) - start.max(j as f64)) / (end - start);
                    (overlap > 1e-9).then_some((j, overlap as f32))
                })
                .collect()
        })
        .collect()
}

// box filter: every output pixel is the coverage-weighted mean of the source pixels under it
fn resize_area<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
) -> Result<(), ImageError> {
    let weights_x = area_weights(src.width(), dst.width());
    let weights_y = area_weights(src.height(), dst.height());

    let src_cols = src.cols();
    let src_data = src.as_slice();
    let dst_cols = dst.cols();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .zip(weights_y.par_iter())
        .for_each(|(dst_row, wy)| {
            for (dst_pixel, wx) in dst_row.chunks_exact_mut(C).zip(weights_x.iter()) {
                let mut acc = [0.0f32; C];
                for &(sy, fy) in wy {
                    for &(sx, fx) in wx {
                        let base = (sy * src_cols + sx) * C;
                        let w = fy * fx;
                        for k in 0..C {
                            acc[k] += src_data[base + k] * w;
                        }
                    }
                }
                dst_pixel.copy_from_slice(&acc);
            }
        });

    Ok(())
}

/// Resize an integer image to a new size going through an `f32` working copy.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `new_size` - The size of the returned image.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// A new image of `new_size`. When the size does not change the pixels are copied as-is.
pub fn resize_u8<const C: usize>(
    src: &Image<u8, C>,
    new_size: ImageSize,
    interpolation: InterpolationMode,
) -> Result<Image<u8, C>, ImageError> {
    if src.size() == new_size {
        return Ok(src.clone());
    }

    let src_f32 = src.cast::<f32>()?;
    let mut dst_f32 = Image::<f32, C>::from_size_val(new_size, 0.0)?;
    resize_native(&src_f32, &mut dst_f32, interpolation)?;

    Image::from_f32_image(&dst_f32)
}

/// The implementation used to resize `u8` images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeBackend {
    /// [`resize_native`] on an `f32` working copy.
    #[default]
    Native,
    /// [`resize_fast`], three and four channel images only.
    Fast,
}

/// Resize an integer image to a new size with the chosen backend.
///
/// Both backends return the input unchanged when the size does not change.
///
/// # Example
///
/// ```
/// use affix_image::Image;
/// use affix_imgproc::interpolation::InterpolationMode;
/// use affix_imgproc::resize::{resize_u8_with, ResizeBackend};
///
/// let image = Image::<u8, 3>::from_size_val([8, 6].into(), 40).unwrap();
/// let resized =
///     resize_u8_with(&image, [4, 3].into(), InterpolationMode::Area, ResizeBackend::Fast).unwrap();
///
/// assert!(resized.as_slice().iter().all(|&v| v == 40));
/// ```
pub fn resize_u8_with<const C: usize>(
    src: &Image<u8, C>,
    new_size: ImageSize,
    interpolation: InterpolationMode,
    backend: ResizeBackend,
) -> Result<Image<u8, C>, ImageError> {
    match backend {
        ResizeBackend::Native => resize_u8(src, new_size, interpolation),
        ResizeBackend::Fast => {
            if src.size() == new_size {
                return Ok(src.clone());
            }
            if src.size().is_empty() || new_size.is_empty() {
                return Err(ImageError::InvalidImageSize(
                    src.width(),
                    src.height(),
                    new_size.width,
                    new_size.height,
                ));
            }

            let mut dst = Image::<u8, C>::from_size_val(new_size, 0)?;
            resize_fast(src, &mut dst, interpolation)?;
            Ok(dst)
        }
    }
}

/// Resize an image to a new size using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// It supports only 3 and 4 channel `u8` images. Alpha is treated as a plain channel.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use affix_image::{Image, ImageSize};
/// use affix_imgproc::resize::resize_fast;
/// use affix_imgproc::interpolation::InterpolationMode;
///
/// let image = Image::<_, 3>::new(
///     ImageSize { width: 4, height: 5 },
///     vec![0u8; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let mut image_resized = Image::<_, 3>::from_size_val([2, 3].into(), 0).unwrap();
///
/// resize_fast(&image, &mut image_resized, InterpolationMode::Area).unwrap();
///
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
///
/// # Errors
///
/// The function returns an error if the image cannot be resized.
pub fn resize_fast<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    let pixel_type = match C {
        3 => fr::PixelType::U8x3,
        4 => fr::PixelType::U8x4,
        _ => return Err(ImageError::ChannelIndexOutOfBounds(C, 4)),
    };

    let (src_size, dst_size) = (src.size(), dst.size());
    let invalid_size = || {
        ImageError::InvalidImageSize(
            src_size.width,
            src_size.height,
            dst_size.width,
            dst_size.height,
        )
    };

    let (dst_width, dst_height) = (dst.width() as u32, dst.height() as u32);

    let src_image = fr::images::ImageRef::new(
        src.width() as u32,
        src.height() as u32,
        src.as_slice(),
        pixel_type,
    )
    .map_err(|_| invalid_size())?;

    let mut dst_image =
        fr::images::Image::from_slice_u8(dst_width, dst_height, dst.as_slice_mut(), pixel_type)
            .map_err(|_| invalid_size())?;

    let alg = match interpolation {
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
        InterpolationMode::Area => fr::ResizeAlg::Convolution(fr::FilterType::Box),
    };
    let options = fr::ResizeOptions::new().resize_alg(alg).use_alpha(false);

    fr::Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|_| invalid_size())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use affix_image::{Image, ImageError, ImageSize};

    use super::InterpolationMode;

    #[test]
    fn resize_smoke_ch3() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0f32; 4 * 5 * 3],
        )?;

        let mut image_resized = Image::<_, 3>::from_size_val([2, 3].into(), 0.0)?;

        super::resize_native(&image, &mut image_resized, InterpolationMode::Bilinear)?;

        assert_eq!(image_resized.num_channels(), 3);
        assert_eq!(image_resized.size().width, 2);
        assert_eq!(image_resized.size().height, 3);
        Ok(())
    }

    #[test]
    fn resize_same_size_is_identity() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([3, 2].into(), vec![1, 2, 3, 4, 5, 6])?;
        let resized = super::resize_u8(&image, image.size(), InterpolationMode::Bilinear)?;
        assert_eq!(resized, image);
        Ok(())
    }

    #[test]
    fn resize_area_downscale_averages() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            [4, 2].into(),
            vec![
                0, 10, 100, 200,
                20, 30, 100, 200,
            ],
        )?;

        let resized = super::resize_u8(&image, [2, 1].into(), InterpolationMode::Area)?;
        assert_eq!(resized.as_slice(), &[15, 150]);
        Ok(())
    }

    #[test]
    fn resize_area_fractional_coverage() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([3, 1].into(), vec![0.0, 30.0, 60.0])?;
        let mut resized = Image::<f32, 1>::from_size_val([2, 1].into(), 0.0)?;
        super::resize_native(&image, &mut resized, InterpolationMode::Area)?;

        // each output covers 1.5 source pixels
        approx::assert_relative_eq!(resized.as_slice()[0], 10.0, epsilon = 1e-4);
        approx::assert_relative_eq!(resized.as_slice()[1], 50.0, epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn resize_area_keeps_constant_colour() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val([7, 5].into(), 123)?;
        for size in [[3, 2], [10, 11], [7, 1]] {
            let resized = super::resize_u8(&image, size.into(), InterpolationMode::Area)?;
            assert!(resized.as_slice().iter().all(|&v| v == 123));
        }
        Ok(())
    }

    #[test]
    fn resize_nearest_upscale() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 1].into(), vec![10, 20])?;
        let resized = super::resize_u8(&image, [4, 1].into(), InterpolationMode::Nearest)?;
        assert_eq!(resized.as_slice(), &[10, 10, 20, 20]);
        Ok(())
    }

    #[test]
    fn resize_empty_is_error() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;
        let mut dst = Image::<f32, 1>::from_size_val([0, 2].into(), 0.0)?;
        assert!(super::resize_native(&image, &mut dst, InterpolationMode::Bilinear).is_err());
        Ok(())
    }

    fn ramp_rgb(width: usize, height: usize, step: u8) -> Result<Image<u8, 3>, ImageError> {
        let data = (0..width * height)
            .flat_map(|i| {
                let v = (i % width) as u8 * step;
                [v, v / 2, 255 - v]
            })
            .collect();
        Image::new([width, height].into(), data)
    }

    fn max_abs_diff(a: &Image<u8, 3>, b: &Image<u8, 3>) -> u8 {
        a.as_slice()
            .iter()
            .zip(b.as_slice())
            .map(|(x, y)| x.abs_diff(*y))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn backends_agree_on_area_downscale() -> Result<(), ImageError> {
        let image = ramp_rgb(8, 4, 30)?;
        let native = super::resize_u8(&image, [4, 2].into(), InterpolationMode::Area)?;
        let fast = super::resize_u8_with(
            &image,
            [4, 2].into(),
            InterpolationMode::Area,
            super::ResizeBackend::Fast,
        )?;

        assert_eq!(native.pixel(1, 0), Some(&[75u8, 38, 180][..]));
        assert!(max_abs_diff(&native, &fast) <= 1);
        Ok(())
    }

    #[test]
    fn backends_agree_on_bilinear_upscale() -> Result<(), ImageError> {
        let image = ramp_rgb(4, 3, 40)?;
        let native = super::resize_u8(&image, [8, 6].into(), InterpolationMode::Bilinear)?;
        let fast = super::resize_u8_with(
            &image,
            [8, 6].into(),
            InterpolationMode::Bilinear,
            super::ResizeBackend::Fast,
        )?;

        assert_eq!(fast.size(), native.size());
        assert!(max_abs_diff(&native, &fast) <= 2);
        Ok(())
    }

    #[test]
    fn fast_backend_same_size_and_empty() -> Result<(), ImageError> {
        let image = ramp_rgb(4, 3, 40)?;
        let same = super::resize_u8_with(
            &image,
            image.size(),
            InterpolationMode::Bilinear,
            super::ResizeBackend::Fast,
        )?;
        assert_eq!(same, image);

        assert!(super::resize_u8_with(
            &image,
            [0, 3].into(),
            InterpolationMode::Bilinear,
            super::ResizeBackend::Fast,
        )
        .is_err());
        Ok(())
    }

    #[test]
    fn resize_fast() -> Result<(), ImageError> {
        let image = Image::<_, 4>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0u8; 4 * 5 * 4],
        )?;

        let mut image_resized = Image::<_, 4>::from_size_val([2, 3].into(), 0)?;

        super::resize_fast(&image, &mut image_resized, InterpolationMode::Nearest)?;

        assert_eq!(image_resized.num_channels(), 4);
        assert_eq!(image_resized.size().width, 2);
        assert_eq!(image_resized.size().height, 3);
        Ok(())
    }
}
