//! Pastes a poster onto a kiosk image along an [`OrientedRectangle`].
//!
//! The poster is resized to the rectangle, sheared onto a canvas by an affine warp, and
//! every non-black canvas pixel replaces the kiosk pixel under it. Black canvas pixels
//! count as background, so pure black inside the poster itself is lost as well.

use std::path::Path;

use affix_image::{ops::merge_alpha, Image, ImageSize};
use affix_imgproc::{
    crop::{crop_image, paste_image},
    interpolation::InterpolationMode,
    parallel,
    resize::{resize_u8_with, ResizeBackend},
    warp::{get_affine_transform, warp_affine},
};
use affix_io::{read_image_any, DecodedImage};

use crate::error::CompositeError;
use crate::geometry::{resolve_rectangle, OrientedRectangle, Point};
use crate::status::{Locale, Status, StatusSink};

/// Knobs of the compositing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeOptions {
    /// Used to fit the poster into the picked rectangle.
    pub poster_interpolation: InterpolationMode,
    /// Used by the shear.
    pub warp_interpolation: InterpolationMode,
    /// Used to fit the canvas into the clipped region.
    pub region_interpolation: InterpolationMode,
    /// Implementation behind both resizes.
    pub resize_backend: ResizeBackend,
    /// Language of the status lines.
    pub locale: Locale,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            poster_interpolation: InterpolationMode::Area,
            warp_interpolation: InterpolationMode::Bilinear,
            region_interpolation: InterpolationMode::Bilinear,
            resize_backend: ResizeBackend::Native,
            locale: Locale::English,
        }
    }
}

/// The part of the kiosk image the canvas is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Size after clipping to the kiosk bounds.
    pub size: ImageSize,
}

/// Place the rectangle's canvas on a kiosk image of `kiosk_size`.
///
/// The region never leaves the kiosk; whatever sticks out right or below is cut off.
pub fn region_of_interest(rect: &OrientedRectangle, kiosk_size: ImageSize) -> Region {
    let (x, y) = rect.offset();
    let canvas = rect.canvas_size();

    Region {
        x,
        y,
        size: ImageSize {
            width: canvas.width.min(kiosk_size.width.saturating_sub(x)),
            height: canvas.height.min(kiosk_size.height.saturating_sub(y)),
        },
    }
}

/// Resize the poster to the rectangle and shear it onto a black canvas.
///
/// # Returns
///
/// An image of [`OrientedRectangle::canvas_size`].
pub fn warp_poster(
    poster: &Image<u8, 3>,
    rect: &OrientedRectangle,
    options: &CompositeOptions,
) -> Result<Image<u8, 3>, CompositeError> {
    let resized = resize_u8_with(
        poster,
        rect.poster_size(),
        options.poster_interpolation,
        options.resize_backend,
    )?;

    let m = get_affine_transform(&rect.source_corners(), &rect.target_corners())?;
    log::debug!("poster shear matrix {m:?}");

    let mut canvas = Image::<f32, 3>::from_size_val(rect.canvas_size(), 0.0)?;
    warp_affine(
        &resized.cast::<f32>()?,
        &mut canvas,
        &m,
        options.warp_interpolation,
    )?;

    Ok(Image::from_f32_image(&canvas)?)
}

/// Keep the kiosk pixel wherever the canvas is black, take the canvas pixel elsewhere.
///
/// Done as `(canvas & fg) + (kiosk & bg)` with complementary byte masks.
fn blend_masked(
    canvas: &Image<u8, 3>,
    kiosk: &Image<u8, 3>,
) -> Result<Image<u8, 3>, CompositeError> {
    let mut out = Image::<u8, 3>::from_size_val(canvas.size(), 0)?;

    parallel::par_iter_rows_two(canvas, kiosk, &mut out, |fg, bg, dst| {
        let background = fg.iter().all(|&v| v == 0);
        let fg_mask = if background { 0x00 } else { 0xff };
        let bg_mask = !fg_mask;
        for k in 0..3 {
            dst[k] = (fg[k] & fg_mask).saturating_add(bg[k] & bg_mask);
        }
    });

    Ok(out)
}

/// Composite already decoded images.
///
/// The poster's alpha, if any, is ignored. The kiosk keeps its alpha untouched, a kiosk
/// without alpha comes back fully opaque.
pub fn composite_images(
    poster: DecodedImage,
    kiosk: DecodedImage,
    rect: &OrientedRectangle,
    options: &CompositeOptions,
) -> Result<Image<u8, 4>, CompositeError> {
    let (mut kiosk_color, kiosk_alpha) = kiosk.into_color_alpha()?;

    let region = region_of_interest(rect, kiosk_color.size());
    log::debug!(
        "canvas {} placed at ({}, {}) clipped to {}",
        rect.canvas_size(),
        region.x,
        region.y,
        region.size
    );

    if !region.size.is_empty() {
        let canvas = warp_poster(&poster.into_rgb8()?, rect, options)?;
        let patch = resize_u8_with(
            &canvas,
            region.size,
            options.region_interpolation,
            options.resize_backend,
        )?;

        let mut target = Image::<u8, 3>::from_size_val(region.size, 0)?;
        crop_image(&kiosk_color, &mut target, region.x, region.y)?;

        let blended = blend_masked(&patch, &target)?;
        paste_image(&blended, &mut kiosk_color, region.x, region.y)?;
    }

    Ok(merge_alpha(&kiosk_color, &kiosk_alpha)?)
}

/// Composite with the default [`CompositeOptions`].
///
/// See [`composite_with_options`].
pub fn composite(
    poster_path: impl AsRef<Path>,
    kiosk_path: impl AsRef<Path>,
    rect: &OrientedRectangle,
    sink: &mut impl StatusSink,
) -> Result<Option<Image<u8, 4>>, CompositeError> {
    composite_with_options(
        poster_path,
        kiosk_path,
        rect,
        sink,
        &CompositeOptions::default(),
    )
}

/// Decode the poster and the kiosk image from disk and composite them.
///
/// # Arguments
///
/// * `poster_path` - Image pasted onto the kiosk.
/// * `kiosk_path` - Image receiving the poster.
/// * `rect` - Where the poster goes, see [`resolve_rectangle`].
/// * `sink` - Receives the paths, the decoded sizes and any decode failure.
/// * `options` - Interpolation and language settings.
///
/// # Returns
///
/// `Ok(None)` when either file cannot be decoded; the reason was already sent to `sink`.
/// Otherwise the kiosk image with the poster pasted, as RGBA.
pub fn composite_with_options(
    poster_path: impl AsRef<Path>,
    kiosk_path: impl AsRef<Path>,
    rect: &OrientedRectangle,
    sink: &mut impl StatusSink,
    options: &CompositeOptions,
) -> Result<Option<Image<u8, 4>>, CompositeError> {
    let (poster_path, kiosk_path) = (poster_path.as_ref(), kiosk_path.as_ref());
    log::debug!(
        "compositing {} onto {}",
        poster_path.display(),
        kiosk_path.display()
    );

    sink.report(&Status::PosterPath(poster_path.to_path_buf()).render(options.locale));
    sink.report(&Status::KioskPath(kiosk_path.to_path_buf()).render(options.locale));

    let poster = read_image_any(poster_path);
    let kiosk = read_image_any(kiosk_path);

    let poster = match poster {
        Ok(poster) => poster,
        Err(err) => {
            log::warn!("failed to decode {}: {err}", poster_path.display());
            sink.report(&Status::PosterNotFound(poster_path.to_path_buf()).render(options.locale));
            return Ok(None);
        }
    };

    let kiosk = match kiosk {
        Ok(kiosk) => kiosk,
        Err(err) => {
            log::warn!("failed to decode {}: {err}", kiosk_path.display());
            sink.report(&Status::KioskNotFound(kiosk_path.to_path_buf()).render(options.locale));
            return Ok(None);
        }
    };

    sink.report(&Status::PosterSize(poster.size()).render(options.locale));
    sink.report(&Status::KioskSize(kiosk.size()).render(options.locale));

    if region_of_interest(rect, kiosk.size()).size.is_empty() {
        sink.report(&Status::EmptyRegion.render(options.locale));
    }

    composite_images(poster, kiosk, rect, options).map(Some)
}

/// Resolve three picked points and composite, in one call.
///
/// Invalid points fail before either file is read.
pub fn composite_points(
    poster_path: impl AsRef<Path>,
    kiosk_path: impl AsRef<Path>,
    points: [Point; 3],
    sink: &mut impl StatusSink,
    options: &CompositeOptions,
) -> Result<Option<Image<u8, 4>>, CompositeError> {
    let rect = resolve_rectangle(points)?;
    composite_with_options(poster_path, kiosk_path, &rect, sink, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::resolve_rectangle;

    fn rect(points: [(i32, i32); 3]) -> OrientedRectangle {
        match resolve_rectangle(points.map(Point::from)) {
            Ok(rect) => rect,
            Err(err) => panic!("bad test points: {err}"),
        }
    }

    #[test]
    fn region_is_clipped() {
        let r = rect([(700, 500), (900, 500), (700, 650)]);
        let region = region_of_interest(&r, [800, 600].into());
        assert_eq!(region.x, 700);
        assert_eq!(region.y, 500);
        assert_eq!(region.size, ImageSize::from([100, 100]));

        let outside = rect([(900, 10), (950, 10), (900, 50)]);
        assert!(region_of_interest(&outside, [800, 600].into())
            .size
            .is_empty());
    }

    #[test]
    fn warp_zero_skew_covers_canvas() -> Result<(), CompositeError> {
        let r = rect([(0, 0), (8, 0), (0, 4)]);
        let poster = Image::<u8, 3>::from_size_val([16, 8].into(), 90)?;
        let canvas = warp_poster(&poster, &r, &CompositeOptions::default())?;

        assert_eq!(canvas.size(), ImageSize::from([8, 4]));
        assert!(canvas.as_slice().iter().all(|&v| v == 90));
        Ok(())
    }

    #[test]
    fn warp_upward_leaves_black_triangles() -> Result<(), CompositeError> {
        let r = rect([(0, 10), (10, 0), (0, 20)]);
        let poster = Image::<u8, 3>::from_size_val([10, 10].into(), 200)?;
        let canvas = warp_poster(&poster, &r, &CompositeOptions::default())?;

        assert_eq!(canvas.size(), ImageSize::from([10, 20]));
        // above the poster on the left, below it on the right
        assert_eq!(canvas.pixel(0, 0), Some(&[0u8, 0, 0][..]));
        assert_eq!(canvas.pixel(9, 19), Some(&[0u8, 0, 0][..]));
        // the middle of the sheared poster
        assert_eq!(canvas.pixel(5, 10), Some(&[200u8, 200, 200][..]));
        Ok(())
    }

    #[test]
    fn fast_backend_matches_native() -> Result<(), CompositeError> {
        let data = (0..40 * 20)
            .flat_map(|i| {
                let v = 20 + (i % 40) as u8 * 5;
                [v, 255 - v, 100]
            })
            .collect();
        let poster = Image::<u8, 3>::new([40, 20].into(), data)?;
        let r = rect([(0, 0), (20, 0), (0, 10)]);

        let native = warp_poster(&poster, &r, &CompositeOptions::default())?;
        let fast = warp_poster(
            &poster,
            &r,
            &CompositeOptions {
                resize_backend: ResizeBackend::Fast,
                ..Default::default()
            },
        )?;

        assert_eq!(fast.size(), native.size());
        let max_diff = native
            .as_slice()
            .iter()
            .zip(fast.as_slice())
            .map(|(a, b)| a.abs_diff(*b))
            .max();
        assert!(max_diff.is_some_and(|d| d <= 1), "max diff {max_diff:?}");
        Ok(())
    }

    #[test]
    fn blend_keeps_black_as_background() -> Result<(), CompositeError> {
        let canvas = Image::<u8, 3>::new([2, 1].into(), vec![0, 0, 0, 10, 0, 0])?;
        let kiosk = Image::<u8, 3>::new([2, 1].into(), vec![7, 8, 9, 7, 8, 9])?;
        let out = blend_masked(&canvas, &kiosk)?;
        assert_eq!(out.as_slice(), &[7, 8, 9, 10, 0, 0]);
        Ok(())
    }

    #[test]
    fn composite_in_memory_keeps_alpha() -> Result<(), CompositeError> {
        let poster = DecodedImage::Rgb8(Image::from_size_val([4, 4].into(), 50)?);
        let kiosk = DecodedImage::Rgba8(Image::from_size_val([10, 10].into(), 128)?);

        let out = composite_images(
            poster,
            kiosk,
            &rect([(2, 2), (6, 2), (2, 6)]),
            &CompositeOptions::default(),
        )?;

        assert_eq!(out.pixel(3, 3), Some(&[50u8, 50, 50, 128][..]));
        assert_eq!(out.pixel(0, 0), Some(&[128u8, 128, 128, 128][..]));
        assert!(out.channel(3)?.as_slice().iter().all(|&a| a == 128));
        Ok(())
    }
}
