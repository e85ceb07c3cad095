use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use affix_image::Image;

/// Interpolation mode for the resize and warp operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
    /// Pixel area relation, averages every source pixel covered by the target pixel
    Area,
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated pixel values.
pub fn interpolate_pixel<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    interpolation: InterpolationMode,
) -> [f32; C] {
    match interpolation {
        // point sampling has no footprint, area falls back to bilinear like OpenCV does
        InterpolationMode::Bilinear | InterpolationMode::Area => {
            bilinear_interpolation(image, u, v)
        }
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v),
    }
}
