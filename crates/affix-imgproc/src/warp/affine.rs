use affix_image::{Image, ImageError};

use crate::interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode};
use crate::parallel;

#[rustfmt::skip]
fn determinant3x3(m: &[f32; 9]) -> f32 {
    m[0] * (m[4] * m[8] - m[5] * m[7]) -
    m[1] * (m[3] * m[8] - m[5] * m[6]) +
    m[2] * (m[3] * m[7] - m[4] * m[6])
}

#[rustfmt::skip]
fn adjugate3x3(m: &[f32; 9]) -> [f32; 9] {
    [
        m[4] * m[8] - m[5] * m[7],  // [0, 0]
        m[2] * m[7] - m[1] * m[8],  // [0, 1]
        m[1] * m[5] - m[2] * m[4],  // [0, 2]
        m[5] * m[6] - m[3] * m[8],  // [1, 0]
        m[0] * m[8] - m[2] * m[6],  // [1, 1]
        m[2] * m[3] - m[0] * m[5],  // [1, 2]
        m[3] * m[7] - m[4] * m[6],  // [2, 0]
        m[1] * m[6] - m[0] * m[7],  // [2, 1]
        m[0] * m[4] - m[1] * m[3],  // [2, 2]
    ]
}

/// Computes the 2x3 affine transformation that maps three source points onto three
/// destination points.
///
/// Solves `dst_i = M * [src_i.x, src_i.y, 1]` for the six unknowns of `M`.
///
/// # Arguments
///
/// * `src` - Three points in the source image as `[x, y]`.
/// * `dst` - The three corresponding points in the destination image.
///
/// # Returns
///
/// The row-major 2x3 matrix `[a, b, c, d, e, f]`.
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] when the source points are collinear.
pub fn get_affine_transform(
    src: &[[f32; 2]; 3],
    dst: &[[f32; 2]; 3],
) -> Result<[f32; 6], ImageError> {
    #[rustfmt::skip]
    let a = [
        src[0][0], src[0][1], 1.0,
        src[1][0], src[1][1], 1.0,
        src[2][0], src[2][1], 1.0,
    ];

    let det = determinant3x3(&a);
    if det == 0.0 {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let adj = adjugate3x3(&a);
    let inv_det = 1.0 / det;

    // solve one row of the affine matrix per output coordinate
    let solve = |k: usize| -> [f32; 3] {
        let rhs = [dst[0][k], dst[1][k], dst[2][k]];
        let mut row = [0.0; 3];
        for (i, r) in row.iter_mut().enumerate() {
            *r = (adj[i * 3] * rhs[0] + adj[i * 3 + 1] * rhs[1] + adj[i * 3 + 2] * rhs[2])
                * inv_det;
        }
        row
    };

    let [a, b, c] = solve(0);
    let [d, e, f] = solve(1);

    Ok([a, b, c, d, e, f])
}

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    // follow OpenCV: a singular matrix inverts to zero
    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Applies an affine transformation to a point.
pub fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// Destination pixels whose source position falls outside `src` are left untouched,
/// so the initial contents of `dst` act as the constant border value.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `m` - The 2x3 affine transformation matrix src -> dst.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use affix_image::{Image, ImageSize};
/// use affix_imgproc::interpolation::InterpolationMode;
/// use affix_imgproc::warp::warp_affine;
///
/// let src = Image::<_, 3>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     1f32,
/// ).unwrap();
///
/// let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
///
/// let mut dst = Image::<_, 3>::from_size_val(src.size(), 0.0).unwrap();
///
/// warp_affine(&src, &mut dst, &m, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(dst.size().width, 4);
/// assert_eq!(dst.size().height, 5);
/// ```
pub fn warp_affine<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    m: &[f32; 6],
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

    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let (map_x, map_y) = meshgrid_from_fn(dst_cols, dst_rows, |x, y| {
        Ok(transform_point(x as f32, y as f32, &m_inv))
    })?;

    let (src_cols, src_rows) = (src.cols() as f32, src.rows() as f32);

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&x, &y, dst_pixel| {
        // check if the position is within the bounds of the src image
        if x >= 0.0f32 && x < src_cols && y >= 0.0f32 && y < src_rows {
            dst_pixel.copy_from_slice(&interpolate_pixel(src, x, y, interpolation));
        }
    });

    Ok(())
}
