use std::{fs::File, io::BufWriter, path::Path};

use ::png::{BitDepth, ColorType, Encoder};
use affix_image::{Image, ImageSize};

use crate::error::IoError;

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the pixel data.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgb,
    )
}

/// Writes the given PNG _(rgba8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the pixel data.
pub fn write_image_png_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgba,
    )
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    // Make sure you set `depth` correctly
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(
        BufWriter::new(file),
        image_size.width as u32,
        image_size.height as u32,
    );
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::IoError, functional::read_image_any, DecodedImage};

    #[test]
    fn write_png_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("checker-rgb8.png");

        let data = (0..5 * 3).flat_map(|i| [i as u8, 0, 255 - i as u8]).collect();
        let image = Image::<u8, 3>::new([5, 3].into(), data)?;
        write_image_png_rgb8(&file_path, &image)?;

        assert!(file_path.exists(), "File does not exist: {:?}", file_path);
        assert_eq!(read_image_any(&file_path)?, DecodedImage::Rgb8(image));

        Ok(())
    }

    #[test]
    fn write_png_rgba8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("alpha.png");

        let image = Image::<u8, 4>::new([2, 1].into(), vec![1, 2, 3, 0, 4, 5, 6, 128])?;
        write_image_png_rgba8(&file_path, &image)?;

        assert_eq!(read_image_any(&file_path)?, DecodedImage::Rgba8(image));

        Ok(())
    }
}
