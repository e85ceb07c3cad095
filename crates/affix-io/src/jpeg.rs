use crate::error::IoError;
use affix_image::Image;
use jpeg_encoder::{ColorType, Encoder};
use std::path::Path;

/// Writes the given JPEG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the pixel data
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    let image_size = image.size();

    // the encoder addresses rows and columns with u16
    let (width, height) = match (
        u16::try_from(image_size.width),
        u16::try_from(image_size.height),
    ) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::ImageTooLarge(
                image_size.width,
                image_size.height,
            ))
        }
    };

    let encoder = Encoder::new_file(file_path, quality)?;
    encoder.encode(image.as_slice(), width, height, ColorType::Rgb)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::read_image_any;

    #[test]
    fn write_jpeg_flat() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("flat.jpeg");

        let image = Image::<u8, 3>::from_size_val([16, 8].into(), 120)?;
        write_image_jpeg_rgb8(&file_path, &image, 100)?;

        let image_back = read_image_any(&file_path)?.into_rgb8()?;
        assert_eq!(image_back.size(), image.size());
        // lossy, but a flat image survives almost untouched
        assert!(image_back
            .as_slice()
            .iter()
            .all(|&v| (v as i16 - 120).abs() <= 2));

        Ok(())
    }

    #[test]
    fn write_jpeg_too_large() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let image = Image::<u8, 3>::from_size_val([70_000, 1].into(), 0)?;
        let res = write_image_jpeg_rgb8(tmp_dir.path().join("wide.jpg"), &image, 90);
        assert!(matches!(res, Err(IoError::ImageTooLarge(70_000, 1))));
        Ok(())
    }
}
