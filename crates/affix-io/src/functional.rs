use std::path::Path;

use affix_image::{
    ops::{drop_alpha, split_alpha},
    Image, ImageSize,
};

use crate::{error::IoError, jpeg, png};

/// Default JPEG quality used by [`write_image_any_rgba8`] callers that do not care.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// A decoded 8-bit image, with or without an alpha channel.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedImage {
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
}

impl DecodedImage {
    /// The size of the decoded image.
    pub fn size(&self) -> ImageSize {
        match self {
            DecodedImage::Rgb8(img) => img.size(),
            DecodedImage::Rgba8(img) => img.size(),
        }
    }

    /// Whether the source file carried an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, DecodedImage::Rgba8(_))
    }

    /// The colour channels of the image, discarding any alpha.
    pub fn into_rgb8(self) -> Result<Image<u8, 3>, IoError> {
        match self {
            DecodedImage::Rgb8(img) => Ok(img),
            DecodedImage::Rgba8(img) => Ok(drop_alpha(&img)?),
        }
    }

    /// Split into colour and alpha planes. An image without alpha gets a fully opaque plane.
    pub fn into_color_alpha(self) -> Result<(Image<u8, 3>, Image<u8, 1>), IoError> {
        match self {
            DecodedImage::Rgb8(img) => {
                let alpha = Image::from_size_val(img.size(), u8::MAX)?;
                Ok((img, alpha))
            }
            DecodedImage::Rgba8(img) => Ok(split_alpha(&img)?),
        }
    }
}

/// Decodes an image from raw bytes.
///
/// The format is guessed from the content, not from a file name. Images with an alpha
/// channel decode to [`DecodedImage::Rgba8`], everything else (including grayscale) to
/// [`DecodedImage::Rgb8`]. Higher bit depths are reduced to 8 bits.
///
/// # Arguments
///
/// * `bytes` - The encoded image bytes.
pub fn decode_image_any(bytes: &[u8]) -> Result<DecodedImage, IoError> {
    let img = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = if img.color().has_alpha() {
        DecodedImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?)
    } else {
        DecodedImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?)
    };

    Ok(image)
}

/// Reads an image from the given file path.
///
/// The file is read into memory first and decoded from the byte buffer, which keeps
/// paths with non-ASCII characters working the same way on every platform.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// The decoded image.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<DecodedImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;
    log::debug!("read {} bytes from {}", bytes.len(), file_path.display());

    decode_image_any(&bytes)
}

/// Writes an RGBA image, choosing the encoder from the file extension.
///
/// `.png` keeps the alpha channel. `.jpg` and `.jpeg` drop it, JPEG has no alpha.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image to encode.
/// * `quality` - JPEG quality from 0 to 100, ignored for PNG.
///
/// # Errors
///
/// Returns [`IoError::InvalidFileExtension`] for any other extension.
pub fn write_image_any_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
    quality: u8,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => png::write_image_png_rgba8(file_path, image),
        Some("jpg") | Some("jpeg") => {
            jpeg::write_image_jpeg_rgb8(file_path, &drop_alpha(image)?, quality)
        }
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_rgba() -> Result<Image<u8, 4>, IoError> {
        let size = ImageSize {
            width: 6,
            height: 4,
        };
        let data = (0..size.area())
            .flat_map(|i| [(i * 10) as u8, 50, 200, (i * 7) as u8])
            .collect();
        Ok(Image::new(size, data)?)
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_any("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn decode_garbage() {
        assert!(decode_image_any(b"definitely not an image").is_err());
    }

    #[test]
    fn write_read_png_keeps_alpha() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gradient.png");

        let image = gradient_rgba()?;
        write_image_any_rgba8(&file_path, &image, DEFAULT_JPEG_QUALITY)?;

        let decoded = read_image_any(&file_path)?;
        assert!(decoded.has_alpha());
        assert_eq!(decoded, DecodedImage::Rgba8(image));

        Ok(())
    }

    #[test]
    fn write_read_jpeg_drops_alpha() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gradient.JPG");

        write_image_any_rgba8(&file_path, &gradient_rgba()?, DEFAULT_JPEG_QUALITY)?;

        let decoded = read_image_any(&file_path)?;
        assert!(!decoded.has_alpha());
        assert_eq!(decoded.size(), [6, 4].into());

        Ok(())
    }

    #[test]
    fn non_ascii_path() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("포스터_ポスター.png");

        let image = gradient_rgba()?;
        write_image_any_rgba8(&file_path, &image, DEFAULT_JPEG_QUALITY)?;

        let (color, alpha) = read_image_any(&file_path)?.into_color_alpha()?;
        assert_eq!(color.size(), image.size());
        assert_eq!(alpha.as_slice()[1], 7);

        Ok(())
    }

    #[test]
    fn unsupported_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let res = write_image_any_rgba8(
            tmp_dir.path().join("out.bmp"),
            &gradient_rgba()?,
            DEFAULT_JPEG_QUALITY,
        );
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
        Ok(())
    }

    #[test]
    fn opaque_alpha_is_synthesised() -> Result<(), IoError> {
        let rgb = Image::<u8, 3>::from_size_val([2, 2].into(), 9)?;
        let (_, alpha) = DecodedImage::Rgb8(rgb).into_color_alpha()?;
        assert!(alpha.as_slice().iter().all(|&a| a == 255));
        Ok(())
    }
}
