use crate::geometry::Point;

/// Rejected point input. Raised before any image is touched.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GeometryError {
    /// The caller did not pass exactly three points.
    #[error("Exactly 3 points are required, got {0}")]
    WrongPointCount(usize),

    /// The same point was picked twice.
    #[error("Point {0} was given more than once")]
    DuplicatePoint(Point),

    /// Points live in image space and cannot be negative.
    #[error("Point {0} has a negative coordinate")]
    NegativeCoordinate(Point),

    /// The right corner shares its x with another point, leaving no width.
    #[error("Two points share the rightmost x = {0}, the rectangle has no width")]
    DegenerateWidth(i32),

    /// The left points share their y, so top and bottom cannot be told apart.
    #[error("The left points share y = {0}, the rectangle has no height")]
    DegenerateHeight(i32),

    /// The sheared canvas would be larger than any image the pipeline handles.
    #[error("The rectangle needs a {0}x{1} canvas, larger than supported")]
    CanvasTooLarge(usize, usize),
}

/// An error type for the compositing pipeline.
#[derive(thiserror::Error, Debug)]
pub enum CompositeError {
    /// The picked points do not describe a usable rectangle.
    #[error(transparent)]
    InvalidInput(#[from] GeometryError),

    /// An image operation failed.
    #[error("Image operation failed. {0}")]
    Image(#[from] affix_image::ImageError),

    /// Reading or writing an image file failed.
    #[error("Image I/O failed. {0}")]
    Io(#[from] affix_io::IoError),
}
