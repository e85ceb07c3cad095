use std::path::{Path, PathBuf};

use affix_image::Image;
use affix_io::{functional::DEFAULT_JPEG_QUALITY, write_image_any_rgba8};

use crate::compositor::{composite_points, CompositeOptions};
use crate::error::CompositeError;
use crate::geometry::Point;
use crate::status::{Status, StatusSink};

/// Number of points needed to place a poster.
pub const NUM_POINTS: usize = 3;

/// The state of one poster placement: selected files, picked points and the last result.
///
/// A front end owns one of these and forwards user actions to it. Nothing is shared
/// between sessions.
///
/// ```no_run
/// use affix_composite::{Point, Session, LogSink};
///
/// let mut session = Session::default();
/// let mut sink = LogSink;
/// session.set_poster("poster.png");
/// session.set_kiosk("kiosk.jpg");
/// for p in [(100, 100), (400, 100), (100, 300)] {
///     session.push_point(Point::from(p), &mut sink);
/// }
/// session.process(&mut sink).unwrap();
/// session.save("out.png", &mut sink).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    poster: Option<PathBuf>,
    kiosk: Option<PathBuf>,
    points: Vec<Point>,
    result: Option<Image<u8, 4>>,
    options: CompositeOptions,
    jpeg_quality: Option<u8>,
}

impl Session {
    /// Create an empty session using `options` for every composite.
    pub fn with_options(options: CompositeOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Set the JPEG quality used by [`Session::save`], clamped to 100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality.min(100));
        self
    }

    /// The options used by [`Session::process`].
    pub fn options(&self) -> &CompositeOptions {
        &self.options
    }

    /// Select the poster file.
    pub fn set_poster(&mut self, path: impl Into<PathBuf>) {
        self.poster = Some(path.into());
    }

    /// Select the kiosk file. Points picked on the previous kiosk image are dropped.
    pub fn set_kiosk(&mut self, path: impl Into<PathBuf>) {
        self.kiosk = Some(path.into());
        self.points.clear();
    }

    /// The selected poster file, if any.
    pub fn poster_path(&self) -> Option<&Path> {
        self.poster.as_deref()
    }

    /// The selected kiosk file, if any.
    pub fn kiosk_path(&self) -> Option<&Path> {
        self.kiosk.as_deref()
    }

    /// Points picked so far, in picking order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Record a picked point.
    ///
    /// Returns `false` and ignores the point once three points are held.
    pub fn push_point(&mut self, point: Point, sink: &mut impl StatusSink) -> bool {
        if self.points.len() >= NUM_POINTS {
            return false;
        }
        self.points.push(point);
        sink.report(&Status::PointSelected(point).render(self.options.locale));
        true
    }

    /// Forget the picked points so new ones can be chosen.
    pub fn reset_points(&mut self) {
        self.points.clear();
    }

    /// The most recent successful composite.
    pub fn last_result(&self) -> Option<&Image<u8, 4>> {
        self.result.as_ref()
    }

    fn inputs(&self) -> Option<(&Path, &Path, [Point; NUM_POINTS])> {
        let points = <[Point; NUM_POINTS]>::try_from(self.points.as_slice()).ok()?;
        Some((self.poster.as_deref()?, self.kiosk.as_deref()?, points))
    }

    /// Composite the selected poster onto the selected kiosk image.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when an input is missing or a file cannot be decoded, after telling
    /// `sink` why. The previous result is kept in that case.
    ///
    /// # Errors
    ///
    /// Fails when the picked points do not describe a rectangle, or an image operation
    /// fails internally.
    pub fn process(
        &mut self,
        sink: &mut impl StatusSink,
    ) -> Result<Option<&Image<u8, 4>>, CompositeError> {
        let Some((poster, kiosk, points)) = self.inputs() else {
            sink.report(&Status::MissingInputs.render(self.options.locale));
            return Ok(None);
        };

        let Some(image) = composite_points(poster, kiosk, points, sink, &self.options)? else {
            return Ok(None);
        };

        sink.report(&Status::Completed.render(self.options.locale));
        self.result = Some(image);

        Ok(self.result.as_ref())
    }

    /// Write the last result to `path`, the extension picks the format.
    ///
    /// # Returns
    ///
    /// `Ok(false)` when nothing has been composited yet.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        sink: &mut impl StatusSink,
    ) -> Result<bool, CompositeError> {
        let path = path.as_ref();
        let locale = self.options.locale;

        let Some(image) = &self.result else {
            sink.report(&Status::NothingToSave.render(locale));
            return Ok(false);
        };

        let quality = self.jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY);
        if let Err(err) = write_image_any_rgba8(path, image, quality) {
            log::warn!("failed to write {}: {err}", path.display());
            sink.report(&Status::SaveFailed(path.to_path_buf()).render(locale));
            return Err(err.into());
        }

        sink.report(&Status::Saved(path.to_path_buf()).render(locale));
        Ok(true)
    }
}
