use std::path::PathBuf;

use affix_image::ImageSize;

use crate::geometry::Point;

/// Language used to render [`Status`] lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// English messages.
    #[default]
    English,
    /// Korean messages.
    Korean,
}

/// Something worth telling the person driving the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// A poster path was selected.
    PosterPath(PathBuf),
    /// A kiosk path was selected.
    KioskPath(PathBuf),
    /// A corner was picked on the kiosk image.
    PointSelected(Point),
    /// The poster file could not be decoded.
    PosterNotFound(PathBuf),
    /// The kiosk file could not be decoded.
    KioskNotFound(PathBuf),
    /// Decoded poster dimensions.
    PosterSize(ImageSize),
    /// Decoded kiosk dimensions.
    KioskSize(ImageSize),
    /// The picked region lies entirely outside the kiosk image.
    EmptyRegion,
    /// The poster was pasted.
    Completed,
    /// Processing was requested without both images and three points.
    MissingInputs,
    /// The result was written to disk.
    Saved(PathBuf),
    /// Writing the result failed.
    SaveFailed(PathBuf),
    /// Saving was requested before anything was composited.
    NothingToSave,
}

impl Status {
    /// Render the status as a single line in the given language.
    pub fn render(&self, locale: Locale) -> String {
        match locale {
            Locale::English => self.render_english(),
            Locale::Korean => self.render_korean(),
        }
    }

    fn render_english(&self) -> String {
        match self {
            Status::PosterPath(p) => format!("Poster image path: {}", p.display()),
            Status::KioskPath(p) => format!("Kiosk image path: {}", p.display()),
            Status::PointSelected(p) => format!("Selected position: {p}"),
            Status::PosterNotFound(p) => format!(
                "Cannot find the poster image. Please check the path: {}",
                p.display()
            ),
            Status::KioskNotFound(p) => format!(
                "Cannot find the kiosk image. Please check the path: {}",
                p.display()
            ),
            Status::PosterSize(s) => format!("Poster image size: {s}"),
            Status::KioskSize(s) => format!("Kiosk image size: {s}"),
            Status::EmptyRegion => {
                "The selected region is outside the kiosk image, nothing was pasted".into()
            }
            Status::Completed => "Poster pasted".into(),
            Status::MissingInputs => {
                "Please select the poster and kiosk images and pick 3 points".into()
            }
            Status::Saved(p) => format!("Image saved to: {}", p.display()),
            Status::SaveFailed(p) => format!("Failed to save the image: {}", p.display()),
            Status::NothingToSave => "Please paste a poster first".into(),
        }
    }

    fn render_korean(&self) -> String {
        match self {
            Status::PosterPath(p) => format!("포스터 이미지 경로: {}", p.display()),
            Status::KioskPath(p) => format!("키오스크 이미지 경로: {}", p.display()),
            Status::PointSelected(p) => format!("선택한 위치: {p}"),
            Status::PosterNotFound(_) => {
                "포스터 이미지를 찾을 수 없습니다. 경로를 확인해 주세요".into()
            }
            Status::KioskNotFound(_) => {
                "키오스크 이미지를 찾을 수 없습니다. 경로를 확인해 주세요".into()
            }
            Status::PosterSize(s) => format!("포스터 이미지 사이즈: {s}"),
            Status::KioskSize(s) => format!("키오스크 이미지 사이즈: {s}"),
            Status::EmptyRegion => "선택한 영역이 키오스크 이미지 밖에 있습니다".into(),
            Status::Completed => "이미지 붙이기 완료".into(),
            Status::MissingInputs => {
                "포스터와 키오스크 이미지, 3개의 점을 선택해주세요.".into()
            }
            Status::Saved(p) => format!("이미지 저장 경로: {}", p.display()),
            Status::SaveFailed(_) => "이미지 저장에 실패했습니다.".into(),
            Status::NothingToSave => "포스터를 먼저 붙여주세요.".into(),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.render(Locale::English))
    }
}

/// Receives rendered status lines, synchronously and in order.
///
/// Implemented for any `FnMut(&str)`, so a closure appending to a UI widget works as is.
pub trait StatusSink {
    /// Deliver one line.
    fn report(&mut self, line: &str);
}

impl<F: FnMut(&str)> StatusSink for F {
    fn report(&mut self, line: &str) {
        self(line)
    }
}

/// Forwards status lines to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn report(&mut self, line: &str) {
        log::info!("{line}");
    }
}

/// Keeps every status line in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    /// The lines received so far, oldest first.
    pub lines: Vec<String>,
}

impl StatusSink for MemorySink {
    fn report(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}
