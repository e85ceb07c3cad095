#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Placement of the poster from three picked points.
pub mod geometry;

/// The resize, warp and masked blend pipeline.
pub mod compositor;

/// Error types for the compositing pipeline.
pub mod error;

/// A caller owned editing session.
pub mod session;

/// Human readable status lines and where they go.
pub mod status;

pub use crate::compositor::{
    composite, composite_images, composite_points, composite_with_options, CompositeOptions,
};
pub use crate::error::{CompositeError, GeometryError};
pub use crate::geometry::{resolve_points, resolve_rectangle, OrientedRectangle, Point};
pub use crate::session::Session;
pub use crate::status::{Locale, LogSink, MemorySink, Status, StatusSink};
