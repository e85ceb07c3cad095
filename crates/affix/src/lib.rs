#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use affix_image as image;

#[doc(inline)]
pub use affix_imgproc as imgproc;

#[doc(inline)]
pub use affix_io as io;

#[doc(inline)]
pub use affix_composite as composite;
