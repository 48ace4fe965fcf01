//! In-memory raster image decoding and encoding.
//!
//! Images live in a [`PixelBuffer`]: tightly packed 8-bit interleaved
//! samples in one of four channel layouts (gray, gray+alpha, RGB,
//! RGBA). BMP and PNM are decoded and encoded natively; PNG and JPEG
//! are handled through the `png` and `image` crates and normalized to
//! the same buffer shape.
//!
//! The high-level entry points are [`load`] and [`save`]: loading
//! sniffs the format from file content and returns it alongside the
//! decoded buffer, saving picks the codec from the target extension.
//! The per-format modules
//! expose the same codecs over byte slices for callers that manage
//! their own I/O. Decoders accept optional [`Limits`] to bound
//! allocations for untrusted input and a [`Stop`] token for
//! cancellation; pass [`Unstoppable`] when neither matters.
//!
//! ```no_run
//! use pixelform::{Channels, load, save};
//!
//! let (image, format) = load("photo.jpg")?;
//! println!("loaded a {format} image");
//! let gray = image.reshape(Channels::Gray);
//! save("photo.pgm", &gray)?;
//! # Ok::<(), pixelform::ImageError>(())
//! ```

#![forbid(unsafe_code)]

pub mod bmp;
mod buffer;
mod dispatch;
mod error;
mod format;
mod limits;
pub mod pnm;
mod reshape;

pub mod jpeg;
pub mod png;

pub use buffer::{Channels, DEFAULT_PADDING, PixelBuffer};
pub use dispatch::{SaveOptions, load, load_with, save, save_with};
pub use error::ImageError;
pub use format::{ImageFormat, MAGIC_LEN};
pub use jpeg::DEFAULT_JPEG_QUALITY;
pub use limits::Limits;
pub use reshape::reshape;

pub use enough::{Stop, StopReason, Unstoppable};
