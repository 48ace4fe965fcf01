use core::fmt;

use crate::error::ImageError;
use crate::reshape;

/// Byte used to fill alpha (and other padded) channels when expanding.
pub const DEFAULT_PADDING: u8 = 0xFF;

/// Number and meaning of per-pixel samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channels {
    /// 1 sample: luminance.
    Gray = 1,
    /// 2 samples: luminance + alpha.
    GrayAlpha = 2,
    /// 3 samples: red, green, blue.
    Rgb = 3,
    /// 4 samples: red, green, blue, alpha.
    Rgba = 4,
}

impl Channels {
    /// Samples per pixel.
    pub fn count(self) -> usize {
        self as usize
    }

    /// Map a dynamic channel count (e.g. from a CLI argument or a codec
    /// header) into the closed enum. Counts outside 1-4 are rejected.
    pub fn from_count(n: u32) -> Result<Channels, ImageError> {
        match n {
            1 => Ok(Channels::Gray),
            2 => Ok(Channels::GrayAlpha),
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            other => Err(ImageError::UnsupportedChannelCount(other)),
        }
    }

    /// Whether the last sample of each pixel is an alpha value.
    pub fn has_alpha(self) -> bool {
        matches!(self, Channels::GrayAlpha | Channels::Rgba)
    }
}

impl fmt::Display for Channels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channels::Gray => "Gray",
            Channels::GrayAlpha => "GrayAlpha",
            Channels::Rgb => "RGB",
            Channels::Rgba => "RGBA",
        })
    }
}

/// The canonical in-memory image: 8-bit samples, 1-4 interleaved channels,
/// row-major with no row padding.
///
/// Invariant: `pixels.len() == width * height * channels.count()`, with both
/// dimensions nonzero. Constructors enforce this; everything downstream may
/// rely on it. `Clone` is the explicit deep copy; buffers are never aliased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: Channels,
}

impl PixelBuffer {
    /// Create a blank image with every byte set to [`DEFAULT_PADDING`].
    pub fn new(width: u32, height: u32, channels: Channels) -> Result<PixelBuffer, ImageError> {
        let len = buffer_len(width, height, channels)?;
        Ok(PixelBuffer {
            pixels: vec![DEFAULT_PADDING; len],
            width,
            height,
            channels,
        })
    }

    /// Wrap an existing byte vector, validating the size invariant.
    pub fn from_vec(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        channels: Channels,
    ) -> Result<PixelBuffer, ImageError> {
        let expected = buffer_len(width, height, channels)?;
        if pixels.len() != expected {
            return Err(ImageError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(PixelBuffer {
            pixels,
            width,
            height,
            channels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Bytes per row (`width * channels`; rows are never padded).
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels.count()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.pixels
    }

    /// One image row. Panics if `y` is out of bounds.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds");
        let stride = self.stride();
        &self.pixels[y as usize * stride..][..stride]
    }

    /// Mutable image row. Panics if `y` is out of bounds.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of bounds");
        let stride = self.stride();
        &mut self.pixels[y as usize * stride..][..stride]
    }

    /// Convert to another channel layout. Always returns a freshly
    /// allocated buffer, even when `target` matches the current layout.
    /// See [`crate::reshape`] for the per-pair conversion rules.
    pub fn reshape(&self, target: Channels) -> PixelBuffer {
        reshape::reshape(self, target, DEFAULT_PADDING)
    }

    /// Like [`PixelBuffer::reshape`] with an explicit padding byte for new
    /// alpha/second channels.
    pub fn reshape_with(&self, target: Channels, padding: u8) -> PixelBuffer {
        reshape::reshape(self, target, padding)
    }
}

fn buffer_len(width: u32, height: u32, channels: Channels) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|wh| wh.checked_mul(channels.count()))
        .ok_or(ImageError::InvalidDimensions { width, height })
}
