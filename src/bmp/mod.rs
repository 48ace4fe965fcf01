//! Windows Bitmap codec.
//!
//! Decodes 1/4/8-bit indexed, 16/32-bit bitfield, and 24-bit truecolor
//! files; encodes 24-bit uncompressed only. RLE variants are rejected
//! with [`ImageError::UnsupportedVariant`].

mod decode;
mod encode;
mod utils;

use enough::Stop;

use crate::buffer::{Channels, PixelBuffer};
use crate::error::ImageError;
use crate::limits::Limits;

/// Decode a BMP bitstream into an RGB or RGBA [`PixelBuffer`].
pub fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<PixelBuffer, ImageError> {
    decode::decode_pixels(data, limits, stop)
}

/// Parse the header only: `(width, height, output channels)`.
pub fn probe(data: &[u8]) -> Result<(u32, u32, Channels), ImageError> {
    decode::probe(data)
}

/// Encode to a 24-bit uncompressed BMP, reshaping non-RGB input first.
pub fn encode(image: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, ImageError> {
    encode::encode_bmp(image, stop)
}
