//! JPEG support, delegating to the `image` crate's baseline codec.
//!
//! JPEG has no alpha, so encoding drops the alpha channel first:
//! gray+alpha becomes gray and RGBA becomes RGB. Quality runs 1-100.

use std::io::Cursor;

use enough::Stop;
use image::ImageDecoder;
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};

use crate::buffer::{Channels, DEFAULT_PADDING, PixelBuffer};
use crate::error::ImageError;
use crate::limits::{self, Limits};

/// Encoder quality used when the caller does not pick one.
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

pub fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<PixelBuffer, ImageError> {
    let decoder = JpegDecoder::new(Cursor::new(data))?;
    stop.check()?;

    let (width, height) = decoder.dimensions();
    let channels = match decoder.color_type() {
        image::ColorType::L8 => Channels::Gray,
        image::ColorType::Rgb8 => Channels::Rgb,
        other => {
            return Err(ImageError::UnsupportedVariant(format!(
                "JPEG color type {other:?}"
            )));
        }
    };
    limits::check(limits, width, height, channels.count())?;

    let mut pixels = vec![0; decoder.total_bytes() as usize];
    decoder.read_image(&mut pixels)?;
    stop.check()?;

    PixelBuffer::from_vec(pixels, width, height, channels)
}

pub fn encode(image: &PixelBuffer, quality: u8, stop: &dyn Stop) -> Result<Vec<u8>, ImageError> {
    match image.channels() {
        Channels::GrayAlpha => {
            let gray = image.reshape_with(Channels::Gray, DEFAULT_PADDING);
            return encode(&gray, quality, stop);
        }
        Channels::Rgba => {
            let rgb = image.reshape_with(Channels::Rgb, DEFAULT_PADDING);
            return encode(&rgb, quality, stop);
        }
        Channels::Gray | Channels::Rgb => {}
    }
    stop.check()?;

    let color = match image.channels() {
        Channels::Gray => image::ExtendedColorType::L8,
        _ => image::ExtendedColorType::Rgb8,
    };
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder.encode(image.pixels(), image.width(), image.height(), color)?;
    stop.check()?;
    Ok(out)
}
