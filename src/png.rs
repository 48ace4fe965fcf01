//! PNG support, delegating to the `png` crate. Decoding normalizes
//! every PNG flavor to 8-bit samples: palette and sub-byte images are
//! expanded and 16-bit samples are stripped to their high byte.

use std::io::Cursor;

use enough::Stop;

use crate::buffer::{Channels, PixelBuffer};
use crate::error::ImageError;
use crate::limits::{self, Limits};

pub fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<PixelBuffer, ImageError> {
    let mut decoder = ::png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(
        ::png::Transformations::EXPAND | ::png::Transformations::STRIP_16,
    );
    let mut reader = decoder.read_info()?;
    stop.check()?;

    let (width, height) = reader.info().size();
    let channels = match reader.output_color_type() {
        (::png::ColorType::Grayscale, _) => Channels::Gray,
        (::png::ColorType::GrayscaleAlpha, _) => Channels::GrayAlpha,
        (::png::ColorType::Rgb, _) => Channels::Rgb,
        (::png::ColorType::Rgba, _) => Channels::Rgba,
        (other, _) => {
            return Err(ImageError::CodecFailure(format!(
                "PNG expansion left color type {other:?}"
            )));
        }
    };
    limits::check(limits, width, height, channels.count())?;

    let mut pixels = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut pixels)?;
    stop.check()?;
    pixels.truncate(info.buffer_size());

    PixelBuffer::from_vec(pixels, width, height, channels)
}

pub fn encode(image: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, ImageError> {
    stop.check()?;
    let color = match image.channels() {
        Channels::Gray => ::png::ColorType::Grayscale,
        Channels::GrayAlpha => ::png::ColorType::GrayscaleAlpha,
        Channels::Rgb => ::png::ColorType::Rgb,
        Channels::Rgba => ::png::ColorType::Rgba,
    };

    let mut out = Vec::new();
    let mut encoder = ::png::Encoder::new(&mut out, image.width(), image.height());
    encoder.set_color(color);
    encoder.set_depth(::png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.pixels())?;
    writer.finish()?;
    stop.check()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::Limits;
    use enough::Unstoppable;

    #[test]
    fn rgba_survives_a_round_trip() {
        let image = PixelBuffer::from_vec(
            vec![10, 20, 30, 255, 40, 50, 60, 128],
            2,
            1,
            Channels::Rgba,
        )
        .unwrap();
        let bytes = encode(&image, &Unstoppable).unwrap();
        let back = decode(&bytes, None, &Unstoppable).unwrap();
        assert_eq!(back.channels(), Channels::Rgba);
        assert_eq!(back.pixels(), image.pixels());
    }

    #[test]
    fn gray_round_trip_keeps_one_channel() {
        let image = PixelBuffer::from_vec(vec![0, 128, 255], 3, 1, Channels::Gray).unwrap();
        let bytes = encode(&image, &Unstoppable).unwrap();
        let back = decode(&bytes, None, &Unstoppable).unwrap();
        assert_eq!(back.channels(), Channels::Gray);
        assert_eq!(back.pixels(), image.pixels());
    }

    #[test]
    fn limits_reject_before_reading_pixels() {
        let image = PixelBuffer::new(8, 8, Channels::Rgb).unwrap();
        let bytes = encode(&image, &Unstoppable).unwrap();
        let limits = Limits { max_width: Some(4), ..Limits::default() };
        let err = decode(&bytes, Some(&limits), &Unstoppable).unwrap_err();
        assert!(matches!(err, ImageError::LimitExceeded(_)));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(decode(b"not a png at all", None, &Unstoppable).is_err());
    }
}
