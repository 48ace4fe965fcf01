//! PNM encoder. Output is always binary P6 with a 255 maxval; other
//! channel layouts are reshaped to RGB first.

use enough::Stop;

use crate::buffer::{Channels, DEFAULT_PADDING, PixelBuffer};
use crate::error::ImageError;

pub(crate) fn encode_pnm(image: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, ImageError> {
    if image.channels() != Channels::Rgb {
        let rgb = image.reshape_with(Channels::Rgb, DEFAULT_PADDING);
        return encode_pnm(&rgb, stop);
    }
    stop.check()?;

    let header = format!("P6 {} {} 255\n", image.width(), image.height());
    let mut out = Vec::with_capacity(header.len() + image.pixels().len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(image.pixels());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    #[test]
    fn raw_ppm_layout() {
        let image =
            PixelBuffer::from_vec(vec![1, 2, 3, 4, 5, 6], 2, 1, Channels::Rgb).unwrap();
        let out = encode_pnm(&image, &Unstoppable).unwrap();
        assert_eq!(&out[..9], b"P6 2 1 25");
        assert_eq!(&out[out.len() - 6..], &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn gray_input_broadcasts_to_rgb() {
        let image = PixelBuffer::from_vec(vec![7], 1, 1, Channels::Gray).unwrap();
        let out = encode_pnm(&image, &Unstoppable).unwrap();
        assert_eq!(&out[out.len() - 3..], &[7, 7, 7]);
    }
}
