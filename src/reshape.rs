//! Channel-reshape engine: converts a [`PixelBuffer`] between the four
//! supported channel layouts.
//!
//! Gray values produced from color use the unweighted average
//! `(r + g + b) / 3` with integer truncation, a speed/simplicity
//! trade-off rather than perceptual luma. Expanding adds alpha/second
//! channels filled with a caller-chosen padding byte (opaque by default);
//! dropping alpha simply discards the sample, with no premultiplication.

use crate::buffer::{Channels, PixelBuffer};

/// Convert `src` to the `target` layout.
///
/// Always returns a freshly allocated, independent buffer; the identity
/// case is a deep copy, never an alias. The input is never mutated.
pub fn reshape(src: &PixelBuffer, target: Channels, padding: u8) -> PixelBuffer {
    use Channels::*;

    if src.channels() == target {
        return src.clone();
    }

    let pixel_count = src.width() as usize * src.height() as usize;
    let mut out = vec![0u8; pixel_count * target.count()];

    match (src.channels(), target) {
        (Gray, GrayAlpha) => per_pixel(src, &mut out, 1, 2, |s, d| {
            d[0] = s[0];
            d[1] = padding;
        }),
        (Gray, Rgb) => per_pixel(src, &mut out, 1, 3, |s, d| {
            d.fill(s[0]);
        }),
        (Gray, Rgba) => per_pixel(src, &mut out, 1, 4, |s, d| {
            d[..3].fill(s[0]);
            d[3] = padding;
        }),
        (GrayAlpha, Gray) => per_pixel(src, &mut out, 2, 1, |s, d| {
            d[0] = s[0];
        }),
        (GrayAlpha, Rgb) => per_pixel(src, &mut out, 2, 3, |s, d| {
            d.fill(s[0]);
        }),
        (GrayAlpha, Rgba) => per_pixel(src, &mut out, 2, 4, |s, d| {
            d[..3].fill(s[0]);
            d[3] = s[1];
        }),
        (Rgb, Gray) => per_pixel(src, &mut out, 3, 1, |s, d| {
            d[0] = average(s);
        }),
        (Rgb, GrayAlpha) => per_pixel(src, &mut out, 3, 2, |s, d| {
            d[0] = average(s);
            d[1] = padding;
        }),
        (Rgb, Rgba) => per_pixel(src, &mut out, 3, 4, |s, d| {
            d[..3].copy_from_slice(s);
            d[3] = padding;
        }),
        (Rgba, Gray) => per_pixel(src, &mut out, 4, 1, |s, d| {
            d[0] = average(s);
        }),
        (Rgba, GrayAlpha) => per_pixel(src, &mut out, 4, 2, |s, d| {
            d[0] = average(s);
            d[1] = s[3];
        }),
        (Rgba, Rgb) => per_pixel(src, &mut out, 4, 3, |s, d| {
            d.copy_from_slice(&s[..3]);
        }),
        // Identity pairs handled by the early return above.
        _ => unreachable!("identity reshape reached the conversion matrix"),
    }

    PixelBuffer::from_vec(out, src.width(), src.height(), target)
        .expect("reshape output sized from a valid source buffer")
}

/// Unweighted average of the first three samples, truncating.
fn average(px: &[u8]) -> u8 {
    ((u32::from(px[0]) + u32::from(px[1]) + u32::from(px[2])) / 3) as u8
}

fn per_pixel<F>(src: &PixelBuffer, out: &mut [u8], sn: usize, dn: usize, mut f: F)
where
    F: FnMut(&[u8], &mut [u8]),
{
    for (s, d) in src
        .pixels()
        .chunks_exact(sn)
        .zip(out.chunks_exact_mut(dn))
    {
        f(s, d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_1x1(r: u8, g: u8, b: u8) -> PixelBuffer {
        PixelBuffer::from_vec(vec![r, g, b], 1, 1, Channels::Rgb).unwrap()
    }

    #[test]
    fn identity_is_a_deep_copy() {
        let src = rgb_1x1(1, 2, 3);
        let mut copy = reshape(&src, Channels::Rgb, 0xFF);
        assert_eq!(copy.pixels(), src.pixels());
        copy.pixels_mut()[0] = 99;
        assert_eq!(src.pixels()[0], 1);
    }

    #[test]
    fn gray_is_truncating_average() {
        let out = reshape(&rgb_1x1(10, 20, 30), Channels::Gray, 0xFF);
        assert_eq!(out.pixels(), &[20]);
        // (1 + 2 + 3) / 3 == 2 exactly; (1 + 2 + 4) / 3 truncates to 2
        let out = reshape(&rgb_1x1(1, 2, 4), Channels::Gray, 0xFF);
        assert_eq!(out.pixels(), &[2]);
    }

    #[test]
    fn expansion_broadcasts_and_pads() {
        let gray = PixelBuffer::from_vec(vec![7], 1, 1, Channels::Gray).unwrap();
        assert_eq!(reshape(&gray, Channels::Rgb, 0xFF).pixels(), &[7, 7, 7]);
        assert_eq!(
            reshape(&gray, Channels::Rgba, 0xFF).pixels(),
            &[7, 7, 7, 0xFF]
        );
        assert_eq!(reshape(&gray, Channels::GrayAlpha, 0x80).pixels(), &[7, 0x80]);
    }

    #[test]
    fn alpha_survives_where_both_sides_have_it() {
        let ga = PixelBuffer::from_vec(vec![9, 42], 1, 1, Channels::GrayAlpha).unwrap();
        assert_eq!(reshape(&ga, Channels::Rgba, 0xFF).pixels(), &[9, 9, 9, 42]);

        let rgba = PixelBuffer::from_vec(vec![30, 60, 90, 42], 1, 1, Channels::Rgba).unwrap();
        assert_eq!(reshape(&rgba, Channels::GrayAlpha, 0xFF).pixels(), &[60, 42]);
    }

    #[test]
    fn dropping_alpha_discards_it() {
        let rgba = PixelBuffer::from_vec(vec![1, 2, 3, 0], 1, 1, Channels::Rgba).unwrap();
        assert_eq!(reshape(&rgba, Channels::Rgb, 0xFF).pixels(), &[1, 2, 3]);

        let ga = PixelBuffer::from_vec(vec![5, 0], 1, 1, Channels::GrayAlpha).unwrap();
        assert_eq!(reshape(&ga, Channels::Gray, 0xFF).pixels(), &[5]);
    }

    #[test]
    fn rgb_to_gray_alpha_uses_padding() {
        let out = reshape(&rgb_1x1(30, 30, 30), Channels::GrayAlpha, 0xAB);
        assert_eq!(out.pixels(), &[30, 0xAB]);
    }
}
