use pixelform::{Channels, DEFAULT_PADDING, PixelBuffer, reshape};

const LAYOUTS: [Channels; 4] = [
    Channels::Gray,
    Channels::GrayAlpha,
    Channels::Rgb,
    Channels::Rgba,
];

fn sample(channels: Channels) -> PixelBuffer {
    let len = 3 * 2 * channels.count();
    let pixels = (0..len).map(|i| (i * 7 % 251) as u8).collect();
    PixelBuffer::from_vec(pixels, 3, 2, channels).unwrap()
}

#[test]
fn every_pair_preserves_dimensions() {
    for from in LAYOUTS {
        for to in LAYOUTS {
            let src = sample(from);
            let dst = src.reshape(to);
            assert_eq!(dst.width(), src.width(), "{from:?} -> {to:?}");
            assert_eq!(dst.height(), src.height(), "{from:?} -> {to:?}");
            assert_eq!(dst.channels(), to, "{from:?} -> {to:?}");
            assert_eq!(
                dst.pixels().len(),
                3 * 2 * to.count(),
                "{from:?} -> {to:?}"
            );
        }
    }
}

#[test]
fn composed_reshape_returns_to_the_source_shape() {
    // Reshaping out to any layout and back preserves dimensions and
    // channel count for every (a, b) pair; the content may be lossy.
    for a in LAYOUTS {
        for b in LAYOUTS {
            let src = sample(a);
            let back = src.reshape(b).reshape(a);
            assert_eq!(back.width(), src.width(), "{a:?} -> {b:?} -> {a:?}");
            assert_eq!(back.height(), src.height(), "{a:?} -> {b:?} -> {a:?}");
            assert_eq!(back.channels(), a, "{a:?} -> {b:?} -> {a:?}");
            assert_eq!(back.pixels().len(), src.pixels().len(), "{a:?} -> {b:?} -> {a:?}");
        }
    }
}

#[test]
fn identity_reshape_is_an_independent_copy() {
    let src = sample(Channels::Rgb);
    let mut dst = src.reshape(Channels::Rgb);
    assert_eq!(dst.pixels(), src.pixels());
    dst.pixels_mut()[0] ^= 0xFF;
    assert_ne!(dst.pixels()[0], src.pixels()[0]);
}

#[test]
fn gray_is_the_truncating_mean() {
    let src = PixelBuffer::from_vec(vec![10, 20, 30], 1, 1, Channels::Rgb).unwrap();
    assert_eq!(src.reshape(Channels::Gray).pixels(), &[20]);

    // (1 + 2 + 3) / 3 = 2 exactly; (0 + 0 + 2) / 3 truncates to 0.
    let src = PixelBuffer::from_vec(vec![0, 0, 2], 1, 1, Channels::Rgb).unwrap();
    assert_eq!(src.reshape(Channels::Gray).pixels(), &[0]);
}

#[test]
fn expansion_broadcasts_and_pads_alpha() {
    let src = PixelBuffer::from_vec(vec![9], 1, 1, Channels::Gray).unwrap();
    assert_eq!(src.reshape(Channels::Rgb).pixels(), &[9, 9, 9]);
    assert_eq!(
        src.reshape(Channels::Rgba).pixels(),
        &[9, 9, 9, DEFAULT_PADDING]
    );
}

#[test]
fn alpha_crosses_between_alpha_layouts() {
    let src = PixelBuffer::from_vec(vec![50, 60, 70, 42], 1, 1, Channels::Rgba).unwrap();
    assert_eq!(src.reshape(Channels::GrayAlpha).pixels(), &[60, 42]);

    let src = PixelBuffer::from_vec(vec![80, 42], 1, 1, Channels::GrayAlpha).unwrap();
    assert_eq!(src.reshape(Channels::Rgba).pixels(), &[80, 80, 80, 42]);
}

#[test]
fn alpha_is_dropped_without_blending() {
    // A fully transparent pixel keeps its raw color samples.
    let src = PixelBuffer::from_vec(vec![200, 100, 50, 0], 1, 1, Channels::Rgba).unwrap();
    assert_eq!(src.reshape(Channels::Rgb).pixels(), &[200, 100, 50]);
}

#[test]
fn custom_padding_byte() {
    let src = PixelBuffer::from_vec(vec![5], 1, 1, Channels::Gray).unwrap();
    let dst = reshape(&src, Channels::GrayAlpha, 0x00);
    assert_eq!(dst.pixels(), &[5, 0x00]);
}
