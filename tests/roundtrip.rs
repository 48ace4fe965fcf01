use enough::Unstoppable;
use pixelform::{Channels, PixelBuffer, bmp, pnm};

fn gradient_rgb(width: u32, height: u32) -> PixelBuffer {
    let len = width as usize * height as usize * 3;
    let pixels = (0..len).map(|i| (i * 13 % 256) as u8).collect();
    PixelBuffer::from_vec(pixels, width, height, Channels::Rgb).unwrap()
}

#[test]
fn bmp_24bit_round_trip_is_exact() {
    // Width 3 forces a padded stride (9 bytes up to 12).
    let image = gradient_rgb(3, 5);
    let bytes = bmp::encode(&image, &Unstoppable).unwrap();
    let back = bmp::decode(&bytes, None, &Unstoppable).unwrap();
    assert_eq!(back.channels(), Channels::Rgb);
    assert_eq!((back.width(), back.height()), (3, 5));
    assert_eq!(back.pixels(), image.pixels());
}

#[test]
fn bmp_round_trip_flattens_rgba_to_rgb() {
    let image = PixelBuffer::from_vec(
        vec![10, 20, 30, 200, 40, 50, 60, 100],
        2,
        1,
        Channels::Rgba,
    )
    .unwrap();
    let bytes = bmp::encode(&image, &Unstoppable).unwrap();
    let back = bmp::decode(&bytes, None, &Unstoppable).unwrap();
    assert_eq!(back.channels(), Channels::Rgb);
    assert_eq!(back.pixels(), &[10, 20, 30, 40, 50, 60]);
}

#[test]
fn pnm_round_trip_is_exact() {
    let image = gradient_rgb(4, 3);
    let bytes = pnm::encode(&image, &Unstoppable).unwrap();
    let back = pnm::decode(&bytes, None, &Unstoppable).unwrap();
    assert_eq!(back.channels(), Channels::Rgb);
    assert_eq!((back.width(), back.height()), (4, 3));
    assert_eq!(back.pixels(), image.pixels());
}

#[test]
fn p3_and_p6_decode_identically() {
    let raw = b"P6 2 2 255\n\x00\x01\x02\x7F\x80\x81\xFD\xFE\xFF\x10\x20\x30".to_vec();
    let mut plain = String::from("P3\n2 2\n255\n");
    for s in [0u8, 1, 2, 0x7F, 0x80, 0x81, 0xFD, 0xFE, 0xFF, 0x10, 0x20, 0x30] {
        plain.push_str(&format!("{s} "));
    }
    let a = pnm::decode(&raw, None, &Unstoppable).unwrap();
    let b = pnm::decode(plain.as_bytes(), None, &Unstoppable).unwrap();
    assert_eq!(a.pixels(), b.pixels());
    assert_eq!(a.channels(), b.channels());
}

#[test]
fn p5_low_maxval_hits_full_range() {
    let image = pnm::decode(b"P5 2 1 15\n\x0F\x00", None, &Unstoppable).unwrap();
    assert_eq!(image.pixels(), &[255, 0]);
}

#[test]
fn gray_image_survives_bmp_via_broadcast() {
    let image = PixelBuffer::from_vec(vec![0, 128, 255], 3, 1, Channels::Gray).unwrap();
    let bytes = bmp::encode(&image, &Unstoppable).unwrap();
    let back = bmp::decode(&bytes, None, &Unstoppable).unwrap();
    assert_eq!(
        back.pixels(),
        &[0, 0, 0, 128, 128, 128, 255, 255, 255]
    );
}
