//! BMP encoder: 24-bit uncompressed output only.
//!
//! This is the subset the crate itself produces; palette, 16-bit, and
//! 32-bit writing are deliberately not implemented. Buffers in other
//! layouts are reshaped to RGB first.

use enough::Stop;

use crate::buffer::{Channels, PixelBuffer};
use crate::error::ImageError;

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;

pub(crate) fn encode_bmp(image: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, ImageError> {
    if image.channels() != Channels::Rgb {
        let rgb = image.reshape(Channels::Rgb);
        return encode_bmp(&rgb, stop);
    }

    let w = image.width() as usize;
    let h = image.height() as usize;
    let row_stride = (w * 3 + 3) & !3;
    let pixel_data_size = row_stride * h;
    let file_size = FILE_HEADER_LEN + INFO_HEADER_LEN + pixel_data_size;

    let mut out = Vec::with_capacity(file_size);

    // File header
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&((FILE_HEADER_LEN + INFO_HEADER_LEN) as u32).to_le_bytes());

    // BITMAPINFOHEADER
    out.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
    out.extend_from_slice(&(image.width() as i32).to_le_bytes());
    out.extend_from_slice(&(image.height() as i32).to_le_bytes()); // positive = bottom-up
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes()); // 72 DPI
    out.extend_from_slice(&2835u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors

    let pad = row_stride - w * 3;
    for y in (0..h).rev() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for px in image.row(y as u32).chunks_exact(3) {
            out.push(px[2]);
            out.push(px[1]);
            out.push(px[0]);
        }
        out.extend(core::iter::repeat_n(0u8, pad));
    }

    Ok(out)
}
