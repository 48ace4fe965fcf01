//! BMP decoder: 1/4/8-bit indexed, 16/32-bit bitfield, and 24-bit
//! truecolor bitstreams.
//!
//! One strict linear pass: any read past the end of input is
//! [`ImageError::TruncatedData`], and the first malformed header field
//! aborts the decode. RLE compression is rejected, not skipped.

use enough::Stop;

use super::utils::{expand_sample, mask_shape};
use crate::buffer::{Channels, PixelBuffer};
use crate::error::ImageError;
use crate::limits::{self, Limits};

const BI_RGB: u32 = 0;
const BI_RLE8: u32 = 1;
const BI_RLE4: u32 = 2;
const BI_BITFIELDS: u32 = 3;
const BI_ALPHABITFIELDS: u32 = 6;

// Implicit 5-5-5 layout for 16-bit files without explicit masks.
const DEFAULT_MASKS_16: [u32; 4] = [0x7C00, 0x03E0, 0x001F, 0];

// ── Byte cursor ─────────────────────────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn set_position(&mut self, pos: usize) -> Result<(), ImageError> {
        if pos > self.data.len() {
            return Err(ImageError::TruncatedData);
        }
        self.pos = pos;
        Ok(())
    }

    fn skip(&mut self, n: usize) -> Result<(), ImageError> {
        let new_pos = self.pos.checked_add(n).ok_or(ImageError::TruncatedData)?;
        self.set_position(new_pos)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ImageError> {
        let end = self.pos.checked_add(N).ok_or(ImageError::TruncatedData)?;
        if end > self.data.len() {
            return Err(ImageError::TruncatedData);
        }
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(buf)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ImageError> {
        let end = self
            .pos
            .checked_add(buf.len())
            .ok_or(ImageError::TruncatedData)?;
        if end > self.data.len() {
            return Err(ImageError::TruncatedData);
        }
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(())
    }

    fn get_u16_le(&mut self) -> Result<u16, ImageError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    fn get_u32_le(&mut self) -> Result<u32, ImageError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    fn get_i32_le(&mut self) -> Result<i32, ImageError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }
}

// ── Header ──────────────────────────────────────────────────────────

pub(crate) struct BmpHeader {
    pub width: u32,
    pub height: u32,
    pub depth: u16,
    pub compression: u32,
    /// Positive file height: rows are stored bottom-up (the default).
    pub bottom_up: bool,
    pub pixel_offset: usize,
    pub dib_size: u32,
    /// R, G, B, A bitfield masks (explicit or implicit).
    pub masks: [u32; 4],
    pub colors_used: u32,
}

impl BmpHeader {
    pub(crate) fn output_channels(&self) -> Channels {
        match self.depth {
            1 | 4 | 8 => Channels::Rgba,
            16 | 32 => {
                if self.masks[3] != 0 || self.depth == 32 {
                    Channels::Rgba
                } else {
                    Channels::Rgb
                }
            }
            _ => Channels::Rgb,
        }
    }

    /// Authoritative per-scanline byte count: bits rounded up to whole
    /// bytes, then to the mandatory 4-byte alignment.
    fn row_stride(&self) -> Result<usize, ImageError> {
        let bits = (self.width as usize)
            .checked_mul(usize::from(self.depth))
            .ok_or(ImageError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let bytes = bits.div_ceil(8);
        bytes
            .checked_add(3)
            .map(|b| b & !3)
            .ok_or(ImageError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
    }
}

fn parse_header(cur: &mut Cursor<'_>) -> Result<BmpHeader, ImageError> {
    if &cur.read_array::<2>()? != b"BM" {
        return Err(ImageError::FormatMismatch("BMP"));
    }

    // Remainder of the 14-byte file header: total size, two reserved
    // fields, and the offset of the pixel data.
    let _file_size = cur.get_u32_le()?;
    cur.skip(4)?;
    let pixel_offset = cur.get_u32_le()? as usize;

    let dib_size = cur.get_u32_le()?;
    let (width, height, planes, depth, compression);
    let mut masks = [0u32; 4];
    let mut colors_used = 0u32;

    match dib_size {
        12 => {
            // BITMAPCOREHEADER (OS/2 v1): 16-bit unsigned dimensions,
            // always uncompressed.
            width = i32::from(cur.get_u16_le()?);
            height = i32::from(cur.get_u16_le()?);
            planes = cur.get_u16_le()?;
            depth = cur.get_u16_le()?;
            compression = BI_RGB;
        }
        16 | 40 | 52 | 56 | 64 | 108 | 124 => {
            width = cur.get_i32_le()?;
            height = cur.get_i32_le()?;
            planes = cur.get_u16_le()?;
            depth = cur.get_u16_le()?;
            compression = if dib_size >= 40 { cur.get_u32_le()? } else { BI_RGB };
            if dib_size >= 40 {
                let _image_size = cur.get_u32_le()?;
                cur.skip(4 * 2)?; // x/y pixels-per-meter
                colors_used = cur.get_u32_le()?;
                let _colors_important = cur.get_u32_le()?;
            }
            // Color masks are embedded from BITMAPV2INFOHEADER (52) on,
            // or follow a plain 40-byte header when BI_BITFIELDS is set.
            if dib_size >= 52
                || (compression == BI_BITFIELDS || compression == BI_ALPHABITFIELDS)
            {
                masks[0] = cur.get_u32_le()?;
                masks[1] = cur.get_u32_le()?;
                masks[2] = cur.get_u32_le()?;
            }
            if dib_size >= 56 || compression == BI_ALPHABITFIELDS {
                masks[3] = cur.get_u32_le()?;
            }
            // V4/V5 colorspace, endpoints, gamma, intent, ICC fields are
            // irrelevant here; the palette is located by dib_size below.
        }
        other => {
            return Err(ImageError::CorruptHeader(format!(
                "unknown DIB header size: {other}"
            )));
        }
    }

    if planes != 1 {
        return Err(ImageError::CorruptHeader(format!(
            "planes field is {planes}, expected 1"
        )));
    }
    if width <= 0 || height == 0 {
        return Err(ImageError::CorruptHeader(format!(
            "invalid dimensions {width}x{height}"
        )));
    }

    Ok(BmpHeader {
        width: width as u32,
        height: height.unsigned_abs(),
        depth,
        compression,
        bottom_up: height > 0,
        pixel_offset,
        dib_size,
        masks,
        colors_used,
    })
}

// ── Palette ─────────────────────────────────────────────────────────

/// RGB palette entry; the file's fourth byte is padding, emitted opaque.
#[derive(Clone, Copy, Default)]
struct PaletteEntry {
    red: u8,
    green: u8,
    blue: u8,
}

fn read_palette(cur: &mut Cursor<'_>, header: &BmpHeader) -> Result<Vec<PaletteEntry>, ImageError> {
    let max_colors = 1u32 << header.depth;
    let colors = match header.colors_used {
        0 => max_colors,
        n if n > max_colors => {
            return Err(ImageError::CorruptHeader(format!(
                "palette declares {n} colors, max for {}-bit is {max_colors}",
                header.depth
            )));
        }
        n => n,
    };

    // Palette entries are 4-byte BGRX, except the 12-byte core header's
    // 3-byte BGR. BI_BITFIELDS mask words (after a 40-byte header) sit
    // between the header and the palette.
    let mut palette_offset = 14usize + header.dib_size as usize;
    if header.dib_size == 40 {
        match header.compression {
            BI_BITFIELDS => palette_offset += 12,
            BI_ALPHABITFIELDS => palette_offset += 16,
            _ => {}
        }
    }
    cur.set_position(palette_offset)?;

    let mut palette = Vec::with_capacity(colors as usize);
    for _ in 0..colors {
        let entry = if header.dib_size == 12 {
            let [b, g, r] = cur.read_array::<3>()?;
            PaletteEntry { red: r, green: g, blue: b }
        } else {
            let [b, g, r, _] = cur.read_array::<4>()?;
            PaletteEntry { red: r, green: g, blue: b }
        };
        palette.push(entry);
    }
    Ok(palette)
}

// ── Decode ──────────────────────────────────────────────────────────

/// Probe the header only: `(width, height, output channels)`.
pub(crate) fn probe(data: &[u8]) -> Result<(u32, u32, Channels), ImageError> {
    let header = parse_header(&mut Cursor::new(data))?;
    Ok((header.width, header.height, header.output_channels()))
}

pub(crate) fn decode_pixels(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<PixelBuffer, ImageError> {
    let mut cur = Cursor::new(data);
    let header = parse_header(&mut cur)?;

    match header.compression {
        BI_RGB => {}
        BI_BITFIELDS | BI_ALPHABITFIELDS if matches!(header.depth, 16 | 32) => {}
        BI_RLE4 | BI_RLE8 => {
            return Err(ImageError::UnsupportedVariant(
                "RLE-compressed BMP".into(),
            ));
        }
        other => {
            return Err(ImageError::UnsupportedVariant(format!(
                "BMP compression scheme {other}"
            )));
        }
    }
    if !matches!(header.depth, 1 | 4 | 8 | 16 | 24 | 32) {
        return Err(ImageError::UnsupportedVariant(format!(
            "BMP bit depth {}",
            header.depth
        )));
    }

    let channels = header.output_channels();
    limits::check(limits, header.width, header.height, channels.count())?;

    let palette = if header.depth <= 8 {
        read_palette(&mut cur, &header)?
    } else {
        Vec::new()
    };

    let masks = match (header.depth, header.compression) {
        (16, BI_RGB) => DEFAULT_MASKS_16,
        _ => header.masks,
    };

    let width = header.width as usize;
    let height = header.height as usize;
    let dims_err = || ImageError::InvalidDimensions {
        width: header.width,
        height: header.height,
    };
    let out_stride = width
        .checked_mul(channels.count())
        .ok_or_else(dims_err)?;
    let out_len = out_stride.checked_mul(height).ok_or_else(dims_err)?;

    // The input must hold every scanline; checking up front keeps a
    // fabricated billion-pixel header from allocating anything.
    let in_stride = header.row_stride()?;
    let needed = in_stride.checked_mul(height).ok_or_else(dims_err)?;
    if data.len().saturating_sub(header.pixel_offset) < needed {
        return Err(ImageError::TruncatedData);
    }

    let mut out = vec![0u8; out_len];
    let mut scanline = vec![0u8; in_stride];
    cur.set_position(header.pixel_offset)?;

    for file_row in 0..height {
        if file_row % 16 == 0 {
            stop.check()?;
        }
        cur.read_exact(&mut scanline)?;
        // Bottom-up files fill the output from the last row backwards.
        let dest_row = if header.bottom_up {
            height - 1 - file_row
        } else {
            file_row
        };
        let out_row = &mut out[dest_row * out_stride..][..out_stride];

        match header.depth {
            1 | 4 | 8 => decode_indexed_row(&scanline, out_row, &header, &palette)?,
            16 => decode_masked_row::<2>(&scanline, out_row, channels, &masks),
            24 => decode_bgr_row(&scanline, out_row),
            32 if header.compression == BI_RGB => decode_bgra_row(&scanline, out_row),
            32 => decode_masked_row::<4>(&scanline, out_row, channels, &masks),
            _ => unreachable!("depth validated above"),
        }
    }

    PixelBuffer::from_vec(out, header.width, header.height, channels)
}

/// Palette lookup for packed 1/4/8-bit indices, MSB-first within a byte.
fn decode_indexed_row(
    scanline: &[u8],
    out_row: &mut [u8],
    header: &BmpHeader,
    palette: &[PaletteEntry],
) -> Result<(), ImageError> {
    let bpp = usize::from(header.depth);
    let index_mask = (1u16 << bpp) - 1;

    for (x, px) in out_row.chunks_exact_mut(4).enumerate() {
        let bit_pos = x * bpp;
        let byte = scanline[bit_pos / 8];
        let shift = 8 - bpp - (bit_pos % 8);
        let index = usize::from((u16::from(byte) >> shift) & index_mask);

        let entry = palette.get(index).ok_or_else(|| {
            ImageError::CorruptData(format!(
                "palette index {index} out of range (palette has {} entries)",
                palette.len()
            ))
        })?;
        px[0] = entry.red;
        px[1] = entry.green;
        px[2] = entry.blue;
        px[3] = 255;
    }
    Ok(())
}

fn decode_bgr_row(scanline: &[u8], out_row: &mut [u8]) {
    for (src, dst) in scanline.chunks_exact(3).zip(out_row.chunks_exact_mut(3)) {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
    }
}

fn decode_bgra_row(scanline: &[u8], out_row: &mut [u8]) {
    for (src, dst) in scanline.chunks_exact(4).zip(out_row.chunks_exact_mut(4)) {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
        dst[3] = src[3];
    }
}

/// Bitfield extraction for packed 16- or 32-bit words (`WORD` bytes each).
fn decode_masked_row<const WORD: usize>(
    scanline: &[u8],
    out_row: &mut [u8],
    channels: Channels,
    masks: &[u32; 4],
) {
    let shapes = masks.map(mask_shape);

    for (src, dst) in scanline
        .chunks_exact(WORD)
        .zip(out_row.chunks_exact_mut(channels.count()))
    {
        let v = match WORD {
            2 => u32::from(u16::from_le_bytes([src[0], src[1]])),
            _ => u32::from_le_bytes([src[0], src[1], src[2], src[3]]),
        };
        dst[0] = expand_sample(v, shapes[0]);
        dst[1] = expand_sample(v, shapes[1]);
        dst[2] = expand_sample(v, shapes[2]);
        if channels == Channels::Rgba {
            dst[3] = if masks[3] == 0 {
                255
            } else {
                expand_sample(v, shapes[3])
            };
        }
    }
}
