//! PNM decoder: the six Netpbm variants, ASCII and binary.

use enough::Stop;

use super::PnmFormat;
use crate::buffer::PixelBuffer;
use crate::error::ImageError;
use crate::limits::{self, Limits};

/// Header tokenizer: whitespace-delimited integers with `#` comments
/// skipped anywhere between tokens.
struct Tokenizer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'#' {
                while let Some(&c) = self.data.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn next_u32(&mut self) -> Result<u32, ImageError> {
        self.skip_separators();
        let start = self.pos;
        while self
            .data
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_digit())
        {
            self.pos += 1;
        }
        if self.pos == start {
            return match self.data.get(self.pos) {
                None => Err(ImageError::TruncatedData),
                Some(&b) => Err(ImageError::CorruptHeader(format!(
                    "expected integer, found byte {b:#04x}"
                ))),
            };
        }
        let token = &self.data[start..self.pos];
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ImageError::CorruptHeader("integer token out of range".into()))
    }

    /// One `0`/`1` digit for P1 data; whitespace between digits is
    /// optional, so this does not read full tokens.
    fn next_bit(&mut self) -> Result<u8, ImageError> {
        self.skip_separators();
        match self.data.get(self.pos) {
            Some(&b @ (b'0' | b'1')) => {
                self.pos += 1;
                Ok(b - b'0')
            }
            Some(&b) => Err(ImageError::CorruptData(format!(
                "expected bitmap digit, found byte {b:#04x}"
            ))),
            None => Err(ImageError::TruncatedData),
        }
    }

    /// Consume the single whitespace byte separating the header from
    /// binary sample data.
    fn expect_data_separator(&mut self) -> Result<usize, ImageError> {
        match self.data.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => Ok(self.pos + 1),
            Some(&b) => Err(ImageError::CorruptHeader(format!(
                "expected whitespace before sample data, found byte {b:#04x}"
            ))),
            None => Err(ImageError::TruncatedData),
        }
    }
}

pub(crate) fn decode_pnm(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<PixelBuffer, ImageError> {
    let format = parse_magic(data)?;
    let mut tok = Tokenizer::new(data, 2);

    let width = tok.next_u32()?;
    let height = tok.next_u32()?;
    // Bitmap variants carry no maxval field; samples are single bits.
    let maxval = if format.has_maxval() { tok.next_u32()? } else { 1 };

    if width == 0 || height == 0 {
        return Err(ImageError::CorruptHeader(format!(
            "invalid dimensions {width}x{height}"
        )));
    }
    if maxval == 0 || maxval > 65535 {
        return Err(ImageError::CorruptHeader(format!(
            "max sample value {maxval} outside 1-65535"
        )));
    }

    let channels = format.channels();
    limits::check(limits, width, height, channels.count())?;
    stop.check()?;

    let sample_count = width as usize * height as usize * channels.count();
    let mut out = Vec::with_capacity(sample_count);

    match format {
        PnmFormat::PbmPlain => {
            for i in 0..sample_count {
                if i % 4096 == 0 {
                    stop.check()?;
                }
                // Historical polarity: a set bit is ink, i.e. black.
                out.push(if tok.next_bit()? == 1 { 0x00 } else { 0xFF });
            }
        }
        PnmFormat::PgmPlain | PnmFormat::PpmPlain => {
            for i in 0..sample_count {
                if i % 4096 == 0 {
                    stop.check()?;
                }
                let sample = tok.next_u32()?;
                out.push(rescale(sample, maxval)?);
            }
        }
        PnmFormat::PbmRaw => {
            let data_start = tok.expect_data_separator()?;
            let stride = (width as usize).div_ceil(8);
            let rows = data
                .get(data_start..)
                .filter(|rest| rest.len() >= stride * height as usize)
                .ok_or(ImageError::TruncatedData)?;
            for (y, row) in rows.chunks_exact(stride).take(height as usize).enumerate() {
                if y % 16 == 0 {
                    stop.check()?;
                }
                for x in 0..width as usize {
                    let bit = (row[x / 8] >> (7 - x % 8)) & 1;
                    out.push(if bit == 1 { 0x00 } else { 0xFF });
                }
            }
        }
        PnmFormat::PgmRaw | PnmFormat::PpmRaw => {
            let data_start = tok.expect_data_separator()?;
            let wide = maxval > 255;
            let bytes_per_sample = if wide { 2 } else { 1 };
            let samples = data
                .get(data_start..)
                .filter(|rest| rest.len() >= sample_count * bytes_per_sample)
                .ok_or(ImageError::TruncatedData)?;
            if wide {
                for (i, pair) in samples.chunks_exact(2).take(sample_count).enumerate() {
                    if i % 4096 == 0 {
                        stop.check()?;
                    }
                    // 16-bit samples are stored big-endian.
                    let sample = u32::from(u16::from_be_bytes([pair[0], pair[1]]));
                    out.push(rescale(sample, maxval)?);
                }
            } else if maxval == 255 {
                out.extend_from_slice(&samples[..sample_count]);
            } else {
                for (i, &b) in samples[..sample_count].iter().enumerate() {
                    if i % 4096 == 0 {
                        stop.check()?;
                    }
                    out.push(rescale(u32::from(b), maxval)?);
                }
            }
        }
    }

    PixelBuffer::from_vec(out, width, height, channels)
}

pub(crate) fn parse_magic(data: &[u8]) -> Result<PnmFormat, ImageError> {
    if data.first() != Some(&b'P') {
        return Err(ImageError::FormatMismatch("PNM"));
    }
    match data.get(1) {
        Some(b'1') => Ok(PnmFormat::PbmPlain),
        Some(b'2') => Ok(PnmFormat::PgmPlain),
        Some(b'3') => Ok(PnmFormat::PpmPlain),
        Some(b'4') => Ok(PnmFormat::PbmRaw),
        Some(b'5') => Ok(PnmFormat::PgmRaw),
        Some(b'6') => Ok(PnmFormat::PpmRaw),
        Some(&d) => Err(ImageError::UnsupportedVariant(format!(
            "PNM sub-format P{}",
            char::from(d)
        ))),
        None => Err(ImageError::TruncatedData),
    }
}

/// Map a sample to the canonical 0-255 range.
fn rescale(sample: u32, maxval: u32) -> Result<u8, ImageError> {
    if sample > maxval {
        return Err(ImageError::CorruptData(format!(
            "sample {sample} exceeds declared maximum {maxval}"
        )));
    }
    if maxval == 255 {
        Ok(sample as u8)
    } else {
        Ok((255 * sample / maxval) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Channels;
    use enough::Unstoppable;

    #[test]
    fn p1_ascii_bitmap_with_comment() {
        let data = b"P1\n# a comment\n2 2\n1 0\n0 1\n";
        let img = decode_pnm(data, None, &Unstoppable).unwrap();
        assert_eq!(img.channels(), Channels::Gray);
        assert_eq!(img.pixels(), &[0x00, 0xFF, 0xFF, 0x00]);
    }

    #[test]
    fn p1_digits_need_no_separators() {
        let data = b"P1 2 2 1001";
        let img = decode_pnm(data, None, &Unstoppable).unwrap();
        assert_eq!(img.pixels(), &[0x00, 0xFF, 0xFF, 0x00]);
    }

    #[test]
    fn p4_packed_bitmap() {
        // 2 rows of 3 pixels: 0b101, 0b010; one byte per row.
        let data = b"P4\n3 2\n\xA0\x40";
        let img = decode_pnm(data, None, &Unstoppable).unwrap();
        assert_eq!(
            img.pixels(),
            &[0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF]
        );
    }

    #[test]
    fn p2_rescales_to_255() {
        let data = b"P2\n2 1\n15\n15 0\n";
        let img = decode_pnm(data, None, &Unstoppable).unwrap();
        assert_eq!(img.pixels(), &[255, 0]);
    }

    #[test]
    fn p5_low_maxval_rescales() {
        let data = b"P5\n2 1\n15\n\x0F\x00";
        let img = decode_pnm(data, None, &Unstoppable).unwrap();
        assert_eq!(img.pixels(), &[255, 0]);
    }

    #[test]
    fn p5_sixteen_bit_big_endian() {
        let data = b"P5\n1 1\n65535\n\xFF\xFF";
        let img = decode_pnm(data, None, &Unstoppable).unwrap();
        assert_eq!(img.pixels(), &[255]);

        let data = b"P5\n1 1\n65535\n\x80\x00";
        let img = decode_pnm(data, None, &Unstoppable).unwrap();
        assert_eq!(img.pixels(), &[127]);
    }

    #[test]
    fn p6_maxval_255_is_a_straight_copy() {
        let data = b"P6 2 1 255\n\x01\x02\x03\x04\x05\x06";
        let img = decode_pnm(data, None, &Unstoppable).unwrap();
        assert_eq!(img.channels(), Channels::Rgb);
        assert_eq!(img.pixels(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn sample_above_maxval_is_corrupt() {
        let err = decode_pnm(b"P2\n1 1\n10\n11\n", None, &Unstoppable).unwrap_err();
        assert!(matches!(err, ImageError::CorruptData(_)));
    }

    #[test]
    fn zero_dimension_is_corrupt() {
        let err = decode_pnm(b"P6 0 4 255\n", None, &Unstoppable).unwrap_err();
        assert!(matches!(err, ImageError::CorruptHeader(_)));
    }

    #[test]
    fn non_digit_header_token_is_corrupt() {
        let err = decode_pnm(b"P6 two 2 255\n", None, &Unstoppable).unwrap_err();
        assert!(matches!(err, ImageError::CorruptHeader(_)));
    }

    #[test]
    fn truncated_binary_data() {
        let err = decode_pnm(b"P6 2 2 255\n\x01\x02", None, &Unstoppable).unwrap_err();
        assert!(matches!(err, ImageError::TruncatedData));
    }

    #[test]
    fn p7_is_unsupported_not_corrupt() {
        let err = decode_pnm(b"P7\nWIDTH 1\n", None, &Unstoppable).unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedVariant(_)));
    }

    #[test]
    fn non_pnm_is_a_format_mismatch() {
        let err = decode_pnm(b"BM", None, &Unstoppable).unwrap_err();
        assert!(matches!(err, ImageError::FormatMismatch("PNM")));
    }
}
