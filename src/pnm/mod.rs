//! Netpbm (PBM/PGM/PPM) support.
//!
//! All six classic sub-formats decode: the ASCII variants P1-P3 and
//! the binary variants P4-P6, including 16-bit big-endian samples and
//! non-255 maxval rescaling. Encoding always produces binary P6.

mod decode;
mod encode;

use enough::Stop;

use crate::buffer::PixelBuffer;
use crate::error::ImageError;
use crate::limits::Limits;

/// The Netpbm sub-format, as named by the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnmFormat {
    /// `P1`, ASCII bitmap.
    PbmPlain,
    /// `P2`, ASCII graymap.
    PgmPlain,
    /// `P3`, ASCII pixmap.
    PpmPlain,
    /// `P4`, binary bitmap.
    PbmRaw,
    /// `P5`, binary graymap.
    PgmRaw,
    /// `P6`, binary pixmap.
    PpmRaw,
}

impl PnmFormat {
    pub(crate) fn channels(self) -> crate::buffer::Channels {
        match self {
            Self::PpmPlain | Self::PpmRaw => crate::buffer::Channels::Rgb,
            _ => crate::buffer::Channels::Gray,
        }
    }

    pub(crate) fn has_maxval(self) -> bool {
        !matches!(self, Self::PbmPlain | Self::PbmRaw)
    }
}

/// Identify the sub-format without decoding sample data.
pub fn probe(data: &[u8]) -> Result<PnmFormat, ImageError> {
    decode::parse_magic(data)
}

/// Decode any PNM variant into an in-memory buffer. Bitmap and
/// graymap variants produce [`Channels::Gray`](crate::Channels::Gray)
/// output, pixmaps produce RGB.
pub fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<PixelBuffer, ImageError> {
    decode::decode_pnm(data, limits, stop)
}

/// Encode as binary P6 with maxval 255.
pub fn encode(image: &PixelBuffer, stop: &dyn Stop) -> Result<Vec<u8>, ImageError> {
    encode::encode_pnm(image, stop)
}
