use core::fmt;
use std::path::Path;

/// How many leading bytes the sniffer needs to see.
pub const MAGIC_LEN: usize = 8;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Image format, detected from filename extension and/or magic bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Unknown,
    Png,
    Jpeg,
    Pnm,
    Bmp,
}

impl ImageFormat {
    /// Classify from the filename extension alone (case-insensitive).
    ///
    /// This is the rule used when saving: there is no file content to
    /// sniff yet, so the extension is authoritative.
    pub fn from_extension(path: &Path) -> ImageFormat {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return ImageFormat::Unknown;
        };
        match ext.to_ascii_lowercase().as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "bmp" => ImageFormat::Bmp,
            "pnm" | "ppm" | "pgm" | "pbm" => ImageFormat::Pnm,
            _ => ImageFormat::Unknown,
        }
    }

    /// Classify from the first bytes of the file content.
    pub fn from_magic(header: &[u8]) -> ImageFormat {
        if header.len() >= 8 && header[..8] == PNG_MAGIC {
            ImageFormat::Png
        } else if header.len() >= 3 && header[..3] == [0xFF, 0xD8, 0xFF] {
            ImageFormat::Jpeg
        } else if header.len() >= 2 && &header[..2] == b"BM" {
            ImageFormat::Bmp
        } else if header.len() >= 3
            && header[0] == b'P'
            && (b'1'..=b'6').contains(&header[1])
            && header[2].is_ascii_whitespace()
        {
            ImageFormat::Pnm
        } else {
            ImageFormat::Unknown
        }
    }

    /// Cross-check extension against magic bytes.
    ///
    /// When both agree, the answer is trivially that tag. When they
    /// disagree the magic bytes win: filenames are user-controlled and
    /// routinely wrong, file contents rarely lie. A file whose content
    /// matches no signature classifies as [`ImageFormat::Unknown`]
    /// regardless of its name.
    pub fn classify(path: &Path, header: &[u8]) -> ImageFormat {
        let named = ImageFormat::from_extension(path);
        let sniffed = ImageFormat::from_magic(header);
        if named == sniffed { named } else { sniffed }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageFormat::Unknown => "Unknown",
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Pnm => "PNM",
            ImageFormat::Bmp => "BMP",
        })
    }
}
