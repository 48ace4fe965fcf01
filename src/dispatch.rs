//! Format-dispatching load and save entry points.
//!
//! Loading reads the whole file, sniffs the leading bytes, and routes
//! to the matching codec; the file's magic number wins over its
//! extension when the two disagree. Saving trusts the extension alone,
//! since a fresh file has no content to sniff.

use std::path::Path;

use enough::{Stop, Unstoppable};
use tracing::{debug, warn};

use crate::buffer::PixelBuffer;
use crate::error::ImageError;
use crate::format::{ImageFormat, MAGIC_LEN};
use crate::jpeg::DEFAULT_JPEG_QUALITY;
use crate::limits::Limits;
use crate::{bmp, jpeg, pnm};

/// Knobs for [`save_with`].
#[derive(Clone, Debug)]
pub struct SaveOptions {
    /// JPEG encoder quality, 1-100. Ignored by the other formats.
    pub jpeg_quality: u8,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { jpeg_quality: DEFAULT_JPEG_QUALITY }
    }
}

/// Load an image file, auto-detecting its format. Returns the decoded
/// buffer together with the format the sniffer settled on.
pub fn load(path: impl AsRef<Path>) -> Result<(PixelBuffer, ImageFormat), ImageError> {
    load_with(path, None, &Unstoppable)
}

/// [`load`] with resource limits and cancellation.
pub fn load_with(
    path: impl AsRef<Path>,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<(PixelBuffer, ImageFormat), ImageError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;

    let head = data.get(..MAGIC_LEN).unwrap_or(&data);
    let format = ImageFormat::classify(path, head);
    debug!(
        path = %path.display(),
        %format,
        extension = %ImageFormat::from_extension(path),
        "classified input"
    );

    let decoded = match format {
        ImageFormat::Bmp => bmp::decode(&data, limits, stop),
        ImageFormat::Pnm => pnm::decode(&data, limits, stop),
        ImageFormat::Png => crate::png::decode(&data, limits, stop),
        ImageFormat::Jpeg => jpeg::decode(&data, limits, stop),
        ImageFormat::Unknown => Err(ImageError::UnknownFormat),
    };
    match decoded {
        Ok(image) => Ok((image, format)),
        Err(err) => {
            warn!(path = %path.display(), %format, %err, "decode failed");
            Err(err)
        }
    }
}

/// Save an image, picking the codec from the path's extension.
pub fn save(path: impl AsRef<Path>, image: &PixelBuffer) -> Result<(), ImageError> {
    save_with(path, image, &SaveOptions::default(), &Unstoppable)
}

/// [`save`] with encoder options and cancellation.
pub fn save_with(
    path: impl AsRef<Path>,
    image: &PixelBuffer,
    options: &SaveOptions,
    stop: &dyn Stop,
) -> Result<(), ImageError> {
    let path = path.as_ref();
    let format = ImageFormat::from_extension(path);
    debug!(path = %path.display(), %format, channels = %image.channels(), "saving");

    let bytes = match format {
        ImageFormat::Bmp => bmp::encode(image, stop)?,
        ImageFormat::Pnm => pnm::encode(image, stop)?,
        ImageFormat::Png => crate::png::encode(image, stop)?,
        ImageFormat::Jpeg => jpeg::encode(image, options.jpeg_quality, stop)?,
        ImageFormat::Unknown => return Err(ImageError::UnknownFormat),
    };
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_full_jpeg_quality() {
        assert_eq!(SaveOptions::default().jpeg_quality, 100);
    }
}
