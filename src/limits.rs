/// Resource limits for decoding untrusted files.
///
/// All fields default to `None` (no limit). Limits are checked after a
/// codec has parsed the header and before the output buffer is allocated.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for the decoded output buffer.
    pub max_output_bytes: Option<u64>,
}

impl Limits {
    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> Result<(), crate::ImageError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(crate::ImageError::LimitExceeded(format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(crate::ImageError::LimitExceeded(format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(crate::ImageError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn check_output_size(&self, bytes: usize) -> Result<(), crate::ImageError> {
        if let Some(max) = self.max_output_bytes {
            if bytes as u64 > max {
                return Err(crate::ImageError::LimitExceeded(format!(
                    "output buffer of {bytes} bytes exceeds limit {max}"
                )));
            }
        }
        Ok(())
    }
}

/// Check header-declared dimensions and the resulting allocation size.
pub(crate) fn check(
    limits: Option<&Limits>,
    width: u32,
    height: u32,
    channels: usize,
) -> Result<(), crate::ImageError> {
    if let Some(limits) = limits {
        limits.check_dimensions(width, height)?;
        let bytes = width as usize * height as usize * channels;
        limits.check_output_size(bytes)?;
    }
    Ok(())
}
