use enough::StopReason;

/// Errors from loading, saving, decoding, encoding, or reshaping images.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ImageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither the magic bytes nor the filename identify a supported format.
    #[error("unrecognized image format")]
    UnknownFormat,

    /// The requested codec was handed data that fails its signature check.
    #[error("not a {0} bitstream")]
    FormatMismatch(&'static str),

    /// Valid but unhandled sub-kind (RLE compression, odd bit depth, ...).
    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    #[error("corrupt pixel data: {0}")]
    CorruptData(String),

    #[error("unexpected end of input")]
    TruncatedData,

    /// Reshape target outside the 1-4 channel range.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannelCount(u32),

    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// A PNG/JPEG collaborator library reported a structural defect.
    #[error("codec failure: {0}")]
    CodecFailure(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for ImageError {
    fn from(r: StopReason) -> Self {
        ImageError::Cancelled(r)
    }
}

impl From<::png::DecodingError> for ImageError {
    fn from(e: ::png::DecodingError) -> Self {
        match e {
            ::png::DecodingError::IoError(io) => ImageError::Io(io),
            other => ImageError::CodecFailure(other.to_string()),
        }
    }
}

impl From<::png::EncodingError> for ImageError {
    fn from(e: ::png::EncodingError) -> Self {
        match e {
            ::png::EncodingError::IoError(io) => ImageError::Io(io),
            other => ImageError::CodecFailure(other.to_string()),
        }
    }
}

impl From<image::ImageError> for ImageError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => ImageError::Io(io),
            other => ImageError::CodecFailure(other.to_string()),
        }
    }
}
