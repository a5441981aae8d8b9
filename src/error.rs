use alloc::string::String;
use enough::StopReason;

/// Errors from BMP decoding, encoding and bitmap manipulation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    /// Reading from or writing to the byte source failed.
    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a Windows BMP file (bad signature)")]
    UnrecognizedFormat,

    #[error("unsupported BMP variant: {0}")]
    UnsupportedFormat(String),

    /// Compression code 1 (RLE8) or 2 (RLE4).
    #[error("run-length encoded BMP (compression {0}) is not supported")]
    UnsupportedCompression(u32),

    #[error("unsupported bit depth {0} (expected 1, 4, 8, 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("corrupt pixel data: {0}")]
    DataCorruption(String),

    #[error("pixel ({x}, {y}) is outside a {width}x{height} image")]
    PixelOutOfRange {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("color index {index} is outside the palette range [0, {len})")]
    ColorIndexOutOfRange { index: usize, len: usize },

    #[error("a {depth}-bit image has no color table")]
    NoColorTable { depth: u16 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The image does not fit the fixed-width fields of the BMP headers.
    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u64, height: u64 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

/// Coarse classification of a [`BitmapError`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Open/read/write failure at the byte-source boundary.
    Io,
    /// Bad signature, unsupported compression, unrecognized bit depth,
    /// non-positive width.
    UnsupportedFormat,
    /// Fewer bytes available than the headers declare.
    DataCorruption,
    /// Pixel coordinate, palette index or argument outside valid bounds.
    OutOfRange,
    /// Values that do not fit the format's fixed-width fields.
    Configuration,
    LimitExceeded,
    Cancelled,
}

impl BitmapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "std")]
            Self::Io(_) => ErrorKind::Io,
            Self::UnrecognizedFormat
            | Self::UnsupportedFormat(_)
            | Self::UnsupportedCompression(_)
            | Self::UnsupportedBitDepth(_) => ErrorKind::UnsupportedFormat,
            Self::UnexpectedEof | Self::DataCorruption(_) => ErrorKind::DataCorruption,
            Self::PixelOutOfRange { .. }
            | Self::ColorIndexOutOfRange { .. }
            | Self::NoColorTable { .. }
            | Self::InvalidArgument(_) => ErrorKind::OutOfRange,
            Self::DimensionsTooLarge { .. } => ErrorKind::Configuration,
            Self::LimitExceeded(_) => ErrorKind::LimitExceeded,
            Self::Cancelled(_) => ErrorKind::Cancelled,
        }
    }
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}
