use enough::Stop;

use crate::bitmap::{Bitmap, Reporting};
use crate::error::BitmapError;
use crate::limits::Limits;

/// Options for decoding one BMP file held in memory.
///
/// ```no_run
/// use zenbmp::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your BMP bytes
/// let limits = Limits { max_pixels: Some(1 << 24), ..Limits::default() };
/// let bitmap = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// # Ok::<(), zenbmp::BitmapError>(())
/// ```
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    reporting: Reporting,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            reporting: Reporting::Strict,
        }
    }

    /// Reject images exceeding `limits` before any pixel memory is allocated.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Reporting mode given to the decoded bitmap.
    pub fn with_reporting(mut self, reporting: Reporting) -> Self {
        self.reporting = reporting;
        self
    }

    pub fn decode(self, stop: impl Stop) -> Result<Bitmap, BitmapError> {
        crate::bmp::decode_bitmap(self.data, self.limits, self.reporting, &stop)
    }
}

/// Decode a BMP file held in memory with default options.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<Bitmap, BitmapError> {
    DecodeRequest::new(data).decode(stop)
}

/// Read a whole BMP stream and decode it.
#[cfg(feature = "std")]
pub fn decode_reader<R: std::io::Read>(
    mut reader: R,
    stop: impl Stop,
) -> Result<Bitmap, BitmapError> {
    let mut data = alloc::vec::Vec::new();
    reader.read_to_end(&mut data)?;
    decode(&data, stop)
}

impl Bitmap {
    /// Replace this bitmap with the image decoded from `data`, keeping the
    /// current reporting mode.
    ///
    /// On failure the bitmap is left as a 1×1, 1-bit placeholder and the
    /// error is returned.
    pub fn read_from_bytes(&mut self, data: &[u8], stop: impl Stop) -> Result<(), BitmapError> {
        let result = DecodeRequest::new(data)
            .with_reporting(self.reporting())
            .decode(stop);
        self.replace_or_reset(result)
    }

    /// [`read_from_bytes`](Self::read_from_bytes) on the contents of a file.
    #[cfg(feature = "std")]
    pub fn read_from_file(
        &mut self,
        path: impl AsRef<std::path::Path>,
        stop: impl Stop,
    ) -> Result<(), BitmapError> {
        match std::fs::read(path.as_ref()) {
            Ok(data) => self.read_from_bytes(&data, stop),
            Err(err) => {
                log::warn!("cannot open {}: {err}", path.as_ref().display());
                self.reset_to_placeholder();
                Err(err.into())
            }
        }
    }

    fn replace_or_reset(&mut self, result: Result<Bitmap, BitmapError>) -> Result<(), BitmapError> {
        match result {
            Ok(bitmap) => {
                *self = bitmap;
                Ok(())
            }
            Err(err) => {
                log::warn!("bmp read failed: {err}");
                self.reset_to_placeholder();
                Err(err)
            }
        }
    }
}
