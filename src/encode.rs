use alloc::borrow::Cow;
use alloc::vec::Vec;

use enough::Stop;

use crate::bitmap::Bitmap;
use crate::error::BitmapError;
use crate::pixel::BitDepth;

/// Options for encoding a [`Bitmap`] as a BMP file.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct EncodeRequest<'a> {
    bitmap: &'a Bitmap,
    depth: Option<BitDepth>,
}

impl<'a> EncodeRequest<'a> {
    pub fn new(bitmap: &'a Bitmap) -> Self {
        Self {
            bitmap,
            depth: None,
        }
    }

    /// Write at `depth` instead of the bitmap's own depth. Indexed depths are
    /// quantized against the standard palette; the bitmap is not modified.
    pub fn with_bit_depth(mut self, depth: BitDepth) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn encode(self, stop: impl Stop) -> Result<Vec<u8>, BitmapError> {
        let bitmap = match self.depth {
            Some(depth) if depth != self.bitmap.bit_depth() => {
                let mut converted = self.bitmap.clone();
                converted.convert_bit_depth(depth);
                Cow::Owned(converted)
            }
            _ => Cow::Borrowed(self.bitmap),
        };
        crate::bmp::encode_bitmap(&bitmap, &stop)
    }

    /// Encode and write the whole file to `writer`.
    #[cfg(feature = "std")]
    pub fn encode_to<W: std::io::Write>(
        self,
        mut writer: W,
        stop: impl Stop,
    ) -> Result<(), BitmapError> {
        let data = self.encode(stop)?;
        writer.write_all(&data)?;
        writer.flush()?;
        Ok(())
    }
}

/// Encode `bitmap` at its own depth.
pub fn encode(bitmap: &Bitmap, stop: impl Stop) -> Result<Vec<u8>, BitmapError> {
    EncodeRequest::new(bitmap).encode(stop)
}

/// Encode `bitmap` and write it to `writer`.
#[cfg(feature = "std")]
pub fn encode_writer<W: std::io::Write>(
    bitmap: &Bitmap,
    writer: W,
    stop: impl Stop,
) -> Result<(), BitmapError> {
    EncodeRequest::new(bitmap).encode_to(writer, stop)
}

impl Bitmap {
    /// Encode and write to `path`, creating or truncating the file.
    ///
    /// Nothing is written if encoding fails.
    #[cfg(feature = "std")]
    pub fn write_to_file(
        &self,
        path: impl AsRef<std::path::Path>,
        stop: impl Stop,
    ) -> Result<(), BitmapError> {
        let data = encode(self, stop)?;
        std::fs::write(path.as_ref(), data).map_err(|err| {
            log::warn!("cannot write {}: {err}", path.as_ref().display());
            BitmapError::from(err)
        })
    }
}
