use crate::bitmap::ppm_to_dpi;
use crate::bmp::{BitMasks, Compression, Cursor, FileHeader, Headers, InfoHeader};
use crate::error::BitmapError;
use crate::pixel::BitDepth;

/// Header summary of a BMP file, read without decoding any pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapInfo {
    pub file_header: FileHeader,
    pub info_header: InfoHeader,
    /// Channel masks of a bit-field 16-bit file, when present.
    pub masks: Option<BitMasks>,
}

impl BitmapInfo {
    /// Parse the file and info headers. Only the signature is checked; call
    /// [`check_supported`](Self::check_supported) to apply the decoder's rules.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BitmapError> {
        let mut cursor = Cursor::new(data);
        let Headers { file, info } = Headers::read(&mut cursor)?;
        let masks = if info.compression_kind() == Compression::Bitfields {
            cursor.set_position(crate::bmp::HEADERS_SIZE)?;
            let mut read = || -> Result<u16, BitmapError> {
                let mask = cursor.read_u32_le()?;
                Ok(mask as u16)
            };
            Some(BitMasks {
                red: read()?,
                green: read()?,
                blue: read()?,
            })
        } else {
            None
        };
        Ok(Self {
            file_header: file,
            info_header: info,
            masks,
        })
    }

    /// Whether [`decode`](crate::decode) would accept these headers.
    pub fn check_supported(&self) -> Result<(), BitmapError> {
        Headers {
            file: self.file_header,
            info: self.info_header,
        }
        .validate()
        .map(|_| ())
    }

    pub fn width(&self) -> i32 {
        self.info_header.width
    }

    /// Negative for top-down files.
    pub fn height(&self) -> i32 {
        self.info_header.height
    }

    pub fn bit_depth(&self) -> Option<BitDepth> {
        BitDepth::from_bits(self.info_header.bit_count)
    }

    pub fn compression(&self) -> Compression {
        self.info_header.compression_kind()
    }

    pub fn horizontal_dpi(&self) -> i32 {
        ppm_to_dpi(self.info_header.x_pels_per_meter)
    }

    pub fn vertical_dpi(&self) -> i32 {
        ppm_to_dpi(self.info_header.y_pels_per_meter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::error::ErrorKind;
    use enough::Unstoppable;

    #[test]
    fn probe_reports_header_fields() {
        let mut b = Bitmap::with_size(5, -3, BitDepth::Sixteen).unwrap();
        b.set_dpi(300, 300);
        let data = crate::encode(&b, Unstoppable).unwrap();
        let info = BitmapInfo::from_bytes(&data).unwrap();
        assert_eq!((info.width(), info.height()), (5, -3));
        assert_eq!(info.bit_depth(), Some(BitDepth::Sixteen));
        assert_eq!(info.compression(), Compression::Bitfields);
        assert_eq!(info.masks, Some(BitMasks::RGB555));
        assert_eq!(info.horizontal_dpi(), 299);
        assert_eq!(info.file_header.data_offset, 66);
        info.check_supported().unwrap();
    }

    #[test]
    fn probe_accepts_what_decode_rejects() {
        let b = Bitmap::with_size(2, 2, BitDepth::Eight).unwrap();
        let mut data = crate::encode(&b, Unstoppable).unwrap();
        data[30] = 1; // RLE8
        let info = BitmapInfo::from_bytes(&data).unwrap();
        assert_eq!(info.compression(), Compression::Rle8);
        assert_eq!(info.masks, None);
        assert!(matches!(
            info.check_supported(),
            Err(BitmapError::UnsupportedCompression(1))
        ));
    }

    #[test]
    fn probe_rejects_other_formats() {
        let err = BitmapInfo::from_bytes(b"\x89PNG\r\n\x1a\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }
}
