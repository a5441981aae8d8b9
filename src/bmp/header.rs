//! BITMAPFILEHEADER and BITMAPINFOHEADER, read and written little-endian.

use alloc::format;
use alloc::vec::Vec;

use super::cursor::Cursor;
use crate::error::BitmapError;
use crate::pixel::BitDepth;

/// `"BM"` read as a little-endian `u16`.
pub const SIGNATURE: u16 = 0x4D42;

/// Bytes in the file header plus a 40-byte info header.
pub const HEADERS_SIZE: usize = FileHeader::SIZE + InfoHeader::SIZE;

/// The 14-byte file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileHeader {
    pub signature: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Absolute byte offset of the first pixel row.
    pub data_offset: u32,
}

impl FileHeader {
    pub const SIZE: usize = 14;

    /// Read the file header, failing on a bad signature before anything else.
    pub(crate) fn read(cursor: &mut Cursor<'_>) -> Result<Self, BitmapError> {
        let signature = cursor.read_u16_le()?;
        if signature != SIGNATURE {
            return Err(BitmapError::UnrecognizedFormat);
        }
        Ok(Self {
            signature,
            file_size: cursor.read_u32_le()?,
            reserved1: cursor.read_u16_le()?,
            reserved2: cursor.read_u16_le()?,
            data_offset: cursor.read_u32_le()?,
        })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.signature.to_le_bytes());
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&self.reserved1.to_le_bytes());
        out.extend_from_slice(&self.reserved2.to_le_bytes());
        out.extend_from_slice(&self.data_offset.to_le_bytes());
    }
}

/// Compression field of the info header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compression {
    Rgb,
    Rle8,
    Rle4,
    Bitfields,
    Unknown(u32),
}

impl Compression {
    pub const fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Rgb,
            1 => Self::Rle8,
            2 => Self::Rle4,
            3 => Self::Bitfields,
            other => Self::Unknown(other),
        }
    }

    pub const fn to_u32(self) -> u32 {
        match self {
            Self::Rgb => 0,
            Self::Rle8 => 1,
            Self::Rle4 => 2,
            Self::Bitfields => 3,
            Self::Unknown(other) => other,
        }
    }
}

/// The 40-byte info header. Larger (V4/V5) headers are accepted; only their
/// first 40 bytes are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InfoHeader {
    pub header_size: u32,
    /// Negative when columns are stored right-to-left.
    pub width: i32,
    /// Negative when rows are stored top-to-bottom.
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl InfoHeader {
    pub const SIZE: usize = 40;

    pub(crate) fn read(cursor: &mut Cursor<'_>) -> Result<Self, BitmapError> {
        Ok(Self {
            header_size: cursor.read_u32_le()?,
            width: cursor.read_i32_le()?,
            height: cursor.read_i32_le()?,
            planes: cursor.read_u16_le()?,
            bit_count: cursor.read_u16_le()?,
            compression: cursor.read_u32_le()?,
            image_size: cursor.read_u32_le()?,
            x_pels_per_meter: cursor.read_i32_le()?,
            y_pels_per_meter: cursor.read_i32_le()?,
            colors_used: cursor.read_u32_le()?,
            colors_important: cursor.read_u32_le()?,
        })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.header_size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.planes.to_le_bytes());
        out.extend_from_slice(&self.bit_count.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&self.image_size.to_le_bytes());
        out.extend_from_slice(&self.x_pels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.y_pels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.colors_used.to_le_bytes());
        out.extend_from_slice(&self.colors_important.to_le_bytes());
    }

    pub fn compression_kind(&self) -> Compression {
        Compression::from_u32(self.compression)
    }

    /// Whether the three 16-bit masks live inside this header rather than
    /// directly after it.
    pub(crate) fn embeds_masks(&self) -> bool {
        self.header_size >= 52
    }
}

/// Both headers of a file, as read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Headers {
    pub file: FileHeader,
    pub info: InfoHeader,
}

/// What the decoder needs from a validated header pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) flip_vertical: bool,
    pub(crate) depth: BitDepth,
    pub(crate) compression: Compression,
}

impl Headers {
    pub(crate) fn read(cursor: &mut Cursor<'_>) -> Result<Self, BitmapError> {
        let file = FileHeader::read(cursor)?;
        let info = InfoHeader::read(cursor)?;
        log::trace!(
            "bmp headers: file_size={} data_offset={} header_size={} {}x{} planes={} bpp={} compression={} image_size={} ppm={}x{} colors_used={} colors_important={}",
            file.file_size,
            file.data_offset,
            info.header_size,
            info.width,
            info.height,
            info.planes,
            info.bit_count,
            info.compression,
            info.image_size,
            info.x_pels_per_meter,
            info.y_pels_per_meter,
            info.colors_used,
            info.colors_important,
        );
        Ok(Self { file, info })
    }

    /// Check the headers describe an image this crate can decode.
    pub(crate) fn validate(&self) -> Result<Layout, BitmapError> {
        let info = &self.info;
        if (info.header_size as usize) < InfoHeader::SIZE {
            return Err(BitmapError::UnsupportedFormat(format!(
                "info header of {} bytes (OS/2 core headers are not supported)",
                info.header_size
            )));
        }

        let compression = info.compression_kind();
        match compression {
            Compression::Rgb => {}
            Compression::Rle8 | Compression::Rle4 => {
                return Err(BitmapError::UnsupportedCompression(info.compression));
            }
            Compression::Bitfields if info.bit_count == 16 => {}
            Compression::Bitfields => {
                return Err(BitmapError::UnsupportedFormat(format!(
                    "bit-field compression at {} bits per pixel",
                    info.bit_count
                )));
            }
            Compression::Unknown(code) => {
                return Err(BitmapError::UnsupportedFormat(format!(
                    "unknown compression {code}"
                )));
            }
        }

        let depth = BitDepth::try_from(info.bit_count)?;

        if info.width <= 0 {
            return Err(BitmapError::UnsupportedFormat(format!(
                "non-positive width {}",
                info.width
            )));
        }
        if info.height == 0 {
            return Err(BitmapError::UnsupportedFormat("zero height".into()));
        }

        Ok(Layout {
            width: info.width.unsigned_abs(),
            height: info.height.unsigned_abs(),
            flip_vertical: info.height < 0,
            depth,
            compression,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> Headers {
        Headers {
            file: FileHeader {
                signature: SIGNATURE,
                file_size: 70,
                reserved1: 0,
                reserved2: 0,
                data_offset: 54,
            },
            info: InfoHeader {
                header_size: 40,
                width: 2,
                height: -2,
                planes: 1,
                bit_count: 24,
                compression: 0,
                image_size: 16,
                x_pels_per_meter: 3780,
                y_pels_per_meter: 3780,
                colors_used: 0,
                colors_important: 0,
            },
        }
    }

    fn to_bytes(h: &Headers) -> Vec<u8> {
        let mut out = Vec::new();
        h.file.write(&mut out);
        h.info.write(&mut out);
        out
    }

    #[test]
    fn write_then_read() {
        let h = sample();
        let bytes = to_bytes(&h);
        assert_eq!(bytes.len(), HEADERS_SIZE);
        assert_eq!(&bytes[..2], b"BM");
        assert_eq!(&bytes[18..22], &2i32.to_le_bytes());
        assert_eq!(&bytes[22..26], &(-2i32).to_le_bytes());
        let back = Headers::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(back, h);
        let layout = back.validate().unwrap();
        assert_eq!((layout.width, layout.height), (2, 2));
        assert!(layout.flip_vertical);
        assert_eq!(layout.depth, BitDepth::TwentyFour);
    }

    #[test]
    fn bad_signature_wins_over_truncation() {
        let err = Headers::read(&mut Cursor::new(b"PK\x03\x04")).unwrap_err();
        assert!(matches!(err, BitmapError::UnrecognizedFormat));
        let err = Headers::read(&mut Cursor::new(b"BM\x00\x00")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataCorruption);
    }

    #[test]
    fn rejections() {
        let mut h = sample();
        h.info.compression = 1;
        assert!(matches!(
            h.validate(),
            Err(BitmapError::UnsupportedCompression(1))
        ));

        let mut h = sample();
        h.info.compression = 3;
        assert_eq!(h.validate().unwrap_err().kind(), ErrorKind::UnsupportedFormat);
        h.info.bit_count = 16;
        assert_eq!(h.validate().unwrap().compression, Compression::Bitfields);

        let mut h = sample();
        h.info.compression = 4;
        assert_eq!(h.validate().unwrap_err().kind(), ErrorKind::UnsupportedFormat);

        let mut h = sample();
        h.info.bit_count = 2;
        assert!(matches!(
            h.validate(),
            Err(BitmapError::UnsupportedBitDepth(2))
        ));

        for width in [0, -3] {
            let mut h = sample();
            h.info.width = width;
            assert_eq!(h.validate().unwrap_err().kind(), ErrorKind::UnsupportedFormat);
        }

        let mut h = sample();
        h.info.height = 0;
        assert!(h.validate().is_err());

        let mut h = sample();
        h.info.header_size = 12;
        assert!(h.validate().is_err());
    }
}
