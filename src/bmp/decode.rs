//! BMP decoder: uncompressed 1/4/8/24/32-bit and bit-field 16-bit images.

use alloc::format;

use enough::Stop;

use super::cursor::Cursor;
use super::header::{Compression, FileHeader, HEADERS_SIZE, Headers};
use super::row::RowCodec;
use super::utils::BitMasks;
use crate::bitmap::{Bitmap, Reporting};
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::palette::ColorTable;
use crate::pixel::{BitDepth, Pixel};

/// Decode a complete BMP file held in memory.
///
/// Limits are checked and the pixel data length verified before the pixel
/// buffer is allocated.
pub(crate) fn decode_bitmap(
    data: &[u8],
    limits: Option<&Limits>,
    reporting: Reporting,
    stop: &dyn Stop,
) -> Result<Bitmap, BitmapError> {
    let mut cursor = Cursor::new(data);
    let headers = Headers::read(&mut cursor)?;
    let layout = headers.validate()?;
    if let Some(limits) = limits {
        limits.check(layout.width, layout.height)?;
    }
    stop.check()?;

    let info = &headers.info;
    let header_end = FileHeader::SIZE.saturating_add(info.header_size as usize);
    cursor.set_position(header_end)?;

    let palette = if layout.depth.is_indexed() {
        Some(read_palette(&mut cursor, &headers, layout.depth)?)
    } else {
        None
    };

    let masks = if layout.compression == Compression::Bitfields {
        read_masks(&mut cursor, &headers)?
    } else {
        BitMasks::RGB555
    };

    let data_offset = headers.file.data_offset as usize;
    let pixel_start = cursor.position().max(data_offset);
    if pixel_start > cursor.position() {
        log::debug!(
            "bmp: skipping {} bytes before pixel data at offset {pixel_start}",
            pixel_start - cursor.position()
        );
    }
    cursor.set_position(pixel_start)?;

    let (w, h) = (layout.width as usize, layout.height as usize);
    let stride = layout.depth.row_stride(w);
    let needed = stride
        .checked_mul(h)
        .ok_or(BitmapError::DimensionsTooLarge {
            width: u64::from(layout.width),
            height: u64::from(layout.height),
        })?;
    if cursor.remaining() < needed {
        return Err(BitmapError::DataCorruption(format!(
            "{w}x{h} at {} bits needs {needed} bytes of pixel data, {} available",
            layout.depth.bits(),
            cursor.remaining()
        )));
    }

    let mut codec = RowCodec::new(layout.depth, w, palette.as_ref(), masks, false)?;
    let mut bitmap = Bitmap::with_size(info.width, info.height, layout.depth)?;
    bitmap.set_reporting(reporting);
    bitmap.set_pels_per_meter(info.x_pels_per_meter, info.y_pels_per_meter);

    for r in 0..h {
        if r % 16 == 0 {
            stop.check()?;
        }
        let src = cursor.take(stride)?;
        let y = if layout.flip_vertical { r } else { h - 1 - r };
        codec.decode_row(src, bitmap.row_mut(y))?;
    }
    drop(codec);

    if let (Some(slot), Some(table)) = (bitmap.palette_mut(), palette) {
        *slot = table;
    }
    Ok(bitmap)
}

/// Read the color table between the headers and the pixel data.
///
/// Only as many entries as fit before `data_offset` are read (at most
/// `2^depth`); the rest stay white.
fn read_palette(
    cursor: &mut Cursor<'_>,
    headers: &Headers,
    depth: BitDepth,
) -> Result<ColorTable, BitmapError> {
    let mut table = ColorTable::filled_white(depth).ok_or(BitmapError::NoColorTable {
        depth: depth.bits(),
    })?;
    let room = (headers.file.data_offset as usize).saturating_sub(cursor.position()) / 4;
    let count = room.min(table.len());
    if count < table.len() {
        log::debug!(
            "bmp: color table has room for {count} of {} entries, rest left white",
            table.len()
        );
    }
    for i in 0..count {
        let [b, g, r, reserved] = cursor.read_fixed_bytes::<4>()?;
        table.set(i, Pixel::new(r, g, b, reserved))?;
    }
    Ok(table)
}

/// Read the red, green and blue masks of a bit-field 16-bit image. Each is
/// stored as a 32-bit field whose high half is ignored.
fn read_masks(cursor: &mut Cursor<'_>, headers: &Headers) -> Result<BitMasks, BitmapError> {
    cursor.set_position(HEADERS_SIZE)?;
    let mut mask = || -> Result<u16, BitmapError> {
        let m = cursor.read_u16_le()?;
        cursor.skip(2)?;
        Ok(m)
    };
    let masks = BitMasks {
        red: mask()?,
        green: mask()?,
        blue: mask()?,
    };
    log::trace!(
        "bmp: masks r={:#06x} g={:#06x} b={:#06x}",
        masks.red,
        masks.green,
        masks.blue
    );
    if headers.info.embeds_masks() {
        // Masks were part of a V2+ info header; pixel data follows the header.
        let header_end = FileHeader::SIZE.saturating_add(headers.info.header_size as usize);
        cursor.set_position(header_end)?;
    }
    if masks == (BitMasks { red: 0, green: 0, blue: 0 }) {
        log::debug!("bmp: all bit-field masks are zero, using 5-5-5");
        return Ok(BitMasks::RGB555);
    }
    Ok(masks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmp::header::{InfoHeader, SIGNATURE};
    use crate::error::ErrorKind;
    use alloc::vec::Vec;
    use enough::{StopReason, Unstoppable};

    /// Build a file with a 40-byte info header, `extra` bytes between the
    /// headers and the pixel data, and the given raw rows.
    fn build(width: i32, height: i32, bpp: u16, compression: u32, extra: &[u8], rows: &[u8]) -> Vec<u8> {
        let data_offset = (HEADERS_SIZE + extra.len()) as u32;
        let mut out = Vec::new();
        FileHeader {
            signature: SIGNATURE,
            file_size: data_offset + rows.len() as u32,
            reserved1: 0,
            reserved2: 0,
            data_offset,
        }
        .write(&mut out);
        InfoHeader {
            header_size: 40,
            width,
            height,
            planes: 1,
            bit_count: bpp,
            compression,
            image_size: rows.len() as u32,
            x_pels_per_meter: 2835,
            y_pels_per_meter: 2835,
            colors_used: 0,
            colors_important: 0,
        }
        .write(&mut out);
        out.extend_from_slice(extra);
        out.extend_from_slice(rows);
        out
    }

    fn decode(data: &[u8]) -> Result<Bitmap, BitmapError> {
        decode_bitmap(data, None, Reporting::Strict, &Unstoppable)
    }

    #[test]
    fn bottom_up_24bit() {
        // Bottom row first: blue, then top row red.
        let rows = [255, 0, 0, 0, 0, 0, 255, 0];
        let b = decode(&build(1, 2, 24, 0, &[], &rows)).unwrap();
        assert_eq!(b.pixel(0, 0).unwrap(), Pixel::rgb(255, 0, 0));
        assert_eq!(b.pixel(0, 1).unwrap(), Pixel::rgb(0, 0, 255));
        assert_eq!(b.pels_per_meter(), (2835, 2835));
        assert!(!b.is_flipped_vertically());
    }

    #[test]
    fn top_down_rows() {
        let rows = [255, 0, 0, 0, 0, 0, 255, 0];
        let b = decode(&build(1, -2, 24, 0, &[], &rows)).unwrap();
        assert_eq!(b.pixel(0, 0).unwrap(), Pixel::rgb(0, 0, 255));
        assert!(b.is_flipped_vertically());
        assert_eq!(b.height(), -2);
    }

    #[test]
    fn short_palette_is_padded_with_white() {
        // Two entries for an 8-bit image; the second carries a reserved byte.
        let palette = [10, 20, 30, 0, 40, 50, 60, 7];
        let rows = [1, 0, 255, 0];
        let b = decode(&build(3, 1, 8, 0, &palette, &rows)).unwrap();
        let table = b.palette().unwrap();
        assert_eq!(table.len(), 256);
        assert_eq!(table.entries()[0], Pixel::rgb(30, 20, 10));
        assert_eq!(table.entries()[1], Pixel::new(60, 50, 40, 7));
        assert_eq!(table.entries()[2], Pixel::WHITE);
        assert_eq!(b.pixel(0, 0).unwrap(), Pixel::new(60, 50, 40, 7));
        assert_eq!(b.pixel(1, 0).unwrap(), Pixel::rgb(30, 20, 10));
        assert_eq!(b.pixel(2, 0).unwrap(), Pixel::WHITE);
    }

    #[test]
    fn gap_before_pixel_data_is_skipped() {
        let gap = [0xAA; 6];
        let rows = [1, 2, 3, 0];
        let b = decode(&build(1, 1, 24, 0, &gap, &rows)).unwrap();
        assert_eq!(b.pixel(0, 0).unwrap(), Pixel::rgb(3, 2, 1));
    }

    #[test]
    fn bitfield_masks_are_honored() {
        let mut masks = Vec::new();
        for m in [0xF800u32, 0x07E0, 0x001F] {
            masks.extend_from_slice(&m.to_le_bytes());
        }
        let rows = 0x07E0u16.to_le_bytes();
        let b = decode(&build(1, 1, 16, 3, &masks, &[rows[0], rows[1], 0, 0])).unwrap();
        assert_eq!(b.pixel(0, 0).unwrap(), Pixel::rgb(0, 252, 0));
    }

    #[test]
    fn sixteen_bit_without_masks_is_555() {
        let rows = 0x7C00u16.to_le_bytes();
        let b = decode(&build(1, 1, 16, 0, &[], &[rows[0], rows[1], 0, 0])).unwrap();
        assert_eq!(b.pixel(0, 0).unwrap(), Pixel::rgb(248, 0, 0));
    }

    #[test]
    fn truncated_pixel_data() {
        let err = decode(&build(2, 2, 24, 0, &[], &[0u8; 12])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataCorruption);
        let err = decode(&build(2, 2, 24, 0, &[], &[0u8; 16])[..40]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataCorruption);
    }

    #[test]
    fn limits_are_checked_before_reading_pixels() {
        let data = build(4, 4, 24, 0, &[], &[]);
        let limits = Limits {
            max_pixels: Some(8),
            ..Limits::default()
        };
        let err = decode_bitmap(&data, Some(&limits), Reporting::Strict, &Unstoppable).unwrap_err();
        assert!(matches!(err, BitmapError::LimitExceeded(_)));
    }

    struct Cancelled;

    impl Stop for Cancelled {
        fn check(&self) -> Result<(), StopReason> {
            Err(StopReason::Cancelled)
        }
    }

    #[test]
    fn cancellation() {
        let data = build(1, 1, 24, 0, &[], &[0u8; 4]);
        let err = decode_bitmap(&data, None, Reporting::Strict, &Cancelled).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn reporting_mode_is_carried() {
        let data = build(1, 1, 24, 0, &[], &[0u8; 4]);
        let b = decode_bitmap(&data, None, Reporting::Lenient, &Unstoppable).unwrap();
        assert_eq!(b.reporting(), Reporting::Lenient);
        assert_eq!(b.pixel(5, 5).unwrap(), Pixel::BLACK);
    }
}
