//! BMP encoder: uncompressed 1/4/8/24/32-bit and 5-5-5 bit-field 16-bit.

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use super::header::{Compression, FileHeader, HEADERS_SIZE, InfoHeader, SIGNATURE};
use super::row::RowCodec;
use super::utils::BitMasks;
use crate::bitmap::{Bitmap, DEFAULT_PELS_PER_METER};
use crate::error::BitmapError;
use crate::palette::ColorTable;
use crate::pixel::BitDepth;

/// Bytes of the three mask fields written after a 16-bit info header.
const MASKS_SIZE: usize = 12;

/// Encode `bitmap` at its own depth.
///
/// Rows are written bottom-up unless the bitmap is vertically flipped, and
/// mirrored when it is horizontally flipped; the header's width and height
/// carry the matching signs.
pub(crate) fn encode_bitmap(bitmap: &Bitmap, stop: &dyn Stop) -> Result<Vec<u8>, BitmapError> {
    let depth = bitmap.bit_depth();
    let (width, height) = (bitmap.abs_width(), bitmap.abs_height());
    let too_large = || BitmapError::DimensionsTooLarge {
        width: u64::from(width),
        height: u64::from(height),
    };
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(too_large());
    }
    let (w, h) = (width as usize, height as usize);

    let standard;
    let palette = match (depth.is_indexed(), bitmap.palette()) {
        (false, _) => None,
        (true, Some(table)) => Some(table),
        (true, None) => {
            standard = ColorTable::standard(depth);
            standard.as_ref()
        }
    };
    let masks = BitMasks::RGB555;

    let mut codec = RowCodec::new(depth, w, palette, masks, bitmap.is_flipped_horizontally())?;
    let stride = codec.stride();
    let image_size = stride.checked_mul(h).ok_or_else(too_large)?;
    let extra = match depth {
        BitDepth::Sixteen => MASKS_SIZE,
        _ => depth.palette_len() * 4,
    };
    let data_offset = HEADERS_SIZE + extra;
    let file_size = data_offset.checked_add(image_size).ok_or_else(too_large)?;
    let file_size_u32 = u32::try_from(file_size).map_err(|_| too_large())?;

    let or_default = |ppm: i32| if ppm == 0 { DEFAULT_PELS_PER_METER } else { ppm };
    let (x_ppm, y_ppm) = bitmap.pels_per_meter();

    let mut out = Vec::with_capacity(file_size);
    FileHeader {
        signature: SIGNATURE,
        file_size: file_size_u32,
        reserved1: 0,
        reserved2: 0,
        data_offset: data_offset as u32,
    }
    .write(&mut out);
    InfoHeader {
        header_size: InfoHeader::SIZE as u32,
        width: bitmap.width(),
        height: bitmap.height(),
        planes: 1,
        bit_count: depth.bits(),
        compression: match depth {
            BitDepth::Sixteen => Compression::Bitfields,
            _ => Compression::Rgb,
        }
        .to_u32(),
        image_size: image_size as u32,
        x_pels_per_meter: or_default(x_ppm),
        y_pels_per_meter: or_default(y_ppm),
        colors_used: 0,
        colors_important: 0,
    }
    .write(&mut out);

    if let Some(table) = palette {
        for entry in table.entries() {
            out.extend_from_slice(&[entry.blue, entry.green, entry.red, entry.alpha]);
        }
    }
    if depth == BitDepth::Sixteen {
        for mask in [masks.red, masks.green, masks.blue] {
            out.extend_from_slice(&u32::from(mask).to_le_bytes());
        }
    }
    log::trace!(
        "bmp: encoding {}x{} at {} bits, data offset {data_offset}, {file_size} bytes",
        bitmap.width(),
        bitmap.height(),
        depth.bits()
    );

    let mut row_buf = vec![0u8; stride];
    for r in 0..h {
        if r % 16 == 0 {
            stop.check()?;
        }
        let y = if bitmap.is_flipped_vertically() { r } else { h - 1 - r };
        row_buf.fill(0);
        codec.encode_row(bitmap.row(y), &mut row_buf);
        out.extend_from_slice(&row_buf);
    }

    Ok(out)
}
