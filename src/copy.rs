//! Pixel and rectangle copies between bitmaps, optionally skipping a
//! transparent key color.

use crate::bitmap::Bitmap;
use crate::error::BitmapError;
use crate::pixel::Pixel;

/// An inclusive rectangle of source pixels.
///
/// `top` and `bottom` may be given in either order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Region {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The whole of `bitmap`.
    pub fn of(bitmap: &Bitmap) -> Self {
        Self::new(
            0,
            0,
            bitmap.abs_width() as i32 - 1,
            bitmap.abs_height() as i32 - 1,
        )
    }
}

/// Copy one pixel. Coordinates follow each bitmap's reporting mode.
pub fn copy_pixel(
    from: &Bitmap,
    from_x: i32,
    from_y: i32,
    to: &mut Bitmap,
    to_x: i32,
    to_y: i32,
) -> Result<(), BitmapError> {
    let pixel = from.pixel(from_x, from_y)?;
    to.set_pixel(to_x, to_y, pixel)
}

/// Copy one pixel unless its RGB equals `transparent`.
pub fn copy_pixel_keyed(
    from: &Bitmap,
    from_x: i32,
    from_y: i32,
    to: &mut Bitmap,
    to_x: i32,
    to_y: i32,
    transparent: Pixel,
) -> Result<(), BitmapError> {
    let pixel = from.pixel(from_x, from_y)?;
    if pixel.same_rgb(transparent) {
        return Ok(());
    }
    to.set_pixel(to_x, to_y, pixel)
}

/// Copy `region` of `from` so its top-left corner lands at `(to_x, to_y)`.
///
/// The region is clipped to both images; anything outside is skipped.
/// Returns the number of pixels written.
pub fn copy_region(from: &Bitmap, region: Region, to: &mut Bitmap, to_x: i32, to_y: i32) -> usize {
    blit(from, region, to, to_x, to_y, None)
}

/// [`copy_region`], leaving destination pixels alone wherever the source RGB
/// equals `transparent`.
pub fn copy_region_keyed(
    from: &Bitmap,
    region: Region,
    to: &mut Bitmap,
    to_x: i32,
    to_y: i32,
    transparent: Pixel,
) -> usize {
    blit(from, region, to, to_x, to_y, Some(transparent))
}

fn blit(
    from: &Bitmap,
    region: Region,
    to: &mut Bitmap,
    to_x: i32,
    to_y: i32,
    key: Option<Pixel>,
) -> usize {
    let (mut top, mut bottom) = (i64::from(region.top), i64::from(region.bottom));
    if bottom < top {
        core::mem::swap(&mut top, &mut bottom);
    }
    let mut left = i64::from(region.left);
    let mut right = i64::from(region.right);
    let (mut dx, mut dy) = (i64::from(to_x), i64::from(to_y));

    // Clip to the source.
    if left < 0 {
        dx -= left;
        left = 0;
    }
    if top < 0 {
        dy -= top;
        top = 0;
    }
    right = right.min(i64::from(from.abs_width()) - 1);
    bottom = bottom.min(i64::from(from.abs_height()) - 1);

    // Clip to the destination.
    if dx < 0 {
        left -= dx;
        dx = 0;
    }
    if dy < 0 {
        top -= dy;
        dy = 0;
    }
    right = right.min(left + i64::from(to.abs_width()) - 1 - dx);
    bottom = bottom.min(top + i64::from(to.abs_height()) - 1 - dy);

    if left > right || top > bottom {
        log::debug!("copy region {region:?} to ({to_x}, {to_y}) is empty after clipping");
        return 0;
    }

    let (sx, sy) = (left as usize, top as usize);
    let (dx, dy) = (dx as usize, dy as usize);
    let w = (right - left + 1) as usize;
    let h = (bottom - top + 1) as usize;
    let mut written = 0;
    for row in 0..h {
        let src = &from.row(sy + row)[sx..sx + w];
        let dst = &mut to.row_mut(dy + row)[dx..dx + w];
        match key {
            None => {
                dst.copy_from_slice(src);
                written += w;
            }
            Some(key) => {
                for (d, &s) in dst.iter_mut().zip(src) {
                    if !s.same_rgb(key) {
                        *d = s;
                        written += 1;
                    }
                }
            }
        }
    }
    written
}
