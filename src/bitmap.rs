//! The in-memory image: pixel buffer, optional color table, geometry and resolution.

use alloc::vec::Vec;

use crate::error::BitmapError;
use crate::palette::ColorTable;
use crate::pixel::{BitDepth, Pixel};

/// Pixels per meter at 96 DPI, written when no resolution is set.
pub const DEFAULT_PELS_PER_METER: i32 = 3780;

const INCHES_PER_METER: f64 = 39.37007874015748;

/// How out-of-range pixel and palette accesses are reported.
///
/// Every accessor is implemented once, returning a `Result`; this mode only
/// decides whether a clamped or ignored access is also an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Reporting {
    /// Out-of-range accesses return an error.
    #[default]
    Strict,
    /// Out-of-range accesses are clamped (reads) or ignored (palette writes)
    /// and logged as warnings.
    Lenient,
}

/// A decoded or constructed BMP image.
///
/// Pixels are stored row-major, top row first, regardless of the on-disk
/// row order or flip flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    flip_horizontal: bool,
    flip_vertical: bool,
    depth: BitDepth,
    pixels: Vec<Pixel>,
    palette: Option<ColorTable>,
    x_pels_per_meter: i32,
    y_pels_per_meter: i32,
    reporting: Reporting,
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bitmap {
    /// A 1×1, 24-bit, white image.
    pub fn new() -> Self {
        Self {
            width: 1,
            height: 1,
            flip_horizontal: false,
            flip_vertical: false,
            depth: BitDepth::TwentyFour,
            pixels: alloc::vec![Pixel::WHITE],
            palette: None,
            x_pels_per_meter: DEFAULT_PELS_PER_METER,
            y_pels_per_meter: DEFAULT_PELS_PER_METER,
            reporting: Reporting::Strict,
        }
    }

    /// A white image of the given size and depth. Negative dimensions set the flip flags.
    pub fn with_size(width: i32, height: i32, depth: BitDepth) -> Result<Self, BitmapError> {
        let mut bitmap = Self::new();
        bitmap.set_bit_depth(depth);
        bitmap.set_size(width, height)?;
        Ok(bitmap)
    }

    /// Collapse to the 1×1, 1-bit placeholder left behind by a failed read.
    pub fn reset_to_placeholder(&mut self) {
        self.width = 1;
        self.height = 1;
        self.flip_horizontal = false;
        self.flip_vertical = false;
        self.pixels = alloc::vec![Pixel::WHITE];
        self.set_bit_depth(BitDepth::One);
    }

    // ── Geometry ─────────────────────────────────────────────────────

    /// Width, negative when the image is stored horizontally mirrored.
    pub fn width(&self) -> i32 {
        let w = self.width as i32;
        if self.flip_horizontal { -w } else { w }
    }

    /// Height, negative when rows are stored top-to-bottom.
    pub fn height(&self) -> i32 {
        let h = self.height as i32;
        if self.flip_vertical { -h } else { h }
    }

    pub fn abs_width(&self) -> u32 {
        self.width
    }

    pub fn abs_height(&self) -> u32 {
        self.height
    }

    pub fn is_flipped_horizontally(&self) -> bool {
        self.flip_horizontal
    }

    pub fn is_flipped_vertically(&self) -> bool {
        self.flip_vertical
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.depth
    }

    /// `2^depth`, reported as 2^24 for 32-bit images.
    pub fn number_of_colors(&self) -> usize {
        self.depth.number_of_colors()
    }

    /// Reallocate the pixel buffer as opaque white. Negative dimensions set
    /// the matching flip flag; zero is rejected.
    pub fn set_size(&mut self, width: i32, height: i32) -> Result<(), BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::InvalidArgument(alloc::format!(
                "width and height must be non-zero, got {width}x{height}"
            )));
        }
        let (w, h) = (width.unsigned_abs(), height.unsigned_abs());
        let len = (w as usize)
            .checked_mul(h as usize)
            .ok_or(BitmapError::DimensionsTooLarge {
                width: u64::from(w),
                height: u64::from(h),
            })?;
        self.pixels = alloc::vec![Pixel::WHITE; len];
        self.width = w;
        self.height = h;
        self.flip_horizontal = width < 0;
        self.flip_vertical = height < 0;
        Ok(())
    }

    /// Change the bit depth, discarding the pixels (reset to white) and
    /// installing the standard palette for indexed depths.
    ///
    /// Use [`convert_bit_depth`](Self::convert_bit_depth) to keep the pixels.
    pub fn set_bit_depth(&mut self, depth: BitDepth) {
        self.depth = depth;
        self.palette = ColorTable::standard(depth);
        self.pixels.fill(Pixel::WHITE);
    }

    /// Change the bit depth while keeping the pixels. Indexed depths get the
    /// standard palette; pixels are quantized against it when encoded.
    pub fn convert_bit_depth(&mut self, depth: BitDepth) {
        self.depth = depth;
        self.palette = ColorTable::standard(depth);
    }

    // ── Pixels ───────────────────────────────────────────────────────

    fn clamp(&self, x: i32, y: i32) -> (usize, usize, bool) {
        let max_x = self.width as i64 - 1;
        let max_y = self.height as i64 - 1;
        let cx = i64::from(x).clamp(0, max_x);
        let cy = i64::from(y).clamp(0, max_y);
        let clamped = cx != i64::from(x) || cy != i64::from(y);
        (cx as usize, cy as usize, clamped)
    }

    fn out_of_range(&self, x: i32, y: i32) -> BitmapError {
        BitmapError::PixelOutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Downgrade `err` to a warning in lenient mode.
    fn report(&self, err: BitmapError) -> Result<(), BitmapError> {
        match self.reporting {
            Reporting::Strict => Err(err),
            Reporting::Lenient => {
                log::warn!("{err}");
                Ok(())
            }
        }
    }

    /// Pixel at `(x, y)`, clamping coordinates to the nearest valid pixel.
    pub fn pixel_clamped(&self, x: i32, y: i32) -> Pixel {
        let (cx, cy, _) = self.clamp(x, y);
        self.pixels[cy * self.width as usize + cx]
    }

    /// Pixel at `(x, y)`. Out-of-range coordinates are an error in strict
    /// mode and clamp in lenient mode.
    pub fn pixel(&self, x: i32, y: i32) -> Result<Pixel, BitmapError> {
        let (cx, cy, clamped) = self.clamp(x, y);
        if clamped {
            self.report(self.out_of_range(x, y))?;
        }
        Ok(self.pixels[cy * self.width as usize + cx])
    }

    /// Store `pixel` at `(x, y)`, with the same clamping rules as [`pixel`](Self::pixel).
    pub fn set_pixel(&mut self, x: i32, y: i32, pixel: Pixel) -> Result<(), BitmapError> {
        let (cx, cy, clamped) = self.clamp(x, y);
        if clamped {
            self.report(self.out_of_range(x, y))?;
        }
        let w = self.width as usize;
        self.pixels[cy * w + cx] = pixel;
        Ok(())
    }

    /// All pixels, row-major, top row first.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Logical row `y` (0 = top).
    pub fn row(&self, y: usize) -> &[Pixel] {
        let w = self.width as usize;
        &self.pixels[y * w..(y + 1) * w]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [Pixel] {
        let w = self.width as usize;
        &mut self.pixels[y * w..(y + 1) * w]
    }

    // ── Palette ──────────────────────────────────────────────────────

    pub fn palette(&self) -> Option<&ColorTable> {
        self.palette.as_ref()
    }

    pub(crate) fn palette_mut(&mut self) -> Option<&mut ColorTable> {
        self.palette.as_mut()
    }

    /// Palette entry `index`. Without a table, or past its end, this is an
    /// error in strict mode and white in lenient mode.
    pub fn color(&self, index: usize) -> Result<Pixel, BitmapError> {
        let result = match &self.palette {
            Some(table) => table.get(index),
            None => Err(BitmapError::NoColorTable {
                depth: self.depth.bits(),
            }),
        };
        match result {
            Ok(color) => Ok(color),
            Err(err) => {
                self.report(err)?;
                Ok(Pixel::WHITE)
            }
        }
    }

    /// Overwrite palette entry `index`. Invalid writes are errors in strict
    /// mode and ignored in lenient mode.
    pub fn set_color(&mut self, index: usize, color: Pixel) -> Result<(), BitmapError> {
        let result = match &mut self.palette {
            Some(table) => table.set(index, color),
            None => Err(BitmapError::NoColorTable {
                depth: self.depth.bits(),
            }),
        };
        match result {
            Ok(()) => Ok(()),
            Err(err) => self.report(err),
        }
    }

    /// Replace the whole color table. Its length must be `2^depth`.
    pub fn set_palette(&mut self, table: ColorTable) -> Result<(), BitmapError> {
        if !self.depth.is_indexed() {
            return self.report(BitmapError::NoColorTable {
                depth: self.depth.bits(),
            });
        }
        if table.len() != self.depth.palette_len() {
            return self.report(BitmapError::InvalidArgument(alloc::format!(
                "a {}-bit image needs {} palette entries, got {}",
                self.depth.bits(),
                self.depth.palette_len(),
                table.len()
            )));
        }
        self.palette = Some(table);
        Ok(())
    }

    /// Restore the default Windows palette for the current depth.
    pub fn use_standard_palette(&mut self) -> Result<(), BitmapError> {
        match ColorTable::standard(self.depth) {
            Some(table) => {
                self.palette = Some(table);
                Ok(())
            }
            None => self.report(BitmapError::NoColorTable {
                depth: self.depth.bits(),
            }),
        }
    }

    /// Nearest palette index for `pixel`, or 0 when there is no palette.
    pub fn closest_color_index(&self, pixel: Pixel) -> u8 {
        self.palette
            .as_ref()
            .map_or(0, |table| table.closest_index(pixel))
    }

    // ── Resolution ───────────────────────────────────────────────────

    /// Stored resolution in pixels per meter, as written to disk.
    pub fn pels_per_meter(&self) -> (i32, i32) {
        (self.x_pels_per_meter, self.y_pels_per_meter)
    }

    pub(crate) fn set_pels_per_meter(&mut self, x: i32, y: i32) {
        self.x_pels_per_meter = x;
        self.y_pels_per_meter = y;
    }

    /// Set the resolution in dots per inch.
    pub fn set_dpi(&mut self, horizontal: i32, vertical: i32) {
        self.x_pels_per_meter = (f64::from(horizontal) * INCHES_PER_METER) as i32;
        self.y_pels_per_meter = (f64::from(vertical) * INCHES_PER_METER) as i32;
    }

    /// Horizontal resolution in DPI (96 when unset).
    pub fn horizontal_dpi(&self) -> i32 {
        ppm_to_dpi(self.x_pels_per_meter)
    }

    /// Vertical resolution in DPI (96 when unset).
    pub fn vertical_dpi(&self) -> i32 {
        ppm_to_dpi(self.y_pels_per_meter)
    }

    // ── Reporting ────────────────────────────────────────────────────

    pub fn reporting(&self) -> Reporting {
        self.reporting
    }

    pub fn set_reporting(&mut self, reporting: Reporting) {
        self.reporting = reporting;
    }

    pub fn with_reporting(mut self, reporting: Reporting) -> Self {
        self.reporting = reporting;
        self
    }

    // ── Typed pixel interop ──────────────────────────────────────────

    /// Copy the pixels out as an [`imgref::ImgVec`] of `RGBA8`.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        let pixels = self.pixels.iter().map(|&p| p.into()).collect();
        imgref::ImgVec::new(pixels, self.width as usize, self.height as usize)
    }

    /// Build a bitmap of the given depth from typed `RGBA8` pixels.
    #[cfg(feature = "imgref")]
    pub fn from_imgref(
        img: imgref::ImgRef<'_, rgb::RGBA8>,
        depth: BitDepth,
    ) -> Result<Self, BitmapError> {
        let width = i32::try_from(img.width()).map_err(|_| too_large(img.width(), img.height()))?;
        let height =
            i32::try_from(img.height()).map_err(|_| too_large(img.width(), img.height()))?;
        let mut bitmap = Self::with_size(width, height, depth)?;
        for (dst, src) in bitmap
            .pixels
            .chunks_exact_mut(img.width())
            .zip(img.rows())
        {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = s.into();
            }
        }
        Ok(bitmap)
    }
}

#[cfg(feature = "imgref")]
fn too_large(width: usize, height: usize) -> BitmapError {
    BitmapError::DimensionsTooLarge {
        width: width as u64,
        height: height as u64,
    }
}

/// Pixels per meter to DPI; 0 reads as the 96 DPI default.
pub(crate) fn ppm_to_dpi(ppm: i32) -> i32 {
    let ppm = if ppm == 0 { DEFAULT_PELS_PER_METER } else { ppm };
    (f64::from(ppm) / INCHES_PER_METER) as i32
}
