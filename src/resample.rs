//! Bilinear rescaling to a 24-bit bitmap.

use crate::bitmap::Bitmap;
use crate::error::BitmapError;
use crate::pixel::{BitDepth, Pixel};

/// How the `dimension` argument of [`rescale`] is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RescaleMode {
    /// Both sides scale by `dimension` percent.
    Percentage,
    /// Width becomes `dimension`; height keeps the aspect ratio.
    FixedWidth,
    /// Height becomes `dimension`; width keeps the aspect ratio.
    FixedHeight,
    /// The longer side becomes `dimension`. Square images scale by height.
    FitLongestSide,
}

impl RescaleMode {
    /// Parse the single-letter code: `p`, `w`, `h` or `f`, in either case.
    pub fn from_code(code: char) -> Result<Self, BitmapError> {
        match code.to_ascii_lowercase() {
            'p' => Ok(Self::Percentage),
            'w' => Ok(Self::FixedWidth),
            'h' => Ok(Self::FixedHeight),
            'f' => Ok(Self::FitLongestSide),
            other => Err(BitmapError::InvalidArgument(alloc::format!(
                "unknown rescale mode '{other}' (expected p, w, h or f)"
            ))),
        }
    }
}

impl TryFrom<char> for RescaleMode {
    type Error = BitmapError;

    fn try_from(code: char) -> Result<Self, BitmapError> {
        Self::from_code(code)
    }
}

/// Output size for an image of `width`×`height`. Both sides are at least 1.
pub fn target_size(width: u32, height: u32, mode: RescaleMode, dimension: u32) -> (u32, u32) {
    let (w, h, d) = (f64::from(width), f64::from(height), f64::from(dimension));
    // Non-negative, so `as u32` floors (and saturates).
    let (new_w, new_h) = match mode {
        RescaleMode::Percentage => ((w * d / 100.0) as u32, (h * d / 100.0) as u32),
        RescaleMode::FixedWidth => (dimension, (h * d / w) as u32),
        RescaleMode::FixedHeight => ((w * d / h) as u32, dimension),
        RescaleMode::FitLongestSide if width > height => (dimension, (h * d / w) as u32),
        RescaleMode::FitLongestSide => ((w * d / h) as u32, dimension),
    };
    (new_w.max(1), new_h.max(1))
}

/// Resample `source` with bilinear interpolation.
///
/// The result is always 24-bit, keeps the source's flip flags, resolution
/// and reporting mode, and has alpha 0 everywhere.
pub fn rescale(source: &Bitmap, mode: RescaleMode, dimension: u32) -> Result<Bitmap, BitmapError> {
    let (ow, oh) = (source.abs_width(), source.abs_height());
    let (nw, nh) = target_size(ow, oh, mode, dimension);
    let too_large = BitmapError::DimensionsTooLarge {
        width: u64::from(nw),
        height: u64::from(nh),
    };
    let signed = |n: u32, flipped: bool| -> Option<i32> {
        let n = i32::try_from(n).ok()?;
        Some(if flipped { -n } else { n })
    };
    let (Some(sw), Some(sh)) = (
        signed(nw, source.is_flipped_horizontally()),
        signed(nh, source.is_flipped_vertically()),
    ) else {
        return Err(too_large);
    };
    log::debug!("rescale {ow}x{oh} -> {nw}x{nh} ({mode:?} {dimension})");

    let mut out = Bitmap::with_size(sw, sh, BitDepth::TwentyFour)?;
    out.set_reporting(source.reporting());
    let (x_ppm, y_ppm) = source.pels_per_meter();
    out.set_pels_per_meter(x_ppm, y_ppm);

    let (ow, oh, nw, nh) = (ow as usize, oh as usize, nw as usize, nh as usize);
    let pixels = source.pixels();
    let src = |x: usize, y: usize| pixels[y.min(oh - 1) * ow + x.min(ow - 1)];

    for j in 0..nh.saturating_sub(1) {
        let (y, tj) = position(j, oh, nh);
        let row = out.row_mut(j);
        for i in 0..nw - 1 {
            let (x, ti) = position(i, ow, nw);
            row[i] = bilinear(
                src(x, y),
                src(x + 1, y),
                src(x, y + 1),
                src(x + 1, y + 1),
                ti,
                tj,
            );
        }
        row[nw - 1] = lerp(src(ow - 1, y), src(ow - 1, y + 1), tj);
    }

    let last = out.row_mut(nh - 1);
    for i in 0..nw - 1 {
        let (x, ti) = position(i, ow, nw);
        last[i] = lerp(src(x, oh - 1), src(x + 1, oh - 1), ti);
    }
    let corner = src(ow - 1, oh - 1);
    last[nw - 1] = Pixel::rgb(corner.red, corner.green, corner.blue);

    Ok(out)
}

/// Source coordinate of output index `t`: the integer part and the fraction.
fn position(t: usize, old: usize, new: usize) -> (usize, f64) {
    let theta = t as f64 * (old as f64 - 1.0) / (new as f64 - 1.0);
    let base = theta as usize;
    (base, theta - base as f64)
}

fn lerp(a: Pixel, b: Pixel, t: f64) -> Pixel {
    let mix = |a: u8, b: u8| ((1.0 - t) * f64::from(a) + t * f64::from(b)) as u8;
    Pixel::rgb(mix(a.red, b.red), mix(a.green, b.green), mix(a.blue, b.blue))
}

fn bilinear(p00: Pixel, p10: Pixel, p01: Pixel, p11: Pixel, ti: f64, tj: f64) -> Pixel {
    let w00 = 1.0 - ti - tj + ti * tj;
    let w10 = ti - ti * tj;
    let w01 = tj - ti * tj;
    let w11 = ti * tj;
    let mix = |a: u8, b: u8, c: u8, d: u8| {
        (w00 * f64::from(a) + w10 * f64::from(b) + w01 * f64::from(c) + w11 * f64::from(d)) as u8
    };
    Pixel::rgb(
        mix(p00.red, p10.red, p01.red, p11.red),
        mix(p00.green, p10.green, p01.green, p11.green),
        mix(p00.blue, p10.blue, p01.blue, p11.blue),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn mode_codes() {
        assert_eq!(RescaleMode::from_code('P').unwrap(), RescaleMode::Percentage);
        assert_eq!(RescaleMode::try_from('w').unwrap(), RescaleMode::FixedWidth);
        assert_eq!(RescaleMode::from_code('H').unwrap(), RescaleMode::FixedHeight);
        assert_eq!(RescaleMode::from_code('f').unwrap(), RescaleMode::FitLongestSide);
        assert_eq!(
            RescaleMode::from_code('x').unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn target_sizes() {
        assert_eq!(target_size(200, 100, RescaleMode::Percentage, 50), (100, 50));
        assert_eq!(target_size(200, 100, RescaleMode::FixedWidth, 50), (50, 25));
        assert_eq!(target_size(200, 100, RescaleMode::FixedHeight, 50), (100, 50));
        assert_eq!(target_size(200, 100, RescaleMode::FitLongestSide, 20), (20, 10));
        assert_eq!(target_size(100, 200, RescaleMode::FitLongestSide, 20), (10, 20));
        assert_eq!(target_size(30, 30, RescaleMode::FitLongestSide, 7), (7, 7));
        assert_eq!(target_size(3, 7, RescaleMode::FixedWidth, 1), (1, 2));
        assert_eq!(target_size(10, 10, RescaleMode::Percentage, 1), (1, 1));
        assert_eq!(target_size(10, 1000, RescaleMode::FixedHeight, 5), (1, 5));
    }

    #[test]
    fn same_size_is_identity_on_rgb() {
        let mut b = Bitmap::with_size(3, 2, BitDepth::ThirtyTwo).unwrap();
        for (i, p) in b.pixels_mut().iter_mut().enumerate() {
            *p = Pixel::new(i as u8 * 40, 255 - i as u8 * 40, 7, 200);
        }
        let r = rescale(&b, RescaleMode::Percentage, 100).unwrap();
        assert_eq!(r.bit_depth(), BitDepth::TwentyFour);
        for (a, b) in r.pixels().iter().zip(b.pixels()) {
            assert!(a.same_rgb(*b), "{a:?} vs {b:?}");
            assert_eq!(a.alpha, 0);
        }
    }

    #[test]
    fn upscale_interpolates_between_neighbors() {
        let mut b = Bitmap::with_size(2, 1, BitDepth::TwentyFour).unwrap();
        b.set_pixel(0, 0, Pixel::BLACK).unwrap();
        let r = rescale(&b, RescaleMode::FixedWidth, 3).unwrap();
        assert_eq!((r.width(), r.height()), (3, 1));
        assert_eq!(
            r.pixels(),
            &[Pixel::BLACK, Pixel::rgb(127, 127, 127), Pixel::WHITE]
        );
    }

    #[test]
    fn last_row_interpolates_horizontally() {
        // 2x2: bottom row black then white.
        let mut b = Bitmap::with_size(2, 2, BitDepth::TwentyFour).unwrap();
        b.set_pixel(0, 1, Pixel::BLACK).unwrap();
        let r = rescale(&b, RescaleMode::FixedWidth, 3).unwrap();
        assert_eq!((r.width(), r.height()), (3, 3));
        assert_eq!(r.pixel(1, 2).unwrap(), Pixel::rgb(127, 127, 127));
        assert_eq!(r.pixel(0, 2).unwrap(), Pixel::BLACK);
        assert_eq!(r.pixel(2, 2).unwrap(), Pixel::WHITE);
        // Left column blends from white (top) to black (bottom).
        assert_eq!(r.pixel(0, 1).unwrap(), Pixel::rgb(127, 127, 127));
    }

    #[test]
    fn downscale_to_one_pixel_takes_the_corner() {
        let mut b = Bitmap::with_size(4, 4, BitDepth::Eight).unwrap();
        b.set_pixel(3, 3, Pixel::new(1, 2, 3, 9)).unwrap();
        b.set_dpi(300, 300);
        let r = rescale(&b, RescaleMode::Percentage, 10).unwrap();
        assert_eq!((r.width(), r.height()), (1, 1));
        assert_eq!(r.pixels(), &[Pixel::rgb(1, 2, 3)]);
        assert_eq!(r.pels_per_meter(), b.pels_per_meter());
    }

    #[test]
    fn flips_are_preserved() {
        let b = Bitmap::with_size(-4, -2, BitDepth::TwentyFour).unwrap();
        let r = rescale(&b, RescaleMode::Percentage, 50).unwrap();
        assert_eq!((r.width(), r.height()), (-2, -1));
    }
}
