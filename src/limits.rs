use crate::error::BitmapError;
use crate::pixel::Pixel;

/// Resource limits applied while decoding, before the pixel buffer is allocated.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for the in-memory pixel buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check decoded dimensions (absolute values) against every limit.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), BitmapError> {
        if let Some(max_w) = self.max_width
            && u64::from(width) > max_w
        {
            return Err(BitmapError::LimitExceeded(alloc::format!(
                "width {width} exceeds limit {max_w}"
            )));
        }
        if let Some(max_h) = self.max_height
            && u64::from(height) > max_h
        {
            return Err(BitmapError::LimitExceeded(alloc::format!(
                "height {height} exceeds limit {max_h}"
            )));
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max_px) = self.max_pixels
            && pixels > max_px
        {
            return Err(BitmapError::LimitExceeded(alloc::format!(
                "pixel count {pixels} exceeds limit {max_px}"
            )));
        }
        let bytes = pixels.saturating_mul(core::mem::size_of::<Pixel>() as u64);
        if let Some(max_mem) = self.max_memory_bytes
            && bytes > max_mem
        {
            return Err(BitmapError::LimitExceeded(alloc::format!(
                "pixel buffer of {bytes} bytes exceeds memory limit {max_mem}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited() {
        assert!(Limits::default().check(u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn memory_limit_counts_four_bytes_per_pixel() {
        let limits = Limits {
            max_memory_bytes: Some(16),
            ..Default::default()
        };
        assert!(limits.check(2, 2).is_ok());
        assert!(matches!(
            limits.check(3, 2),
            Err(BitmapError::LimitExceeded(_))
        ));
    }
}
