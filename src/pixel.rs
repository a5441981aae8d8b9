use crate::error::BitmapError;

/// One logical pixel: 8-bit red, green, blue and alpha.
///
/// Alpha is only meaningful for 32-bit images; every other depth leaves it at 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Pixel {
    /// The fill value of a freshly allocated pixel buffer.
    pub const WHITE: Pixel = Pixel::rgb(255, 255, 255);
    pub const BLACK: Pixel = Pixel::rgb(0, 0, 0);

    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque-by-convention color with alpha 0.
    #[inline]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 0)
    }

    /// Squared Euclidean distance over red, green and blue. Alpha is ignored.
    #[inline]
    pub const fn distance_sq(self, other: Pixel) -> u32 {
        let dr = self.red.abs_diff(other.red) as u32;
        let dg = self.green.abs_diff(other.green) as u32;
        let db = self.blue.abs_diff(other.blue) as u32;
        dr * dr + dg * dg + db * db
    }

    #[inline]
    pub const fn same_rgb(self, other: Pixel) -> bool {
        self.red == other.red && self.green == other.green && self.blue == other.blue
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGBA8> for Pixel {
    fn from(p: rgb::RGBA8) -> Self {
        Pixel::new(p.r, p.g, p.b, p.a)
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGB8> for Pixel {
    fn from(p: rgb::RGB8) -> Self {
        Pixel::rgb(p.r, p.g, p.b)
    }
}

#[cfg(feature = "rgb")]
impl From<Pixel> for rgb::RGBA8 {
    fn from(p: Pixel) -> Self {
        rgb::RGBA8::new(p.red, p.green, p.blue, p.alpha)
    }
}

/// Bits per pixel on disk.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 2-color palette.
    One,
    /// 16-color palette.
    Four,
    /// 256-color palette.
    Eight,
    /// Bit-field packed RGB in a 16-bit word.
    Sixteen,
    /// BGR, no alpha.
    #[default]
    TwentyFour,
    /// BGRA.
    ThirtyTwo,
}

impl BitDepth {
    pub const ALL: [BitDepth; 6] = [
        BitDepth::One,
        BitDepth::Four,
        BitDepth::Eight,
        BitDepth::Sixteen,
        BitDepth::TwentyFour,
        BitDepth::ThirtyTwo,
    ];

    pub const fn bits(self) -> u16 {
        match self {
            Self::One => 1,
            Self::Four => 4,
            Self::Eight => 8,
            Self::Sixteen => 16,
            Self::TwentyFour => 24,
            Self::ThirtyTwo => 32,
        }
    }

    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            1 => Some(Self::One),
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            24 => Some(Self::TwentyFour),
            32 => Some(Self::ThirtyTwo),
            _ => None,
        }
    }

    /// Whether this depth stores palette indices and carries a color table.
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::One | Self::Four | Self::Eight)
    }

    /// Number of representable colors: `2^bits`, with depth 32 reporting 2^24.
    pub const fn number_of_colors(self) -> usize {
        match self {
            Self::ThirtyTwo => 1 << 24,
            other => 1 << other.bits(),
        }
    }

    /// Size of the color table, or 0 when this depth has none.
    pub const fn palette_len(self) -> usize {
        if self.is_indexed() {
            1 << self.bits()
        } else {
            0
        }
    }

    /// On-disk bytes per row, padded to a multiple of 4.
    pub const fn row_stride(self, width: usize) -> usize {
        (width * self.bits() as usize).div_ceil(32) * 4
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = BitmapError;

    fn try_from(bits: u16) -> Result<Self, BitmapError> {
        Self::from_bits(bits).ok_or(BitmapError::UnsupportedBitDepth(bits))
    }
}
