//! Sub-byte index packing and 16-bit channel masks.

/// Unpack MSB-first 1- or 4-bit palette indices into one byte each.
///
/// Writes `min(out.len(), input.len() * 8 / bits)` indices.
pub(crate) fn unpack_indices(bits: u16, input: &[u8], out: &mut [u8]) {
    if bits == 1 {
        let mut in_iter = input.iter();
        let mut out_iter = out.chunks_exact_mut(8);

        (&mut out_iter)
            .zip(&mut in_iter)
            .for_each(|(out_vals, &in_val)| {
                for (pos, out_val) in out_vals.iter_mut().enumerate() {
                    *out_val = (in_val >> (7 - pos)) & 0x01;
                }
            });

        if let Some(&in_val) = in_iter.next() {
            for (pos, out_val) in out_iter.into_remainder().iter_mut().enumerate() {
                *out_val = (in_val >> (7 - pos)) & 0x01;
            }
        }
    } else if bits == 4 {
        let mut in_iter = input.iter();
        let mut out_iter = out.chunks_exact_mut(2);

        (&mut out_iter)
            .zip(&mut in_iter)
            .for_each(|(out_vals, &in_val)| {
                out_vals[0] = in_val >> 4;
                out_vals[1] = in_val & 0x0f;
            });

        if let Some(&in_val) = in_iter.next() {
            if let Some(out_val) = out_iter.into_remainder().first_mut() {
                *out_val = in_val >> 4;
            }
        }
    }
}

/// Pack 1- or 4-bit palette indices MSB-first. `out` must be zeroed.
pub(crate) fn pack_indices(bits: u16, indices: &[u8], out: &mut [u8]) {
    if bits == 1 {
        for (out_val, chunk) in out.iter_mut().zip(indices.chunks(8)) {
            for (pos, &index) in chunk.iter().enumerate() {
                *out_val |= (index & 0x01) << (7 - pos);
            }
        }
    } else if bits == 4 {
        for (out_val, chunk) in out.iter_mut().zip(indices.chunks(2)) {
            *out_val = (chunk[0] & 0x0f) << 4;
            if let Some(&low) = chunk.get(1) {
                *out_val |= low & 0x0f;
            }
        }
    }
}

/// Red, green and blue bit masks of a 16-bit pixel word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitMasks {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Default for BitMasks {
    fn default() -> Self {
        Self::RGB555
    }
}

impl BitMasks {
    /// 5 bits per channel, top bit unused. Used when a 16-bit file carries no masks.
    pub const RGB555: Self = Self {
        red: 0x7C00,
        green: 0x03E0,
        blue: 0x001F,
    };

    /// 5-6-5.
    pub const RGB565: Self = Self {
        red: 0xF800,
        green: 0x07E0,
        blue: 0x001F,
    };

    pub(crate) fn channels(self) -> [Channel; 3] {
        [
            Channel::from_mask(self.red),
            Channel::from_mask(self.green),
            Channel::from_mask(self.blue),
        ]
    }
}

/// One channel of a [`BitMasks`]: the contiguous run of set bits starting at
/// the mask's lowest set bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Channel {
    shift: u32,
    bits: u32,
}

impl Channel {
    pub(crate) fn from_mask(mask: u16) -> Self {
        if mask == 0 {
            return Self { shift: 0, bits: 0 };
        }
        let shift = mask.trailing_zeros();
        let bits = (mask >> shift).trailing_ones();
        Self { shift, bits }
    }

    /// Extract this channel from `word` and scale it to 8 bits by shifting
    /// left. Fields wider than 8 bits keep their top 8.
    #[inline]
    pub(crate) fn expand(self, word: u16) -> u8 {
        if self.bits == 0 {
            return 0;
        }
        let field = (u32::from(word) >> self.shift) & ((1 << self.bits) - 1);
        if self.bits >= 8 {
            (field >> (self.bits - 8)) as u8
        } else {
            (field << (8 - self.bits)) as u8
        }
    }

    /// Truncate an 8-bit value to this channel's width and shift it into place.
    #[inline]
    pub(crate) fn pack(self, value: u8) -> u16 {
        if self.bits == 0 {
            return 0;
        }
        let field = if self.bits >= 8 {
            u32::from(value) << (self.bits - 8)
        } else {
            u32::from(value) >> (8 - self.bits)
        };
        (field << self.shift) as u16
    }
}
