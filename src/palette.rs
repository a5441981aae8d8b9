//! Color tables for the indexed bit depths and nearest-color quantization.

use alloc::vec::Vec;

use crate::error::BitmapError;
use crate::pixel::{BitDepth, Pixel};

/// An ordered palette of exactly `2^depth` entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable {
    entries: Vec<Pixel>,
}

/// Overrides applied on top of the 8-bit color cube, as `(index, r, g, b)`.
const STANDARD_8BIT_LOW: [(usize, u8, u8, u8); 3] =
    [(7, 192, 192, 192), (8, 192, 220, 192), (9, 166, 202, 240)];

const STANDARD_8BIT_HIGH: [(usize, u8, u8, u8); 10] = [
    (246, 255, 251, 240),
    (247, 160, 160, 164),
    (248, 128, 128, 128),
    (249, 255, 0, 0),
    (250, 0, 255, 0),
    (251, 255, 255, 0),
    (252, 0, 0, 255),
    (253, 255, 0, 255),
    (254, 0, 255, 255),
    (255, 255, 255, 255),
];

impl ColorTable {
    /// The default Windows palette for an indexed depth, or `None` for 16/24/32.
    ///
    /// * 1-bit: black, white.
    /// * 4-bit: the half-intensity RGB cube (0/128) followed by the
    ///   full-intensity cube (0/255), with the duplicate black at index 8
    ///   replaced by light gray (192,192,192).
    /// * 8-bit: an 8×8×4 cube (red and green step 32, blue steps 64) whose
    ///   first ten and last ten entries are the fixed system colors.
    pub fn standard(depth: BitDepth) -> Option<Self> {
        let entries = match depth {
            BitDepth::One => alloc::vec![Pixel::BLACK, Pixel::WHITE],
            BitDepth::Four => {
                let mut entries = Vec::with_capacity(16);
                for level in [128u8, 255] {
                    for b in 0..2u8 {
                        for g in 0..2u8 {
                            for r in 0..2u8 {
                                entries.push(Pixel::rgb(r * level, g * level, b * level));
                            }
                        }
                    }
                }
                entries[8] = Pixel::rgb(192, 192, 192);
                entries
            }
            BitDepth::Eight => {
                let mut entries = Vec::with_capacity(256);
                for b in 0..4u8 {
                    for g in 0..8u8 {
                        for r in 0..8u8 {
                            entries.push(Pixel::rgb(r * 32, g * 32, b * 64));
                        }
                    }
                }
                let mut i = 0;
                for b in 0..2u8 {
                    for g in 0..2u8 {
                        for r in 0..2u8 {
                            entries[i] = Pixel::rgb(r * 128, g * 128, b * 128);
                            i += 1;
                        }
                    }
                }
                for (index, r, g, b) in STANDARD_8BIT_LOW.into_iter().chain(STANDARD_8BIT_HIGH) {
                    entries[index] = Pixel::rgb(r, g, b);
                }
                entries
            }
            _ => return None,
        };
        Some(Self { entries })
    }

    /// An evenly stepped gray ramp from black, or `None` for 16/24/32.
    pub fn grayscale(depth: BitDepth) -> Option<Self> {
        if !depth.is_indexed() {
            return None;
        }
        let len = depth.palette_len();
        let step = if len == 2 { 255 } else { 255 / (len - 1) };
        let entries = (0..len)
            .map(|i| {
                let v = (i * step) as u8;
                Pixel::rgb(v, v, v)
            })
            .collect();
        Some(Self { entries })
    }

    /// A table of `2^depth` entries all set to white.
    pub(crate) fn filled_white(depth: BitDepth) -> Option<Self> {
        depth.is_indexed().then(|| Self {
            entries: alloc::vec![Pixel::WHITE; depth.palette_len()],
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Pixel] {
        &self.entries
    }

    /// Entry at `index`; indices past the end clamp to the last entry.
    #[inline]
    pub(crate) fn lookup(&self, index: usize) -> Pixel {
        self.entries
            .get(index)
            .or_else(|| self.entries.last())
            .copied()
            .unwrap_or_default()
    }

    pub fn get(&self, index: usize) -> Result<Pixel, BitmapError> {
        self.entries
            .get(index)
            .copied()
            .ok_or(BitmapError::ColorIndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub fn set(&mut self, index: usize, color: Pixel) -> Result<(), BitmapError> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(BitmapError::ColorIndexOutOfRange { index, len })?;
        *slot = color;
        Ok(())
    }

    /// Index of the entry nearest to `pixel` by squared RGB distance.
    ///
    /// Ties go to the lowest index; an exact match ends the scan.
    #[inline]
    pub fn closest_index(&self, pixel: Pixel) -> u8 {
        self.closest_index_counted(pixel).0
    }

    /// [`closest_index`](Self::closest_index) plus the number of entries compared.
    pub fn closest_index_counted(&self, pixel: Pixel) -> (u8, usize) {
        let mut best = 0usize;
        let mut best_distance = u32::MAX;
        let mut compared = 0;
        for (i, entry) in self.entries.iter().enumerate() {
            compared += 1;
            let distance = entry.distance_sq(pixel);
            if distance < best_distance {
                best = i;
                best_distance = distance;
                if distance == 0 {
                    break;
                }
            }
        }
        (best as u8, compared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_have_power_of_two_length() {
        for depth in BitDepth::ALL {
            match ColorTable::standard(depth) {
                Some(table) => assert_eq!(table.len(), depth.palette_len()),
                None => assert!(!depth.is_indexed()),
            }
        }
    }

    #[test]
    fn standard_4bit_table() {
        let t = ColorTable::standard(BitDepth::Four).unwrap();
        let expected = [
            (0, 0, 0),
            (128, 0, 0),
            (0, 128, 0),
            (128, 128, 0),
            (0, 0, 128),
            (128, 0, 128),
            (0, 128, 128),
            (128, 128, 128),
            (192, 192, 192),
            (255, 0, 0),
            (0, 255, 0),
            (255, 255, 0),
            (0, 0, 255),
            (255, 0, 255),
            (0, 255, 255),
            (255, 255, 255),
        ];
        for (i, (r, g, b)) in expected.into_iter().enumerate() {
            assert_eq!(t.entries()[i], Pixel::rgb(r, g, b), "entry {i}");
        }
    }

    #[test]
    fn standard_8bit_system_colors() {
        let t = ColorTable::standard(BitDepth::Eight).unwrap();
        let e = t.entries();
        assert_eq!(e[0], Pixel::rgb(0, 0, 0));
        assert_eq!(e[1], Pixel::rgb(128, 0, 0));
        assert_eq!(e[6], Pixel::rgb(0, 128, 128));
        assert_eq!(e[7], Pixel::rgb(192, 192, 192));
        assert_eq!(e[8], Pixel::rgb(192, 220, 192));
        assert_eq!(e[9], Pixel::rgb(166, 202, 240));
        // Cube entries in between: index = r + 8*g + 64*b
        assert_eq!(e[10], Pixel::rgb(64, 32, 0));
        assert_eq!(e[64 + 8 * 3 + 5], Pixel::rgb(160, 96, 64));
        assert_eq!(e[245], Pixel::rgb(160, 192, 192));
        assert_eq!(e[246], Pixel::rgb(255, 251, 240));
        assert_eq!(e[247], Pixel::rgb(160, 160, 164));
        assert_eq!(e[248], Pixel::rgb(128, 128, 128));
        assert_eq!(e[252], Pixel::rgb(0, 0, 255));
        assert_eq!(e[255], Pixel::rgb(255, 255, 255));
        assert!(e.iter().all(|p| p.alpha == 0));
    }

    #[test]
    fn grayscale_ramp() {
        let t = ColorTable::grayscale(BitDepth::Four).unwrap();
        assert_eq!(t.entries()[1], Pixel::rgb(17, 17, 17));
        assert_eq!(t.entries()[15], Pixel::rgb(255, 255, 255));
        let t = ColorTable::grayscale(BitDepth::One).unwrap();
        assert_eq!(t.entries(), &[Pixel::BLACK, Pixel::WHITE]);
        assert!(ColorTable::grayscale(BitDepth::TwentyFour).is_none());
    }

    #[test]
    fn exact_match_stops_the_scan() {
        let t = ColorTable::standard(BitDepth::Eight).unwrap();
        let target = t.entries()[9];
        assert_eq!(t.closest_index_counted(target), (9, 10));
        assert_eq!(t.closest_index_counted(Pixel::BLACK), (0, 1));
    }

    #[test]
    fn no_match_scans_everything() {
        let t = ColorTable::standard(BitDepth::Eight).unwrap();
        let (idx, compared) = t.closest_index_counted(Pixel::rgb(1, 2, 3));
        assert_eq!(idx, 0);
        assert_eq!(compared, 256);
        let (idx, compared) = t.closest_index_counted(Pixel::rgb(250, 250, 250));
        assert_eq!(idx, 255);
        assert_eq!(compared, 256);
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let mut t = ColorTable::filled_white(BitDepth::One).unwrap();
        t.set(0, Pixel::rgb(0, 0, 0)).unwrap();
        t.set(1, Pixel::rgb(20, 0, 0)).unwrap();
        assert_eq!(t.closest_index(Pixel::rgb(10, 0, 0)), 0);
    }

    #[test]
    fn out_of_range_access() {
        let mut t = ColorTable::standard(BitDepth::One).unwrap();
        assert!(matches!(
            t.get(2),
            Err(BitmapError::ColorIndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(t.set(5, Pixel::BLACK).is_err());
        assert_eq!(t.lookup(7), Pixel::WHITE);
    }
}
