//! Conversion between one on-disk row and one row of [`Pixel`]s.
//!
//! Disk column `i` holds logical column `i`, or `width - 1 - i` when the image
//! is horizontally flipped. Decode and encode use the same mapping.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use super::utils::{BitMasks, Channel, pack_indices, unpack_indices};
use crate::error::BitmapError;
use crate::palette::ColorTable;
use crate::pixel::{BitDepth, Pixel};

pub(crate) struct RowCodec<'a> {
    depth: BitDepth,
    width: usize,
    stride: usize,
    palette: Option<&'a ColorTable>,
    channels: [Channel; 3],
    flip_horizontal: bool,
    indices: Vec<u8>,
}

impl<'a> RowCodec<'a> {
    pub(crate) fn new(
        depth: BitDepth,
        width: usize,
        palette: Option<&'a ColorTable>,
        masks: BitMasks,
        flip_horizontal: bool,
    ) -> Result<Self, BitmapError> {
        if depth.is_indexed() && palette.is_none() {
            return Err(BitmapError::NoColorTable { depth: depth.bits() });
        }
        let indices = if depth.is_indexed() { vec![0u8; width] } else { Vec::new() };
        Ok(Self {
            depth,
            width,
            stride: depth.row_stride(width),
            palette,
            channels: masks.channels(),
            flip_horizontal,
            indices,
        })
    }

    pub(crate) fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    fn column(&self, i: usize) -> usize {
        if self.flip_horizontal {
            self.width - 1 - i
        } else {
            i
        }
    }

    /// Decode one stored row into `out` (exactly `width` pixels).
    ///
    /// 24- and 16-bit rows leave alpha untouched; 32-bit rows overwrite it.
    pub(crate) fn decode_row(&mut self, src: &[u8], out: &mut [Pixel]) -> Result<(), BitmapError> {
        if src.len() < self.stride {
            return Err(BitmapError::DataCorruption(format!(
                "row needs {} bytes, only {} available",
                self.stride,
                src.len()
            )));
        }
        let w = self.width;
        match self.depth {
            BitDepth::ThirtyTwo => {
                for (i, c) in src.chunks_exact(4).take(w).enumerate() {
                    out[self.column(i)] = Pixel::new(c[2], c[1], c[0], c[3]);
                }
            }
            BitDepth::TwentyFour => {
                for (i, c) in src.chunks_exact(3).take(w).enumerate() {
                    let p = &mut out[self.column(i)];
                    p.red = c[2];
                    p.green = c[1];
                    p.blue = c[0];
                }
            }
            BitDepth::Sixteen => {
                let [r, g, b] = self.channels;
                for (i, c) in src.chunks_exact(2).take(w).enumerate() {
                    let word = u16::from_le_bytes([c[0], c[1]]);
                    let p = &mut out[self.column(i)];
                    p.red = r.expand(word);
                    p.green = g.expand(word);
                    p.blue = b.expand(word);
                }
            }
            BitDepth::Eight | BitDepth::Four | BitDepth::One => {
                let mut indices = core::mem::take(&mut self.indices);
                if self.depth == BitDepth::Eight {
                    indices.copy_from_slice(&src[..w]);
                } else {
                    unpack_indices(self.depth.bits(), src, &mut indices);
                }
                if let Some(palette) = self.palette {
                    for (i, &index) in indices.iter().enumerate() {
                        out[self.column(i)] = palette.lookup(usize::from(index));
                    }
                }
                self.indices = indices;
            }
        }
        Ok(())
    }

    /// Encode `row` (exactly `width` pixels) into `dst`, which must be
    /// `stride` bytes and zeroed. Indexed depths quantize to the nearest
    /// palette entry.
    pub(crate) fn encode_row(&mut self, row: &[Pixel], dst: &mut [u8]) {
        let w = self.width;
        match self.depth {
            BitDepth::ThirtyTwo => {
                for (i, c) in dst.chunks_exact_mut(4).take(w).enumerate() {
                    let p = row[self.column(i)];
                    c.copy_from_slice(&[p.blue, p.green, p.red, p.alpha]);
                }
            }
            BitDepth::TwentyFour => {
                for (i, c) in dst.chunks_exact_mut(3).take(w).enumerate() {
                    let p = row[self.column(i)];
                    c.copy_from_slice(&[p.blue, p.green, p.red]);
                }
            }
            BitDepth::Sixteen => {
                let [r, g, b] = self.channels;
                for (i, c) in dst.chunks_exact_mut(2).take(w).enumerate() {
                    let p = row[self.column(i)];
                    let word = r.pack(p.red) | g.pack(p.green) | b.pack(p.blue);
                    c.copy_from_slice(&word.to_le_bytes());
                }
            }
            BitDepth::Eight | BitDepth::Four | BitDepth::One => {
                let Some(palette) = self.palette else {
                    return;
                };
                let mut indices = core::mem::take(&mut self.indices);
                for (i, index) in indices.iter_mut().enumerate() {
                    *index = palette.closest_index(row[self.column(i)]);
                }
                if self.depth == BitDepth::Eight {
                    dst[..w].copy_from_slice(&indices);
                } else {
                    pack_indices(self.depth.bits(), &indices, dst);
                }
                self.indices = indices;
            }
        }
    }
}
