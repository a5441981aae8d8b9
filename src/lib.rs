//! # zenbmp
//!
//! Windows BMP reader and writer built around an editable in-memory
//! [`Bitmap`].
//!
//! ## Supported Formats
//!
//! - **1, 4, 8-bit** indexed, with the color table read from the file
//!   (short tables are padded with white)
//! - **16-bit** with bit-field masks, defaulting to 5-5-5
//! - **24-bit** BGR and **32-bit** BGRA
//! - Bottom-up and top-down row order; writing mirrors horizontally flipped bitmaps
//!
//! Writing always emits a 40-byte info header, uncompressed rows, the
//! standard or user palette for indexed depths, and explicit 5-5-5 masks for
//! 16-bit images. Indexed output quantizes each pixel to its nearest palette
//! entry.
//!
//! ## Non-Goals
//!
//! - RLE4/RLE8 compression (rejected with [`BitmapError::UnsupportedCompression`])
//! - OS/2 core headers
//! - Color management, embedded ICC profiles
//!
//! ## Usage
//!
//! ```no_run
//! use zenbmp::{BitDepth, Bitmap, DecodeRequest, EncodeRequest, Pixel, Unstoppable};
//!
//! let data: &[u8] = &[]; // your BMP bytes
//!
//! // Probe without decoding
//! let info = zenbmp::BitmapInfo::from_bytes(data)?;
//! println!("{}x{} {:?}", info.width(), info.height(), info.bit_depth());
//!
//! let mut bitmap = DecodeRequest::new(data).decode(Unstoppable)?;
//! bitmap.set_pixel(0, 0, Pixel::rgb(255, 0, 0))?;
//!
//! // Re-encode as 8-bit against the standard palette
//! let encoded = EncodeRequest::new(&bitmap)
//!     .with_bit_depth(BitDepth::Eight)
//!     .encode(Unstoppable)?;
//!
//! let half = zenbmp::rescale(&bitmap, zenbmp::RescaleMode::Percentage, 50)?;
//! # let _ = (encoded, half, Bitmap::new());
//! # Ok::<(), zenbmp::BitmapError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bitmap;
mod copy;
mod error;
mod info;
mod limits;
mod palette;
mod pixel;
mod resample;

pub mod bmp;

mod decode;
mod encode;

// Re-exports
pub use bitmap::{Bitmap, DEFAULT_PELS_PER_METER, Reporting};
pub use copy::{Region, copy_pixel, copy_pixel_keyed, copy_region, copy_region_keyed};
#[cfg(feature = "std")]
pub use decode::decode_reader;
pub use decode::{DecodeRequest, decode};
#[cfg(feature = "std")]
pub use encode::encode_writer;
pub use encode::{EncodeRequest, encode};
pub use enough::{Stop, Unstoppable};
pub use error::{BitmapError, ErrorKind};
pub use info::BitmapInfo;
pub use limits::Limits;
pub use palette::ColorTable;
pub use pixel::{BitDepth, Pixel};
pub use resample::{RescaleMode, rescale, target_size};
