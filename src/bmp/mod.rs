//! Windows BMP container: headers, row packing, decoder and encoder.
//!
//! Use the top-level [`crate::decode`] and [`crate::encode`] entry points;
//! this module exposes the raw header types for inspection.

mod cursor;
mod decode;
mod encode;
mod header;
mod row;
mod utils;

pub use header::{Compression, FileHeader, HEADERS_SIZE, Headers, InfoHeader, SIGNATURE};
pub use utils::BitMasks;

pub(crate) use cursor::Cursor;
pub(crate) use decode::decode_bitmap;
pub(crate) use encode::encode_bitmap;
