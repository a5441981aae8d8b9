//! Little-endian read cursor over a byte slice.
//!
//! Every multi-byte value is assembled with `from_le_bytes`, so fields come
//! out in host order on both little- and big-endian targets.

use crate::error::BitmapError;

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub(crate) fn set_position(&mut self, pos: usize) -> Result<(), BitmapError> {
        if pos > self.data.len() {
            return Err(BitmapError::UnexpectedEof);
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), BitmapError> {
        let new_pos = self.pos.checked_add(n).ok_or(BitmapError::UnexpectedEof)?;
        self.set_position(new_pos)
    }

    /// Borrow the next `n` bytes.
    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], BitmapError> {
        let end = self.pos.checked_add(n).ok_or(BitmapError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(BitmapError::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], BitmapError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    pub(crate) fn read_u16_le(&mut self) -> Result<u16, BitmapError> {
        self.read_fixed_bytes().map(u16::from_le_bytes)
    }

    pub(crate) fn read_u32_le(&mut self) -> Result<u32, BitmapError> {
        self.read_fixed_bytes().map(u32::from_le_bytes)
    }

    pub(crate) fn read_i32_le(&mut self) -> Result<i32, BitmapError> {
        self.read_fixed_bytes().map(i32::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields() {
        let data = [0x42, 0x4D, 0x78, 0x56, 0x34, 0x12, 0xFE, 0xFF, 0xFF, 0xFF];
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_u16_le().unwrap(), 0x4D42);
        assert_eq!(c.read_u32_le().unwrap(), 0x1234_5678);
        assert_eq!(c.read_i32_le().unwrap(), -2);
        assert_eq!(c.remaining(), 0);
        assert!(matches!(c.read_u16_le(), Err(BitmapError::UnexpectedEof)));
    }

    #[test]
    fn take_does_not_advance_on_failure() {
        let data = [1u8, 2, 3];
        let mut c = Cursor::new(&data);
        c.skip(1).unwrap();
        assert!(c.take(3).is_err());
        assert_eq!(c.position(), 1);
        assert_eq!(c.take(2).unwrap(), &[2, 3]);
        assert!(c.set_position(4).is_err());
    }
}
