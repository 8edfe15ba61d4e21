//! Byte Reader Module
//!
//! A cursor over an immutable input buffer providing sized reads that fail
//! with a distinguished incomplete-data signal when the buffer is exhausted
//! mid-operation. No I/O: this type only ever slices an in-memory buffer
//! the caller already owns.

use crate::error::IncompleteData;

pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Advance the cursor by `n` bytes without reading them (used after an
    /// external reader, e.g. a deflate decoder, has already consumed bytes
    /// from `remaining()` directly).
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn peek_u8(&self) -> Result<u8, IncompleteData> {
        self.remaining()
            .first()
            .copied()
            .ok_or_else(|| IncompleteData::new(1, 0))
    }

    pub fn read_u8(&mut self) -> Result<u8, IncompleteData> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], IncompleteData> {
        let available = self.remaining();
        if available.len() < n {
            return Err(IncompleteData::new(n, available.len()));
        }
        let (taken, _) = available.split_at(n);
        self.pos += n;
        Ok(taken)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, IncompleteData> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, IncompleteData> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i32_be(&mut self) -> Result<i32, IncompleteData> {
        Ok(self.read_u32_be()? as i32)
    }

    pub fn read_u64_be(&mut self) -> Result<u64, IncompleteData> {
        let bytes = self.read_bytes(8)?;
        let mut array = [0u8; 8];
        array.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bytes_in_order() {
        let mut reader = ByteReader::new(&[1, 2, 3, 4]);
        assert_eq!(reader.read_u8().unwrap(), 1);
        assert_eq!(reader.read_bytes(2).unwrap(), &[2, 3]);
        assert_eq!(reader.remaining(), &[4]);
    }

    #[test]
    fn incomplete_read_reports_shortfall() {
        let mut reader = ByteReader::new(&[1]);
        let err = reader.read_u16_be().unwrap_err();
        assert_eq!(err.needed, 2);
        assert_eq!(err.available, 1);
        assert_eq!(err.shortfall(), 1);
    }

    #[test]
    fn peek_does_not_advance() {
        let reader = ByteReader::new(&[9]);
        assert_eq!(reader.peek_u8().unwrap(), 9);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn empty_buffer_is_incomplete() {
        let reader = ByteReader::new(&[]);
        assert!(reader.peek_u8().is_err());
    }
}
