use std::io;

use crate::ReservedBits;

/// A big-endian bit reader.
///
/// Bits are consumed most significant first. Whenever the reader is aligned
/// to a byte boundary, reads of whole bytes go straight to the inner reader.
#[derive(Debug)]
pub struct BitReader<T> {
    data: T,
    bit_pos: u8,
    current_byte: u8,
}

impl<T: io::Read> BitReader<T> {
    /// Creates a new `BitReader` from a reader.
    pub const fn new(data: T) -> Self {
        Self {
            data,
            bit_pos: 0,
            current_byte: 0,
        }
    }

    /// Reads a single bit.
    pub fn read_bit(&mut self) -> io::Result<bool> {
        if self.is_aligned() {
            let mut byte = [0u8; 1];
            self.data.read_exact(&mut byte)?;
            self.current_byte = byte[0];
        }

        let bit = (self.current_byte >> (7 - self.bit_pos)) & 1 == 1;
        self.bit_pos = (self.bit_pos + 1) % 8;

        Ok(bit)
    }

    /// Reads `count` bits (at most 64) as an unsigned integer.
    pub fn read_bits(&mut self, count: u8) -> io::Result<u64> {
        if count > 64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot read more than 64 bits at once",
            ));
        }

        if self.is_aligned() && count % 8 == 0 {
            let len = (count / 8) as usize;
            let mut buf = [0u8; 8];
            self.data.read_exact(&mut buf[8 - len..])?;
            return Ok(u64::from_be_bytes(buf));
        }

        let mut bits = 0;
        for _ in 0..count {
            bits = (bits << 1) | self.read_bit()? as u64;
        }

        Ok(bits)
    }

    /// Reads an 8-bit unsigned integer.
    pub fn read_u8(&mut self) -> io::Result<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Reads a big-endian 16-bit unsigned integer.
    pub fn read_u16(&mut self) -> io::Result<u16> {
        Ok(self.read_bits(16)? as u16)
    }

    /// Reads a big-endian 32-bit unsigned integer.
    pub fn read_u32(&mut self) -> io::Result<u32> {
        Ok(self.read_bits(32)? as u32)
    }

    /// Consumes a reserved region and returns the bits found on the wire.
    ///
    /// The value is not checked against the mandated pattern; callers decide
    /// whether a mismatch matters.
    pub fn read_reserved(&mut self, reserved: ReservedBits) -> io::Result<u64> {
        self.read_bits(reserved.width())
    }

    /// Skips `count` bits.
    pub fn seek_bits(&mut self, count: u32) -> io::Result<()> {
        let mut remaining = count;
        while remaining > 0 {
            let step = remaining.min(64) as u8;
            self.read_bits(step)?;
            remaining -= step as u32;
        }

        Ok(())
    }
}

impl<T> BitReader<T> {
    /// Returns `true` if the reader sits on a byte boundary.
    pub const fn is_aligned(&self) -> bool {
        self.bit_pos == 0
    }

    /// Returns a mutable reference to the inner reader.
    ///
    /// Reading through it while the bit reader is not aligned skips the
    /// unread bits of the current byte.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Consumes the bit reader and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl BitReader<io::Cursor<Vec<u8>>> {
    /// Creates a bit reader over an owned copy of `data`.
    pub fn new_from_slice(data: impl AsRef<[u8]>) -> Self {
        Self::new(io::Cursor::new(data.as_ref().to_vec()))
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_across_bytes() {
        let mut reader = BitReader::new_from_slice([0b1011_0110, 0b0101_1111]);

        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(3).unwrap(), 0b110);
        assert_eq!(reader.read_bits(6).unwrap(), 0b110_010);
        assert!(!reader.is_aligned());
        assert_eq!(reader.read_bits(5).unwrap(), 0b11111);
        assert!(reader.is_aligned());
    }

    #[test]
    fn test_aligned_whole_bytes() {
        let mut reader = BitReader::new_from_slice([0x01, 0x60, 0x00, 0x00, 0x00, 0xAB, 0xCD]);

        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_u32().unwrap(), 0x6000_0000);
        assert_eq!(reader.read_u16().unwrap(), 0xABCD);
    }

    #[test]
    fn test_read_48_bits() {
        let mut reader = BitReader::new_from_slice([0xB0, 0x00, 0x50, 0xF0, 0x00, 0x00]);
        assert_eq!(reader.read_bits(48).unwrap(), 0xB000_50F0_0000);
    }

    #[test]
    fn test_read_reserved_returns_wire_value() {
        let mut reader = BitReader::new_from_slice([0b1010_0000]);
        let value = reader.read_reserved(ReservedBits::ones(4)).unwrap();
        assert_eq!(value, 0b1010);
        assert!(!ReservedBits::ones(4).matches(value));
        assert_eq!(reader.read_bits(4).unwrap(), 0);
    }

    #[test]
    fn test_truncated() {
        let mut reader = BitReader::new_from_slice([0xFF]);
        let err = reader.read_u16().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let mut reader = BitReader::new_from_slice([0xFF]);
        reader.read_bits(7).unwrap();
        let err = reader.read_bits(2).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_seek_bits() {
        let mut reader = BitReader::new_from_slice([0xFF; 12]);
        reader.seek_bits(88).unwrap();
        assert!(reader.is_aligned());
        reader.read_bits(3).unwrap();
        assert!(!reader.is_aligned());
        assert_eq!(reader.into_inner().position(), 12);
    }

    #[test]
    fn test_too_many_bits() {
        let mut reader = BitReader::new_from_slice([0u8; 16]);
        let err = reader.read_bits(65).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
