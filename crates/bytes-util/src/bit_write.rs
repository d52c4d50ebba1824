use std::io;

use crate::{ReservedBits, fits_in_bits};

/// A big-endian bit writer.
///
/// Partial bytes are buffered until eight bits have been written. Call
/// [`BitWriter::finish`] to flush a trailing partial byte (zero padded).
#[derive(Debug)]
pub struct BitWriter<W> {
    bit_pos: u8,
    current_byte: u8,
    writer: W,
}

impl<W: io::Write> BitWriter<W> {
    /// Creates a new `BitWriter` from a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            bit_pos: 0,
            current_byte: 0,
            writer,
        }
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.current_byte |= 1 << (7 - self.bit_pos);
        }

        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.writer.write_all(&[self.current_byte])?;
            self.current_byte = 0;
            self.bit_pos = 0;
        }

        Ok(())
    }

    /// Writes the low `count` bits (at most 64) of `bits`.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`] if `bits` does not fit in
    /// `count` bits; the value is never silently truncated.
    pub fn write_bits(&mut self, bits: u64, count: u8) -> io::Result<()> {
        if count > 64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot write more than 64 bits at once",
            ));
        }

        if !fits_in_bits(bits, count) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("value {bits} does not fit in {count} bits"),
            ));
        }

        if self.is_aligned() && count % 8 == 0 {
            let len = (count / 8) as usize;
            return self.writer.write_all(&bits.to_be_bytes()[8 - len..]);
        }

        for i in (0..count).rev() {
            self.write_bit((bits >> i) & 1 == 1)?;
        }

        Ok(())
    }

    /// Writes an 8-bit unsigned integer.
    pub fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.write_bits(value as u64, 8)
    }

    /// Writes a big-endian 16-bit unsigned integer.
    pub fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.write_bits(value as u64, 16)
    }

    /// Writes a big-endian 32-bit unsigned integer.
    pub fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.write_bits(value as u64, 32)
    }

    /// Writes the mandated pattern of a reserved region.
    pub fn write_reserved(&mut self, reserved: ReservedBits) -> io::Result<()> {
        self.write_bits(reserved.value(), reserved.width())
    }

    /// Pads the current byte with zero bits, if it is partially written.
    pub fn align(&mut self) -> io::Result<()> {
        if !self.is_aligned() {
            self.write_bits(0, 8 - self.bit_pos)?;
        }

        Ok(())
    }

    /// Aligns the writer and returns the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.align()?;
        Ok(self.writer)
    }
}

impl<W> BitWriter<W> {
    /// Returns `true` if the writer sits on a byte boundary.
    pub const fn is_aligned(&self) -> bool {
        self.bit_pos == 0
    }
}

impl<W: io::Write> io::Write for BitWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.is_aligned() {
            return self.writer.write(buf);
        }

        for byte in buf {
            self.write_bits(*byte as u64, 8)?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
