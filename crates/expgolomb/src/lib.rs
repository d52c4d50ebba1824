//! Unsigned Exp-Golomb coding (`ue(v)`) over the bit cursors in `bytes-util`.
//!
//! Used when reading the handful of variable-length fields of a parameter set
//! that configuration records need.
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or
//! [Apache-2.0](./LICENSE.Apache-2.0) license. You can choose between one of
//! them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

use std::io;

use bytes_util::{BitReader, BitWriter};

/// Extension trait for reading Exp-Golomb encoded numbers from a bit reader.
pub trait BitReaderExpGolombExt {
    /// Reads an unsigned Exp-Golomb encoded number (`ue(v)`).
    fn read_exp_golomb(&mut self) -> io::Result<u64>;
}

impl<R: io::Read> BitReaderExpGolombExt for BitReader<R> {
    fn read_exp_golomb(&mut self) -> io::Result<u64> {
        let mut leading_zeros = 0u8;
        while !self.read_bit()? {
            leading_zeros += 1;
            if leading_zeros > 63 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "exp-golomb prefix longer than 63 bits",
                ));
            }
        }

        let suffix = self.read_bits(leading_zeros)?;
        Ok(((1u64 << leading_zeros) - 1) + suffix)
    }
}

/// Extension trait for writing Exp-Golomb encoded numbers to a bit writer.
pub trait BitWriterExpGolombExt {
    /// Writes an unsigned Exp-Golomb encoded number (`ue(v)`).
    fn write_exp_golomb(&mut self, input: u64) -> io::Result<()>;
}

impl<W: io::Write> BitWriterExpGolombExt for BitWriter<W> {
    fn write_exp_golomb(&mut self, input: u64) -> io::Result<()> {
        let value = input.checked_add(1).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "exp-golomb value out of range")
        })?;

        let bits = (64 - value.leading_zeros()) as u8;
        self.write_bits(0, bits - 1)?;
        self.write_bits(value, bits)
    }
}
