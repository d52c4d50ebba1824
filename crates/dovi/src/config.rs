use std::io;

use bytes_util::{BitReader, BitWriter, ReservedBits, fits_in_bits};
use tracing::debug;

use crate::{DoviError, Result};

/// Encoded size of every Dolby Vision configuration record.
pub const RECORD_SIZE: u64 = 24;

/// `const unsigned int(28) reserved = 0` after `dv_bl_signal_compatibility_id`.
pub const RESERVED_TRAILING_BITS: ReservedBits = ReservedBits::zeros(28);
/// Each of the four `const unsigned int(32) reserved = 0` words closing the record.
pub const RESERVED_WORD: ReservedBits = ReservedBits::zeros(32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Dolby Vision Decoder Configuration Record.
///
/// Dolby Vision Streams Within the ISO Base Media File Format - 3.2
pub struct DOVIDecoderConfigurationRecord {
    /// `dv_version_major`
    pub dv_version_major: u8,
    /// `dv_version_minor`
    pub dv_version_minor: u8,
    /// `dv_profile` (7 bits)
    pub dv_profile: u8,
    /// `dv_level` (6 bits)
    pub dv_level: u8,
    /// `rpu_present_flag`
    pub rpu_present_flag: bool,
    /// `el_present_flag`
    pub el_present_flag: bool,
    /// `bl_present_flag`
    pub bl_present_flag: bool,
    /// `dv_bl_signal_compatibility_id` (4 bits)
    pub dv_bl_signal_compatibility_id: u8,
}

impl DOVIDecoderConfigurationRecord {
    /// Demuxes a record from exactly 24 bytes of the reader.
    ///
    /// The reserved bits are consumed and ignored.
    pub fn demux<R: io::Read>(reader: &mut R) -> Result<Self> {
        let mut bit_reader = BitReader::new(reader);

        let dv_version_major = bit_reader.read_u8()?;
        let dv_version_minor = bit_reader.read_u8()?;
        let dv_profile = bit_reader.read_bits(7)? as u8;
        let dv_level = bit_reader.read_bits(6)? as u8;
        let rpu_present_flag = bit_reader.read_bit()?;
        let el_present_flag = bit_reader.read_bit()?;
        let bl_present_flag = bit_reader.read_bit()?;
        let dv_bl_signal_compatibility_id = bit_reader.read_bits(4)? as u8;

        let mut non_zero = bit_reader.read_reserved(RESERVED_TRAILING_BITS)? != 0;
        for _ in 0..4 {
            non_zero |= bit_reader.read_reserved(RESERVED_WORD)? != 0;
        }

        if non_zero {
            debug!(dv_profile, "non-zero reserved bits in Dolby Vision configuration");
        }

        Ok(Self {
            dv_version_major,
            dv_version_minor,
            dv_profile,
            dv_level,
            rpu_present_flag,
            el_present_flag,
            bl_present_flag,
            dv_bl_signal_compatibility_id,
        })
    }

    /// Always 24.
    pub const fn size(&self) -> u64 {
        RECORD_SIZE
    }

    /// Muxes the record, writing zero into every reserved bit.
    pub fn mux<T: io::Write>(&self, writer: &mut T) -> Result<()> {
        check_width("dv_profile", self.dv_profile, 7)?;
        check_width("dv_level", self.dv_level, 6)?;
        check_width(
            "dv_bl_signal_compatibility_id",
            self.dv_bl_signal_compatibility_id,
            4,
        )?;

        let mut bit_writer = BitWriter::new(writer);

        bit_writer.write_u8(self.dv_version_major)?;
        bit_writer.write_u8(self.dv_version_minor)?;
        bit_writer.write_bits(self.dv_profile as u64, 7)?;
        bit_writer.write_bits(self.dv_level as u64, 6)?;
        bit_writer.write_bit(self.rpu_present_flag)?;
        bit_writer.write_bit(self.el_present_flag)?;
        bit_writer.write_bit(self.bl_present_flag)?;
        bit_writer.write_bits(self.dv_bl_signal_compatibility_id as u64, 4)?;

        bit_writer.write_reserved(RESERVED_TRAILING_BITS)?;
        for _ in 0..4 {
            bit_writer.write_reserved(RESERVED_WORD)?;
        }

        bit_writer.finish()?;

        Ok(())
    }

    /// The box type carrying this record: `dvcC` up to profile 7, `dvvC` for
    /// profiles 8 to 10 and `dvwC` above.
    pub const fn config_box_fourcc(&self) -> [u8; 4] {
        match self.dv_profile {
            0..=7 => *b"dvcC",
            8..=10 => *b"dvvC",
            _ => *b"dvwC",
        }
    }

    /// Returns the RFC 6381 `codecs` parameter for this record, e.g. `dvh1.05.03`.
    ///
    /// `sample_entry` is the sample entry FourCC (`dvh1`, `dvhe`, `dav1`, ...).
    pub fn codec_string(&self, sample_entry: &str) -> String {
        format!("{sample_entry}.{:02}.{:02}", self.dv_profile, self.dv_level)
    }
}

fn check_width(field: &'static str, value: u8, bits: u8) -> Result<()> {
    if fits_in_bits(value as u64, bits) {
        Ok(())
    } else {
        Err(DoviError::FieldOverflow {
            field,
            value: value as u64,
            bits,
        })
    }
}
