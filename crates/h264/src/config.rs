use std::io::{self, Write};

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use bytes_util::{BitReader, BitWriter, BytesCursorExt, ReservedBits};
use tracing::{debug, trace};

use crate::{H264Error, Result};

/// The only `configurationVersion` this crate reads or writes.
pub const CONFIGURATION_VERSION: u8 = 1;

/// `bit(6) reserved = '111111'b` ahead of `lengthSizeMinusOne`.
pub const RESERVED_LENGTH_SIZE: ReservedBits = ReservedBits::ones(6);
/// `bit(3) reserved = '111'b` ahead of `numOfSequenceParameterSets`.
pub const RESERVED_NUM_OF_SPS: ReservedBits = ReservedBits::ones(3);
/// `bit(6) reserved = '111111'b` ahead of `chroma_format`.
pub const RESERVED_CHROMA_FORMAT: ReservedBits = ReservedBits::ones(6);
/// `bit(5) reserved = '11111'b` ahead of each bit depth field.
pub const RESERVED_BIT_DEPTH: ReservedBits = ReservedBits::ones(5);

#[derive(Debug, Clone, PartialEq)]
/// AVC Decoder Configuration Record (`avcC` payload).
///
/// ISO/IEC 14496-15 - 5.3.3.1
pub struct AVCDecoderConfigurationRecord {
    /// `configurationVersion`, always 1.
    pub configuration_version: u8,
    /// `AVCProfileIndication`: `profile_idc` of the SPS.
    pub profile_indication: u8,
    /// `profile_compatibility`: the byte between `profile_idc` and `level_idc` in the SPS.
    pub profile_compatibility: u8,
    /// `AVCLevelIndication`: `level_idc` of the SPS.
    pub level_indication: u8,
    /// `lengthSizeMinusOne` (2 bits).
    pub length_size_minus_one: u8,
    /// Sequence parameter set NAL units, at most 31.
    pub sps: Vec<Bytes>,
    /// Picture parameter set NAL units, at most 255.
    pub pps: Vec<Bytes>,
    /// Present only for the high profiles (100, 110, 122, 144).
    pub extended_config: Option<AvccExtendedConfig>,
}

#[derive(Debug, Clone, PartialEq)]
/// The trailing section of an `avcC` record for high profiles.
pub struct AvccExtendedConfig {
    /// `chroma_format` (2 bits).
    pub chroma_format_idc: u8,
    /// `bit_depth_luma_minus8` (3 bits).
    pub bit_depth_luma_minus8: u8,
    /// `bit_depth_chroma_minus8` (3 bits).
    pub bit_depth_chroma_minus8: u8,
    /// Sequence parameter set extension NAL units, at most 255.
    pub sequence_parameter_set_ext: Vec<Bytes>,
}

impl Default for AvccExtendedConfig {
    /// 4:2:0, 8 bit, no SPS extensions.
    fn default() -> Self {
        Self {
            chroma_format_idc: 1,
            bit_depth_luma_minus8: 0,
            bit_depth_chroma_minus8: 0,
            sequence_parameter_set_ext: Vec::new(),
        }
    }
}

impl AVCDecoderConfigurationRecord {
    /// Returns `true` if the profile carries the extended section.
    pub const fn is_high_profile(profile_indication: u8) -> bool {
        matches!(profile_indication, 100 | 110 | 122 | 144)
    }

    /// Parses an AVC Decoder Configuration Record from the given reader.
    ///
    /// High profile records must carry the extended section; one that ends
    /// after the PPS array is [`H264Error::Truncated`].
    pub fn parse(reader: &mut io::Cursor<Bytes>) -> Result<Self> {
        let mut bit_reader = BitReader::new(reader);

        let configuration_version = bit_reader.read_u8()?;
        if configuration_version != CONFIGURATION_VERSION {
            return Err(H264Error::UnsupportedVersion(configuration_version));
        }

        let profile_indication = bit_reader.read_u8()?;
        let profile_compatibility = bit_reader.read_u8()?;
        let level_indication = bit_reader.read_u8()?;

        read_reserved(&mut bit_reader, RESERVED_LENGTH_SIZE, "length_size_minus_one")?;
        let length_size_minus_one = bit_reader.read_bits(2)? as u8;

        read_reserved(&mut bit_reader, RESERVED_NUM_OF_SPS, "num_of_sps")?;
        let num_of_sps = bit_reader.read_bits(5)? as usize;
        let sps = read_parameter_sets(bit_reader.get_mut(), num_of_sps)?;

        let num_of_pps = bit_reader.read_u8()? as usize;
        let pps = read_parameter_sets(bit_reader.get_mut(), num_of_pps)?;

        trace!(num_of_sps, num_of_pps, "avcC parameter sets decoded");

        let extended_config = if !Self::is_high_profile(profile_indication) {
            None
        } else {
            read_reserved(&mut bit_reader, RESERVED_CHROMA_FORMAT, "chroma_format")?;
            let chroma_format_idc = bit_reader.read_bits(2)? as u8;

            read_reserved(&mut bit_reader, RESERVED_BIT_DEPTH, "bit_depth_luma_minus8")?;
            let bit_depth_luma_minus8 = bit_reader.read_bits(3)? as u8;

            read_reserved(&mut bit_reader, RESERVED_BIT_DEPTH, "bit_depth_chroma_minus8")?;
            let bit_depth_chroma_minus8 = bit_reader.read_bits(3)? as u8;

            let num_of_sps_ext = bit_reader.read_u8()? as usize;
            let sequence_parameter_set_ext =
                read_parameter_sets(bit_reader.get_mut(), num_of_sps_ext)?;

            trace!(num_of_sps_ext, "avcC high profile section decoded");

            Some(AvccExtendedConfig {
                chroma_format_idc,
                bit_depth_luma_minus8,
                bit_depth_chroma_minus8,
                sequence_parameter_set_ext,
            })
        };

        Ok(AVCDecoderConfigurationRecord {
            configuration_version,
            profile_indication,
            profile_compatibility,
            level_indication,
            length_size_minus_one,
            sps,
            pps,
            extended_config,
        })
    }

    /// Returns the size of the AVC Decoder Configuration Record in bytes.
    pub fn size(&self) -> u64 {
        let mut size = 1 // configurationVersion
        + 1 // AVCProfileIndication
        + 1 // profile_compatibility
        + 1 // AVCLevelIndication
        + 1 // reserved, lengthSizeMinusOne
        + 1 // reserved, numOfSequenceParameterSets
        + parameter_sets_size(&self.sps)
        + 1 // numOfPictureParameterSets
        + parameter_sets_size(&self.pps);

        if let Some(ext) = &self.extended_config {
            size += 1 // reserved, chroma_format
            + 1 // reserved, bit_depth_luma_minus8
            + 1 // reserved, bit_depth_chroma_minus8
            + 1 // numOfSequenceParameterSetExt
            + parameter_sets_size(&ext.sequence_parameter_set_ext);
        }

        size
    }

    /// Builds the AVC Decoder Configuration Record into the given writer.
    ///
    /// `extended_config` must be set exactly when the profile is a high
    /// profile, otherwise [`H264Error::ExtendedConfigMismatch`] is returned
    /// before anything is written.
    pub fn build<T: io::Write>(&self, writer: &mut T) -> Result<()> {
        self.validate()?;

        let mut bit_writer = BitWriter::new(writer);

        bit_writer.write_u8(self.configuration_version)?;
        bit_writer.write_u8(self.profile_indication)?;
        bit_writer.write_u8(self.profile_compatibility)?;
        bit_writer.write_u8(self.level_indication)?;

        bit_writer.write_reserved(RESERVED_LENGTH_SIZE)?;
        bit_writer.write_bits(self.length_size_minus_one as u64, 2)?;

        bit_writer.write_reserved(RESERVED_NUM_OF_SPS)?;
        bit_writer.write_bits(self.sps.len() as u64, 5)?;
        write_parameter_sets(&mut bit_writer, &self.sps)?;

        bit_writer.write_u8(self.pps.len() as u8)?;
        write_parameter_sets(&mut bit_writer, &self.pps)?;

        if let Some(ext) = &self.extended_config {
            bit_writer.write_reserved(RESERVED_CHROMA_FORMAT)?;
            bit_writer.write_bits(ext.chroma_format_idc as u64, 2)?;

            bit_writer.write_reserved(RESERVED_BIT_DEPTH)?;
            bit_writer.write_bits(ext.bit_depth_luma_minus8 as u64, 3)?;

            bit_writer.write_reserved(RESERVED_BIT_DEPTH)?;
            bit_writer.write_bits(ext.bit_depth_chroma_minus8 as u64, 3)?;

            bit_writer.write_u8(ext.sequence_parameter_set_ext.len() as u8)?;
            write_parameter_sets(&mut bit_writer, &ext.sequence_parameter_set_ext)?;
        }

        bit_writer.finish()?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.configuration_version != CONFIGURATION_VERSION {
            return Err(H264Error::UnsupportedVersion(self.configuration_version));
        }

        if Self::is_high_profile(self.profile_indication) != self.extended_config.is_some() {
            return Err(H264Error::ExtendedConfigMismatch {
                profile_indication: self.profile_indication,
            });
        }

        H264Error::check_width("length_size_minus_one", self.length_size_minus_one as u64, 2)?;
        H264Error::check_width("num_of_sps", self.sps.len() as u64, 5)?;
        check_lengths("sps_length", &self.sps)?;
        H264Error::check_width("num_of_pps", self.pps.len() as u64, 8)?;
        check_lengths("pps_length", &self.pps)?;

        if let Some(ext) = &self.extended_config {
            H264Error::check_width("chroma_format_idc", ext.chroma_format_idc as u64, 2)?;
            H264Error::check_width(
                "bit_depth_luma_minus8",
                ext.bit_depth_luma_minus8 as u64,
                3,
            )?;
            H264Error::check_width(
                "bit_depth_chroma_minus8",
                ext.bit_depth_chroma_minus8 as u64,
                3,
            )?;
            H264Error::check_width(
                "num_of_sps_ext",
                ext.sequence_parameter_set_ext.len() as u64,
                8,
            )?;
            check_lengths("sps_ext_length", &ext.sequence_parameter_set_ext)?;
        }

        Ok(())
    }

    /// Returns the first SPS NAL unit of a raw `avcC` payload as a zero-copy
    /// slice, without parsing the rest of the record.
    pub fn first_sps_nalu_bytes(data: &Bytes) -> Result<Bytes> {
        if data.len() < 6 {
            return Err(H264Error::Truncated);
        }

        if data[0] != CONFIGURATION_VERSION {
            return Err(H264Error::UnsupportedVersion(data[0]));
        }

        if data[5] & 0b0001_1111 == 0 {
            return Err(H264Error::MissingParameterSet);
        }

        let length = data.get(6..8).ok_or(H264Error::Truncated)?;
        let length = BigEndian::read_u16(length) as usize;
        if data.len() < 8 + length {
            return Err(H264Error::Truncated);
        }

        Ok(data.slice(8..8 + length))
    }

    /// Returns the RFC 6381 `codecs` parameter for this record, e.g. `avc1.64001F`.
    ///
    /// `sample_entry` is the sample entry FourCC (`avc1`, `avc3`, ...).
    pub fn codec_string(&self, sample_entry: &str) -> String {
        format!(
            "{sample_entry}.{:02X}{:02X}{:02X}",
            self.profile_indication, self.profile_compatibility, self.level_indication
        )
    }
}

fn read_reserved<R: io::Read>(
    reader: &mut BitReader<R>,
    reserved: ReservedBits,
    field: &'static str,
) -> io::Result<()> {
    let value = reader.read_reserved(reserved)?;
    if !reserved.matches(value) {
        debug!(
            field,
            value,
            expected = reserved.value(),
            "non-conformant reserved bits in avcC"
        );
    }

    Ok(())
}

fn read_parameter_sets(reader: &mut io::Cursor<Bytes>, count: usize) -> io::Result<Vec<Bytes>> {
    let mut parameter_sets = Vec::with_capacity(count);
    for _ in 0..count {
        let length = BigEndian::read_u16(&reader.extract_bytes(2)?) as usize;
        parameter_sets.push(reader.extract_bytes(length)?);
    }

    Ok(parameter_sets)
}

fn write_parameter_sets<W: io::Write>(
    writer: &mut BitWriter<W>,
    parameter_sets: &[Bytes],
) -> io::Result<()> {
    for parameter_set in parameter_sets {
        writer.write_u16(parameter_set.len() as u16)?;
        writer.write_all(parameter_set)?;
    }

    Ok(())
}

fn parameter_sets_size(parameter_sets: &[Bytes]) -> u64 {
    parameter_sets
        .iter()
        .map(|parameter_set| 2 + parameter_set.len() as u64)
        .sum()
}

fn check_lengths(field: &'static str, parameter_sets: &[Bytes]) -> Result<()> {
    for parameter_set in parameter_sets {
        H264Error::check_width(field, parameter_set.len() as u64, 16)?;
    }

    Ok(())
}
