use std::io::{self, Write};

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use bytes_util::{BitReader, BitWriter, BytesCursorExt, ReservedBits};
use tracing::{debug, trace};

use crate::{
    ConstantFrameRate, H265Error, NALUnitType, NumTemporalLayers, ParallelismType,
    ProfileCompatibilityFlags, Result,
};

/// The only `configurationVersion` this crate reads or writes.
pub const CONFIGURATION_VERSION: u8 = 1;

/// `bit(4) reserved = '1111'b` ahead of `min_spatial_segmentation_idc`.
pub const RESERVED_MIN_SPATIAL_SEGMENTATION: ReservedBits = ReservedBits::ones(4);
/// `bit(6) reserved = '111111'b` ahead of `parallelismType`.
pub const RESERVED_PARALLELISM_TYPE: ReservedBits = ReservedBits::ones(6);
/// `bit(6) reserved = '111111'b` ahead of `chroma_format_idc`.
pub const RESERVED_CHROMA_FORMAT: ReservedBits = ReservedBits::ones(6);
/// `bit(5) reserved = '11111'b` ahead of each bit depth field.
pub const RESERVED_BIT_DEPTH: ReservedBits = ReservedBits::ones(5);
/// `bit(1) reserved = 0` between `array_completeness` and `NAL_unit_type`.
pub const RESERVED_ARRAY_HEADER: ReservedBits = ReservedBits::zeros(1);
/// Top 4 bits of `numNalus`, which never exceeds 12 bits here.
pub const RESERVED_NUM_NALUS: ReservedBits = ReservedBits::zeros(4);

/// Size of everything up to and including `numOfArrays`.
const FIXED_HEADER_SIZE: u64 = 23;

#[derive(Debug, Clone, PartialEq)]
/// HEVC Decoder Configuration Record (`hvcC` payload).
///
/// ISO/IEC 14496-15 - 8.3.3.1
pub struct HEVCDecoderConfigurationRecord {
    /// `configurationVersion`, always 1.
    ///
    /// 8 bits
    pub configuration_version: u8,
    /// `general_profile_space`
    ///
    /// 2 bits
    pub general_profile_space: u8,
    /// `general_tier_flag`
    ///
    /// 1 bit
    pub general_tier_flag: bool,
    /// `general_profile_idc`
    ///
    /// 5 bits
    pub general_profile_idc: u8,
    /// `general_profile_compatibility_flags`
    ///
    /// 32 bits
    pub general_profile_compatibility_flags: ProfileCompatibilityFlags,
    /// `general_constraint_indicator_flags`, right aligned. The top 16 bits are unused.
    ///
    /// 48 bits
    pub general_constraint_indicator_flags: u64,
    /// `general_level_idc`
    ///
    /// 8 bits
    pub general_level_idc: u8,
    /// `min_spatial_segmentation_idc`
    ///
    /// 12 bits
    pub min_spatial_segmentation_idc: u16,
    /// `parallelismType`
    ///
    /// 2 bits
    pub parallelism_type: ParallelismType,
    /// `chroma_format_idc`
    ///
    /// 2 bits
    pub chroma_format_idc: u8,
    /// `bit_depth_luma_minus8`
    ///
    /// 3 bits
    pub bit_depth_luma_minus8: u8,
    /// `bit_depth_chroma_minus8`
    ///
    /// 3 bits
    pub bit_depth_chroma_minus8: u8,
    /// `avgFrameRate` in frames per 256 seconds, 0 if unspecified.
    ///
    /// 16 bits
    pub avg_frame_rate: u16,
    /// `constantFrameRate`
    ///
    /// 2 bits
    pub constant_frame_rate: ConstantFrameRate,
    /// `numTemporalLayers`
    ///
    /// 3 bits
    pub num_temporal_layers: NumTemporalLayers,
    /// `temporalIdNested`
    ///
    /// 1 bit
    pub temporal_id_nested: bool,
    /// `lengthSizeMinusOne`: size of the NAL unit length prefix in samples, minus one.
    ///
    /// 2 bits
    pub length_size_minus_one: u8,
    /// Arrays of initialization NAL units, in wire order.
    pub arrays: Vec<NaluArray>,
}

#[derive(Debug, Clone, PartialEq)]
/// One array of initialization NAL units, all of the same type.
pub struct NaluArray {
    /// `array_completeness`: all NAL units of this type are in the array and
    /// none are in the stream.
    pub array_completeness: bool,
    /// `NAL_unit_type` (6 bits).
    pub nal_unit_type: NALUnitType,
    /// The NAL units, each prefixed by a 16-bit length on the wire.
    pub nalus: Vec<Bytes>,
}

impl NaluArray {
    /// Creates an array of NAL units of one type.
    pub fn new(nal_unit_type: NALUnitType, array_completeness: bool, nalus: Vec<Bytes>) -> Self {
        Self {
            array_completeness,
            nal_unit_type,
            nalus,
        }
    }

    fn size(&self) -> u64 {
        1 // array_completeness, reserved, NAL_unit_type
        + 2 // numNalus
        + self
            .nalus
            .iter()
            .map(|nalu| 2 + nalu.len() as u64) // nalUnitLength, nalUnit
            .sum::<u64>()
    }
}

impl HEVCDecoderConfigurationRecord {
    /// Demuxes an HEVC Decoder Configuration Record from the given reader.
    ///
    /// NAL units are returned as zero-copy slices of the reader's buffer.
    /// Reserved bits are accepted whatever their value. Any bytes after the
    /// last array are left unread.
    pub fn demux(reader: &mut io::Cursor<Bytes>) -> Result<Self> {
        let mut bit_reader = BitReader::new(reader);

        let configuration_version = bit_reader.read_u8()?;
        if configuration_version != CONFIGURATION_VERSION {
            return Err(H265Error::UnsupportedVersion(configuration_version));
        }

        let general_profile_space = bit_reader.read_bits(2)? as u8;
        let general_tier_flag = bit_reader.read_bit()?;
        let general_profile_idc = bit_reader.read_bits(5)? as u8;
        let general_profile_compatibility_flags =
            ProfileCompatibilityFlags::from_bits_retain(bit_reader.read_u32()?);
        let general_constraint_indicator_flags = bit_reader.read_bits(48)?;
        let general_level_idc = bit_reader.read_u8()?;

        read_reserved(&mut bit_reader, RESERVED_MIN_SPATIAL_SEGMENTATION, "min_spatial_segmentation_idc")?;
        let min_spatial_segmentation_idc = bit_reader.read_bits(12)? as u16;

        read_reserved(&mut bit_reader, RESERVED_PARALLELISM_TYPE, "parallelism_type")?;
        let parallelism_type = ParallelismType(bit_reader.read_bits(2)? as u8);

        read_reserved(&mut bit_reader, RESERVED_CHROMA_FORMAT, "chroma_format_idc")?;
        let chroma_format_idc = bit_reader.read_bits(2)? as u8;

        read_reserved(&mut bit_reader, RESERVED_BIT_DEPTH, "bit_depth_luma_minus8")?;
        let bit_depth_luma_minus8 = bit_reader.read_bits(3)? as u8;

        read_reserved(&mut bit_reader, RESERVED_BIT_DEPTH, "bit_depth_chroma_minus8")?;
        let bit_depth_chroma_minus8 = bit_reader.read_bits(3)? as u8;

        let avg_frame_rate = bit_reader.read_u16()?;
        let constant_frame_rate = ConstantFrameRate(bit_reader.read_bits(2)? as u8);
        let num_temporal_layers = NumTemporalLayers::from(bit_reader.read_bits(3)? as u8);
        let temporal_id_nested = bit_reader.read_bit()?;
        let length_size_minus_one = bit_reader.read_bits(2)? as u8;

        let num_of_arrays = bit_reader.read_u8()?;
        trace!(num_of_arrays, "hvcC header decoded");

        let mut arrays = Vec::with_capacity(num_of_arrays as usize);
        for _ in 0..num_of_arrays {
            let array_completeness = bit_reader.read_bit()?;
            read_reserved(&mut bit_reader, RESERVED_ARRAY_HEADER, "nal_array")?;
            let nal_unit_type = NALUnitType(bit_reader.read_bits(6)? as u8);

            read_reserved(&mut bit_reader, RESERVED_NUM_NALUS, "num_nalus")?;
            let num_nalus = bit_reader.read_bits(12)? as u16;

            if !nal_unit_type.is_allowed_in_config() {
                debug!(?nal_unit_type, "unexpected NAL unit type in hvcC array");
            }

            let mut nalus = Vec::with_capacity(num_nalus as usize);
            for _ in 0..num_nalus {
                let nal_unit_length = bit_reader.read_u16()? as usize;
                nalus.push(bit_reader.get_mut().extract_bytes(nal_unit_length)?);
            }

            trace!(?nal_unit_type, num_nalus, "hvcC array decoded");

            arrays.push(NaluArray {
                array_completeness,
                nal_unit_type,
                nalus,
            });
        }

        Ok(HEVCDecoderConfigurationRecord {
            configuration_version,
            general_profile_space,
            general_tier_flag,
            general_profile_idc,
            general_profile_compatibility_flags,
            general_constraint_indicator_flags,
            general_level_idc,
            min_spatial_segmentation_idc,
            parallelism_type,
            chroma_format_idc,
            bit_depth_luma_minus8,
            bit_depth_chroma_minus8,
            avg_frame_rate,
            constant_frame_rate,
            num_temporal_layers,
            temporal_id_nested,
            length_size_minus_one,
            arrays,
        })
    }

    /// Returns the size of the HEVC Decoder Configuration Record in bytes.
    ///
    /// Always equal to the number of bytes [`Self::mux`] writes.
    pub fn size(&self) -> u64 {
        FIXED_HEADER_SIZE + self.arrays.iter().map(NaluArray::size).sum::<u64>()
    }

    /// Muxes the HEVC Decoder Configuration Record to the given writer.
    ///
    /// Every field is checked against its bit width before anything is
    /// written; reserved bits are always written with their mandated pattern.
    pub fn mux<T: io::Write>(&self, writer: &mut T) -> Result<()> {
        self.validate()?;

        let mut bit_writer = BitWriter::new(writer);

        bit_writer.write_u8(self.configuration_version)?;
        bit_writer.write_bits(self.general_profile_space as u64, 2)?;
        bit_writer.write_bit(self.general_tier_flag)?;
        bit_writer.write_bits(self.general_profile_idc as u64, 5)?;
        bit_writer.write_u32(self.general_profile_compatibility_flags.bits())?;
        bit_writer.write_bits(self.general_constraint_indicator_flags, 48)?;
        bit_writer.write_u8(self.general_level_idc)?;

        bit_writer.write_reserved(RESERVED_MIN_SPATIAL_SEGMENTATION)?;
        bit_writer.write_bits(self.min_spatial_segmentation_idc as u64, 12)?;

        bit_writer.write_reserved(RESERVED_PARALLELISM_TYPE)?;
        bit_writer.write_bits(self.parallelism_type.0 as u64, 2)?;

        bit_writer.write_reserved(RESERVED_CHROMA_FORMAT)?;
        bit_writer.write_bits(self.chroma_format_idc as u64, 2)?;

        bit_writer.write_reserved(RESERVED_BIT_DEPTH)?;
        bit_writer.write_bits(self.bit_depth_luma_minus8 as u64, 3)?;

        bit_writer.write_reserved(RESERVED_BIT_DEPTH)?;
        bit_writer.write_bits(self.bit_depth_chroma_minus8 as u64, 3)?;

        bit_writer.write_u16(self.avg_frame_rate)?;
        bit_writer.write_bits(self.constant_frame_rate.0 as u64, 2)?;
        bit_writer.write_bits(u8::from(self.num_temporal_layers) as u64, 3)?;
        bit_writer.write_bit(self.temporal_id_nested)?;
        bit_writer.write_bits(self.length_size_minus_one as u64, 2)?;

        bit_writer.write_u8(self.arrays.len() as u8)?;
        for array in &self.arrays {
            bit_writer.write_bit(array.array_completeness)?;
            bit_writer.write_reserved(RESERVED_ARRAY_HEADER)?;
            bit_writer.write_bits(array.nal_unit_type.0 as u64, 6)?;

            bit_writer.write_reserved(RESERVED_NUM_NALUS)?;
            bit_writer.write_bits(array.nalus.len() as u64, 12)?;

            for nalu in &array.nalus {
                bit_writer.write_u16(nalu.len() as u16)?;
                bit_writer.write_all(nalu)?;
            }
        }

        bit_writer.finish()?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.configuration_version != CONFIGURATION_VERSION {
            return Err(H265Error::UnsupportedVersion(self.configuration_version));
        }

        H265Error::check_width("general_profile_space", self.general_profile_space as u64, 2)?;
        H265Error::check_width("general_profile_idc", self.general_profile_idc as u64, 5)?;
        H265Error::check_width(
            "general_constraint_indicator_flags",
            self.general_constraint_indicator_flags,
            48,
        )?;
        H265Error::check_width(
            "min_spatial_segmentation_idc",
            self.min_spatial_segmentation_idc as u64,
            12,
        )?;
        H265Error::check_width("parallelism_type", self.parallelism_type.0 as u64, 2)?;
        H265Error::check_width("chroma_format_idc", self.chroma_format_idc as u64, 2)?;
        H265Error::check_width("bit_depth_luma_minus8", self.bit_depth_luma_minus8 as u64, 3)?;
        H265Error::check_width(
            "bit_depth_chroma_minus8",
            self.bit_depth_chroma_minus8 as u64,
            3,
        )?;
        H265Error::check_width("constant_frame_rate", self.constant_frame_rate.0 as u64, 2)?;
        H265Error::check_width(
            "num_temporal_layers",
            u8::from(self.num_temporal_layers) as u64,
            3,
        )?;
        H265Error::check_width("length_size_minus_one", self.length_size_minus_one as u64, 2)?;
        H265Error::check_width("num_of_arrays", self.arrays.len() as u64, 8)?;

        for array in &self.arrays {
            H265Error::check_width("nal_unit_type", array.nal_unit_type.0 as u64, 6)?;
            H265Error::check_width("num_nalus", array.nalus.len() as u64, 12)?;
            for nalu in &array.nalus {
                H265Error::check_width("nal_unit_length", nalu.len() as u64, 16)?;
            }
        }

        Ok(())
    }

    /// Returns the first SPS NAL unit of a raw `hvcC` payload as a zero-copy slice,
    /// without decoding the rest of the record.
    pub fn first_sps_nalu_bytes(data: &Bytes) -> Result<Bytes> {
        if data.len() < FIXED_HEADER_SIZE as usize {
            return Err(H265Error::Truncated);
        }

        if data[0] != CONFIGURATION_VERSION {
            return Err(H265Error::UnsupportedVersion(data[0]));
        }

        let num_of_arrays = data[22];
        let mut offset = FIXED_HEADER_SIZE as usize;

        for _ in 0..num_of_arrays {
            let header = data.get(offset..offset + 3).ok_or(H265Error::Truncated)?;
            let nal_unit_type = NALUnitType(header[0] & 0b0011_1111);
            let num_nalus = BigEndian::read_u16(&header[1..]) & 0x0FFF;
            offset += 3;

            for _ in 0..num_nalus {
                let length = data.get(offset..offset + 2).ok_or(H265Error::Truncated)?;
                let length = BigEndian::read_u16(length) as usize;
                offset += 2;

                if data.len() < offset + length {
                    return Err(H265Error::Truncated);
                }

                if nal_unit_type == NALUnitType::SpsNut {
                    return Ok(data.slice(offset..offset + length));
                }

                offset += length;
            }
        }

        Err(H265Error::MissingParameterSet)
    }

    /// Iterates over every NAL unit of the given type, across all arrays.
    pub fn nalus(&self, nal_unit_type: NALUnitType) -> impl Iterator<Item = &Bytes> {
        self.arrays
            .iter()
            .filter(move |array| array.nal_unit_type == nal_unit_type)
            .flat_map(|array| array.nalus.iter())
    }

    /// Returns the RFC 6381 `codecs` parameter for this record, e.g. `hvc1.1.6.L93.B0`.
    ///
    /// `sample_entry` is the sample entry FourCC (`hvc1` or `hev1`).
    ///
    /// ISO/IEC 14496-15 - E.3
    pub fn codec_string(&self, sample_entry: &str) -> String {
        let profile_space = match self.general_profile_space {
            1 => "A",
            2 => "B",
            3 => "C",
            _ => "",
        };
        let tier = if self.general_tier_flag { 'H' } else { 'L' };

        let mut codec = format!(
            "{sample_entry}.{profile_space}{}.{:X}.{tier}{}",
            self.general_profile_idc,
            self.general_profile_compatibility_flags.reversed(),
            self.general_level_idc,
        );

        let constraint_bytes = self.general_constraint_indicator_flags.to_be_bytes();
        let constraint_bytes = &constraint_bytes[2..];
        let significant = constraint_bytes
            .iter()
            .rposition(|byte| *byte != 0)
            .map_or(0, |last| last + 1);
        for byte in &constraint_bytes[..significant] {
            codec.push_str(&format!(".{byte:X}"));
        }

        codec
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
            "non-conformant reserved bits in hvcC"
        );
    }

    Ok(())
}
