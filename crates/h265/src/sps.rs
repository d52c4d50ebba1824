use std::io;

use bytes_util::BitReader;
use expgolomb::BitReaderExpGolombExt;

use crate::{NALUnitType, ParameterSetParser, ProfileCompatibilityFlags, SpsSummary};

/// The default [`ParameterSetParser`].
///
/// Reads an SPS NAL unit up to the bit depth fields, skipping everything the
/// configuration record does not carry.
///
/// ISO/IEC 23008-2 - 7.3.2.2
#[derive(Debug, Clone, Copy, Default)]
pub struct SpsParser;

impl ParameterSetParser for SpsParser {
    type Error = io::Error;

    fn parse_sps(&self, nalu: &[u8]) -> Result<SpsSummary, Self::Error> {
        SpsSummary::parse(nalu)
    }
}

impl SpsSummary {
    /// Parses an SPS NAL unit, including its 2-byte NAL unit header.
    pub fn parse(nalu: &[u8]) -> io::Result<Self> {
        let rbsp = remove_emulation_prevention(nalu);
        let mut bit_reader = BitReader::new(io::Cursor::new(rbsp));

        let forbidden_zero_bit = bit_reader.read_bit()?;
        if forbidden_zero_bit {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "forbidden_zero_bit is set"));
        }

        let nal_unit_type = NALUnitType(bit_reader.read_bits(6)? as u8);
        if nal_unit_type != NALUnitType::SpsNut {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expected an SPS NAL unit, got {nal_unit_type:?}"),
            ));
        }

        // nuh_layer_id, nuh_temporal_id_plus1
        bit_reader.seek_bits(6 + 3)?;

        // sps_video_parameter_set_id
        bit_reader.seek_bits(4)?;
        let sps_max_sub_layers_minus1 = bit_reader.read_bits(3)? as u8;
        if sps_max_sub_layers_minus1 > 6 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("sps_max_sub_layers_minus1 out of range: {sps_max_sub_layers_minus1}"),
            ));
        }
        let temporal_id_nesting = bit_reader.read_bit()?;

        // profile_tier_level(1, sps_max_sub_layers_minus1)
        let general_profile_space = bit_reader.read_bits(2)? as u8;
        let general_tier_flag = bit_reader.read_bit()?;
        let general_profile_idc = bit_reader.read_bits(5)? as u8;
        let general_profile_compatibility_flags =
            ProfileCompatibilityFlags::from_bits_retain(bit_reader.read_u32()?);
        let general_constraint_indicator_flags = bit_reader.read_bits(48)?;
        let general_level_idc = bit_reader.read_u8()?;

        let mut sub_layer_profile_present = [false; 8];
        let mut sub_layer_level_present = [false; 8];
        for i in 0..sps_max_sub_layers_minus1 as usize {
            sub_layer_profile_present[i] = bit_reader.read_bit()?;
            sub_layer_level_present[i] = bit_reader.read_bit()?;
        }

        if sps_max_sub_layers_minus1 > 0 {
            // reserved_zero_2bits
            bit_reader.seek_bits(2 * (8 - sps_max_sub_layers_minus1 as u32))?;
        }

        for i in 0..sps_max_sub_layers_minus1 as usize {
            if sub_layer_profile_present[i] {
                // sub_layer_profile_space through sub_layer_inbld_flag
                bit_reader.seek_bits(88)?;
            }

            if sub_layer_level_present[i] {
                // sub_layer_level_idc
                bit_reader.seek_bits(8)?;
            }
        }

        // sps_seq_parameter_set_id
        bit_reader.read_exp_golomb()?;

        let chroma_format_idc = bit_reader.read_exp_golomb()?;
        if chroma_format_idc > 3 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("chroma_format_idc out of range: {chroma_format_idc}"),
            ));
        }

        if chroma_format_idc == 3 {
            // separate_colour_plane_flag
            bit_reader.read_bit()?;
        }

        let pic_width_in_luma_samples = bit_reader.read_exp_golomb()?;
        let pic_height_in_luma_samples = bit_reader.read_exp_golomb()?;

        let conformance_window_flag = bit_reader.read_bit()?;
        if conformance_window_flag {
            // conf_win_{left,right,top,bottom}_offset
            for _ in 0..4 {
                bit_reader.read_exp_golomb()?;
            }
        }

        let bit_depth_luma_minus8 = read_bit_depth(&mut bit_reader)?;
        let bit_depth_chroma_minus8 = read_bit_depth(&mut bit_reader)?;

        Ok(SpsSummary {
            general_profile_space,
            general_tier_flag,
            general_profile_idc,
            general_profile_compatibility_flags,
            general_constraint_indicator_flags,
            general_level_idc,
            chroma_format_idc: chroma_format_idc as u8,
            bit_depth_luma_minus8,
            bit_depth_chroma_minus8,
            pic_width_in_luma_samples,
            pic_height_in_luma_samples,
            max_sub_layers: sps_max_sub_layers_minus1 + 1,
            temporal_id_nesting,
        })
    }
}

fn read_bit_depth<R: io::Read>(bit_reader: &mut BitReader<R>) -> io::Result<u8> {
    let value = bit_reader.read_exp_golomb()?;
    if value > 8 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("bit depth out of range: {}", value + 8),
        ));
    }

    Ok(value as u8)
}

/// Strips `emulation_prevention_three_byte`s, turning a NAL unit into its RBSP.
pub(crate) fn remove_emulation_prevention(nalu: &[u8]) -> Vec<u8> {
    let mut rbsp = Vec::with_capacity(nalu.len());
    let mut zeros = 0;

    for &byte in nalu {
        if zeros >= 2 && byte == 0x03 {
            zeros = 0;
            continue;
        }

        zeros = if byte == 0 { zeros + 1 } else { 0 };
        rbsp.push(byte);
    }

    rbsp
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use bytes_util::BitWriter;
    use expgolomb::BitWriterExpGolombExt;

    use super::*;

    const SPS: &[u8] = b"B\x01\x01\x01@\0\0\x03\0\x90\0\0\x03\0\0\x03\0\x99\xa0\x01@ \x05\xa1e\x95R\x90\x84d_\xf8\xc0Z\x80\x80\x80\x82\0\0\x03\0\x02\0\0\x03\x01 \xc0\x0b\xbc\xa2\0\x02bX\0\x011-\x08";

    fn insert_emulation_prevention(rbsp: &[u8]) -> Vec<u8> {
        let mut nalu = Vec::with_capacity(rbsp.len());
        let mut zeros = 0;

        for &byte in rbsp {
            if zeros >= 2 && byte <= 0x03 {
                nalu.push(0x03);
                zeros = 0;
            }

            zeros = if byte == 0 { zeros + 1 } else { 0 };
            nalu.push(byte);
        }

        nalu
    }

    /// A 1280x720 4:4:4 10-bit SPS with two sub-layers and a conformance window.
    fn synthetic_sps() -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());

        writer.write_bit(false).unwrap();
        writer.write_bits(33, 6).unwrap();
        writer.write_bits(0, 6).unwrap();
        writer.write_bits(1, 3).unwrap();

        writer.write_bits(0, 4).unwrap();
        writer.write_bits(1, 3).unwrap();
        writer.write_bit(false).unwrap();

        writer.write_bits(0, 2).unwrap();
        writer.write_bit(true).unwrap();
        writer.write_bits(2, 5).unwrap();
        writer.write_u32(0x2000_0000).unwrap();
        writer.write_bits(0x8000_0000_0000, 48).unwrap();
        writer.write_u8(120).unwrap();

        writer.write_bit(true).unwrap();
        writer.write_bit(true).unwrap();
        writer.write_bits(0, 14).unwrap();
        writer.write_bits(u64::MAX, 64).unwrap();
        writer.write_bits(0xFF_FFFF, 24).unwrap();
        writer.write_u8(0x5A).unwrap();

        writer.write_exp_golomb(0).unwrap();
        writer.write_exp_golomb(3).unwrap();
        writer.write_bit(false).unwrap();
        writer.write_exp_golomb(1280).unwrap();
        writer.write_exp_golomb(720).unwrap();
        writer.write_bit(true).unwrap();
        writer.write_exp_golomb(0).unwrap();
        writer.write_exp_golomb(0).unwrap();
        writer.write_exp_golomb(0).unwrap();
        writer.write_exp_golomb(8).unwrap();
        writer.write_exp_golomb(2).unwrap();
        writer.write_exp_golomb(2).unwrap();
        writer.write_bit(true).unwrap();

        insert_emulation_prevention(&writer.finish().unwrap())
    }

    #[test]
    fn test_parse_sps() {
        let sps = SpsSummary::parse(SPS).unwrap();

        insta::assert_debug_snapshot!(sps, @r"
        SpsSummary {
            general_profile_space: 0,
            general_tier_flag: false,
            general_profile_idc: 1,
            general_profile_compatibility_flags: ProfileCompatibilityFlags(
                MAIN_PROFILE,
            ),
            general_constraint_indicator_flags: 158329674399744,
            general_level_idc: 153,
            chroma_format_idc: 1,
            bit_depth_luma_minus8: 0,
            bit_depth_chroma_minus8: 0,
            pic_width_in_luma_samples: 2560,
            pic_height_in_luma_samples: 1440,
            max_sub_layers: 1,
            temporal_id_nesting: true,
        }
        ");
    }

    #[test]
    fn test_parse_sps_with_sub_layers() {
        let nalu = synthetic_sps();
        assert_ne!(remove_emulation_prevention(&nalu).len(), nalu.len());

        let sps = SpsParser.parse_sps(&nalu).unwrap();
        assert_eq!(sps.general_profile_space, 0);
        assert!(sps.general_tier_flag);
        assert_eq!(sps.general_profile_idc, 2);
        assert_eq!(
            sps.general_profile_compatibility_flags,
            ProfileCompatibilityFlags::MAIN_10_PROFILE
        );
        assert_eq!(sps.general_constraint_indicator_flags, 0x8000_0000_0000);
        assert_eq!(sps.general_level_idc, 120);
        assert_eq!(sps.chroma_format_idc, 3);
        assert_eq!(sps.bit_depth_luma_minus8, 2);
        assert_eq!(sps.bit_depth_chroma_minus8, 2);
        assert_eq!(sps.pic_width_in_luma_samples, 1280);
        assert_eq!(sps.pic_height_in_luma_samples, 720);
        assert_eq!(sps.max_sub_layers, 2);
        assert!(!sps.temporal_id_nesting);
    }

    #[test]
    fn test_parse_not_sps() {
        // PPS header
        let err = SpsSummary::parse(b"\x44\x01\xc0\x93").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = SpsSummary::parse(b"\xc2\x01").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_parse_sub_layer_count_out_of_range() {
        let mut nalu = SPS.to_vec();
        // sps_video_parameter_set_id 0, sps_max_sub_layers_minus1 7, nesting 1
        nalu[2] = 0x0F;

        let err = SpsSummary::parse(&nalu).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("sps_max_sub_layers_minus1"));
    }

    #[test]
    fn test_parse_truncated_sps() {
        let err = SpsSummary::parse(&SPS[..12]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_remove_emulation_prevention() {
        assert_eq!(
            remove_emulation_prevention(b"\x00\x00\x03\x01\x00\x00\x03\x00\x03"),
            b"\x00\x00\x01\x00\x00\x00\x03"
        );
        assert_eq!(remove_emulation_prevention(b"\x00\x03\x00"), b"\x00\x03\x00");
    }
}
