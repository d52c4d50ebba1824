use bytes::Bytes;
use tracing::trace;

use crate::{
    CONFIGURATION_VERSION, ConstantFrameRate, H265Error, HEVCDecoderConfigurationRecord,
    NALUnitType, NaluArray, NumTemporalLayers, ParallelismType, ProfileCompatibilityFlags, Result,
    SpsParser,
};

/// The SPS fields an [`HEVCDecoderConfigurationRecord`] is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpsSummary {
    /// `general_profile_space`
    pub general_profile_space: u8,
    /// `general_tier_flag`
    pub general_tier_flag: bool,
    /// `general_profile_idc`
    pub general_profile_idc: u8,
    /// `general_profile_compatibility_flag[0..32]`
    pub general_profile_compatibility_flags: ProfileCompatibilityFlags,
    /// The 48 bits following the compatibility flags in `profile_tier_level`.
    pub general_constraint_indicator_flags: u64,
    /// `general_level_idc`
    pub general_level_idc: u8,
    /// `chroma_format_idc`
    pub chroma_format_idc: u8,
    /// `bit_depth_luma_minus8`
    pub bit_depth_luma_minus8: u8,
    /// `bit_depth_chroma_minus8`
    pub bit_depth_chroma_minus8: u8,
    /// `pic_width_in_luma_samples`
    pub pic_width_in_luma_samples: u64,
    /// `pic_height_in_luma_samples`
    pub pic_height_in_luma_samples: u64,
    /// `sps_max_sub_layers_minus1 + 1`
    pub max_sub_layers: u8,
    /// `sps_temporal_id_nesting_flag`
    pub temporal_id_nesting: bool,
}

/// Extracts an [`SpsSummary`] from an SPS NAL unit.
///
/// [`SpsParser`] is the default implementation. Errors are handed back to
/// the caller of [`HEVCConfigBuilder::build`] as
/// [`H265Error::MalformedParameterSet`].
pub trait ParameterSetParser {
    /// Error returned for an SPS that cannot be parsed.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Parses an SPS NAL unit, header included.
    fn parse_sps(&self, nalu: &[u8]) -> std::result::Result<SpsSummary, Self::Error>;
}

/// Record fields [`HEVCConfigBuilder`] does not derive from the SPS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HevcRecordDefaults {
    /// `min_spatial_segmentation_idc`
    pub min_spatial_segmentation_idc: u16,
    /// `parallelismType`
    pub parallelism_type: ParallelismType,
    /// `avgFrameRate`
    pub avg_frame_rate: u16,
    /// `constantFrameRate`
    pub constant_frame_rate: ConstantFrameRate,
    /// `numTemporalLayers`, unless `temporal_from_sps` is set.
    pub num_temporal_layers: NumTemporalLayers,
    /// `temporalIdNested`, unless `temporal_from_sps` is set.
    pub temporal_id_nested: bool,
    /// Take `numTemporalLayers` and `temporalIdNested` from the SPS instead.
    pub temporal_from_sps: bool,
    /// `lengthSizeMinusOne`
    pub length_size_minus_one: u8,
}

impl Default for HevcRecordDefaults {
    fn default() -> Self {
        Self {
            min_spatial_segmentation_idc: 0,
            parallelism_type: ParallelismType::Mixed,
            avg_frame_rate: 0,
            constant_frame_rate: ConstantFrameRate::Unknown,
            num_temporal_layers: NumTemporalLayers::Unknown,
            temporal_id_nested: false,
            temporal_from_sps: false,
            length_size_minus_one: 3,
        }
    }
}

/// Builds an [`HEVCDecoderConfigurationRecord`] from parameter set NAL units.
///
/// ```
/// # use bytes::Bytes;
/// # use h265::{HEVCConfigBuilder, H265Error};
/// let err = HEVCConfigBuilder::new()
///     .vps(vec![Bytes::from_static(b"\x40\x01")], true)
///     .build()
///     .unwrap_err();
/// assert!(matches!(err, H265Error::MissingParameterSet));
/// ```
#[derive(Debug, Clone)]
pub struct HEVCConfigBuilder<P = SpsParser> {
    parser: P,
    defaults: HevcRecordDefaults,
    vps: NaluArray,
    sps: NaluArray,
    pps: NaluArray,
}

impl HEVCConfigBuilder<SpsParser> {
    /// Creates a builder using [`SpsParser`] and [`HevcRecordDefaults::default`].
    pub fn new() -> Self {
        Self::with_parser(SpsParser)
    }
}

impl Default for HEVCConfigBuilder<SpsParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ParameterSetParser> HEVCConfigBuilder<P> {
    /// Creates a builder using a custom SPS parser.
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            defaults: HevcRecordDefaults::default(),
            vps: NaluArray::new(NALUnitType::VpsNut, false, Vec::new()),
            sps: NaluArray::new(NALUnitType::SpsNut, false, Vec::new()),
            pps: NaluArray::new(NALUnitType::PpsNut, false, Vec::new()),
        }
    }

    /// Replaces the values not derived from the SPS.
    pub fn with_defaults(mut self, defaults: HevcRecordDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the VPS NAL units and their `array_completeness`.
    pub fn vps(mut self, nalus: Vec<Bytes>, complete: bool) -> Self {
        self.vps.nalus = nalus;
        self.vps.array_completeness = complete;
        self
    }

    /// Sets the SPS NAL units and their `array_completeness`.
    pub fn sps(mut self, nalus: Vec<Bytes>, complete: bool) -> Self {
        self.sps.nalus = nalus;
        self.sps.array_completeness = complete;
        self
    }

    /// Sets the PPS NAL units and their `array_completeness`.
    pub fn pps(mut self, nalus: Vec<Bytes>, complete: bool) -> Self {
        self.pps.nalus = nalus;
        self.pps.array_completeness = complete;
        self
    }

    /// Builds the record.
    ///
    /// The profile, tier, level, chroma and bit depth fields come from the
    /// first SPS. The arrays are emitted in VPS, SPS, PPS order with the NAL
    /// units exactly as given.
    pub fn build(&self) -> Result<HEVCDecoderConfigurationRecord> {
        let first_sps = self.sps.nalus.first().ok_or(H265Error::MissingParameterSet)?;

        let sps = self
            .parser
            .parse_sps(first_sps)
            .map_err(|err| H265Error::MalformedParameterSet(Box::new(err)))?;

        trace!(
            vps = self.vps.nalus.len(),
            sps = self.sps.nalus.len(),
            pps = self.pps.nalus.len(),
            "building hvcC"
        );

        let defaults = &self.defaults;
        let (num_temporal_layers, temporal_id_nested) = if defaults.temporal_from_sps {
            (NumTemporalLayers::from(sps.max_sub_layers), sps.temporal_id_nesting)
        } else {
            (defaults.num_temporal_layers, defaults.temporal_id_nested)
        };

        Ok(HEVCDecoderConfigurationRecord {
            configuration_version: CONFIGURATION_VERSION,
            general_profile_space: sps.general_profile_space,
            general_tier_flag: sps.general_tier_flag,
            general_profile_idc: sps.general_profile_idc,
            general_profile_compatibility_flags: sps.general_profile_compatibility_flags,
            general_constraint_indicator_flags: sps.general_constraint_indicator_flags,
            general_level_idc: sps.general_level_idc,
            min_spatial_segmentation_idc: defaults.min_spatial_segmentation_idc,
            parallelism_type: defaults.parallelism_type,
            chroma_format_idc: sps.chroma_format_idc,
            bit_depth_luma_minus8: sps.bit_depth_luma_minus8,
            bit_depth_chroma_minus8: sps.bit_depth_chroma_minus8,
            avg_frame_rate: defaults.avg_frame_rate,
            constant_frame_rate: defaults.constant_frame_rate,
            num_temporal_layers,
            temporal_id_nested,
            length_size_minus_one: defaults.length_size_minus_one,
            arrays: vec![self.vps.clone(), self.sps.clone(), self.pps.clone()],
        })
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use super::*;

    const HVCC: &[u8] = b"\x01\x01@\0\0\0\x90\0\0\0\0\0\x99\xf0\0\xfc\xfd\xf8\xf8\0\0\x0f\x03 \0\x01\0\x18@\x01\x0c\x01\xff\xff\x01@\0\0\x03\0\x90\0\0\x03\0\0\x03\0\x99\x95@\x90!\0\x01\0=B\x01\x01\x01@\0\0\x03\0\x90\0\0\x03\0\0\x03\0\x99\xa0\x01@ \x05\xa1e\x95R\x90\x84d_\xf8\xc0Z\x80\x80\x80\x82\0\0\x03\0\x02\0\0\x03\x01 \xc0\x0b\xbc\xa2\0\x02bX\0\x011-\x08\"\0\x01\0\x07D\x01\xc0\x93|\x0c\xc9";

    struct FixedParser(SpsSummary);

    impl ParameterSetParser for FixedParser {
        type Error = io::Error;

        fn parse_sps(&self, _nalu: &[u8]) -> std::result::Result<SpsSummary, Self::Error> {
            Ok(self.0.clone())
        }
    }

    struct FailingParser;

    impl ParameterSetParser for FailingParser {
        type Error = io::Error;

        fn parse_sps(&self, _nalu: &[u8]) -> std::result::Result<SpsSummary, Self::Error> {
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad sps"))
        }
    }

    fn summary() -> SpsSummary {
        SpsSummary {
            general_profile_space: 0,
            general_tier_flag: false,
            general_profile_idc: 1,
            general_profile_compatibility_flags: ProfileCompatibilityFlags::from_bits_retain(
                0x6000_0000,
            ),
            general_constraint_indicator_flags: 0xB000_50F0_0000,
            general_level_idc: 93,
            chroma_format_idc: 1,
            bit_depth_luma_minus8: 0,
            bit_depth_chroma_minus8: 0,
            pic_width_in_luma_samples: 1280,
            pic_height_in_luma_samples: 720,
            max_sub_layers: 3,
            temporal_id_nesting: true,
        }
    }

    #[test]
    fn test_build_from_hvcc_parameter_sets() {
        let expected =
            HEVCDecoderConfigurationRecord::demux(&mut io::Cursor::new(Bytes::from_static(HVCC)))
                .unwrap();

        let config = HEVCConfigBuilder::new()
            .with_defaults(HevcRecordDefaults {
                temporal_from_sps: true,
                ..Default::default()
            })
            .vps(expected.nalus(NALUnitType::VpsNut).cloned().collect(), false)
            .sps(expected.nalus(NALUnitType::SpsNut).cloned().collect(), false)
            .pps(expected.nalus(NALUnitType::PpsNut).cloned().collect(), false)
            .build()
            .unwrap();

        assert_eq!(config, expected);

        let mut buf = Vec::new();
        config.mux(&mut buf).unwrap();
        assert_eq!(buf, HVCC);
    }

    #[test]
    fn test_build_defaults() {
        let vps = Bytes::from(vec![0x40; 5]);
        let sps = Bytes::from(vec![0x42; 20]);
        let pps = Bytes::from(vec![0x44; 10]);

        let config = HEVCConfigBuilder::with_parser(FixedParser(summary()))
            .vps(vec![vps.clone()], true)
            .sps(vec![sps.clone()], true)
            .pps(vec![pps.clone()], true)
            .build()
            .unwrap();

        assert_eq!(config.configuration_version, 1);
        assert_eq!(config.general_profile_idc, 1);
        assert_eq!(config.general_level_idc, 93);
        assert_eq!(config.general_constraint_indicator_flags, 0xB000_50F0_0000);
        assert_eq!(config.length_size_minus_one, 3);
        assert_eq!(config.avg_frame_rate, 0);
        assert_eq!(config.parallelism_type, ParallelismType::Mixed);
        assert_eq!(config.constant_frame_rate, ConstantFrameRate::Unknown);
        assert_eq!(config.num_temporal_layers, NumTemporalLayers::Unknown);
        assert!(!config.temporal_id_nested);

        assert_eq!(config.size(), 73);
        assert_eq!(
            config.arrays,
            vec![
                NaluArray::new(NALUnitType::VpsNut, true, vec![vps]),
                NaluArray::new(NALUnitType::SpsNut, true, vec![sps]),
                NaluArray::new(NALUnitType::PpsNut, true, vec![pps]),
            ]
        );
    }

    #[test]
    fn test_build_overridden_defaults() {
        let config = HEVCConfigBuilder::with_parser(FixedParser(summary()))
            .with_defaults(HevcRecordDefaults {
                avg_frame_rate: 30 * 256,
                constant_frame_rate: ConstantFrameRate::Constant,
                parallelism_type: ParallelismType::Tile,
                length_size_minus_one: 1,
                ..Default::default()
            })
            .sps(vec![Bytes::from_static(b"\x42\x01")], false)
            .build()
            .unwrap();

        assert_eq!(config.avg_frame_rate, 7680);
        assert_eq!(config.constant_frame_rate, ConstantFrameRate::Constant);
        assert_eq!(config.parallelism_type, ParallelismType::Tile);
        assert_eq!(config.length_size_minus_one, 1);
        assert!(config.arrays[0].nalus.is_empty());
        assert!(config.arrays[2].nalus.is_empty());
    }

    #[test]
    fn test_build_temporal_from_sps() {
        let config = HEVCConfigBuilder::with_parser(FixedParser(summary()))
            .with_defaults(HevcRecordDefaults {
                temporal_from_sps: true,
                ..Default::default()
            })
            .sps(vec![Bytes::from_static(b"\x42\x01")], true)
            .build()
            .unwrap();

        assert_eq!(config.num_temporal_layers, NumTemporalLayers::Count(3));
        assert!(config.temporal_id_nested);
    }

    #[test]
    fn test_build_missing_sps() {
        let err = HEVCConfigBuilder::with_parser(FixedParser(summary()))
            .vps(vec![Bytes::from_static(b"\x40\x01")], true)
            .pps(vec![Bytes::from_static(b"\x44\x01")], true)
            .build()
            .unwrap_err();

        assert!(matches!(err, H265Error::MissingParameterSet));
    }

    #[test]
    fn test_build_malformed_sps() {
        let err = HEVCConfigBuilder::with_parser(FailingParser)
            .sps(vec![Bytes::from_static(b"\x42\x01")], true)
            .build()
            .unwrap_err();

        let H265Error::MalformedParameterSet(source) = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(source.to_string(), "bad sps");
        assert!(source.downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn test_build_rejects_sub_layer_count_out_of_range() {
        let mut sps = HVCC[57..118].to_vec();
        // sps_max_sub_layers_minus1 = 7
        sps[2] = 0x0F;

        let err = HEVCConfigBuilder::new()
            .with_defaults(HevcRecordDefaults {
                temporal_from_sps: true,
                ..Default::default()
            })
            .sps(vec![Bytes::from(sps)], true)
            .build()
            .unwrap_err();

        let H265Error::MalformedParameterSet(source) = err else {
            panic!("unexpected error: {err}");
        };
        let source = source.downcast_ref::<io::Error>().unwrap();
        assert_eq!(source.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_build_only_first_sps_is_parsed() {
        let config = HEVCConfigBuilder::new()
            .sps(
                vec![
                    Bytes::from_static(&HVCC[57..118]),
                    Bytes::from_static(b"\xff\xff"),
                ],
                true,
            )
            .build()
            .unwrap();

        assert_eq!(config.general_level_idc, 153);
        assert_eq!(config.arrays[1].nalus.len(), 2);
    }
}
