use bytes_util::nutype_enum;

nutype_enum! {
    /// HEVC NAL unit type (6 bits).
    ///
    /// Only the types allowed in the arrays of an `hvcC` record have names.
    /// Any other value is carried verbatim so reserved types round-trip.
    ///
    /// ISO/IEC 23008-2 - Table 7-1
    pub enum NALUnitType(u8) {
        /// Video parameter set.
        VpsNut = 32,
        /// Sequence parameter set.
        SpsNut = 33,
        /// Picture parameter set.
        PpsNut = 34,
        /// Supplemental enhancement information, prefix.
        PrefixSeiNut = 39,
        /// Supplemental enhancement information, suffix.
        SuffixSeiNut = 40,
    }
}

impl NALUnitType {
    /// Returns `true` for the types ISO/IEC 14496-15 allows in a NAL array.
    pub const fn is_allowed_in_config(&self) -> bool {
        matches!(self.0, 32..=34 | 39 | 40)
    }
}
