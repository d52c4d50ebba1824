bitflags::bitflags! {
    /// `general_profile_compatibility_flags` (32 bits).
    ///
    /// Bit `j` of the syntax element, `general_profile_compatibility_flag[j]`,
    /// is stored at `1 << (31 - j)` so the value matches the wire order.
    ///
    /// ISO/IEC 23008-2 - 7.4.4
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ProfileCompatibilityFlags: u32 {
        /// `general_profile_compatibility_flag[0]`
        const PROFILE_0 = 1 << 31;
        /// Main profile.
        const MAIN_PROFILE = 1 << 30;
        /// Main 10 and Main 10 Still Picture profiles.
        const MAIN_10_PROFILE = 1 << 29;
        /// Main Still Picture profile.
        const MAIN_STILL_PICTURE_PROFILE = 1 << 28;
        /// Format range extensions profiles.
        const RANGE_EXTENSIONS_PROFILE = 1 << 27;
        /// High throughput profiles.
        const HIGH_THROUGHPUT_PROFILE = 1 << 26;
        /// Multiview Main profile.
        const MULTIVIEW_MAIN_PROFILE = 1 << 25;
        /// Scalable Main and Scalable Main 10 profiles.
        const SCALABLE_MAIN_PROFILE = 1 << 24;
        /// 3D Main profile.
        const THREE_D_MAIN_PROFILE = 1 << 23;
        /// Screen content coding extensions profiles.
        const SCREEN_CONTENT_CODING_EXTENSIONS_PROFILE = 1 << 22;
        /// Scalable format range extensions profiles.
        const SCALABLE_RANGE_EXTENSIONS_PROFILE = 1 << 21;
        /// High throughput screen content coding extensions profiles.
        const HIGH_THROUGHPUT_SCREEN_CONTENT_CODING_EXTENSIONS_PROFILE = 1 << 20;

        // Reserved flags are kept as they are on the wire.
        const _ = !0;
    }
}

impl ProfileCompatibilityFlags {
    /// The flags in the bit-reversed order used by RFC 6381 codec strings,
    /// where `general_profile_compatibility_flag[0]` is the least significant bit.
    pub const fn reversed(&self) -> u32 {
        self.bits().reverse_bits()
    }
}
