mod num_temporal_layers;
mod profile_compatibility;

use bytes_util::nutype_enum;

pub use num_temporal_layers::NumTemporalLayers;
pub use profile_compatibility::ProfileCompatibilityFlags;

nutype_enum! {
    /// `parallelismType` (2 bits): the type of parallel decoding the stream supports.
    ///
    /// ISO/IEC 14496-15 - 8.3.3.1.3
    #[derive(Default)]
    pub enum ParallelismType(u8) {
        /// Mixed, or unknown.
        Mixed = 0,
        /// Slice based.
        Slice = 1,
        /// Tile based.
        Tile = 2,
        /// Entropy coding sync (wavefront) based.
        Wavefront = 3,
    }
}

nutype_enum! {
    /// `constantFrameRate` (2 bits).
    ///
    /// ISO/IEC 14496-15 - 8.3.3.1.3
    #[derive(Default)]
    pub enum ConstantFrameRate(u8) {
        /// The stream may or may not be of constant frame rate.
        Unknown = 0,
        /// The stream is of constant frame rate.
        Constant = 1,
        /// The representation of each temporal layer is of constant frame rate.
        TemporalLayerConstant = 2,
    }
}
