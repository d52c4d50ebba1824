//! A crate for decoding, encoding and building HEVC decoder configuration records.
//!
//! Supports:
//! - `hvcC` payload demux, mux and exact size computation
//! - NAL unit arrays with reserved NAL unit types kept verbatim
//! - Building a record from VPS/SPS/PPS NAL units, with a pluggable SPS parser
//! - RFC 6381 codec strings
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

mod builder;
mod config;
mod enums;
pub mod error;
mod nal_unit_type;
mod sps;

pub use builder::{HEVCConfigBuilder, HevcRecordDefaults, ParameterSetParser, SpsSummary};
pub use config::{
    CONFIGURATION_VERSION, HEVCDecoderConfigurationRecord, NaluArray, RESERVED_ARRAY_HEADER,
    RESERVED_BIT_DEPTH, RESERVED_CHROMA_FORMAT, RESERVED_MIN_SPATIAL_SEGMENTATION,
    RESERVED_NUM_NALUS, RESERVED_PARALLELISM_TYPE,
};
pub use enums::{ConstantFrameRate, NumTemporalLayers, ParallelismType, ProfileCompatibilityFlags};
pub use error::{H265Error, Result};
pub use nal_unit_type::NALUnitType;
pub use sps::SpsParser;
