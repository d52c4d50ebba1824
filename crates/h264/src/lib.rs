//! A crate for parsing and building AVC decoder configuration records (`avcC`).
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

mod config;
pub mod error;

pub use config::{
    AVCDecoderConfigurationRecord, AvccExtendedConfig, CONFIGURATION_VERSION,
    RESERVED_BIT_DEPTH, RESERVED_CHROMA_FORMAT, RESERVED_LENGTH_SIZE, RESERVED_NUM_OF_SPS,
};
pub use error::{H264Error, Result};
