//! A crate for decoding and encoding the Dolby Vision decoder configuration
//! record carried in `dvcC`, `dvvC` and `dvwC` boxes.
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
    DOVIDecoderConfigurationRecord, RECORD_SIZE, RESERVED_TRAILING_BITS, RESERVED_WORD,
};
pub use error::{DoviError, Result};
