//! Byte and bit level helpers shared by the codec configuration crates.
//!
//! - [`BitReader`] / [`BitWriter`]: big-endian, octet-aligned bit cursors over
//!   any [`std::io::Read`] / [`std::io::Write`].
//! - [`ReservedBits`]: a named reserved-bit region with its mandated value.
//! - [`BytesCursorExt`]: zero-copy extraction from an `io::Cursor<Bytes>`.
//! - [`nutype_enum!`]: open enums over an integer that keep unknown values.
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

mod bit_read;
mod bit_write;
mod cursor;
mod nutype;
mod reserved;

pub use bit_read::BitReader;
pub use bit_write::BitWriter;
pub use cursor::BytesCursorExt;
pub use reserved::{ReservedBits, fits_in_bits};
