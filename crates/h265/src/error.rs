//! Error types for HEVC configuration record operations.

use std::io;

use thiserror::Error;

/// Errors that can occur while decoding, encoding or building an
/// [`HEVCDecoderConfigurationRecord`](crate::HEVCDecoderConfigurationRecord).
#[derive(Error, Debug)]
pub enum H265Error {
    /// The source ended before a field or a length-prefixed payload was complete.
    #[error("configuration record is truncated")]
    Truncated,

    /// `configurationVersion` is not 1.
    #[error("unsupported configuration version: {0}")]
    UnsupportedVersion(u8),

    /// A value does not fit in the bit width of its field.
    #[error("{field} value {value} does not fit in {bits} bits")]
    FieldOverflow {
        /// Name of the record field.
        field: &'static str,
        /// Value that was about to be written.
        value: u64,
        /// Width of the field on the wire.
        bits: u8,
    },

    /// No SPS NAL unit was supplied or found.
    #[error("missing sequence parameter set")]
    MissingParameterSet,

    /// The parameter-set parser rejected the SPS.
    #[error("malformed parameter set: {0}")]
    MalformedParameterSet(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Any other I/O error from the source or sink.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for H265Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => H265Error::Truncated,
            _ => H265Error::Io(err),
        }
    }
}

impl H265Error {
    pub(crate) fn check_width(field: &'static str, value: u64, bits: u8) -> Result<()> {
        if bytes_util::fits_in_bits(value, bits) {
            Ok(())
        } else {
            Err(H265Error::FieldOverflow { field, value, bits })
        }
    }
}

/// Result type alias for HEVC configuration record operations.
pub type Result<T> = std::result::Result<T, H265Error>;
