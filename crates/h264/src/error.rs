//! Error types for AVC configuration record operations.

use std::io;

use thiserror::Error;

/// Errors that can occur while parsing or building an
/// [`AVCDecoderConfigurationRecord`](crate::AVCDecoderConfigurationRecord).
#[derive(Error, Debug)]
pub enum H264Error {
    /// The source ended before a field or a parameter set was complete.
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

    /// `extended_config` is set on a profile without the high profile section,
    /// or missing on one that requires it.
    #[error("extended config does not match profile {profile_indication}")]
    ExtendedConfigMismatch {
        /// `AVCProfileIndication` of the record.
        profile_indication: u8,
    },

    /// The record carries no SPS.
    #[error("missing sequence parameter set")]
    MissingParameterSet,

    /// Any other I/O error from the source or sink.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for H264Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => H264Error::Truncated,
            _ => H264Error::Io(err),
        }
    }
}

impl H264Error {
    pub(crate) fn check_width(field: &'static str, value: u64, bits: u8) -> Result<()> {
        if bytes_util::fits_in_bits(value, bits) {
            Ok(())
        } else {
            Err(H264Error::FieldOverflow { field, value, bits })
        }
    }
}

/// Result type alias for AVC configuration record operations.
pub type Result<T> = std::result::Result<T, H264Error>;

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_eof_is_truncated() {
        let err = H264Error::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, H264Error::Truncated));

        let err = H264Error::from(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(matches!(err, H264Error::Io(_)));
    }

    #[test]
    fn test_check_width() {
        assert!(H264Error::check_width("num_of_sps", 31, 5).is_ok());
        insta::assert_snapshot!(
            H264Error::check_width("num_of_sps", 32, 5).unwrap_err(),
            @"num_of_sps value 32 does not fit in 5 bits"
        );
    }
}
