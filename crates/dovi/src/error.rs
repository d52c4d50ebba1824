//! Error types for Dolby Vision configuration record operations.

use std::io;

use thiserror::Error;

/// Errors that can occur while decoding or encoding a
/// [`DOVIDecoderConfigurationRecord`](crate::DOVIDecoderConfigurationRecord).
#[derive(Error, Debug)]
pub enum DoviError {
    /// Fewer than 24 bytes were available.
    #[error("configuration record is truncated")]
    Truncated,

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

    /// Any other I/O error from the source or sink.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for DoviError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => DoviError::Truncated,
            _ => DoviError::Io(err),
        }
    }
}

/// Result type alias for Dolby Vision configuration record operations.
pub type Result<T> = std::result::Result<T, DoviError>;
