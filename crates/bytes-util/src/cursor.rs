use std::io;

use bytes::Bytes;

/// Zero-copy extraction helpers for `io::Cursor<Bytes>`.
pub trait BytesCursorExt {
    /// Extracts the next `size` bytes as a slice of the underlying buffer.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] without advancing if fewer
    /// than `size` bytes remain.
    fn extract_bytes(&mut self, size: usize) -> io::Result<Bytes>;

    /// Extracts everything after the current position.
    fn extract_remaining(&mut self) -> Bytes;

    /// Number of bytes after the current position.
    fn remaining_len(&self) -> usize;
}

impl BytesCursorExt for io::Cursor<Bytes> {
    fn extract_bytes(&mut self, size: usize) -> io::Result<Bytes> {
        if self.remaining_len() < size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "expected {size} bytes, only {} remaining",
                    self.remaining_len()
                ),
            ));
        }

        let position = self.position() as usize;
        let slice = self.get_ref().slice(position..position + size);
        self.set_position((position + size) as u64);

        Ok(slice)
    }

    fn extract_remaining(&mut self) -> Bytes {
        let len = self.get_ref().len();
        let position = (self.position() as usize).min(len);
        self.set_position(len as u64);
        self.get_ref().slice(position..)
    }

    fn remaining_len(&self) -> usize {
        self.get_ref()
            .len()
            .saturating_sub(self.position() as usize)
    }
}
