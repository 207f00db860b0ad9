use bytes::Bytes;
use std::io::{self, BufRead, Read as _};

use crate::error::{BencodeError, Result};

/// A byte source the parser pulls tokens from, one byte of lookahead at a time.
pub(crate) trait Read<'de> {
    /// Number of bytes consumed so far.
    fn position(&self) -> usize;

    /// Returns the next byte without consuming it, or `None` at end of input.
    fn peek(&mut self) -> Result<Option<u8>>;

    /// Consumes the byte returned by the last successful [`peek`](Read::peek).
    fn discard(&mut self);

    /// Consumes exactly `len` bytes into an owned buffer.
    fn read_owned(&mut self, len: usize) -> Result<Bytes>;
}

/// Reads from an in-memory buffer. Payloads can be borrowed for `'de`.
pub(crate) struct SliceRead<'de> {
    data: &'de [u8],
    pos: usize,
}

impl<'de> SliceRead<'de> {
    pub(crate) fn new(data: &'de [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Consumes exactly `len` bytes and returns them as a slice of the source.
    pub(crate) fn read_borrowed(&mut self, len: usize) -> Result<&'de [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(BencodeError::UnexpectedEof)?;

        let payload = &self.data[self.pos..end];
        self.pos = end;
        Ok(payload)
    }
}

impl<'de> Read<'de> for SliceRead<'de> {
    fn position(&self) -> usize {
        self.pos
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        Ok(self.data.get(self.pos).copied())
    }

    fn discard(&mut self) {
        self.pos += 1;
    }

    fn read_owned(&mut self, len: usize) -> Result<Bytes> {
        self.read_borrowed(len).map(Bytes::copy_from_slice)
    }
}

/// Reads incrementally from a buffered stream.
///
/// Only the bytes belonging to the decoded value are consumed from the
/// underlying reader; anything after it stays buffered for the caller.
pub(crate) struct IoRead<'r, R: ?Sized> {
    inner: &'r mut R,
    pos: usize,
}

impl<'r, R: BufRead + ?Sized> IoRead<'r, R> {
    pub(crate) fn new(inner: &'r mut R) -> Self {
        Self { inner, pos: 0 }
    }
}

impl<'de, R: BufRead + ?Sized> Read<'de> for IoRead<'_, R> {
    fn position(&self) -> usize {
        self.pos
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(BencodeError::Io(e)),
            }
        }
    }

    fn discard(&mut self) {
        self.inner.consume(1);
        self.pos += 1;
    }

    fn read_owned(&mut self, len: usize) -> Result<Bytes> {
        // Grow with the bytes actually delivered rather than trusting `len`.
        let mut buf = Vec::new();
        let read = (&mut *self.inner).take(len as u64).read_to_end(&mut buf)?;
        self.pos += read;

        if read < len {
            return Err(BencodeError::UnexpectedEof);
        }
        Ok(Bytes::from(buf))
    }
}
