//! Byte chunking for large initializers.
//!
//! Compilers choke on single source lines holding megabytes of literals, so
//! each embedded byte sequence is split into fixed-size chunks and every
//! chunk is written on its own line.

use std::fmt::Write as FmtWrite;

/// Default maximum number of bytes per emitted line (2^16)
pub const CHUNK_SIZE: usize = 65_536;

/// Lazy iterator over contiguous, non-overlapping slices of a byte sequence.
///
/// A clone yields the same remaining chunks as the original. Build a new
/// one with [`ByteChunks::new`] to start over from the first chunk.
#[derive(Debug, Clone)]
pub struct ByteChunks<'a> {
    rest: &'a [u8],
    size: usize,
}

impl<'a> ByteChunks<'a> {
    /// Creates a chunk iterator; `size` must be non-zero
    pub fn new(data: &'a [u8], size: usize) -> Self {
        assert!(size > 0, "chunk size must be non-zero");
        Self { rest: data, size }
    }

    /// Number of chunks the full input produces
    pub fn count_for(len: usize, size: usize) -> usize {
        len.div_ceil(size)
    }
}

impl<'a> Iterator for ByteChunks<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let take = self.size.min(self.rest.len());
        let (chunk, rest) = self.rest.split_at(take);
        self.rest = rest;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = Self::count_for(self.rest.len(), self.size);
        (n, Some(n))
    }
}

impl ExactSizeIterator for ByteChunks<'_> {}

impl std::iter::FusedIterator for ByteChunks<'_> {}

/// Append one chunk as comma-joined decimal literals, with a trailing comma
pub fn write_decimal_chunk(out: &mut String, chunk: &[u8]) {
    // worst case "255," per byte
    out.reserve(chunk.len() * 4);
    for byte in chunk {
        // writing into a String cannot fail
        let _ = write!(out, "{},", byte);
    }
}

/// Parse a comma-separated decimal initializer body back into bytes.
///
/// Whitespace and empty items are ignored, so both single-line and
/// chunked bodies decode. Returns `None` if any item is not a `u8`.
pub fn parse_decimal_bytes(body: &str) -> Option<Vec<u8>> {
    body.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<u8>().ok())
        .collect()
}
