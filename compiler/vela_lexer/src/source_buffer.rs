//! Sentinel-terminated source buffer for zero-bounds-check scanning.
//!
//! The buffer guarantees a `0x00` sentinel byte after the source content,
//! so the scanner detects end of input by reading a byte instead of
//! comparing positions. The total size is rounded up to the next 64-byte
//! boundary, which also provides safe zero padding for `peek()` and
//! `peek2()` near the end of the buffer.
//!
//! Interior null bytes in the source are distinguished from the sentinel
//! by position (see [`Cursor::is_eof`](crate::Cursor::is_eof)); the
//! scanner turns them into invalid tokens rather than stopping early.

use crate::Cursor;

/// Cache line size in bytes, used for buffer padding.
const CACHE_LINE: usize = 64;

/// Sentinel-terminated copy of one file's source text.
///
/// Layout: `[source_bytes..., 0x00, zero padding...]` with the sentinel
/// at index `len()` and padding out to a 64-byte boundary.
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    buf: Vec<u8>,
    /// Length of the actual source content (excludes sentinel/padding).
    source_len: u32,
}

impl SourceBuffer {
    /// Copy `source` into a fresh sentinel-terminated buffer.
    ///
    /// Sources longer than `u32::MAX` bytes are rejected upstream by the
    /// driver; this constructor asserts the bound.
    pub fn new(source: &str) -> SourceBuffer {
        let source_bytes = source.as_bytes();
        let source_len =
            u32::try_from(source_bytes.len()).expect("source file exceeds 4 GiB limit");

        // Round up to a 64-byte boundary, always leaving room for the
        // sentinel plus two lookahead bytes (`peek2` must stay in bounds
        // even at the sentinel position).
        let padded_len = (source_bytes.len() + 3).next_multiple_of(CACHE_LINE);
        let mut buf = vec![0u8; padded_len];
        buf[..source_bytes.len()].copy_from_slice(source_bytes);

        SourceBuffer { buf, source_len }
    }

    /// The source bytes, without sentinel or padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }

    /// A [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// Source length in bytes.
    pub fn len(&self) -> u32 {
        self.source_len
    }

    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }
}
