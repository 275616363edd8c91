//! Zero-cost cursor over a sentinel-terminated buffer.
//!
//! The cursor advances byte-by-byte. EOF is detected when the current
//! byte equals the sentinel (`0x00`) and the position has reached the
//! source length; a null byte before that is an interior null, which the
//! scanner reports as an invalid token. No bounds checks are needed in
//! the common case; the sentinel guarantees termination.

/// Byte cursor over a sentinel-terminated buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
/// `Copy`, so the scanner can snapshot it for its bounded lookahead
/// (e.g. probing a `*` run for a doc-comment closing marker).
///
/// # Invariant
///
/// `buf[source_len] == 0x00`, and at least two further `0x00` bytes
/// follow it, guaranteed by `SourceBuffer` construction.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Sentinel-terminated buffer (source + sentinel + padding).
    buf: &'a [u8],
    /// Current read position.
    pos: u32,
    /// Length of actual source content.
    source_len: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Cursor<'a> {
        debug_assert!((source_len as usize) < buf.len());
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        Cursor {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// The byte at the current position; `0x00` at EOF (the sentinel).
    /// Interior nulls also read `0x00`; [`is_eof`](Self::is_eof)
    /// distinguishes them.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// The byte one position ahead. Always safe: the sentinel and padding
    /// guarantee in-bounds reads past the source content.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf[self.pos as usize + 1]
    }

    /// The byte two positions ahead.
    #[inline]
    pub fn peek2(&self) -> u8 {
        self.buf[self.pos as usize + 2]
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// True when the current byte is the sentinel, not an interior null.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current() == 0 && self.pos >= self.source_len
    }

    /// Current byte offset in the source (file-local).
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Length of the source content.
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Extract `start..end` as `&str`.
    ///
    /// # Contract
    ///
    /// The range must lie within the source content on UTF-8 character
    /// boundaries, guaranteed when both ends come from the scanner's
    /// token boundary tracking, since the source was built from `&str`.
    #[allow(
        unsafe_code,
        reason = "from_utf8_unchecked on source originally validated as &str"
    )]
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        debug_assert!(start <= end && end <= self.source_len);
        // SAFETY: see the contract above.
        unsafe { std::str::from_utf8_unchecked(&self.buf[start as usize..end as usize]) }
    }

    /// Extract `start..pos` as `&str`.
    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos)
    }

    /// Advance while `pred` holds for the current byte.
    ///
    /// `pred(0)` must return `false` so the sentinel terminates the loop;
    /// all the byte classes the scanner uses satisfy this.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }

    /// Advance past horizontal whitespace: space, tab, and carriage
    /// return (a lone `\r` is horizontal; `\r\n` leaves the `\n` for the
    /// newline handler, which is the one place line boundaries are
    /// recorded).
    #[inline]
    pub fn eat_whitespace(&mut self) {
        loop {
            match self.buf[self.pos as usize] {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Advance to the next `\n` or EOF, SIMD-accelerated. Used to skip
    /// line comment bodies. The cursor stops *at* the newline.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offsets are bounded by source_len which fits in u32"
    )]
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        match memchr::memchr(b'\n', remaining) {
            Some(offset) => self.pos += offset as u32,
            None => self.pos = self.source_len,
        }
    }

    /// Advance past ordinary string content to the next interesting byte
    /// (`"`, `\`, `\n`, `\r`) and return it, or `0` at EOF.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offsets are bounded by source_len which fits in u32"
    )]
    pub fn skip_to_string_delim(&mut self) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        let primary = memchr::memchr3(b'"', b'\\', b'\n', remaining);
        let cr = memchr::memchr(b'\r', remaining);
        let offset = match (primary, cr) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, None) => a,
            (None, b) => b,
        };
        match offset {
            Some(off) => {
                self.pos += off as u32;
                self.buf[self.pos as usize]
            }
            None => {
                self.pos = self.source_len;
                0
            }
        }
    }

    /// Width in bytes of the UTF-8 character starting with `byte`.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance past one full UTF-8 character.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.advance_n(width);
    }
}
