//! Source files, the global offset address space, and the per-file
//! line position index.
//!
//! Every file of a compilation occupies a disjoint range of one shared
//! byte-offset space, so a bare `u32` is a complete source position. The
//! [`SourceMap`] hands out the ranges; each [`SourceFile`] keeps an
//! append-only index of line starts that the lexer feeds while scanning,
//! which makes position queries valid mid-scan for everything already
//! seen.

use std::fmt;

/// Identifier of a file registered in a [`SourceMap`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A resolved line/column position.
///
/// `line` is 1-based. `column` is the byte distance from the recorded
/// line boundary.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One registered source file: its slot in the global offset space and
/// its incrementally built line index.
///
/// Created when lexing begins, mutated only by the lexer (line-start
/// appends), then effectively frozen: diagnostics read it for the rest
/// of the compilation.
pub struct SourceFile {
    id: FileId,
    name: String,
    start_id: u32,
    len: u32,
    /// Strictly increasing global offsets; index 0 is `start_id` (line 1
    /// begins there). One entry is appended per line terminator crossed.
    /// Never revised after append.
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Open a file whose byte 0 sits at `start_id` in the global space.
    pub fn open(id: FileId, name: impl Into<String>, start_id: u32, len: u32) -> SourceFile {
        SourceFile {
            id,
            name: name.into(),
            start_id,
            len,
            line_starts: vec![start_id],
        }
    }

    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Global offset of this file's byte 0.
    #[inline]
    pub fn start_id(&self) -> u32 {
        self.start_id
    }

    /// Source length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last global offset belonging to this file.
    #[inline]
    pub fn end(&self) -> u32 {
        self.start_id + self.len
    }

    /// Number of lines discovered so far.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Record the next line boundary. Must be called in increasing offset
    /// order, once per line terminator crossed.
    pub fn append_line_start(&mut self, offset: u32) {
        debug_assert!(
            offset > *self.line_starts.last().expect("index is never empty"),
            "line starts must be strictly increasing"
        );
        self.line_starts.push(offset);
    }

    /// Resolve a global offset to a line/column position.
    ///
    /// Finds the rightmost recorded boundary at or before `offset`; its
    /// 1-based index is the line. Offsets before `start_id` clamp to
    /// line 1; offsets past the last recorded boundary resolve to the
    /// current last line, so diagnostics work mid-scan before later
    /// lines have been discovered.
    pub fn find_position(&self, offset: u32) -> Position {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        Position {
            line: idx as u32 + 1,
            column: offset.saturating_sub(self.line_starts[idx]),
        }
    }
}

/// Registry of all files in one compilation, owner of the global offset
/// address space.
pub struct SourceMap {
    files: Vec<SourceFile>,
    next_start: u32,
}

impl SourceMap {
    pub fn new() -> SourceMap {
        SourceMap {
            files: Vec::new(),
            next_start: 0,
        }
    }

    /// Register a file of `len` bytes and claim its offset range.
    ///
    /// Ranges never overlap; a one-byte gap after each file keeps them
    /// disjoint even for empty files and gives end-of-file spans a home.
    pub fn add_file(&mut self, name: impl Into<String>, len: u32) -> FileId {
        let id = FileId(self.files.len() as u32);
        let start = self.next_start;
        self.next_start = start + len + 1;
        self.files.push(SourceFile::open(id, name, start, len));
        id
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.index()]
    }

    pub fn file_mut(&mut self, id: FileId) -> &mut SourceFile {
        &mut self.files[id.index()]
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    /// Resolve a global offset back to the file owning it.
    pub fn file_at(&self, offset: u32) -> Option<&SourceFile> {
        let idx = match self
            .files
            .binary_search_by_key(&offset, SourceFile::start_id)
        {
            Ok(exact) => exact,
            Err(0) => return None,
            Err(insert) => insert - 1,
        };
        let file = &self.files[idx];
        (offset <= file.end()).then_some(file)
    }

    /// Resolve a global offset to its file and position in one step.
    pub fn position(&self, offset: u32) -> Option<(FileId, Position)> {
        let file = self.file_at(offset)?;
        Some((file.id(), file.find_position(offset)))
    }
}

impl Default for SourceMap {
    fn default() -> SourceMap {
        SourceMap::new()
    }
}
