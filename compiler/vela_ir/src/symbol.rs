//! Interning symbol table doubling as the keyword registry.
//!
//! Interning hashes with FNV-1a. The algorithm is load-bearing, because
//! keyword pre-seeding and later lookups must agree bit-for-bit on slot
//! placement. Canonical copies are leaked to `&'static str` so equal
//! content always yields the identical stable address; the table itself
//! is a per-compilation context object and is simply dropped at the end
//! of its scope.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::TokenKind;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a over raw bytes.
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// A canonical interned string plus the token kind recorded when it was
/// first inserted (a pre-seeded keyword kind, or [`TokenKind::Ident`]).
///
/// Equality and hashing go by address: equal content always interns to
/// the identical canonical pointer, so pointer identity IS content
/// equality for symbols from the same table.
#[derive(Copy, Clone)]
pub struct Symbol {
    text: &'static str,
    kind: TokenKind,
}

impl Symbol {
    #[inline]
    pub fn text(self) -> &'static str {
        self.text
    }

    #[inline]
    pub fn kind(self) -> TokenKind {
        self.kind
    }

    /// The canonical address.
    #[inline]
    pub fn as_ptr(self) -> *const u8 {
        self.text.as_ptr()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Symbol) -> bool {
        std::ptr::eq(self.text.as_ptr(), other.text.as_ptr())
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.text.as_ptr() as usize).hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?}, {:?})", self.text, self.kind)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

struct Entry {
    hash: u32,
    symbol: Symbol,
}

/// Open-addressing intern table, pre-seeded with every fixed keyword,
/// type-name, directive, and operator spelling tagged with its kind.
///
/// Lookup is amortized O(1): power-of-two capacity, linear probing, full
/// byte-equality as the collision tie-break. Entries are immutable once
/// inserted and the table grows monotonically for its whole life.
pub struct SymbolTable {
    slots: Vec<Option<Entry>>,
    len: usize,
}

impl SymbolTable {
    /// Create a table with every [`TokenKind::spelling`] pre-seeded.
    ///
    /// This seeding is what lets the lexer resolve "is this word a
    /// keyword" with one intern call instead of a dispatch table.
    pub fn new() -> SymbolTable {
        let mut table = SymbolTable {
            slots: Vec::new(),
            len: 0,
        };
        table.grow(512);
        for kind in TokenKind::all_kinds() {
            if let Some(spelling) = kind.spelling() {
                let hash = fnv1a(spelling.as_bytes());
                debug_assert!(
                    table.find(spelling, hash).is_none(),
                    "duplicate seeded spelling {spelling:?}"
                );
                table.insert_new(
                    Symbol {
                        text: spelling,
                        kind,
                    },
                    hash,
                );
            }
        }
        table
    }

    /// Intern `text`, hashing it here.
    pub fn intern(&mut self, text: &str) -> Symbol {
        self.intern_hashed(text, fnv1a(text.as_bytes()))
    }

    /// Intern `text` with a caller-computed FNV-1a hash.
    ///
    /// If the content already exists the stored canonical symbol comes
    /// back, including the kind recorded at first insertion. Otherwise a
    /// canonical copy is made and tagged [`TokenKind::Ident`].
    pub fn intern_hashed(&mut self, text: &str, hash: u32) -> Symbol {
        debug_assert_eq!(hash, fnv1a(text.as_bytes()), "hash must be FNV-1a of the bytes");
        if let Some(existing) = self.find(text, hash) {
            return existing;
        }
        if self.len * 4 >= self.slots.len() * 3 {
            self.grow(self.slots.len() * 2);
        }
        let canonical: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let symbol = Symbol {
            text: canonical,
            kind: TokenKind::Ident,
        };
        self.insert_new(symbol, hash);
        symbol
    }

    /// Non-inserting lookup.
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.find(text, fnv1a(text.as_bytes()))
    }

    /// Number of interned strings, seeded spellings included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn find(&self, text: &str, hash: u32) -> Option<Symbol> {
        let mask = self.slots.len() - 1;
        let mut idx = hash as usize & mask;
        loop {
            match &self.slots[idx] {
                None => return None,
                Some(entry) if entry.hash == hash && entry.symbol.text == text => {
                    return Some(entry.symbol);
                }
                Some(_) => idx = (idx + 1) & mask,
            }
        }
    }

    /// Insert a symbol whose content is known to be absent.
    fn insert_new(&mut self, symbol: Symbol, hash: u32) {
        let mask = self.slots.len() - 1;
        let mut idx = hash as usize & mask;
        while self.slots[idx].is_some() {
            idx = (idx + 1) & mask;
        }
        self.slots[idx] = Some(Entry { hash, symbol });
        self.len += 1;
    }

    /// Rehash into `new_capacity` slots (a power of two).
    fn grow(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity.is_power_of_two());
        let old = std::mem::replace(
            &mut self.slots,
            (0..new_capacity).map(|_| None).collect(),
        );
        let mask = new_capacity - 1;
        for entry in old.into_iter().flatten() {
            let mut idx = entry.hash as usize & mask;
            while self.slots[idx].is_some() {
                idx = (idx + 1) & mask;
            }
            self.slots[idx] = Some(entry);
        }
    }
}

impl Default for SymbolTable {
    fn default() -> SymbolTable {
        SymbolTable::new()
    }
}
