//! Bump arena backing all ephemeral compiler allocations.
//!
//! One [`Arena`] lives for one compilation unit. Token payloads, and later
//! AST storage, are bump-allocated from a chain of fixed-size blocks and
//! released in one bulk operation when the arena is dropped (or recycled
//! with [`Arena::reset`]). Individual allocations are never freed.
//!
//! The arena is single-threaded: allocation state lives in `Cell`s, so the
//! type is `!Sync` by construction. One arena per compile unit avoids any
//! need for synchronization.

mod arena;

pub use arena::Arena;
