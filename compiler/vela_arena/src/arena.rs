//! Block-chain bump allocator.
//!
//! Allocation is a pointer bump in the common case. When the current block
//! is exhausted a fresh block is acquired from the global allocator and
//! chained; requests too large for a standard block get a dedicated block
//! of exactly the requested size. Backing-allocator failure is fatal for
//! the compilation and reported through [`std::alloc::handle_alloc_error`].

#![allow(
    unsafe_code,
    reason = "raw block allocation and pointer bumping require unsafe"
)]

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;

/// Usable bytes in a standard block.
const BLOCK_SIZE: usize = 64 * 1024;

/// Requests above this threshold get a dedicated block instead of a new
/// standard block, so a single large allocation cannot waste most of a
/// fresh block's capacity.
const LARGE_REQUEST: usize = BLOCK_SIZE / 2;

/// One heap block owned by the arena.
struct Block {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl Block {
    fn new(layout: Layout) -> Block {
        debug_assert!(layout.size() > 0);
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc(layout) };
        let Some(ptr) = NonNull::new(raw) else {
            // Fatal: the compilation cannot continue without memory.
            handle_alloc_error(layout);
        };
        Block { ptr, layout }
    }

    fn standard() -> Block {
        // Align standard blocks generously so any scalar request fits
        // without per-block alignment gaps at the base.
        Block::new(Layout::from_size_align(BLOCK_SIZE, 16).expect("valid block layout"))
    }

    fn base(&self) -> usize {
        self.ptr.as_ptr() as usize
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // SAFETY: `ptr` was obtained from `alloc` with this exact layout.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

/// Bump arena over a chain of heap blocks.
///
/// All allocations share the arena's lifetime: nothing is freed until the
/// arena is reset or dropped, and values placed in it are never dropped.
/// Interior mutability is `Cell`-based, so the arena is `!Sync`: one
/// arena per thread/compile unit.
pub struct Arena {
    /// All owned blocks. `blocks[0]` is always a standard block; the bump
    /// region lives in the most recently pushed *standard* block.
    blocks: RefCell<Vec<Block>>,
    /// Address of the next free byte in the current bump block.
    cursor: Cell<usize>,
    /// One past the last usable byte of the current bump block.
    end: Cell<usize>,
    /// Total bytes handed out (requested sizes, before alignment padding).
    allocated: Cell<usize>,
}

impl Arena {
    /// Create an arena with one standard block ready for bumping.
    pub fn new() -> Arena {
        let first = Block::standard();
        let base = first.base();
        Arena {
            blocks: RefCell::new(vec![first]),
            cursor: Cell::new(base),
            end: Cell::new(base + BLOCK_SIZE),
            allocated: Cell::new(0),
        }
    }

    /// Allocate `layout.size()` bytes at `layout.align()` alignment.
    ///
    /// The returned pointer is valid until the arena is reset or dropped.
    /// Zero-size requests return a well-aligned dangling pointer without
    /// consuming arena space.
    pub fn alloc_raw(&self, layout: Layout) -> NonNull<u8> {
        let size = layout.size();
        let align = layout.align();
        if size == 0 {
            // SAFETY: `align` is a valid nonzero power of two, so this is
            // a well-aligned dangling pointer (same trick as `NonNull::dangling`).
            return unsafe { NonNull::new_unchecked(align as *mut u8) };
        }
        self.allocated.set(self.allocated.get() + size);

        let aligned = align_up(self.cursor.get(), align);
        if aligned + size <= self.end.get() {
            self.cursor.set(aligned + size);
            // SAFETY: `aligned` lies inside a live block, never null.
            return unsafe { NonNull::new_unchecked(aligned as *mut u8) };
        }
        self.alloc_slow(layout)
    }

    /// Block-acquisition path: dedicated block for large requests, fresh
    /// standard block otherwise.
    #[cold]
    fn alloc_slow(&self, layout: Layout) -> NonNull<u8> {
        if layout.size() > LARGE_REQUEST {
            // Dedicated block of exactly the requested size. The bump
            // region stays in the current standard block, which may still
            // have usable space.
            let block = Block::new(layout);
            let ptr = block.ptr;
            self.blocks.borrow_mut().push(block);
            return ptr;
        }

        let block = Block::standard();
        let base = block.base();
        self.blocks.borrow_mut().push(block);
        let aligned = align_up(base, layout.align());
        self.cursor.set(aligned + layout.size());
        self.end.set(base + BLOCK_SIZE);
        // SAFETY: the fresh block starts 16-aligned and holds BLOCK_SIZE
        // bytes; `aligned + size` fits because size <= LARGE_REQUEST.
        unsafe { NonNull::new_unchecked(aligned as *mut u8) }
    }

    /// Move `value` into the arena and return a reference with the
    /// arena's lifetime. The value's destructor will never run.
    pub fn alloc<T>(&self, value: T) -> &mut T {
        let ptr = self.alloc_raw(Layout::new::<T>()).as_ptr().cast::<T>();
        // SAFETY: `ptr` is fresh, properly aligned, and sized for `T`.
        unsafe {
            ptr.write(value);
            &mut *ptr
        }
    }

    /// Copy a string into the arena.
    pub fn alloc_str(&self, s: &str) -> &str {
        let bytes = self.alloc_slice_copy(s.as_bytes());
        // SAFETY: `bytes` is a byte-for-byte copy of a valid `&str`.
        unsafe { std::str::from_utf8_unchecked(bytes) }
    }

    /// Copy a slice of `Copy` elements into the arena.
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> &[T] {
        if src.is_empty() {
            return &[];
        }
        let layout = Layout::array::<T>(src.len()).expect("slice layout fits isize");
        let ptr = self.alloc_raw(layout).as_ptr().cast::<T>();
        // SAFETY: `ptr` points at `src.len()` properly aligned `T` slots
        // disjoint from `src` (the arena just produced them).
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), ptr, src.len());
            std::slice::from_raw_parts(ptr, src.len())
        }
    }

    /// Total bytes handed out by this arena (excludes alignment padding
    /// and unused block capacity).
    pub fn allocated_bytes(&self) -> usize {
        self.allocated.get()
    }

    /// Number of blocks currently chained (standard + dedicated).
    pub fn block_count(&self) -> usize {
        self.blocks.borrow().len()
    }

    /// Release everything allocated so far, keeping the first block for
    /// reuse. Previously returned pointers are invalidated.
    pub fn reset(&mut self) {
        let mut blocks = self.blocks.borrow_mut();
        blocks.truncate(1);
        let base = blocks[0].base();
        self.cursor.set(base);
        self.end.set(base + BLOCK_SIZE);
        self.allocated.set(0);
    }
}

impl Default for Arena {
    fn default() -> Arena {
        Arena::new()
    }
}

/// Round `addr` up to the next multiple of `align` (a power of two).
#[inline]
fn align_up(addr: usize, align: usize) -> usize {
    (addr + align - 1) & !(align - 1)
}
