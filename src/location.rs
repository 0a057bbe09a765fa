use core::ptr::{self, NonNull};

/// A window into memory owned by the application.
///
/// The engine never owns the memory behind a `Location`. It only keeps the
/// window for the duration of one transaction and shrinks it byte by byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    ptr: NonNull<u8>,
    len: usize,
}

// Locations only point into memory that outlives the engine (statics or
// `Exposed` cells), and every access through them is a volatile byte access.
unsafe impl Send for Location {}
unsafe impl Sync for Location {}

impl Location {
    /// Zero-length window: writes are discarded, reads yield zero.
    pub const EMPTY: Self = Self {
        ptr: NonNull::dangling(),
        len: 0,
    };

    /// # Safety
    ///
    /// `ptr` must be non-null and valid for volatile reads and writes of `len`
    /// bytes for as long as the location can be returned by a resolver, and
    /// any byte pattern written there must be a valid value.
    pub const unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Self {
        Self {
            ptr: NonNull::new_unchecked(ptr),
            len,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Reads the byte under the cursor and advances past it.
    pub(crate) fn take_byte(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }

        let byte = unsafe { ptr::read_volatile(self.ptr.as_ptr()) };
        self.advance();
        Some(byte)
    }

    /// Stores `byte` under the cursor and advances past it. Returns `false`
    /// without touching memory once the window is exhausted.
    pub(crate) fn put_byte(&mut self, byte: u8) -> bool {
        if self.len == 0 {
            return false;
        }

        unsafe { ptr::write_volatile(self.ptr.as_ptr(), byte) };
        self.advance();
        true
    }

    fn advance(&mut self) {
        self.len -= 1;
        if self.len > 0 {
            self.ptr = unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(1)) };
        }
    }
}

/// Maps an identifier byte to the memory the master may access.
///
/// Resolution runs inside the bus interrupt: it must not block, allocate or
/// touch the bus.
pub trait Resolver {
    fn resolve(&self, identifier: u8) -> Option<Location>;
}

impl<F> Resolver for F
where
    F: Fn(u8) -> Option<Location>,
{
    fn resolve(&self, identifier: u8) -> Option<Location> {
        self(identifier)
    }
}

/// Dense identifier table covering `base..base + N`.
#[derive(Debug, Clone, Copy)]
pub struct LocationTable<const N: usize> {
    base: u8,
    entries: [Option<Location>; N],
}

impl<const N: usize> LocationTable<N> {
    pub const fn new(base: u8) -> Self {
        assert!(
            base as usize + N <= 256,
            "Location table exceeds the identifier range"
        );

        Self {
            base,
            entries: [None; N],
        }
    }

    /// Binds `identifier` to `location`. Panics if the identifier is not
    /// covered by the table.
    pub const fn with(mut self, identifier: u8, location: Location) -> Self {
        let index = match self.index_of(identifier) {
            Some(i) => i,
            None => panic!("Identifier outside the location table"),
        };
        self.entries[index] = Some(location);
        self
    }

    const fn index_of(&self, identifier: u8) -> Option<usize> {
        if identifier < self.base {
            return None;
        }

        let index = (identifier - self.base) as usize;
        if index < N {
            Some(index)
        } else {
            None
        }
    }
}

impl<const N: usize> Resolver for LocationTable<N> {
    fn resolve(&self, identifier: u8) -> Option<Location> {
        self.index_of(identifier).and_then(|i| self.entries[i])
    }
}
