use core::{cell::UnsafeCell, mem, ptr};

use bytemuck::Pod;

use crate::Location;

/// Application value that the bus master may read and overwrite.
///
/// The dispatcher touches the value byte by byte from interrupt context.
/// Accesses from the application go through a critical section so that a
/// multi-byte value is never observed half-written by either side. Separate
/// cells are not updated atomically with respect to each other.
pub struct Exposed<T> {
    value: UnsafeCell<T>,
}

unsafe impl<T: Send> Sync for Exposed<T> {}

impl<T: Pod> Exposed<T> {
    pub const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    pub fn get(&self) -> T {
        critical_section::with(|_| unsafe { ptr::read_volatile(self.value.get()) })
    }

    pub fn set(&self, value: T) {
        critical_section::with(|_| unsafe { ptr::write_volatile(self.value.get(), value) })
    }

    /// Read-modify-write without the dispatcher interleaving. Returns the new
    /// value.
    pub fn update(&self, f: impl FnOnce(T) -> T) -> T {
        critical_section::with(|_| unsafe {
            let value = f(ptr::read_volatile(self.value.get()));
            ptr::write_volatile(self.value.get(), value);
            value
        })
    }

    /// The whole value as a resolver window, in native byte order.
    pub fn location(&'static self) -> Location {
        // `T: Pod` accepts any byte pattern the master writes.
        unsafe { Location::from_raw_parts(self.value.get().cast::<u8>(), mem::size_of::<T>()) }
    }
}
