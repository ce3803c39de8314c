//! Type-erased storage cell
//!
//! Every collection owns exactly one `StorageCell`. The concrete payload
//! type is chosen by the strategy currently installed on the collection:
//! `()` for the empty layout, a `usize` counter for single-value layouts,
//! a `Vec` of boxed values, unboxed representations or weak handles for
//! the array layouts. The cell itself never interprets the payload; it
//! only hands it back to the strategy that wrote it.

use std::any::Any;
use std::fmt;

/// An opaque cell holding a strategy-owned payload.
///
/// Reading the cell with a payload type other than the one installed, or
/// before any payload was installed, is a programming error and panics.
/// The expected type is implied by the collection's current strategy, so a
/// mismatch means the strategy pointer and the storage cell went out of
/// sync.
#[derive(Default)]
pub struct StorageCell {
    payload: Option<Box<dyn Any>>,
}

impl StorageCell {
    /// A cell with no payload, as on a collection before
    /// `set_initial_strategy`.
    pub fn unset() -> Self {
        StorageCell { payload: None }
    }

    pub fn is_set(&self) -> bool {
        self.payload.is_some()
    }

    /// Install a fresh payload, dropping the previous one.
    pub fn install<T: 'static>(&mut self, payload: T) {
        self.payload = Some(Box::new(payload));
    }

    /// Drop the payload, returning the cell to its uninitialized state.
    pub fn clear(&mut self) {
        self.payload = None;
    }

    pub fn get<T: 'static>(&self) -> &T {
        self.payload
            .as_ref()
            .expect("storage cell read before a strategy initialized it")
            .downcast_ref::<T>()
            .expect("storage cell read with a payload type not written by the current strategy")
    }

    pub fn get_mut<T: 'static>(&mut self) -> &mut T {
        self.payload
            .as_mut()
            .expect("storage cell written before a strategy initialized it")
            .downcast_mut::<T>()
            .expect("storage cell written with a payload type not written by the current strategy")
    }
}

impl fmt::Debug for StorageCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            write!(f, "StorageCell(set)")
        } else {
            write!(f, "StorageCell(unset)")
        }
    }
}
