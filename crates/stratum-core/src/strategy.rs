//! The strategy operation contract
//!
//! A strategy is one concrete in-memory representation for a collection:
//! a storage shape plus a value-membership predicate. Strategies operate
//! on a foreign collection handle and keep no per-collection state of
//! their own (singleton layouts) or are instantiated once per collection
//! (non-singleton layouts).
//!
//! `store` and `insert` take the owning factory so that a value outside
//! the representable set can trigger the promotion protocol; everything
//! else works on the collection alone.

use std::any::Any;
use std::sync::Arc;

use crate::error::{Result, StrategyError};
use crate::factory::StrategyFactory;
use crate::host::StrategyHost;

pub trait Strategy<C: StrategyHost>: Any {
    /// Layout name as it appears in transition log lines.
    fn name(&self) -> &'static str;

    /// Singleton layouts share one instance across every collection;
    /// non-singleton layouts get a fresh instance per collection through
    /// `instantiate`.
    fn is_singleton(&self) -> bool {
        true
    }

    /// Build a per-collection instance. Only consulted for layouts that
    /// report `is_singleton() == false`; the registry entry then acts as a
    /// prototype used for predicate queries alone.
    fn instantiate(&self, _collection: &C, _size: usize) -> Option<Arc<dyn Strategy<C>>> {
        None
    }

    /// Membership test for the representable value set.
    fn check_can_handle(&self, value: &C::Value) -> bool;

    /// Install a fresh payload representing `size` copies of this
    /// strategy's default value. May assume nothing about the previous
    /// payload.
    fn initialize_storage(&self, collection: &mut C, size: usize);

    fn size(&self, collection: &C) -> usize;

    fn fetch(&self, collection: &C, index: usize) -> Result<C::Value>;

    fn store(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        value: C::Value,
    ) -> Result<()>;

    /// Grow storage at `index`, shifting the suffix right. When an element
    /// of `values` falls outside the representable set, the prefix before
    /// it stays written in place and the remainder is handed to the
    /// promoted strategy at the split position.
    fn insert(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        values: &[C::Value],
    ) -> Result<()>;

    /// Shrink storage, shifting the suffix left. Range-checked.
    fn delete(&self, collection: &mut C, start: usize, end: usize) -> Result<()>;

    /// Hook invoked after a transition onto this strategy completed.
    fn strategy_switched(&self, _collection: &mut C) {}

    /// Downcast access for specialized storage conversions.
    fn as_any(&self) -> &dyn Any;

    // === Derived operations ===

    fn slice(&self, collection: &C, start: usize, end: usize) -> Result<Vec<C::Value>> {
        (start..end).map(|i| self.fetch(collection, i)).collect()
    }

    fn fetch_all(&self, collection: &C) -> Result<Vec<C::Value>> {
        self.slice(collection, 0, self.size(collection))
    }

    fn store_all(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        values: &[C::Value],
    ) -> Result<()> {
        // An early store may promote the collection, so later elements
        // must go through whichever strategy is installed by then.
        for (i, value) in values.iter().enumerate() {
            let handle = collection
                .get_strategy()
                .cloned()
                .ok_or(StrategyError::Uninitialized)?;
            handle.instance().store(factory, collection, i, value.clone())?;
        }
        Ok(())
    }

    fn append(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        values: &[C::Value],
    ) -> Result<()> {
        let size = self.size(collection);
        self.insert(factory, collection, size, values)
    }

    fn pop(&self, collection: &mut C, index: usize) -> Result<C::Value> {
        let value = self.fetch(collection, index)?;
        self.delete(collection, index, index + 1)?;
        Ok(value)
    }

    // === Storage conversion ===

    /// Generic storage migration: re-box every element of the previous
    /// layout and store it under this one. Correct for any pair of
    /// layouts; targets with a structural shortcut override it, and
    /// factory-registered converters bypass it entirely.
    fn convert_storage_from(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        previous: &dyn Strategy<C>,
    ) -> Result<()> {
        let values = previous.fetch_all(collection)?;
        self.initialize_storage(collection, values.len());
        for (i, value) in values.into_iter().enumerate() {
            // Storing may cascade into a further promotion, so re-read the
            // installed strategy each round.
            let handle = collection
                .get_strategy()
                .cloned()
                .ok_or(StrategyError::Uninitialized)?;
            handle.instance().store(factory, collection, i, value)?;
        }
        Ok(())
    }
}

/// Bounds-checking behavior a layout composes in.
pub trait IndexPolicy: 'static {
    fn check_index(index: usize, size: usize) -> Result<usize>;

    fn check_range(start: usize, end: usize, size: usize) -> Result<()>;
}

/// Rejects out-of-range indices with `IndexOutOfBounds` and ill-formed
/// ranges with `RangeOutOfBounds`.
pub struct SafeIndexing;

impl IndexPolicy for SafeIndexing {
    fn check_index(index: usize, size: usize) -> Result<usize> {
        if index < size {
            Ok(index)
        } else {
            Err(StrategyError::IndexOutOfBounds { index, size })
        }
    }

    fn check_range(start: usize, end: usize, size: usize) -> Result<()> {
        if start <= end && end <= size {
            Ok(())
        } else {
            Err(StrategyError::RangeOutOfBounds { start, end, size })
        }
    }
}

/// Trusts the caller: no bounds checks. Out-of-range access falls through
/// to the underlying storage, which panics on violation.
pub struct UnsafeIndexing;

impl IndexPolicy for UnsafeIndexing {
    fn check_index(index: usize, _size: usize) -> Result<usize> {
        Ok(index)
    }

    fn check_range(_start: usize, _end: usize, _size: usize) -> Result<()> {
        Ok(())
    }
}

/// Values a weak layout can hold: anything with a non-owning handle form.
pub trait WeakValue: Clone {
    type Weak: Clone + 'static;

    fn downgrade(&self) -> Self::Weak;

    /// `None` once the referent has been reclaimed.
    fn upgrade(weak: &Self::Weak) -> Option<Self>;
}

impl<T: 'static> WeakValue for std::rc::Rc<T> {
    type Weak = std::rc::Weak<T>;

    fn downgrade(&self) -> Self::Weak {
        std::rc::Rc::downgrade(self)
    }

    fn upgrade(weak: &Self::Weak) -> Option<Self> {
        weak.upgrade()
    }
}

impl<T: 'static> WeakValue for std::sync::Arc<T> {
    type Weak = std::sync::Weak<T>;

    fn downgrade(&self) -> Self::Weak {
        std::sync::Arc::downgrade(self)
    }

    fn upgrade(weak: &Self::Weak) -> Option<Self> {
        weak.upgrade()
    }
}
