//! The empty layout

use std::any::Any;
use std::marker::PhantomData;

use crate::error::{Result, StrategyError};
use crate::factory::StrategyFactory;
use crate::host::StrategyHost;
use crate::strategy::{IndexPolicy, SafeIndexing, Strategy};

/// Represents no values at all: `size` is always zero and any store or
/// insert of actual elements promotes immediately.
pub struct EmptyStrategy<C> {
    name: &'static str,
    _host: PhantomData<fn(C)>,
}

impl<C: StrategyHost> EmptyStrategy<C> {
    pub fn new(name: &'static str) -> Self {
        EmptyStrategy {
            name,
            _host: PhantomData,
        }
    }
}

impl<C: StrategyHost> Strategy<C> for EmptyStrategy<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check_can_handle(&self, _value: &C::Value) -> bool {
        false
    }

    fn initialize_storage(&self, collection: &mut C, _size: usize) {
        collection.get_storage_mut().install(());
    }

    fn size(&self, _collection: &C) -> usize {
        0
    }

    fn fetch(&self, _collection: &C, index: usize) -> Result<C::Value> {
        Err(StrategyError::IndexOutOfBounds { index, size: 0 })
    }

    fn store(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        value: C::Value,
    ) -> Result<()> {
        factory.promote_store(collection, index, value)
    }

    fn insert(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        values: &[C::Value],
    ) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        factory.promote_insert(collection, index, values)
    }

    fn delete(&self, _collection: &mut C, start: usize, end: usize) -> Result<()> {
        // Only the empty range is deletable from an empty collection.
        SafeIndexing::check_range(start, end, 0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
