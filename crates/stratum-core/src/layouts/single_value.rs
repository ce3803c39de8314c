//! The single-value layout

use std::any::Any;
use std::marker::PhantomData;

use crate::error::Result;
use crate::factory::StrategyFactory;
use crate::host::StrategyHost;
use crate::strategy::{IndexPolicy, SafeIndexing, Strategy};

/// Supplies the one value a `SingleValueStrategy` can represent, together
/// with its identity test.
pub trait SingleValueSpec<V>: 'static {
    fn value(&self) -> V;

    fn is_value(&self, value: &V) -> bool;
}

/// Every slot holds one well-known value, so the only storage needed is an
/// element counter. All operations are O(1).
pub struct SingleValueStrategy<C, S> {
    name: &'static str,
    spec: S,
    _host: PhantomData<fn(C)>,
}

impl<C: StrategyHost, S: SingleValueSpec<C::Value>> SingleValueStrategy<C, S> {
    pub fn new(name: &'static str, spec: S) -> Self {
        SingleValueStrategy {
            name,
            spec,
            _host: PhantomData,
        }
    }

    pub fn spec(&self) -> &S {
        &self.spec
    }
}

impl<C: StrategyHost, S: SingleValueSpec<C::Value>> Strategy<C> for SingleValueStrategy<C, S> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check_can_handle(&self, value: &C::Value) -> bool {
        self.spec.is_value(value)
    }

    fn initialize_storage(&self, collection: &mut C, size: usize) {
        collection.get_storage_mut().install(size);
    }

    fn size(&self, collection: &C) -> usize {
        *collection.get_storage().get::<usize>()
    }

    fn fetch(&self, collection: &C, index: usize) -> Result<C::Value> {
        SafeIndexing::check_index(index, self.size(collection))?;
        Ok(self.spec.value())
    }

    fn store(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        value: C::Value,
    ) -> Result<()> {
        SafeIndexing::check_index(index, self.size(collection))?;
        if self.spec.is_value(&value) {
            // The slot already holds this value by definition.
            return Ok(());
        }
        factory.promote_store(collection, index, value)
    }

    fn insert(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        values: &[C::Value],
    ) -> Result<()> {
        let size = self.size(collection);
        SafeIndexing::check_range(index, index, size)?;
        // Absorb the leading run of representable elements into the
        // counter; the remainder belongs to a more general layout.
        let handled = values
            .iter()
            .take_while(|v| self.spec.is_value(v))
            .count();
        *collection.get_storage_mut().get_mut::<usize>() += handled;
        if handled < values.len() {
            return factory.promote_insert(collection, index + handled, &values[handled..]);
        }
        Ok(())
    }

    fn delete(&self, collection: &mut C, start: usize, end: usize) -> Result<()> {
        SafeIndexing::check_range(start, end, self.size(collection))?;
        *collection.get_storage_mut().get_mut::<usize>() -= end - start;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
