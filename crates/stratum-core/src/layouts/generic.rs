//! The generic boxed layout

use std::any::Any;
use std::marker::PhantomData;

use crate::error::Result;
use crate::factory::StrategyFactory;
use crate::host::StrategyHost;
use crate::strategy::{IndexPolicy, SafeIndexing, Strategy};

/// Boxed array storage that accepts every value. This is the terminal
/// node of any lattice: once a collection lands here it never promotes
/// again.
pub struct GenericStrategy<C: StrategyHost, P: IndexPolicy = SafeIndexing> {
    name: &'static str,
    default: C::Value,
    _policy: PhantomData<fn(P)>,
}

impl<C: StrategyHost, P: IndexPolicy> GenericStrategy<C, P> {
    pub fn new(name: &'static str, default: C::Value) -> Self {
        GenericStrategy {
            name,
            default,
            _policy: PhantomData,
        }
    }
}

impl<C: StrategyHost, P: IndexPolicy> Strategy<C> for GenericStrategy<C, P> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check_can_handle(&self, _value: &C::Value) -> bool {
        true
    }

    fn initialize_storage(&self, collection: &mut C, size: usize) {
        collection
            .get_storage_mut()
            .install(vec![self.default.clone(); size]);
    }

    fn size(&self, collection: &C) -> usize {
        collection.get_storage().get::<Vec<C::Value>>().len()
    }

    fn fetch(&self, collection: &C, index: usize) -> Result<C::Value> {
        let storage = collection.get_storage().get::<Vec<C::Value>>();
        let index = P::check_index(index, storage.len())?;
        Ok(storage[index].clone())
    }

    fn store(
        &self,
        _factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        value: C::Value,
    ) -> Result<()> {
        let storage = collection.get_storage_mut().get_mut::<Vec<C::Value>>();
        let index = P::check_index(index, storage.len())?;
        storage[index] = value;
        Ok(())
    }

    fn insert(
        &self,
        _factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        values: &[C::Value],
    ) -> Result<()> {
        let storage = collection.get_storage_mut().get_mut::<Vec<C::Value>>();
        P::check_range(index, index, storage.len())?;
        storage.splice(index..index, values.iter().cloned());
        Ok(())
    }

    fn delete(&self, collection: &mut C, start: usize, end: usize) -> Result<()> {
        let storage = collection.get_storage_mut().get_mut::<Vec<C::Value>>();
        P::check_range(start, end, storage.len())?;
        storage.drain(start..end);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Direct re-boxing copy: every layout can hand its elements straight
    /// into a boxed array without the per-element re-validation of the
    /// generic path.
    fn convert_storage_from(
        &self,
        _factory: &StrategyFactory<C>,
        collection: &mut C,
        previous: &dyn Strategy<C>,
    ) -> Result<()> {
        let values = previous.fetch_all(collection)?;
        collection.get_storage_mut().install(values);
        Ok(())
    }
}
