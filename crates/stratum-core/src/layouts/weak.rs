//! The weak generic layout

use std::any::Any;
use std::marker::PhantomData;

use crate::error::Result;
use crate::factory::StrategyFactory;
use crate::host::StrategyHost;
use crate::strategy::{IndexPolicy, SafeIndexing, Strategy, WeakValue};

/// Boxed array storage over non-owning handles. Accepts every value;
/// fetching a slot whose referent has been reclaimed yields the layout's
/// default value instead, which is a value-level change and never a
/// transition.
pub struct WeakGenericStrategy<C: StrategyHost>
where
    C::Value: WeakValue,
{
    name: &'static str,
    default: C::Value,
    _host: PhantomData<fn(C)>,
}

impl<C: StrategyHost> WeakGenericStrategy<C>
where
    C::Value: WeakValue,
{
    pub fn new(name: &'static str, default: C::Value) -> Self {
        WeakGenericStrategy {
            name,
            default,
            _host: PhantomData,
        }
    }

    fn upgrade_or_default(&self, weak: &<C::Value as WeakValue>::Weak) -> C::Value {
        <C::Value as WeakValue>::upgrade(weak).unwrap_or_else(|| self.default.clone())
    }
}

impl<C: StrategyHost> Strategy<C> for WeakGenericStrategy<C>
where
    C::Value: WeakValue,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn check_can_handle(&self, _value: &C::Value) -> bool {
        true
    }

    fn initialize_storage(&self, collection: &mut C, size: usize) {
        collection
            .get_storage_mut()
            .install(vec![self.default.downgrade(); size]);
    }

    fn size(&self, collection: &C) -> usize {
        collection
            .get_storage()
            .get::<Vec<<C::Value as WeakValue>::Weak>>()
            .len()
    }

    fn fetch(&self, collection: &C, index: usize) -> Result<C::Value> {
        let storage = collection
            .get_storage()
            .get::<Vec<<C::Value as WeakValue>::Weak>>();
        let index = SafeIndexing::check_index(index, storage.len())?;
        Ok(self.upgrade_or_default(&storage[index]))
    }

    fn store(
        &self,
        _factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        value: C::Value,
    ) -> Result<()> {
        let storage = collection
            .get_storage_mut()
            .get_mut::<Vec<<C::Value as WeakValue>::Weak>>();
        let index = SafeIndexing::check_index(index, storage.len())?;
        storage[index] = value.downgrade();
        Ok(())
    }

    fn insert(
        &self,
        _factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        values: &[C::Value],
    ) -> Result<()> {
        let storage = collection
            .get_storage_mut()
            .get_mut::<Vec<<C::Value as WeakValue>::Weak>>();
        SafeIndexing::check_range(index, index, storage.len())?;
        storage.splice(index..index, values.iter().map(|v| v.downgrade()));
        Ok(())
    }

    fn delete(&self, collection: &mut C, start: usize, end: usize) -> Result<()> {
        let storage = collection
            .get_storage_mut()
            .get_mut::<Vec<<C::Value as WeakValue>::Weak>>();
        SafeIndexing::check_range(start, end, storage.len())?;
        storage.drain(start..end);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Downgrade in bulk instead of re-validating element by element.
    fn convert_storage_from(
        &self,
        _factory: &StrategyFactory<C>,
        collection: &mut C,
        previous: &dyn Strategy<C>,
    ) -> Result<()> {
        let weak: Vec<<C::Value as WeakValue>::Weak> = previous
            .fetch_all(collection)?
            .iter()
            .map(|v| v.downgrade())
            .collect();
        collection.get_storage_mut().install(weak);
        Ok(())
    }
}
