//! The single-type unboxed layout

use std::any::Any;
use std::marker::PhantomData;

use crate::error::Result;
use crate::factory::StrategyFactory;
use crate::host::StrategyHost;
use crate::strategy::{IndexPolicy, SafeIndexing, Strategy};

/// Wrap/unwrap pair between boxed values of one concrete variant and
/// their unboxed representation.
pub trait ValueCodec<V>: 'static {
    type Repr: Clone + 'static;

    /// True when the value's concrete variant is the unboxed type.
    fn matches(&self, value: &V) -> bool;

    /// Extract the payload. Callers check `matches` first.
    fn unwrap(&self, value: &V) -> Self::Repr;

    /// Reconstruct the boxed value.
    fn wrap(&self, repr: Self::Repr) -> V;

    fn default_repr(&self) -> Self::Repr;
}

/// Unboxed array storage for values of a single concrete variant.
pub struct SingleTypeStrategy<C, X, P = SafeIndexing> {
    name: &'static str,
    codec: X,
    _marker: PhantomData<fn(C, P)>,
}

impl<C, X, P> SingleTypeStrategy<C, X, P>
where
    C: StrategyHost,
    X: ValueCodec<C::Value>,
    P: IndexPolicy,
{
    pub fn new(name: &'static str, codec: X) -> Self {
        SingleTypeStrategy {
            name,
            codec,
            _marker: PhantomData,
        }
    }

    pub fn codec(&self) -> &X {
        &self.codec
    }
}

impl<C, X, P> Strategy<C> for SingleTypeStrategy<C, X, P>
where
    C: StrategyHost,
    X: ValueCodec<C::Value>,
    P: IndexPolicy,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn check_can_handle(&self, value: &C::Value) -> bool {
        self.codec.matches(value)
    }

    fn initialize_storage(&self, collection: &mut C, size: usize) {
        collection
            .get_storage_mut()
            .install(vec![self.codec.default_repr(); size]);
    }

    fn size(&self, collection: &C) -> usize {
        collection.get_storage().get::<Vec<X::Repr>>().len()
    }

    fn fetch(&self, collection: &C, index: usize) -> Result<C::Value> {
        let storage = collection.get_storage().get::<Vec<X::Repr>>();
        let index = P::check_index(index, storage.len())?;
        Ok(self.codec.wrap(storage[index].clone()))
    }

    fn store(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        value: C::Value,
    ) -> Result<()> {
        P::check_index(index, self.size(collection))?;
        if !self.codec.matches(&value) {
            return factory.promote_store(collection, index, value);
        }
        let repr = self.codec.unwrap(&value);
        collection.get_storage_mut().get_mut::<Vec<X::Repr>>()[index] = repr;
        Ok(())
    }

    fn insert(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        values: &[C::Value],
    ) -> Result<()> {
        P::check_range(index, index, self.size(collection))?;
        let mut reprs = Vec::new();
        for value in values {
            if !self.codec.matches(value) {
                break;
            }
            reprs.push(self.codec.unwrap(value));
        }
        let handled = reprs.len();
        collection
            .get_storage_mut()
            .get_mut::<Vec<X::Repr>>()
            .splice(index..index, reprs);
        if handled < values.len() {
            return factory.promote_insert(collection, index + handled, &values[handled..]);
        }
        Ok(())
    }

    fn delete(&self, collection: &mut C, start: usize, end: usize) -> Result<()> {
        let storage = collection.get_storage_mut().get_mut::<Vec<X::Repr>>();
        P::check_range(start, end, storage.len())?;
        storage.drain(start..end);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
