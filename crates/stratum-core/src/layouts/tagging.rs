//! The tagging layout
//!
//! A mostly-unboxed array that reserves one sentinel representation in
//! the unboxed domain to stand in for a single out-of-type value
//! (typically the collection's default). The price is that the one typed
//! value whose representation equals the sentinel is not representable
//! and promotes.

use std::any::Any;
use std::marker::PhantomData;

use crate::error::Result;
use crate::factory::StrategyFactory;
use crate::host::StrategyHost;
use crate::layouts::single_type::ValueCodec;
use crate::strategy::{IndexPolicy, SafeIndexing, Strategy};

/// A `ValueCodec` extended with the tag: the out-of-type value, its
/// identity test, and the reserved representation standing in for it.
pub trait TaggedCodec<V>: ValueCodec<V> {
    fn tag_value(&self) -> V;

    fn is_tag_value(&self, value: &V) -> bool;

    fn tag_repr(&self) -> Self::Repr;
}

pub struct TaggingStrategy<C, X, P = SafeIndexing> {
    name: &'static str,
    codec: X,
    _marker: PhantomData<fn(C, P)>,
}

impl<C, X, P> TaggingStrategy<C, X, P>
where
    C: StrategyHost,
    X: TaggedCodec<C::Value>,
    X::Repr: PartialEq,
    P: IndexPolicy,
{
    pub fn new(name: &'static str, codec: X) -> Self {
        TaggingStrategy {
            name,
            codec,
            _marker: PhantomData,
        }
    }

    pub fn codec(&self) -> &X {
        &self.codec
    }

    /// `None` when the value lies outside the representable set: neither
    /// the tag value nor a typed value, or the typed value that collides
    /// with the reserved representation.
    fn encode(&self, value: &C::Value) -> Option<X::Repr> {
        if self.codec.is_tag_value(value) {
            return Some(self.codec.tag_repr());
        }
        if self.codec.matches(value) {
            let repr = self.codec.unwrap(value);
            if repr != self.codec.tag_repr() {
                return Some(repr);
            }
        }
        None
    }

    fn decode(&self, repr: &X::Repr) -> C::Value {
        if *repr == self.codec.tag_repr() {
            self.codec.tag_value()
        } else {
            self.codec.wrap(repr.clone())
        }
    }
}

impl<C, X, P> Strategy<C> for TaggingStrategy<C, X, P>
where
    C: StrategyHost,
    X: TaggedCodec<C::Value>,
    X::Repr: PartialEq,
    P: IndexPolicy,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn check_can_handle(&self, value: &C::Value) -> bool {
        self.encode(value).is_some()
    }

    fn initialize_storage(&self, collection: &mut C, size: usize) {
        // The default value is the tag value, so a fresh payload is all
        // sentinels.
        collection
            .get_storage_mut()
            .install(vec![self.codec.tag_repr(); size]);
    }

    fn size(&self, collection: &C) -> usize {
        collection.get_storage().get::<Vec<X::Repr>>().len()
    }

    fn fetch(&self, collection: &C, index: usize) -> Result<C::Value> {
        let storage = collection.get_storage().get::<Vec<X::Repr>>();
        let index = P::check_index(index, storage.len())?;
        Ok(self.decode(&storage[index]))
    }

    fn store(
        &self,
        factory: &StrategyFactory<C>,
        collection: &mut C,
        index: usize,
        value: C::Value,
    ) -> Result<()> {
        P::check_index(index, self.size(collection))?;
        match self.encode(&value) {
            Some(repr) => {
                collection.get_storage_mut().get_mut::<Vec<X::Repr>>()[index] = repr;
                Ok(())
            }
            None => factory.promote_store(collection, index, value),
        }
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
            match self.encode(value) {
                Some(repr) => reprs.push(repr),
                None => break,
            }
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
