//! Collection façade
//!
//! The thin dispatch layer host code talks to. Every operation loads the
//! collection's current strategy and forwards to it with the collection
//! as first argument; the façade itself holds no storage logic and never
//! reads the storage cell.

use crate::error::{Result, StrategyError};
use crate::factory::StrategyFactory;
use crate::host::{StrategyHandle, StrategyHost, StrategyId};

/// A borrow of one collection routed through its factory.
pub struct Collection<'a, C: StrategyHost> {
    factory: &'a StrategyFactory<C>,
    host: &'a mut C,
}

impl<C: StrategyHost> StrategyFactory<C> {
    /// Façade over `host`. Valid for any collection after
    /// `set_initial_strategy`; operations on an uninitialized collection
    /// fail with `Uninitialized`.
    pub fn collection<'a>(&'a self, host: &'a mut C) -> Collection<'a, C> {
        Collection {
            factory: self,
            host,
        }
    }
}

impl<'a, C: StrategyHost> Collection<'a, C> {
    fn current(&self) -> Result<StrategyHandle<C>> {
        self.host
            .get_strategy()
            .cloned()
            .ok_or(StrategyError::Uninitialized)
    }

    /// Id of the strategy currently backing this collection.
    pub fn strategy(&self) -> Result<StrategyId> {
        Ok(self.current()?.id())
    }

    pub fn size(&self) -> Result<usize> {
        Ok(self.current()?.instance().size(self.host))
    }

    pub fn fetch(&self, index: usize) -> Result<C::Value> {
        self.current()?.instance().fetch(self.host, index)
    }

    pub fn store(&mut self, index: usize, value: C::Value) -> Result<()> {
        self.current()?
            .instance()
            .store(self.factory, self.host, index, value)
    }

    pub fn insert(&mut self, index: usize, values: &[C::Value]) -> Result<()> {
        self.current()?
            .instance()
            .insert(self.factory, self.host, index, values)
    }

    pub fn delete(&mut self, start: usize, end: usize) -> Result<()> {
        self.current()?.instance().delete(self.host, start, end)
    }

    pub fn append(&mut self, values: &[C::Value]) -> Result<()> {
        self.current()?
            .instance()
            .append(self.factory, self.host, values)
    }

    pub fn pop(&mut self, index: usize) -> Result<C::Value> {
        self.current()?.instance().pop(self.host, index)
    }

    pub fn slice(&self, start: usize, end: usize) -> Result<Vec<C::Value>> {
        self.current()?.instance().slice(self.host, start, end)
    }

    pub fn fetch_all(&self) -> Result<Vec<C::Value>> {
        self.current()?.instance().fetch_all(self.host)
    }

    pub fn store_all(&mut self, values: &[C::Value]) -> Result<()> {
        self.current()?
            .instance()
            .store_all(self.factory, self.host, values)
    }
}
