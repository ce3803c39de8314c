//! Collection host interface
//!
//! The core never defines a collection type of its own. Host code brings
//! one and exposes exactly two mutable cells through `StrategyHost`: the
//! strategy slot and the storage cell. Everything else about the host type
//! is opaque.

use std::sync::Arc;

use crate::cell::StorageCell;
use crate::strategy::Strategy;

/// Identifies a strategy registered with a factory.
///
/// Ids are assigned in registration order by the `FactoryBuilder` and are
/// only meaningful for the factory that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrategyId(pub(crate) usize);

impl StrategyId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The strategy currently backing a collection: its registry id plus the
/// instance servicing operations. For singleton layouts the instance is
/// shared with every other collection on that layout; for non-singleton
/// layouts it is private to this collection.
pub struct StrategyHandle<C: StrategyHost> {
    pub(crate) id: StrategyId,
    pub(crate) instance: Arc<dyn Strategy<C>>,
}

impl<C: StrategyHost> StrategyHandle<C> {
    pub fn id(&self) -> StrategyId {
        self.id
    }

    pub fn instance(&self) -> &dyn Strategy<C> {
        self.instance.as_ref()
    }

    /// True when both handles share one strategy instance.
    pub fn shares_instance(&self, other: &StrategyHandle<C>) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }
}

// Derived Clone would demand C: Clone, which hosts need not be.
impl<C: StrategyHost> Clone for StrategyHandle<C> {
    fn clone(&self) -> Self {
        StrategyHandle {
            id: self.id,
            instance: Arc::clone(&self.instance),
        }
    }
}

/// Host-side plumbing the core needs from a collection type.
///
/// A host keeps an `Option<StrategyHandle<Self>>` and a `StorageCell` and
/// wires them through the four accessors. The two naming hooks only feed
/// the transition log; leaving them at their empty defaults omits the
/// corresponding clauses from the log lines.
pub trait StrategyHost: Sized + 'static {
    type Value: Clone + 'static;

    fn get_strategy(&self) -> Option<&StrategyHandle<Self>>;

    fn set_strategy(&mut self, handle: StrategyHandle<Self>);

    fn get_storage(&self) -> &StorageCell;

    fn get_storage_mut(&mut self) -> &mut StorageCell;

    /// Host type name recorded in log lines (the `of <classname>` clause).
    fn type_name(&self) -> &'static str {
        ""
    }

    /// Host type name of a value, for the log's `elements:` clause.
    fn value_type_name(_value: &Self::Value) -> &'static str {
        ""
    }
}
