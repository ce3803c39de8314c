//! Strategy factory and registry
//!
//! The factory owns one instance per registered strategy (a shared
//! singleton, or a prototype for per-collection layouts), the
//! generalization edges between them, the specialized-conversion dispatch
//! table, and the transition logger. It is assembled once through
//! `FactoryBuilder` and frozen afterwards; construction rejects cyclic
//! generalization graphs.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, StrategyError};
use crate::host::{StrategyHandle, StrategyHost, StrategyId};
use crate::logger::Logger;
use crate::strategy::Strategy;

/// Layout-aware storage migration for one `(source, target)` pair.
/// Receives the factory, the collection, and the two strategy instances.
pub(crate) type ConversionFn<C> = Box<
    dyn Fn(&StrategyFactory<C>, &mut C, &dyn Strategy<C>, &dyn Strategy<C>) -> Result<()>,
>;

struct RegisteredStrategy<C: StrategyHost> {
    instance: Arc<dyn Strategy<C>>,
    generalizations: Vec<StrategyId>,
    depth: usize,
}

/// Visit state for DFS cycle detection over the generalization graph
#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    NotVisited,
    InProgress,
    Completed,
}

/// Collects strategies, generalization edges and converters, then builds
/// a frozen `StrategyFactory`.
pub struct FactoryBuilder<C: StrategyHost> {
    instances: Vec<Arc<dyn Strategy<C>>>,
    edges: Vec<(StrategyId, Vec<StrategyId>)>,
    converters: Vec<(StrategyId, StrategyId, ConversionFn<C>)>,
    logger: Logger,
}

impl<C: StrategyHost> FactoryBuilder<C> {
    pub fn new() -> Self {
        FactoryBuilder {
            instances: Vec::new(),
            edges: Vec::new(),
            converters: Vec::new(),
            logger: Logger::disabled(),
        }
    }

    /// Register a strategy instance and obtain its id. Registration order
    /// breaks ties between strategies of equal generalization depth when
    /// classifying values.
    pub fn strategy<S: Strategy<C>>(&mut self, instance: S) -> StrategyId {
        let id = StrategyId(self.instances.len());
        self.instances.push(Arc::new(instance));
        id
    }

    /// Declare where `from` promotes to, in decreasing order of
    /// preference. The first target whose predicate accepts the offending
    /// value wins.
    pub fn generalize_to(&mut self, from: StrategyId, targets: &[StrategyId]) {
        self.edges.push((from, targets.to_vec()));
    }

    /// Register a layout-aware converter for one `(source, target)`
    /// transition, bypassing the generic re-boxing path for that pair.
    pub fn converter<S, T, F>(&mut self, from: StrategyId, to: StrategyId, convert: F)
    where
        S: Strategy<C>,
        T: Strategy<C>,
        F: Fn(&StrategyFactory<C>, &mut C, &S, &T) -> Result<()> + 'static,
    {
        let wrapped: ConversionFn<C> = Box::new(move |factory, collection, source, target| {
            let src = source.as_any().downcast_ref::<S>().ok_or_else(|| {
                StrategyError::ConversionMismatch {
                    from: source.name(),
                    to: target.name(),
                }
            })?;
            let tgt = target.as_any().downcast_ref::<T>().ok_or_else(|| {
                StrategyError::ConversionMismatch {
                    from: source.name(),
                    to: target.name(),
                }
            })?;
            convert(factory, collection, src, tgt)
        });
        self.converters.push((from, to, wrapped));
    }

    pub fn logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    /// Validate the registrations, compute generalization depths, reject
    /// cycles, and freeze the factory.
    pub fn build(self) -> Result<StrategyFactory<C>> {
        let count = self.instances.len();

        let mut strategies: Vec<RegisteredStrategy<C>> = self
            .instances
            .into_iter()
            .map(|instance| RegisteredStrategy {
                instance,
                generalizations: Vec::new(),
                depth: 0,
            })
            .collect();

        for (from, targets) in self.edges {
            for target in targets.iter().chain(std::iter::once(&from)) {
                if target.0 >= count {
                    return Err(StrategyError::UnknownStrategy(target.0));
                }
            }
            strategies[from.0].generalizations = targets;
        }

        let mut states = vec![VisitState::NotVisited; count];
        let mut depths = vec![0usize; count];
        for index in 0..count {
            Self::depth_of(index, &strategies, &mut states, &mut depths)?;
        }
        for (strategy, depth) in strategies.iter_mut().zip(&depths) {
            strategy.depth = *depth;
        }

        // Most specific first: decreasing depth, registration order on
        // ties.
        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by_key(|&i| (Reverse(depths[i]), i));
        let order = order.into_iter().map(StrategyId).collect();

        let mut converters = HashMap::new();
        for (from, to, convert) in self.converters {
            for id in [from, to] {
                if id.0 >= count {
                    return Err(StrategyError::UnknownStrategy(id.0));
                }
            }
            converters.insert((from, to), convert);
        }

        Ok(StrategyFactory {
            strategies,
            order,
            converters,
            logger: self.logger,
        })
    }

    /// Depth of the longest generalization chain from `index` to a
    /// terminal strategy. A strategy revisited while in progress means
    /// the graph has a cycle.
    fn depth_of(
        index: usize,
        strategies: &[RegisteredStrategy<C>],
        states: &mut [VisitState],
        depths: &mut [usize],
    ) -> Result<usize> {
        match states[index] {
            VisitState::Completed => return Ok(depths[index]),
            VisitState::InProgress => {
                return Err(StrategyError::GeneralizationCycle {
                    strategy: strategies[index].instance.name(),
                })
            }
            VisitState::NotVisited => {}
        }
        states[index] = VisitState::InProgress;
        let mut depth = 0;
        for target in &strategies[index].generalizations {
            depth = depth.max(Self::depth_of(target.0, strategies, states, depths)? + 1);
        }
        states[index] = VisitState::Completed;
        depths[index] = depth;
        Ok(depth)
    }
}

impl<C: StrategyHost> Default for FactoryBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct StrategyFactory<C: StrategyHost> {
    strategies: Vec<RegisteredStrategy<C>>,
    order: Vec<StrategyId>,
    converters: HashMap<(StrategyId, StrategyId), ConversionFn<C>>,
    logger: Logger,
}

impl<C: StrategyHost> StrategyFactory<C> {
    fn registered(&self, id: StrategyId) -> Result<&RegisteredStrategy<C>> {
        self.strategies
            .get(id.0)
            .ok_or(StrategyError::UnknownStrategy(id.0))
    }

    /// The registry's instance for predicate queries. For non-singleton
    /// layouts this is the prototype, never a collection's own instance.
    pub fn prototype(&self, id: StrategyId) -> Result<&dyn Strategy<C>> {
        Ok(self.registered(id)?.instance.as_ref())
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Registered strategies in decreasing generalization depth.
    pub fn ordered_strategies(&self) -> impl Iterator<Item = StrategyId> + '_ {
        self.order.iter().copied()
    }

    pub fn generalization_depth(&self, id: StrategyId) -> Result<usize> {
        Ok(self.registered(id)?.depth)
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Current strategy id of a collection, if initialized.
    pub fn strategy_of(&self, collection: &C) -> Option<StrategyId> {
        collection.get_strategy().map(|handle| handle.id())
    }

    fn resolve(&self, id: StrategyId, collection: &C, size: usize) -> Result<Arc<dyn Strategy<C>>> {
        let registered = self.registered(id)?;
        if registered.instance.is_singleton() {
            Ok(Arc::clone(&registered.instance))
        } else {
            registered
                .instance
                .instantiate(collection, size)
                .ok_or(StrategyError::NotInstantiable {
                    strategy: registered.instance.name(),
                })
        }
    }

    /// Install a strategy on a collection that never had one: initialize
    /// storage to `size` default values, store the optional initial
    /// elements (which may already promote), and emit a `Created` event.
    pub fn set_initial_strategy(
        &self,
        collection: &mut C,
        id: StrategyId,
        size: usize,
        elements: Option<&[C::Value]>,
    ) -> Result<()> {
        if collection.get_strategy().is_some() {
            return Err(StrategyError::AlreadyInitialized);
        }
        let instance = self.resolve(id, collection, size)?;
        let handle = StrategyHandle { id, instance };
        collection.set_strategy(handle.clone());
        handle.instance().initialize_storage(collection, size);
        let witness = elements.and_then(|elements| elements.first().cloned());
        if let Some(elements) = elements {
            handle.instance().store_all(self, collection, elements)?;
        }
        handle.instance().strategy_switched(collection);
        self.log_event(collection, handle.instance().name(), None, witness.as_ref());
        Ok(())
    }

    /// Replace the collection's strategy: rewire, convert storage, run the
    /// hook, and emit a `Switched` event, in that order.
    pub fn switch_strategy(
        &self,
        collection: &mut C,
        new_id: StrategyId,
        witness: Option<&C::Value>,
    ) -> Result<StrategyHandle<C>> {
        let old = collection
            .get_strategy()
            .cloned()
            .ok_or(StrategyError::Uninitialized)?;
        let size = old.instance().size(collection);
        let instance = self.resolve(new_id, collection, size)?;
        let new = StrategyHandle {
            id: new_id,
            instance,
        };
        collection.set_strategy(new.clone());
        self.convert_storage(collection, &old, &new)?;
        new.instance().strategy_switched(collection);
        self.log_event(
            collection,
            new.instance().name(),
            Some(old.instance().name()),
            witness,
        );
        Ok(new)
    }

    /// Promotion entry point for a `store` whose value the current
    /// strategy cannot represent: generalize, then retry the store on
    /// whichever strategy ends up installed.
    pub fn promote_store(&self, collection: &mut C, index: usize, value: C::Value) -> Result<()> {
        self.generalize_for_value(collection, &value)?;
        let handle = collection
            .get_strategy()
            .cloned()
            .ok_or(StrategyError::Uninitialized)?;
        handle.instance().store(self, collection, index, value)
    }

    /// Promotion entry point for an `insert` remainder. The first value
    /// picks the target; the retried insert hands any further
    /// unrepresentable elements through the same path again.
    pub fn promote_insert(
        &self,
        collection: &mut C,
        index: usize,
        values: &[C::Value],
    ) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        self.generalize_for_value(collection, &values[0])?;
        let handle = collection
            .get_strategy()
            .cloned()
            .ok_or(StrategyError::Uninitialized)?;
        handle.instance().insert(self, collection, index, values)
    }

    /// Scan the current strategy's generalizations in declaration order
    /// for the first whose predicate accepts `value`, and switch to it.
    /// No match means the lattice is ill-formed.
    fn generalize_for_value(
        &self,
        collection: &mut C,
        value: &C::Value,
    ) -> Result<StrategyHandle<C>> {
        let old = collection
            .get_strategy()
            .cloned()
            .ok_or(StrategyError::Uninitialized)?;
        let target = self
            .registered(old.id())?
            .generalizations
            .iter()
            .copied()
            .find(|&target| self.strategies[target.0].instance.check_can_handle(value))
            .ok_or(StrategyError::NoGeneralization {
                strategy: old.instance().name(),
            })?;
        self.switch_strategy(collection, target, Some(value))
    }

    /// Most specific registered strategy that accepts every value:
    /// a linear sweep over the depth-ordered list with an alive bitmap,
    /// short-circuiting once a single candidate remains.
    pub fn strategy_type_for(&self, values: &[C::Value]) -> Result<StrategyId> {
        let mut alive = vec![true; self.order.len()];
        let mut remaining = self.order.len();
        for value in values {
            if remaining <= 1 {
                break;
            }
            for (slot, &id) in self.order.iter().enumerate() {
                if alive[slot] && !self.strategies[id.0].instance.check_can_handle(value) {
                    alive[slot] = false;
                    remaining -= 1;
                }
            }
        }
        self.order
            .iter()
            .zip(&alive)
            .find(|(_, &alive)| alive)
            .map(|(&id, _)| id)
            .ok_or(StrategyError::NoMatchingStrategy)
    }

    fn convert_storage(
        &self,
        collection: &mut C,
        old: &StrategyHandle<C>,
        new: &StrategyHandle<C>,
    ) -> Result<()> {
        if let Some(convert) = self.converters.get(&(old.id(), new.id())) {
            convert(self, collection, old.instance(), new.instance())
        } else {
            new.instance()
                .convert_storage_from(self, collection, old.instance())
        }
    }

    fn log_event(
        &self,
        collection: &C,
        new_name: &str,
        old_name: Option<&str>,
        witness: Option<&C::Value>,
    ) {
        if !self.logger.is_active() {
            return;
        }
        // Promotions may have cascaded past the named target, so the size
        // is read through whatever strategy is installed now.
        let size = collection
            .get_strategy()
            .map(|handle| handle.instance().size(collection))
            .unwrap_or(0);
        let element = witness.map(|v| C::value_type_name(v)).unwrap_or("");
        self.logger
            .log(old_name, new_name, collection.type_name(), size, element);
    }
}
