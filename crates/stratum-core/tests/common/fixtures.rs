//! Shared host model for the integration tests: an `Rc`-boxed value tree,
//! a `VarList` collection, codecs for the unboxed layouts, and the example
//! lattice the tests run against.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

use stratum_core::{
    EmptyStrategy, FactoryBuilder, GenericStrategy, Logger, SafeIndexing, SingleTypeStrategy,
    SingleValueSpec, SingleValueStrategy, StorageCell, Strategy, StrategyFactory, StrategyHandle,
    StrategyHost, StrategyId, TaggedCodec, TaggingStrategy, UnsafeIndexing, ValueCodec,
    WeakGenericStrategy,
};

/// Boxed host value. Cloning clones the handle, not the object.
#[derive(Debug)]
pub enum Obj {
    Nil,
    Integer(i64),
    Plain,
}

pub type Value = Rc<Obj>;

pub fn int(value: i64) -> Value {
    Rc::new(Obj::Integer(value))
}

pub fn obj() -> Value {
    Rc::new(Obj::Plain)
}

/// Equality the way the host model defines it: integers structurally,
/// everything else by identity.
pub fn obj_eq(a: &Value, b: &Value) -> bool {
    match (&**a, &**b) {
        (Obj::Integer(x), Obj::Integer(y)) => x == y,
        _ => Rc::ptr_eq(a, b),
    }
}

/// The host collection: nothing but the two cells the core requires.
pub struct VarList {
    strategy: Option<StrategyHandle<VarList>>,
    storage: StorageCell,
}

impl VarList {
    pub fn new() -> Self {
        VarList {
            strategy: None,
            storage: StorageCell::unset(),
        }
    }
}

impl StrategyHost for VarList {
    type Value = Value;

    fn get_strategy(&self) -> Option<&StrategyHandle<Self>> {
        self.strategy.as_ref()
    }

    fn set_strategy(&mut self, handle: StrategyHandle<Self>) {
        self.strategy = Some(handle);
    }

    fn get_storage(&self) -> &StorageCell {
        &self.storage
    }

    fn get_storage_mut(&mut self) -> &mut StorageCell {
        &mut self.storage
    }

    fn type_name(&self) -> &'static str {
        "VarList"
    }

    fn value_type_name(value: &Value) -> &'static str {
        match &**value {
            Obj::Nil => "Nil",
            Obj::Integer(_) => "Integer",
            Obj::Plain => "Object",
        }
    }
}

/// Spec for the all-nil layout: one shared nil object, identity-tested.
pub struct NilSpec {
    pub nil: Value,
}

impl SingleValueSpec<Value> for NilSpec {
    fn value(&self) -> Value {
        self.nil.clone()
    }

    fn is_value(&self, value: &Value) -> bool {
        Rc::ptr_eq(value, &self.nil)
    }
}

/// Unboxed codec for integer values.
pub struct IntegerCodec;

impl ValueCodec<Value> for IntegerCodec {
    type Repr = i64;

    fn matches(&self, value: &Value) -> bool {
        matches!(&**value, Obj::Integer(_))
    }

    fn unwrap(&self, value: &Value) -> i64 {
        match &**value {
            Obj::Integer(i) => *i,
            _ => unreachable!("unwrap on a non-integer value"),
        }
    }

    fn wrap(&self, repr: i64) -> Value {
        int(repr)
    }

    fn default_repr(&self) -> i64 {
        0
    }
}

/// Integer codec extended with nil as the tagged value; `i64::MAX` is the
/// reserved representation.
pub struct IntegerOrNilCodec {
    pub nil: Value,
}

pub const TAG_REPR: i64 = i64::MAX;

impl ValueCodec<Value> for IntegerOrNilCodec {
    type Repr = i64;

    fn matches(&self, value: &Value) -> bool {
        matches!(&**value, Obj::Integer(_))
    }

    fn unwrap(&self, value: &Value) -> i64 {
        match &**value {
            Obj::Integer(i) => *i,
            _ => unreachable!("unwrap on a non-integer value"),
        }
    }

    fn wrap(&self, repr: i64) -> Value {
        int(repr)
    }

    fn default_repr(&self) -> i64 {
        TAG_REPR
    }
}

impl TaggedCodec<Value> for IntegerOrNilCodec {
    fn tag_value(&self) -> Value {
        self.nil.clone()
    }

    fn is_tag_value(&self, value: &Value) -> bool {
        Rc::ptr_eq(value, &self.nil)
    }

    fn tag_repr(&self) -> i64 {
        TAG_REPR
    }
}

/// A boxed layout whose instance is private to each collection, for the
/// non-singleton paths of the factory.
pub struct PrivateGenericStrategy {
    nil: Value,
    inner: GenericStrategy<VarList, SafeIndexing>,
}

impl PrivateGenericStrategy {
    pub fn new(nil: Value) -> Self {
        PrivateGenericStrategy {
            inner: GenericStrategy::new("PrivateGenericStrategy", nil.clone()),
            nil,
        }
    }
}

impl Strategy<VarList> for PrivateGenericStrategy {
    fn name(&self) -> &'static str {
        "PrivateGenericStrategy"
    }

    fn is_singleton(&self) -> bool {
        false
    }

    fn instantiate(
        &self,
        _collection: &VarList,
        _size: usize,
    ) -> Option<Arc<dyn Strategy<VarList>>> {
        Some(Arc::new(PrivateGenericStrategy::new(self.nil.clone())))
    }

    fn check_can_handle(&self, value: &Value) -> bool {
        self.inner.check_can_handle(value)
    }

    fn initialize_storage(&self, collection: &mut VarList, size: usize) {
        self.inner.initialize_storage(collection, size)
    }

    fn size(&self, collection: &VarList) -> usize {
        self.inner.size(collection)
    }

    fn fetch(&self, collection: &VarList, index: usize) -> stratum_core::Result<Value> {
        self.inner.fetch(collection, index)
    }

    fn store(
        &self,
        factory: &StrategyFactory<VarList>,
        collection: &mut VarList,
        index: usize,
        value: Value,
    ) -> stratum_core::Result<()> {
        self.inner.store(factory, collection, index, value)
    }

    fn insert(
        &self,
        factory: &StrategyFactory<VarList>,
        collection: &mut VarList,
        index: usize,
        values: &[Value],
    ) -> stratum_core::Result<()> {
        self.inner.insert(factory, collection, index, values)
    }

    fn delete(&self, collection: &mut VarList, start: usize, end: usize) -> stratum_core::Result<()> {
        self.inner.delete(collection, start, end)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Log sink the tests can read back.
#[derive(Clone, Default)]
pub struct SharedLog(Rc<RefCell<Vec<u8>>>);

impl SharedLog {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("log output should be utf-8")
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for SharedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Copy)]
pub struct Ids {
    pub empty: StrategyId,
    pub nil: StrategyId,
    pub generic: StrategyId,
    pub weak: StrategyId,
    pub integer: StrategyId,
    pub integer_or_nil: StrategyId,
    pub private: StrategyId,
}

/// The example lattice the tests run against:
///
/// ```text
/// Empty ─────────────────────────┐
/// Nil ─────┬─> IntegerOrNil ──┬──┼─> Generic
/// Integer ─┘                  │  │
/// WeakGeneric (terminal)      ┴──┘
/// ```
pub fn lattice_builder(nil: &Value) -> (FactoryBuilder<VarList>, Ids) {
    let mut builder = FactoryBuilder::new();
    let empty = builder.strategy(EmptyStrategy::new("EmptyStrategy"));
    let nil_id = builder.strategy(SingleValueStrategy::new(
        "NilStrategy",
        NilSpec { nil: nil.clone() },
    ));
    let generic = builder.strategy(GenericStrategy::<VarList, UnsafeIndexing>::new(
        "GenericStrategy",
        nil.clone(),
    ));
    let weak = builder.strategy(WeakGenericStrategy::new(
        "WeakGenericStrategy",
        nil.clone(),
    ));
    let integer = builder.strategy(SingleTypeStrategy::<VarList, IntegerCodec>::new(
        "IntegerStrategy",
        IntegerCodec,
    ));
    let integer_or_nil = builder.strategy(TaggingStrategy::<VarList, IntegerOrNilCodec>::new(
        "IntegerOrNilStrategy",
        IntegerOrNilCodec { nil: nil.clone() },
    ));
    let private = builder.strategy(PrivateGenericStrategy::new(nil.clone()));

    builder.generalize_to(empty, &[generic]);
    builder.generalize_to(nil_id, &[integer_or_nil, generic]);
    builder.generalize_to(integer, &[integer_or_nil, generic]);
    builder.generalize_to(integer_or_nil, &[generic]);

    let ids = Ids {
        empty,
        nil: nil_id,
        generic,
        weak,
        integer,
        integer_or_nil,
        private,
    };
    (builder, ids)
}

pub struct Fixture {
    pub factory: StrategyFactory<VarList>,
    pub ids: Ids,
    pub nil: Value,
    pub log: SharedLog,
}

pub fn fixture() -> Fixture {
    let nil: Value = Rc::new(Obj::Nil);
    let log = SharedLog::default();
    let (mut builder, ids) = lattice_builder(&nil);
    builder.logger(Logger::to_writer(log.clone()));
    let factory = builder.build().expect("example lattice should be acyclic");
    Fixture {
        factory,
        ids,
        nil,
        log,
    }
}

impl Fixture {
    /// A fresh list on the given layout.
    pub fn list(&self, id: StrategyId, size: usize) -> VarList {
        let mut list = VarList::new();
        self.factory
            .set_initial_strategy(&mut list, id, size, None)
            .expect("initial strategy should install");
        list
    }

    pub fn list_with(&self, id: StrategyId, size: usize, elements: &[Value]) -> VarList {
        let mut list = VarList::new();
        self.factory
            .set_initial_strategy(&mut list, id, size, Some(elements))
            .expect("initial strategy should install");
        list
    }
}

/// Assert a list holds exactly `expected`, element by element.
pub fn assert_contents(factory: &StrategyFactory<VarList>, list: &mut VarList, expected: &[Value]) {
    let collection = factory.collection(list);
    assert_eq!(collection.size().unwrap(), expected.len());
    for (i, want) in expected.iter().enumerate() {
        let got = collection.fetch(i).unwrap();
        assert!(obj_eq(&got, want), "element {} mismatch: {:?}", i, got);
    }
}
