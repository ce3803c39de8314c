//! End-to-end integration: run collection operations with the logger
//! active, then feed the emitted trace through the analysis pipeline.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use stratum_core::{
    EmptyStrategy, FactoryBuilder, GenericStrategy, Logger, SingleValueSpec, SingleValueStrategy,
    StorageCell, StrategyHandle, StrategyHost,
};
use stratum_trace::{parse_log, render_summary, ReportOptions, TransitionGraph};

#[derive(Debug)]
enum Datum {
    Blank,
    Num(i64),
}

type Value = Rc<Datum>;

struct Row {
    strategy: Option<StrategyHandle<Row>>,
    storage: StorageCell,
}

impl Row {
    fn new() -> Self {
        Row {
            strategy: None,
            storage: StorageCell::unset(),
        }
    }
}

impl StrategyHost for Row {
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
        "Row"
    }

    fn value_type_name(value: &Value) -> &'static str {
        match &**value {
            Datum::Blank => "Blank",
            Datum::Num(_) => "Num",
        }
    }
}

struct BlankSpec {
    blank: Value,
}

impl SingleValueSpec<Value> for BlankSpec {
    fn value(&self) -> Value {
        self.blank.clone()
    }

    fn is_value(&self, value: &Value) -> bool {
        Rc::ptr_eq(value, &self.blank)
    }
}

#[derive(Clone, Default)]
struct SharedLog(Rc<RefCell<Vec<u8>>>);

impl Write for SharedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_log_roundtrips_through_analysis() {
    let blank: Value = Rc::new(Datum::Blank);
    let log = SharedLog::default();

    let mut builder = FactoryBuilder::new();
    let empty = builder.strategy(EmptyStrategy::new("EmptyStrategy"));
    let all_blank = builder.strategy(SingleValueStrategy::new(
        "BlankStrategy",
        BlankSpec {
            blank: blank.clone(),
        },
    ));
    let generic = builder.strategy(GenericStrategy::<Row>::new(
        "GenericStrategy",
        blank.clone(),
    ));
    builder.generalize_to(empty, &[all_blank, generic]);
    builder.generalize_to(all_blank, &[generic]);
    builder.logger(Logger::to_writer(log.clone()));
    let factory = builder.build().unwrap();

    // Two rows that both end up generic, one that stays blank.
    for _ in 0..2 {
        let mut row = Row::new();
        factory
            .set_initial_strategy(&mut row, all_blank, 4, None)
            .unwrap();
        let mut collection = factory.collection(&mut row);
        collection.store(1, Rc::new(Datum::Num(7))).unwrap();
    }
    let mut row = Row::new();
    factory
        .set_initial_strategy(&mut row, all_blank, 2, None)
        .unwrap();

    let trace = log.0.borrow().clone();
    let parsed = parse_log(trace.as_slice()).unwrap();
    assert!(parsed.skipped.is_empty());
    assert_eq!(parsed.entries.len(), 5);

    let graph = TransitionGraph::from_entries(&parsed.entries);
    let switched = graph
        .edges()
        .find(|edge| edge.old.is_some())
        .expect("a transition edge");
    assert_eq!(switched.old.as_deref(), Some("BlankStrategy"));
    assert_eq!(switched.new, "GenericStrategy");
    assert_eq!(switched.objects, 2);
    assert_eq!(switched.slots, 8);
    assert_eq!(switched.per_class["Row"].objects, 2);

    let summary = render_summary(
        &graph,
        &ReportOptions {
            detailed: true,
            ..Default::default()
        },
    );
    assert!(summary.contains("GenericStrategy"));
    assert!(summary.contains("Switched from BlankStrategy: 2 objects (8 slots)"));

    let json = serde_json::to_string(&parsed.entries).unwrap();
    assert!(json.contains("BlankStrategy"));
}
