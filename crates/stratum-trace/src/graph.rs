//! The transition multigraph
//!
//! Entries aggregate into edges keyed by `(operation, old, new)`. An
//! entry without a predecessor layout (a `Created` event) gets a
//! synthetic source node named after its operation, so creations show up
//! as inflow into the layout they installed.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::entry::LogEntry;

/// Node names containing this marker are actual storage layouts; the
/// rest are synthetic sources. Reports include the latter only on
/// request.
pub const STORAGE_NODE_MARKER: &str = "Strategy";

pub fn is_storage_node(name: &str) -> bool {
    name.contains(STORAGE_NODE_MARKER)
}

/// Object and slot totals for one collection class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassStats {
    pub objects: u64,
    pub slots: u64,
}

impl ClassStats {
    fn absorb(&mut self, objects: u64, slots: u64) {
        self.objects += objects;
        self.slots += slots;
    }
}

/// One aggregated transition edge. `per_class` breaks the totals down by
/// the host class of the collections involved; entries without a
/// classname aggregate under the empty key.
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub operation: String,
    pub old: Option<String>,
    pub new: String,
    pub objects: u64,
    pub slots: u64,
    pub per_class: BTreeMap<String, ClassStats>,
}

impl Edge {
    /// Graph-level source: the old layout, or the synthetic node named
    /// after the operation for predecessor-less events.
    pub fn source_node(&self) -> &str {
        self.old.as_deref().unwrap_or(&self.operation)
    }

    pub fn target_node(&self) -> &str {
        &self.new
    }
}

type EdgeKey = (String, Option<String>, String);

/// Directed multigraph of layout transitions
#[derive(Debug, Default)]
pub struct TransitionGraph {
    edges: BTreeMap<EdgeKey, Edge>,
}

impl TransitionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LogEntry>,
    {
        let mut graph = Self::new();
        for entry in entries {
            graph.add_entry(entry);
        }
        graph
    }

    pub fn add_entry(&mut self, entry: &LogEntry) {
        let key = (
            entry.operation.clone(),
            entry.old.clone(),
            entry.new.clone(),
        );
        let edge = self.edges.entry(key).or_insert_with(|| Edge {
            operation: entry.operation.clone(),
            old: entry.old.clone(),
            new: entry.new.clone(),
            objects: 0,
            slots: 0,
            per_class: BTreeMap::new(),
        });
        edge.objects += entry.objects;
        edge.slots += entry.size;
        edge.per_class
            .entry(entry.classname.clone().unwrap_or_default())
            .or_default()
            .absorb(entry.objects, entry.size);
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Aggregated edges in deterministic key order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// All node names, sources and targets alike, sorted.
    pub fn nodes(&self) -> BTreeSet<&str> {
        self.edges
            .values()
            .flat_map(|edge| [edge.source_node(), edge.target_node()])
            .collect()
    }

    pub fn incoming(&self, node: &str) -> Vec<&Edge> {
        self.edges
            .values()
            .filter(|edge| edge.target_node() == node)
            .collect()
    }

    pub fn outgoing(&self, node: &str) -> Vec<&Edge> {
        self.edges
            .values()
            .filter(|edge| edge.source_node() == node)
            .collect()
    }

    /// Total object count over every edge, the base for percentages.
    pub fn total_objects(&self) -> u64 {
        self.edges.values().map(|edge| edge.objects).sum()
    }
}
