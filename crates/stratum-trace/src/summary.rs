//! Text reports over the transition graph

use std::fmt::Write;

use crate::entry::LogEntry;
use crate::graph::{is_storage_node, Edge, TransitionGraph};

/// Toggles shared by the report renderers, one per CLI flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportOptions {
    /// Show percentages relative to the enclosing total.
    pub percentages: bool,
    /// Include synthetic non-storage nodes.
    pub all_nodes: bool,
    /// Per-edge breakdown under each node.
    pub detailed: bool,
    /// Per-collection-class breakdown under each edge.
    pub per_class: bool,
    /// Omit slot counts.
    pub suppress_slots: bool,
}

fn format_count(objects: u64, slots: u64, options: &ReportOptions) -> String {
    if options.suppress_slots {
        format!("{} objects", objects)
    } else {
        format!("{} objects ({} slots)", objects, slots)
    }
}

fn percent_suffix(part: u64, whole: u64, options: &ReportOptions) -> String {
    if options.percentages && whole > 0 {
        format!(" ({:.1}%)", part as f64 * 100.0 / whole as f64)
    } else {
        String::new()
    }
}

fn class_label(class: &str) -> &str {
    if class.is_empty() {
        "(unclassified)"
    } else {
        class
    }
}

fn edge_totals(edges: &[&Edge]) -> (u64, u64) {
    edges.iter().fold((0, 0), |(objects, slots), edge| {
        (objects + edge.objects, slots + edge.slots)
    })
}

fn render_direction(
    out: &mut String,
    heading: &str,
    edges: &[&Edge],
    describe: impl Fn(&Edge) -> String,
    options: &ReportOptions,
) {
    let (objects, slots) = edge_totals(edges);
    let _ = writeln!(
        out,
        "  {}: {}",
        heading,
        format_count(objects, slots, options)
    );
    if !options.detailed {
        return;
    }
    for edge in edges {
        let _ = writeln!(
            out,
            "    {}: {}{}",
            describe(edge),
            format_count(edge.objects, edge.slots, options),
            percent_suffix(edge.objects, objects, options)
        );
        if options.per_class {
            for (class, stats) in &edge.per_class {
                let _ = writeln!(
                    out,
                    "      of {}: {}",
                    class_label(class),
                    format_count(stats.objects, stats.slots, options)
                );
            }
        }
    }
}

/// Per-node summary: for every (storage) node, total and per-edge inflow
/// and outflow.
pub fn render_summary(graph: &TransitionGraph, options: &ReportOptions) -> String {
    let mut out = String::new();
    for node in graph.nodes() {
        if !options.all_nodes && !is_storage_node(node) {
            continue;
        }
        let _ = writeln!(out, "{}", node);
        render_direction(
            &mut out,
            "incoming",
            &graph.incoming(node),
            |edge| match &edge.old {
                Some(old) => format!("{} from {}", edge.operation, old),
                None => edge.operation.clone(),
            },
            options,
        );
        render_direction(
            &mut out,
            "outgoing",
            &graph.outgoing(node),
            |edge| format!("{} to {}", edge.operation, edge.target_node()),
            options,
        );
    }
    out
}

/// Aggregated entries, re-emitted in the log grammar with `objects`
/// counts. With the per-class option, one line per collection class.
pub fn render_aggregate(graph: &TransitionGraph, options: &ReportOptions) -> String {
    let mut out = String::new();
    for edge in graph.edges() {
        if options.per_class {
            for (class, stats) in &edge.per_class {
                let entry = LogEntry {
                    operation: edge.operation.clone(),
                    old: edge.old.clone(),
                    new: edge.new.clone(),
                    classname: (!class.is_empty()).then(|| class.clone()),
                    size: stats.slots,
                    objects: stats.objects,
                    element_classes: Vec::new(),
                };
                let _ = writeln!(out, "{}", entry);
            }
        } else {
            let entry = LogEntry {
                operation: edge.operation.clone(),
                old: edge.old.clone(),
                new: edge.new.clone(),
                classname: None,
                size: edge.slots,
                objects: edge.objects,
                element_classes: Vec::new(),
            };
            let _ = writeln!(out, "{}", entry);
        }
    }
    out
}
