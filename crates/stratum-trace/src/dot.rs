//! DOT and image rendering of the transition graph
//!
//! `render_dot` produces Graphviz source; `render_jpg` pipes that source
//! into an external `dot` process. The tool never modifies the log it
//! read.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, TraceError};
use crate::graph::{is_storage_node, TransitionGraph};
use crate::summary::ReportOptions;

fn escape(name: &str) -> String {
    name.replace('"', "\\\"")
}

fn count_label(objects: u64, slots: u64, options: &ReportOptions) -> String {
    if options.suppress_slots {
        format!("{} objects", objects)
    } else {
        format!("{} objects / {} slots", objects, slots)
    }
}

/// Render the graph as Graphviz DOT source. Nodes are labelled with
/// their inflow totals; edges with their operation and counts.
pub fn render_dot(graph: &TransitionGraph, options: &ReportOptions) -> String {
    let mut out = String::from("digraph transitions {\n");
    let _ = writeln!(out, "    node [shape=box];");

    let visible = |name: &str| options.all_nodes || is_storage_node(name);

    for node in graph.nodes() {
        if !visible(node) {
            continue;
        }
        let incoming = graph.incoming(node);
        let (objects, slots) = incoming
            .iter()
            .fold((0, 0), |(o, s), e| (o + e.objects, s + e.slots));
        let label = if incoming.is_empty() {
            escape(node)
        } else {
            format!("{}\\n{}", escape(node), count_label(objects, slots, options))
        };
        let _ = writeln!(out, "    \"{}\" [label=\"{}\"];", escape(node), label);
    }

    let total = graph.total_objects();
    for edge in graph.edges() {
        if !visible(edge.source_node()) || !visible(edge.target_node()) {
            continue;
        }
        let mut label = format!(
            "{}\\n{}",
            escape(&edge.operation),
            count_label(edge.objects, edge.slots, options)
        );
        if options.percentages && total > 0 {
            let _ = write!(label, " ({:.1}%)", edge.objects as f64 * 100.0 / total as f64);
        }
        let _ = writeln!(
            out,
            "    \"{}\" -> \"{}\" [label=\"{}\"];",
            escape(edge.source_node()),
            escape(edge.target_node()),
            label
        );
    }

    out.push_str("}\n");
    out
}

/// Render the graph to a JPG by piping DOT source through an external
/// `dot` invocation.
pub fn render_jpg(dot_source: &str, output: &Path) -> Result<()> {
    let mut child = Command::new("dot")
        .arg("-Tjpg")
        .arg("-o")
        .arg(output)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| TraceError::Dot(format!("could not spawn dot: {}", e)))?;

    {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TraceError::Dot("dot stdin unavailable".to_string()))?;
        stdin.write_all(dot_source.as_bytes())?;
        // Dropping stdin closes the pipe so dot can finish.
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(TraceError::Dot(format!("dot exited with {}", status)));
    }
    Ok(())
}
