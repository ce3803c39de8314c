//! Stratum Trace - Offline analysis of strategy transition logs
//!
//! Reads the text trace the core's logger emits, aggregates it into a
//! directed multigraph of layout transitions, and renders summaries or
//! DOT/JPG output. Strictly read-only with respect to the log.
//!
//! ## Pipeline
//!
//! - Lexing/parsing: `tokenize` + `parse_line`/`parse_log`
//! - Aggregation: `TransitionGraph`
//! - Reports: `render_summary`, `render_aggregate`, `render_dot`,
//!   `render_jpg`

mod dot;
mod entry;
mod error;
mod graph;
mod parser;
mod summary;
mod token;

pub use dot::{render_dot, render_jpg};
pub use entry::LogEntry;
pub use error::{ParseError, Result, TraceError};
pub use graph::{is_storage_node, ClassStats, Edge, TransitionGraph, STORAGE_NODE_MARKER};
pub use parser::{parse_line, parse_log, ParsedLog, Parser, SkippedLine};
pub use summary::{render_aggregate, render_summary, ReportOptions};
pub use token::{tokenize, Token, TokenKind};
