//! Transition logger
//!
//! One structured text line per `Created`/`Switched` event, written as
//! soon as the event happens; nothing is buffered across operations.
//! Line shape:
//!
//! ```text
//! Created (NewStrategy) of Classname size 10 elements: ElementClass
//! Switched (OldStrategy -> NewStrategy) size 10
//! ```
//!
//! The `of` and `elements:` clauses are omitted when the host provides no
//! names for them.

use std::cell::RefCell;
use std::io::{self, Write};

/// On/off event sink. The factory holds exactly one; when disabled, event
/// emission is a no-op. The core is single-threaded by contract, so the
/// sink sits behind a `RefCell` rather than a lock.
pub struct Logger {
    sink: Option<RefCell<Box<dyn Write>>>,
}

impl Logger {
    pub fn disabled() -> Self {
        Logger { sink: None }
    }

    pub fn to_stdout() -> Self {
        Self::to_writer(io::stdout())
    }

    pub fn to_writer<W: Write + 'static>(writer: W) -> Self {
        Logger {
            sink: Some(RefCell::new(Box::new(writer))),
        }
    }

    pub fn is_active(&self) -> bool {
        self.sink.is_some()
    }

    /// Emit one event line. `old_name` present means a transition
    /// (`Switched`), absent means first installation (`Created`).
    pub(crate) fn log(
        &self,
        old_name: Option<&str>,
        new_name: &str,
        classname: &str,
        size: usize,
        element_typename: &str,
    ) {
        let Some(sink) = &self.sink else {
            return;
        };
        let mut line = match old_name {
            Some(old) => format!("Switched ({} -> {})", old, new_name),
            None => format!("Created ({})", new_name),
        };
        if !classname.is_empty() {
            line.push_str(&format!(" of {}", classname));
        }
        line.push_str(&format!(" size {}", size));
        if !element_typename.is_empty() {
            line.push_str(&format!(" elements: {}", element_typename));
        }
        // A full sink is not the collection's problem.
        let _ = writeln!(sink.borrow_mut(), "{}", line);
    }
}
