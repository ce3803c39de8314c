//! Parsed log entries

use std::fmt;

use serde::{Deserialize, Serialize};

/// One transition event from the log: the operation (`Created`,
/// `Switched`, or whatever a host emits), the layouts involved, and the
/// counts attached to the event. `objects` defaults to 1 when the line
/// carries no aggregate count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub operation: String,
    pub old: Option<String>,
    pub new: String,
    pub classname: Option<String>,
    pub size: u64,
    pub objects: u64,
    pub element_classes: Vec<String>,
}

impl fmt::Display for LogEntry {
    /// Re-emits the entry in the log grammar.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.operation)?;
        if let Some(old) = &self.old {
            write!(f, "{} -> ", old)?;
        }
        write!(f, "{})", self.new)?;
        if let Some(classname) = &self.classname {
            write!(f, " of {}", classname)?;
        }
        write!(f, " size {}", self.size)?;
        if self.objects != 1 {
            write!(f, " objects {}", self.objects)?;
        }
        if !self.element_classes.is_empty() {
            write!(f, " elements: {}", self.element_classes.join(" "))?;
        }
        Ok(())
    }
}
