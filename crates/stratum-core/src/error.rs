//! Error types for strategy operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StrategyError>;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("index {index} out of bounds for collection of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("range {start}..{end} out of bounds for collection of size {size}")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        size: usize,
    },

    #[error("collection has no strategy installed")]
    Uninitialized,

    #[error("collection already has a strategy installed")]
    AlreadyInitialized,

    #[error("no generalization of {strategy} accepts the stored value")]
    NoGeneralization { strategy: &'static str },

    #[error("no registered strategy can represent the given values")]
    NoMatchingStrategy,

    #[error("cycle in the generalization graph involving {strategy}")]
    GeneralizationCycle { strategy: &'static str },

    #[error("strategy id {0} is not registered with this factory")]
    UnknownStrategy(usize),

    #[error("non-singleton strategy {strategy} did not provide an instance")]
    NotInstantiable { strategy: &'static str },

    #[error("conversion registered for mismatched strategy types ({from} -> {to})")]
    ConversionMismatch {
        from: &'static str,
        to: &'static str,
    },
}

impl StrategyError {
    /// True for errors that indicate an ill-formed lattice or registry
    /// rather than a recoverable per-operation failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StrategyError::NoGeneralization { .. }
                | StrategyError::NoMatchingStrategy
                | StrategyError::GeneralizationCycle { .. }
                | StrategyError::UnknownStrategy(_)
                | StrategyError::NotInstantiable { .. }
                | StrategyError::ConversionMismatch { .. }
        )
    }
}
