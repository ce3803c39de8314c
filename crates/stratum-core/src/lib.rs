//! Stratum Core - Adaptive storage strategies for heterogeneous collections
//!
//! A collection's in-memory representation is not fixed: it starts on the
//! most compact layout compatible with its contents and is transparently
//! promoted to a more general layout when a store operation would violate
//! the current layout's representable set.
//!
//! ## Architecture
//!
//! - Layouts: the strategy lattice (`layouts`), from `EmptyStrategy` up
//!   to the terminal `GenericStrategy`
//! - Factory: owns strategy instances, resolves promotion targets, and
//!   drives transitions (`StrategyFactory`, built via `FactoryBuilder`)
//! - Façade: uniform collection API delegating to the current strategy
//!   (`Collection`)
//! - Logger: one structured line per `Created`/`Switched` event

mod cell;
mod error;
mod facade;
mod factory;
mod host;
pub mod layouts;
mod logger;
mod strategy;

pub use cell::StorageCell;
pub use error::{Result, StrategyError};
pub use facade::Collection;
pub use factory::{FactoryBuilder, StrategyFactory};
pub use host::{StrategyHandle, StrategyHost, StrategyId};
pub use layouts::{
    EmptyStrategy, GenericStrategy, SingleTypeStrategy, SingleValueSpec, SingleValueStrategy,
    TaggedCodec, TaggingStrategy, ValueCodec, WeakGenericStrategy,
};
pub use logger::Logger;
pub use strategy::{IndexPolicy, SafeIndexing, Strategy, UnsafeIndexing, WeakValue};
