//! The concrete layout family
//!
//! Each layout is a small struct composed from the orthogonal pieces a
//! representation needs: an indexing policy, a value predicate, and a
//! wrap/unwrap codec where storage is unboxed. The factory treats them
//! all uniformly through the `Strategy` trait.

mod empty;
mod generic;
mod single_type;
mod single_value;
mod tagging;
mod weak;

pub use empty::EmptyStrategy;
pub use generic::GenericStrategy;
pub use single_type::{SingleTypeStrategy, ValueCodec};
pub use single_value::{SingleValueSpec, SingleValueStrategy};
pub use tagging::{TaggedCodec, TaggingStrategy};
pub use weak::WeakGenericStrategy;
