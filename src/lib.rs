//! Stratum - Adaptive storage strategies for heterogeneous collections
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use stratum_core as strategies;
pub use stratum_trace as trace;
