//! Use-case facade over the engine.
//!
//! # Responsibility
//! - Own the current snapshot and the persistence gateway.
//! - Route every change through a repository working copy.

pub mod store;
