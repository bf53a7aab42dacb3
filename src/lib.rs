//! This crate provides the core engine of a deterministic single-tape Turing
//! machine simulator: the growable tape, the per-state transition model with
//! an optional precompiled packed lookup table, the step/run execution loop
//! with halting detection, and overflow-safe reporting over the final tape.
//! It also includes the textual machine-definition loader and a
//! modification-time keyed template cache used by the command-line driver.

pub mod cache;
pub mod loader;
pub mod machine;
pub mod report;
pub mod state;
pub mod tape;
pub mod types;

/// Re-exports the `TemplateCache` struct from the cache module.
pub use cache::TemplateCache;
/// Re-exports the `Definition` struct and `DefinitionLoader` from the loader module.
pub use loader::{Definition, DefinitionLoader};
/// Re-exports the `Machine` struct and packed-encoding limits from the machine module.
pub use machine::{Machine, MAX_PACKED_STATE, MAX_PACKED_WRITE_SYMBOL};
/// Re-exports the `State` and `Transition` structs from the state module.
pub use state::{State, Transition};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports execution and error types from the types module.
pub use types::{
    Direction, HaltReason, MachineError, RunOutcome, Step, Symbol, DEFAULT_BLANK_SYMBOL,
};
