//! This module defines the core data structures and types shared across the
//! Turing machine simulator: tape symbols, head movement, execution outcomes,
//! and the crate-level error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A tape symbol. Symbols are conceptually non-negative; negative values may
/// appear transiently but are clamped to 0 whenever rendered as output digits.
pub type Symbol = i32;

/// The default blank symbol written to every tape cell never explicitly set.
pub const DEFAULT_BLANK_SYMBOL: Symbol = 0;

/// Initial physical tape capacity on first allocation.
pub const INITIAL_TAPE_CAPACITY: usize = 64;

/// Represents the possible movements of the tape head after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Returns the head displacement for this direction.
    pub fn delta(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a step and continues execution.
    Continue,
    /// The machine is halted; the step performed no action.
    Halted,
}

/// Represents the outcome of a bounded or unbounded `run`.
///
/// Exhausting a step budget is not an error and is not halting; callers must
/// distinguish the two via this value or `Machine::is_halted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The machine reached a halting condition.
    Halted,
    /// The step budget ran out while the machine was still running.
    StepLimitReached,
}

/// Why the machine halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    /// The machine was in, or transitioned into, a state flagged as halting.
    HaltingState,
    /// No rule existed for the (state, read symbol) pair. A valid terminal
    /// outcome, not an error.
    NoRule,
}

/// Represents the errors that can occur while building or loading a machine.
///
/// Execution itself never fails: missing rules and out-of-range lookups halt
/// the machine, and numeric overflow in reporting saturates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// A machine definition file was malformed.
    #[error("malformed machine definition: {0}")]
    Definition(String),
    /// A write symbol does not fit the 7-bit packed encoding.
    #[error("write symbol {0} does not fit the packed encoding (0..=127)")]
    WriteSymbolOutOfRange(Symbol),
    /// A next-state id does not fit the packed encoding's remaining bits.
    #[error("next state {0} does not fit the packed encoding (max {1})")]
    NextStateOutOfRange(usize, usize),
    /// A file system operation failed.
    #[error("file error: {0}")]
    File(String),
}
