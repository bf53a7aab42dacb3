//! This module defines the `State` struct and its per-symbol transition
//! rules. A state is identified by a small non-negative integer id, carries a
//! halting flag, and maps each read symbol to the rule to apply when that
//! symbol is under the head.

use crate::types::{Direction, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single transition rule: what to do when the owning state reads the
/// symbol the rule is keyed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state the machine transitions to.
    pub next_state: usize,
    /// The symbol written at the head before moving.
    pub write_symbol: Symbol,
    /// The head movement after writing.
    pub direction: Direction,
}

/// One state of a Turing machine: an id, a halting flag, and a transition
/// table keyed by read symbol.
///
/// States are plain values; cloning a state (or a whole machine) deep-copies
/// the transition table, so clones never share mutable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    id: usize,
    halting: bool,
    transitions: HashMap<Symbol, Transition>,
}

impl State {
    /// Creates a non-halting state with the given id and no transitions.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            halting: false,
            transitions: HashMap::new(),
        }
    }

    /// Returns the unique id of this state.
    pub fn id(&self) -> usize {
        self.id
    }

    /// True if entering or being in this state stops execution.
    pub fn is_halting(&self) -> bool {
        self.halting
    }

    /// Marks or unmarks this state as halting.
    pub fn set_halting(&mut self, halting: bool) {
        self.halting = halting;
    }

    /// Inserts (or overwrites) the rule applied when this state reads
    /// `read_symbol`.
    pub fn add_transition(
        &mut self,
        read_symbol: Symbol,
        next_state: usize,
        write_symbol: Symbol,
        direction: Direction,
    ) {
        self.transitions.insert(
            read_symbol,
            Transition {
                next_state,
                write_symbol,
                direction,
            },
        );
    }

    /// True if a rule exists for the given read symbol.
    pub fn has_transition(&self, read_symbol: Symbol) -> bool {
        self.transitions.contains_key(&read_symbol)
    }

    /// Returns the rule for the given read symbol, if any.
    pub fn transition(&self, read_symbol: Symbol) -> Option<&Transition> {
        self.transitions.get(&read_symbol)
    }

    /// Next state for the given read symbol, if a rule exists.
    pub fn next_state(&self, read_symbol: Symbol) -> Option<usize> {
        self.transition(read_symbol).map(|t| t.next_state)
    }

    /// Write symbol for the given read symbol, if a rule exists.
    pub fn write_symbol(&self, read_symbol: Symbol) -> Option<Symbol> {
        self.transition(read_symbol).map(|t| t.write_symbol)
    }

    /// Head direction for the given read symbol, if a rule exists.
    pub fn direction(&self, read_symbol: Symbol) -> Option<Direction> {
        self.transition(read_symbol).map(|t| t.direction)
    }

    /// Iterates over the registered (read symbol, rule) pairs.
    pub fn transitions(&self) -> impl Iterator<Item = (&Symbol, &Transition)> {
        self.transitions.iter()
    }
}
