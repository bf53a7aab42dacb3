//! This module defines the `Machine` struct, which composes a tape, a set of
//! state descriptors, and the step/run execution loop of a deterministic
//! single-tape Turing machine. It also implements the optional packed
//! transition table, a precompiled dense lookup array used as a faster
//! execution path when state count and alphabet size are known up front.

use crate::report;
use crate::state::{State, Transition};
use crate::tape::Tape;
use crate::types::{
    Direction, HaltReason, MachineError, RunOutcome, Step, Symbol, DEFAULT_BLANK_SYMBOL,
};
use std::collections::HashMap;

/// Bits reserved for the write symbol in a packed entry.
const PACKED_WRITE_BITS: u32 = 7;
/// Bits reserved for the direction in a packed entry. Two bits so that
/// `Stay` survives the round trip and the packed path stays bit-identical
/// to the rule-map path.
const PACKED_DIRECTION_BITS: u32 = 2;
/// Largest write symbol the packed encoding can hold.
pub const MAX_PACKED_WRITE_SYMBOL: Symbol = (1 << PACKED_WRITE_BITS) - 1;
/// Largest next-state id the packed encoding can hold (the remaining bits
/// of the 32-bit entry).
pub const MAX_PACKED_STATE: usize = (1 << (32 - PACKED_WRITE_BITS - PACKED_DIRECTION_BITS)) - 1;

/// Packed entry marking "no rule for this (state, symbol) pair".
const NO_RULE: u32 = u32::MAX;

/// Precompiled transition table: one `u32` per (state, symbol) pair, indexed
/// by `state * symbols_per_state + symbol`, plus a parallel snapshot of each
/// state's halting flag.
#[derive(Debug, Clone)]
struct PackedTable {
    entries: Vec<u32>,
    halting: Vec<bool>,
    symbols_per_state: usize,
}

impl PackedTable {
    /// Constant-time rule lookup. Out-of-range state or symbol ids resolve
    /// to "no rule" rather than panicking.
    fn lookup(&self, state: usize, read: Symbol) -> Option<Transition> {
        if read < 0 || read as usize >= self.symbols_per_state {
            return None;
        }
        let index = state.checked_mul(self.symbols_per_state)?.checked_add(read as usize)?;
        let packed = *self.entries.get(index)?;
        if packed == NO_RULE {
            return None;
        }
        Some(decode_transition(packed))
    }

    fn is_halting(&self, state: usize) -> bool {
        self.halting.get(state).copied().unwrap_or(false)
    }
}

/// Packs a rule into one `u32`: `next_state << 9 | write_symbol << 2 | dir`.
/// Range violations are hard errors; a table is never built from entries
/// that would decode to something else.
fn encode_transition(rule: &Transition) -> Result<u32, MachineError> {
    if rule.write_symbol < 0 || rule.write_symbol > MAX_PACKED_WRITE_SYMBOL {
        return Err(MachineError::WriteSymbolOutOfRange(rule.write_symbol));
    }
    if rule.next_state > MAX_PACKED_STATE {
        return Err(MachineError::NextStateOutOfRange(rule.next_state, MAX_PACKED_STATE));
    }

    let direction_bits = match rule.direction {
        Direction::Left => 0u32,
        Direction::Right => 1,
        Direction::Stay => 2,
    };

    Ok(((rule.next_state as u32) << (PACKED_WRITE_BITS + PACKED_DIRECTION_BITS))
        | ((rule.write_symbol as u32) << PACKED_DIRECTION_BITS)
        | direction_bits)
}

fn decode_transition(packed: u32) -> Transition {
    let direction = match packed & ((1 << PACKED_DIRECTION_BITS) - 1) {
        0 => Direction::Left,
        1 => Direction::Right,
        _ => Direction::Stay,
    };
    Transition {
        next_state: (packed >> (PACKED_WRITE_BITS + PACKED_DIRECTION_BITS)) as usize,
        write_symbol: ((packed >> PACKED_DIRECTION_BITS) & MAX_PACKED_WRITE_SYMBOL as u32) as Symbol,
        direction,
    }
}

/// A deterministic single-tape Turing machine.
///
/// A `Machine` is built once as a *template* (states, transitions, blank
/// symbol, no tape) and cloned via [`clone_template`](Self::clone_template)
/// for each run. Clones share no mutable storage with the template or with
/// each other, so independent clones may be driven on separate threads.
#[derive(Debug, Clone)]
pub struct Machine {
    states: HashMap<usize, State>,
    blank: Symbol,
    tape: Tape,
    head: i64,
    current_state: usize,
    halted: bool,
    halt_reason: Option<HaltReason>,
    table: Option<PackedTable>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Creates an empty machine with blank symbol 0, head at 0, state 0.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            blank: DEFAULT_BLANK_SYMBOL,
            tape: Tape::new(DEFAULT_BLANK_SYMBOL),
            head: 0,
            current_state: 0,
            halted: false,
            halt_reason: None,
            table: None,
        }
    }

    /// Registers a state, replacing any previous state with the same id.
    pub fn add_state(&mut self, state: State) {
        self.states.insert(state.id(), state);
    }

    /// Returns the state with the given id, if registered.
    pub fn state(&self, id: usize) -> Option<&State> {
        self.states.get(&id)
    }

    /// Mutable access to a registered state, used while building a template.
    /// Mutating after [`compile`](Self::compile) requires recompiling.
    pub fn state_mut(&mut self, id: usize) -> Option<&mut State> {
        self.states.get_mut(&id)
    }

    /// Sets the blank symbol for the machine and its tape.
    pub fn set_blank_symbol(&mut self, blank: Symbol) {
        self.blank = blank;
        self.tape.set_blank(blank);
    }

    /// Returns the configured blank symbol.
    pub fn blank_symbol(&self) -> Symbol {
        self.blank
    }

    /// Builds the packed fast-path table for `state_count` states over an
    /// alphabet of `symbols_per_state` symbols. Pure precomputation in
    /// O(state_count × symbols_per_state); must be re-run if transitions are
    /// added afterward. On a range violation no table is installed.
    pub fn compile(
        &mut self,
        state_count: usize,
        symbols_per_state: usize,
    ) -> Result<(), MachineError> {
        self.table = None;

        let mut entries = vec![NO_RULE; state_count * symbols_per_state];
        let mut halting = vec![false; state_count];

        for id in 0..state_count {
            let Some(state) = self.states.get(&id) else {
                continue;
            };
            halting[id] = state.is_halting();
            for symbol in 0..symbols_per_state as Symbol {
                let Some(rule) = state.transition(symbol) else {
                    continue;
                };
                entries[id * symbols_per_state + symbol as usize] = encode_transition(rule)?;
            }
        }

        self.table = Some(PackedTable {
            entries,
            halting,
            symbols_per_state,
        });
        Ok(())
    }

    /// True if a packed fast-path table is installed.
    pub fn is_compiled(&self) -> bool {
        self.table.is_some()
    }

    /// Loads `input` at tape positions `0..input.len()` and resets head,
    /// halted flag, and halt reason for a fresh run.
    pub fn initialize_tape(&mut self, input: &[Symbol]) {
        self.tape = Tape::with_input(input, self.blank);
        self.head = 0;
        self.halted = false;
        self.halt_reason = None;
    }

    /// Loads a unary input of `ones` consecutive 1 symbols starting at 0.
    pub fn initialize_unary(&mut self, ones: usize) {
        self.initialize_tape(&vec![1; ones]);
    }

    /// Returns the current head position.
    pub fn head_position(&self) -> i64 {
        self.head
    }

    /// Moves the head to an arbitrary position.
    pub fn set_head_position(&mut self, position: i64) {
        self.head = position;
    }

    /// Returns the current state id.
    pub fn current_state(&self) -> usize {
        self.current_state
    }

    /// Sets the current state id. Validated lazily: an id with no registered
    /// state simply halts the machine on the next step, consistent with the
    /// missing-rule policy.
    pub fn set_current_state(&mut self, state_id: usize) {
        self.current_state = state_id;
    }

    /// Reads the symbol under the head, marking the position visited.
    pub fn read_tape(&mut self) -> Symbol {
        self.tape.read(self.head)
    }

    /// Writes a symbol at the head, marking the position visited.
    pub fn write_tape(&mut self, symbol: Symbol) {
        self.tape.write(self.head, symbol);
    }

    /// Read-only access to the tape, for reporting.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// True once the machine has reached a halting condition. Terminal:
    /// never cleared except by re-initialization.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Why the machine halted, if it has.
    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halt_reason
    }

    /// Executes one step.
    ///
    /// Returns [`Step::Continue`] if a rule was applied (even when the
    /// transition landed in a halting state), [`Step::Halted`] if the call
    /// performed no write or move because the machine is, or just became,
    /// halted: already halted, current state flagged halting, or no rule for
    /// the read symbol. Absence of a rule is a valid halting condition, not
    /// an error.
    pub fn step(&mut self) -> Step {
        if self.halted {
            return Step::Halted;
        }

        // A state entered as halting halts before acting.
        if self.state_is_halting(self.current_state) {
            return self.halt(HaltReason::HaltingState);
        }

        let read = self.tape.read(self.head);

        let Some(rule) = self.lookup(self.current_state, read) else {
            return self.halt(HaltReason::NoRule);
        };

        self.tape.write(self.head, rule.write_symbol);
        self.head += rule.direction.delta();
        self.current_state = rule.next_state;
        self.tape.visit(self.head);

        // Halting is also detected immediately after transitioning into a
        // halting state, not only on the next step's pre-check.
        if self.state_is_halting(self.current_state) {
            self.halted = true;
            self.halt_reason = Some(HaltReason::HaltingState);
        }

        Step::Continue
    }

    /// Runs until halted or until `max_steps` steps executed; `0` means
    /// unbounded. An exhausted budget is a distinct outcome from halting,
    /// not an error.
    pub fn run(&mut self, max_steps: u64) -> RunOutcome {
        let mut steps = 0u64;
        while !self.halted {
            if max_steps > 0 && steps >= max_steps {
                return RunOutcome::StepLimitReached;
            }
            self.step();
            steps += 1;
        }
        RunOutcome::Halted
    }

    /// Clears tape, head, current state, and halted flag, keeping states and
    /// blank symbol. The visited range is cleared with the tape.
    pub fn reset(&mut self) {
        self.tape = Tape::new(self.blank);
        self.head = 0;
        self.current_state = 0;
        self.halted = false;
        self.halt_reason = None;
    }

    /// Creates a fresh machine with deep copies of this machine's states and
    /// the same blank symbol, but an empty tape, head 0, state 0, and no
    /// packed table. The template stays reusable; clones never share mutable
    /// storage with it or with each other.
    pub fn clone_template(&self) -> Machine {
        Machine {
            states: self.states.clone(),
            blank: self.blank,
            tape: Tape::new(self.blank),
            head: 0,
            current_state: 0,
            halted: false,
            halt_reason: None,
            table: None,
        }
    }

    /// Number of visited tape cells. See [`report::visited_length`].
    pub fn visited_length(&self) -> usize {
        report::visited_length(&self.tape)
    }

    /// Digit string over the visited range. See
    /// [`report::visited_content_string`].
    pub fn visited_content_string(&self) -> String {
        report::visited_content_string(&self.tape)
    }

    /// Size of the non-blank extent. See [`report::output_length`].
    pub fn output_length(&self) -> usize {
        report::output_length(&self.tape)
    }

    /// Numeric interpretation of the non-blank extent, saturating on
    /// overflow. See [`report::output_as_number`].
    pub fn output_as_number(&self) -> i64 {
        report::output_as_number(&self.tape)
    }

    /// Sum of non-blank symbols, each clamped to ≥ 0. See
    /// [`report::sum_of_symbols`].
    pub fn sum_of_symbols(&self) -> i64 {
        report::sum_of_symbols(&self.tape)
    }

    fn lookup(&self, state: usize, read: Symbol) -> Option<Transition> {
        if let Some(table) = &self.table {
            return table.lookup(state, read);
        }
        self.states.get(&state)?.transition(read).copied()
    }

    fn state_is_halting(&self, state: usize) -> bool {
        if let Some(table) = &self.table {
            return table.is_halting(state);
        }
        self.states
            .get(&state)
            .map(|s| s.is_halting())
            .unwrap_or(false)
    }

    fn halt(&mut self, reason: HaltReason) -> Step {
        self.halted = true;
        self.halt_reason = Some(reason);
        Step::Halted
    }
}
