//! This module loads textual machine definitions into runnable templates.
//!
//! The format is line oriented. Line 1 holds the state count `N`, line 2 the
//! input-symbol count `S` (the alphabet is `0..=S` with 0 as blank). The next
//! `(N-1) * (S+1)` non-blank lines give one rule per (state, symbol) pair,
//! state-major then symbol-minor, each formatted `next_state,write_symbol,
//! direction` with direction `L`, `R`, or `N`. The final state `N-1` is
//! implicitly halting and has no rule lines. An optional trailing line
//! supplies the initial tape as digit characters (non-digits ignored); a
//! missing trailing line means "unary default" for machines whose alphabet
//! has exactly one non-blank symbol, otherwise an empty tape.

use crate::machine::Machine;
use crate::state::State;
use crate::types::{Direction, MachineError, Symbol};
use std::fs;
use std::path::Path;

/// A parsed machine definition: the reusable template plus the dimensions
/// needed to compile its packed table and the initial tape, if the file
/// supplied one explicitly.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Template machine: states and transitions, blank symbol 0, no tape.
    pub template: Machine,
    /// Number of states, including the implicit halting state.
    pub state_count: usize,
    /// Alphabet size including blank, i.e. `S + 1`.
    pub symbols_per_state: usize,
    /// Explicit initial tape, or `None` when the caller should fall back to
    /// a default unary input.
    pub initial_input: Option<Vec<Symbol>>,
}

/// `DefinitionLoader` parses machine definitions from files or strings.
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Loads and parses a definition file.
    pub fn load(path: &Path) -> Result<Definition, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::File(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// Parses a definition from string content.
    pub fn parse(content: &str) -> Result<Definition, MachineError> {
        let raw: Vec<&str> = content.lines().collect();
        // (raw line index, trimmed text) of every non-blank line; the header
        // and rule lines are read from this view, the optional input line
        // from the raw view below.
        let lines: Vec<(usize, &str)> = raw
            .iter()
            .enumerate()
            .filter_map(|(i, line)| {
                let trimmed = line.trim();
                (!trimmed.is_empty()).then_some((i, trimmed))
            })
            .collect();

        if lines.len() < 2 {
            return Err(MachineError::Definition(
                "expected at least a state count line and a symbol count line".to_string(),
            ));
        }

        let state_count = parse_int(lines[0].1, "state count")?;
        let symbol_count = parse_int(lines[1].1, "symbol count")?;
        if state_count == 0 {
            return Err(MachineError::Definition(
                "state count must be at least 1".to_string(),
            ));
        }

        let mut template = Machine::new();
        template.set_blank_symbol(0);
        for id in 0..state_count {
            let mut state = State::new(id);
            // The last state is the implicit halting state.
            if id == state_count - 1 {
                state.set_halting(true);
            }
            template.add_state(state);
        }

        let symbols_per_state = symbol_count + 1;
        let expected = (state_count - 1) * symbols_per_state;
        if lines.len() - 2 < expected {
            return Err(MachineError::Definition(format!(
                "expected {} transition lines, found {}",
                expected,
                lines.len() - 2
            )));
        }

        let mut index = 2;
        for state_id in 0..state_count - 1 {
            for symbol in 0..symbols_per_state {
                let line = lines[index].1;
                index += 1;
                let (next, write, direction) = parse_rule_line(line)?;
                if let Some(state) = template.state_mut(state_id) {
                    state.add_transition(symbol as Symbol, next, write, direction);
                }
            }
        }

        // Any raw line after the last consumed non-blank line is an explicit
        // initial tape, even when blank (meaning an empty tape). With no
        // such line, single-symbol alphabets default to unary input.
        let last_consumed_raw = lines[index - 1].0;
        let initial_input = if last_consumed_raw + 1 < raw.len() {
            Some(parse_input_digits(raw[last_consumed_raw + 1]))
        } else if symbol_count == 1 {
            None
        } else {
            Some(Vec::new())
        };

        Ok(Definition {
            template,
            state_count,
            symbols_per_state,
            initial_input,
        })
    }
}

fn parse_int(text: &str, what: &str) -> Result<usize, MachineError> {
    text.parse::<usize>()
        .map_err(|_| MachineError::Definition(format!("invalid {}: '{}'", what, text)))
}

/// Parses one `next_state,write_symbol,direction` rule line.
fn parse_rule_line(line: &str) -> Result<(usize, Symbol, Direction), MachineError> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return Err(MachineError::Definition(format!(
            "bad transition line: '{}'",
            line
        )));
    }

    let next = parse_int(parts[0], "next state")?;
    let write = parts[1].parse::<Symbol>().map_err(|_| {
        MachineError::Definition(format!("invalid write symbol: '{}'", parts[1]))
    })?;
    let direction = match parts[2].chars().next() {
        Some('L') => Direction::Left,
        Some('R') => Direction::Right,
        Some('N') => Direction::Stay,
        _ => {
            return Err(MachineError::Definition(format!(
                "invalid direction '{}' (expected L, R, or N)",
                parts[2]
            )))
        }
    };

    Ok((next, write, direction))
}

/// Extracts the digit characters of an input line as symbols, ignoring
/// everything else.
fn parse_input_digits(line: &str) -> Vec<Symbol> {
    line.chars()
        .filter_map(|c| c.to_digit(10).map(|d| d as Symbol))
        .collect()
}
