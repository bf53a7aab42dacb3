//! This module defines the `Tape` struct, the machine's unbounded,
//! integer-indexed symbol storage. The tape is dense: every cell inside the
//! allocated range is materialized, and cells never written hold the blank
//! symbol. A logical position `p` maps to physical slot `origin + p`; growth
//! doubles the buffer and re-centers the origin so sustained movement toward
//! one edge does not reallocate on every step.
//!
//! The tape also tracks the *visited range* (every head position ever read,
//! written, or moved onto) separately from the *non-blank extent* (positions
//! holding a symbol different from blank). The two are not interchangeable:
//! reporting uses each in a specific place.

use crate::types::{Symbol, DEFAULT_BLANK_SYMBOL, INITIAL_TAPE_CAPACITY};

/// Dense, bidirectionally growable tape storage.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<Symbol>,
    /// Physical slot of logical position 0. Signed so that `origin + pos`
    /// can go negative before triggering a leftward growth.
    origin: i64,
    blank: Symbol,
    /// Inclusive (min, max) of every position the head has occupied.
    visited: Option<(i64, i64)>,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(DEFAULT_BLANK_SYMBOL)
    }
}

impl Tape {
    /// Creates an empty tape with the given blank symbol. No storage is
    /// allocated until the first write.
    pub fn new(blank: Symbol) -> Self {
        Self {
            cells: Vec::new(),
            origin: 0,
            blank,
            visited: None,
        }
    }

    /// Creates a tape pre-loaded with `input` at logical positions
    /// `0..input.len()`. The loaded cells count as visited.
    pub fn with_input(input: &[Symbol], blank: Symbol) -> Self {
        let capacity = INITIAL_TAPE_CAPACITY.max(input.len() * 4 + 16);
        let origin = (capacity / 4) as i64;
        let mut cells = vec![blank; capacity];
        cells[origin as usize..origin as usize + input.len()].copy_from_slice(input);

        let visited = if input.is_empty() {
            None
        } else {
            Some((0, input.len() as i64 - 1))
        };

        Self {
            cells,
            origin,
            blank,
            visited,
        }
    }

    /// Returns the blank symbol of this tape.
    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// Changes the blank symbol. Intended for template configuration before
    /// any cell has been written; already-filled cells are not rewritten.
    pub fn set_blank(&mut self, blank: Symbol) {
        self.blank = blank;
    }

    /// Reads the symbol at `pos`, marking the position visited. Positions
    /// outside the allocated buffer read as blank without allocating.
    pub fn read(&mut self, pos: i64) -> Symbol {
        self.visit(pos);
        self.peek(pos)
    }

    /// Writes `symbol` at `pos`, marking the position visited and growing the
    /// buffer if needed.
    pub fn write(&mut self, pos: i64, symbol: Symbol) {
        self.visit(pos);
        let slot = self.slot_for_write(pos);
        self.cells[slot] = symbol;
    }

    /// Reads the symbol at `pos` without touching the visited range.
    pub fn peek(&self, pos: i64) -> Symbol {
        let phys = self.origin + pos;
        if phys < 0 || phys as usize >= self.cells.len() {
            return self.blank;
        }
        self.cells[phys as usize]
    }

    /// Extends the visited range to include `pos`.
    pub fn visit(&mut self, pos: i64) {
        self.visited = Some(match self.visited {
            None => (pos, pos),
            Some((min, max)) => (min.min(pos), max.max(pos)),
        });
    }

    /// Inclusive range of every position the head has occupied, or `None` if
    /// the tape was never touched.
    pub fn visited_range(&self) -> Option<(i64, i64)> {
        self.visited
    }

    /// Inclusive range of positions holding a non-blank symbol, or `None` if
    /// the tape is entirely blank. Scans stored cells; distinct from
    /// [`visited_range`](Self::visited_range).
    pub fn non_blank_extent(&self) -> Option<(i64, i64)> {
        let mut extent: Option<(i64, i64)> = None;
        for (slot, &symbol) in self.cells.iter().enumerate() {
            if symbol == self.blank {
                continue;
            }
            let pos = slot as i64 - self.origin;
            extent = Some(match extent {
                None => (pos, pos),
                Some((min, max)) => (min.min(pos), max.max(pos)),
            });
        }
        extent
    }

    /// Maps `pos` to a valid physical slot, allocating or growing as needed.
    /// Growth never discards previously written cells.
    fn slot_for_write(&mut self, pos: i64) -> usize {
        if self.cells.is_empty() {
            self.cells = vec![self.blank; INITIAL_TAPE_CAPACITY];
            self.origin = (INITIAL_TAPE_CAPACITY / 4) as i64;
        }
        loop {
            let phys = self.origin + pos;
            if phys >= 0 && (phys as usize) < self.cells.len() {
                return phys as usize;
            }
            self.grow(phys);
        }
    }

    /// Grows the buffer to cover physical index `requested`: new size is
    /// `max(requested + 1, 2 * len)`, old contents re-centered at offset
    /// `(new - old) / 2`, origin rebased accordingly.
    fn grow(&mut self, requested: i64) {
        let old_len = self.cells.len();
        let need = if requested >= 0 {
            requested as usize + 1
        } else {
            old_len * 2
        };
        let new_len = need.max(old_len * 2);

        let mut cells = vec![self.blank; new_len];
        let shift = (new_len - old_len) / 2;
        cells[shift..shift + old_len].copy_from_slice(&self.cells);

        self.origin += shift as i64;
        self.cells = cells;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_cells_read_blank() {
        let mut tape = Tape::new(0);
        assert_eq!(tape.read(0), 0);
        assert_eq!(tape.read(-100), 0);
        assert_eq!(tape.read(100), 0);

        let mut tape = Tape::new(7);
        assert_eq!(tape.read(3), 7);
    }

    #[test]
    fn test_write_then_read_back() {
        let mut tape = Tape::new(0);
        tape.write(0, 1);
        tape.write(-1, 2);
        tape.write(1, 3);

        assert_eq!(tape.read(0), 1);
        assert_eq!(tape.read(-1), 2);
        assert_eq!(tape.read(1), 3);
    }

    #[test]
    fn test_growth_preserves_content() {
        let mut tape = Tape::new(0);
        let k = 500i64;

        // Alternate edges so growth happens in both directions.
        for i in 0..=k {
            tape.write(i, (i % 9 + 1) as Symbol);
            tape.write(-i, (i % 9 + 1) as Symbol);
        }

        for i in 0..=k {
            assert_eq!(tape.peek(i), (i % 9 + 1) as Symbol, "position {i}");
            assert_eq!(tape.peek(-i), (i % 9 + 1) as Symbol, "position {}", -i);
        }
    }

    #[test]
    fn test_far_left_write_after_small_allocation() {
        let mut tape = Tape::new(0);
        tape.write(0, 5);
        tape.write(-10_000, 6);

        assert_eq!(tape.peek(0), 5);
        assert_eq!(tape.peek(-10_000), 6);
    }

    #[test]
    fn test_visited_range_tracks_reads_of_blank_cells() {
        let mut tape = Tape::new(0);
        assert_eq!(tape.visited_range(), None);

        tape.read(-3);
        tape.read(5);
        assert_eq!(tape.visited_range(), Some((-3, 5)));

        // Reading blank cells never creates a non-blank extent.
        assert_eq!(tape.non_blank_extent(), None);
    }

    #[test]
    fn test_visited_and_non_blank_extent_diverge() {
        let mut tape = Tape::new(0);
        tape.read(-5);
        tape.write(0, 1);
        tape.write(2, 3);
        tape.read(8);

        assert_eq!(tape.visited_range(), Some((-5, 8)));
        assert_eq!(tape.non_blank_extent(), Some((0, 2)));
    }

    #[test]
    fn test_overwriting_with_blank_shrinks_extent_not_visited() {
        let mut tape = Tape::new(0);
        tape.write(0, 1);
        tape.write(1, 1);
        tape.write(2, 1);
        assert_eq!(tape.non_blank_extent(), Some((0, 2)));

        tape.write(2, 0);
        assert_eq!(tape.non_blank_extent(), Some((0, 1)));
        assert_eq!(tape.visited_range(), Some((0, 2)));
    }

    #[test]
    fn test_with_input_loads_at_origin() {
        let tape = Tape::with_input(&[1, 2, 3], 0);

        assert_eq!(tape.peek(0), 1);
        assert_eq!(tape.peek(1), 2);
        assert_eq!(tape.peek(2), 3);
        assert_eq!(tape.peek(3), 0);
        assert_eq!(tape.visited_range(), Some((0, 2)));
        assert_eq!(tape.non_blank_extent(), Some((0, 2)));
    }

    #[test]
    fn test_with_empty_input() {
        let tape = Tape::with_input(&[], 0);
        assert_eq!(tape.visited_range(), None);
        assert_eq!(tape.non_blank_extent(), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut tape = Tape::with_input(&[1, 1], 0);
        let mut copy = tape.clone();

        copy.write(0, 9);
        assert_eq!(tape.peek(0), 1);
        tape.write(1, 8);
        assert_eq!(copy.peek(1), 1);
    }
}

