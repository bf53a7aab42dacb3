//! Pure reporting functions over a finished tape.
//!
//! Two distinct spans drive these: the *visited range* (every position the
//! head ever occupied, blanks included) and the *non-blank extent* (positions
//! holding a non-blank symbol). `visited_*` functions use the former,
//! `output_*` and `sum_of_symbols` the latter. Symbols are rendered as their
//! decimal representation, clamped to 0 when negative.

use crate::tape::Tape;

/// Number of tape cells the head has ever occupied, 0 for an untouched tape.
pub fn visited_length(tape: &Tape) -> usize {
    match tape.visited_range() {
        Some((min, max)) => (max - min + 1) as usize,
        None => 0,
    }
}

/// Concatenated decimal rendering of every cell in the visited range, left
/// to right. Visited blank cells render as `0`.
pub fn visited_content_string(tape: &Tape) -> String {
    let Some((min, max)) = tape.visited_range() else {
        return String::new();
    };
    let mut out = String::new();
    for pos in min..=max {
        let symbol = tape.peek(pos).max(0);
        out.push_str(&symbol.to_string());
    }
    out
}

/// Size of the non-blank extent, 0 for an entirely blank tape.
pub fn output_length(tape: &Tape) -> usize {
    match tape.non_blank_extent() {
        Some((min, max)) => (max - min + 1) as usize,
        None => 0,
    }
}

/// Sum of the symbols in the non-blank extent, each clamped to ≥ 0 before
/// summing.
pub fn sum_of_symbols(tape: &Tape) -> i64 {
    let Some((min, max)) = tape.non_blank_extent() else {
        return 0;
    };
    let mut sum = 0i64;
    for pos in min..=max {
        let symbol = tape.peek(pos);
        if symbol != tape.blank() {
            sum += i64::from(symbol.max(0));
        }
    }
    sum
}

/// Numeric interpretation of the non-blank extent: decimal digits of every
/// cell (clamped ≥ 0) concatenated left to right and parsed as an integer.
/// Values exceeding `i64::MAX` saturate to `i64::MAX` rather than wrapping
/// or erroring.
pub fn output_as_number(tape: &Tape) -> i64 {
    let Some((min, max)) = tape.non_blank_extent() else {
        return 0;
    };
    let mut digits = String::new();
    for pos in min..=max {
        let symbol = tape.peek(pos).max(0);
        digits.push_str(&symbol.to_string());
    }
    // The string is all decimal digits, so the only parse failure is
    // overflow; saturate.
    digits.parse::<i64>().unwrap_or(i64::MAX)
}
