#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Puzzle generation and solution counting.
//!
//! A full grid is produced by randomized backtracking under the complete
//! percent rule set. Holes are then dug one cell at a time: a cell stays
//! empty only if the puzzle still has exactly one solution, which is
//! decided by the solver itself: solve, block the found solution with one
//! clause over the empty cells, and solve again.

use crate::sat::clause::Clause;
use crate::sat::literal::Literal;
use crate::sat::solver::{solve, Mode, Verdict};
use crate::sudoku::encode::{to_cnf, var_index};
use crate::sudoku::{Board, BOX, SIZE};
use rand::seq::SliceRandom;
use rand::Rng;

/// `true` if placing `num` at `(row, col)` violates no percent rule
/// against the cells already filled.
#[must_use]
pub fn is_safe(board: &Board, row: usize, col: usize, num: u8) -> bool {
    for i in 0..SIZE {
        if board.get(row, i) == num || board.get(i, col) == num {
            return false;
        }
    }

    let (box_row, box_col) = (row - row % BOX, col - col % BOX);
    for i in 0..BOX {
        for j in 0..BOX {
            if board.get(box_row + i, box_col + j) == num {
                return false;
            }
        }
    }

    if row == col && (0..SIZE).any(|i| board.get(i, i) == num) {
        return false;
    }
    if row + col == SIZE - 1 && (0..SIZE).any(|i| board.get(i, SIZE - 1 - i) == num) {
        return false;
    }

    let in_window = |top: usize| {
        (top..top + BOX).contains(&row)
            && (top..top + BOX).contains(&col)
            && (top..top + BOX)
                .any(|r| (top..top + BOX).any(|c| board.get(r, c) == num))
    };
    if in_window(1) || in_window(5) {
        return false;
    }

    true
}

/// Fills the grid completely by backtracking, trying candidate numbers in
/// a random order. Returns `false` if the partial grid admits no
/// completion.
pub fn fill_grid<R: Rng>(board: &mut Board, rng: &mut R) -> bool {
    fill_from(board, 0, rng)
}

fn fill_from<R: Rng>(board: &mut Board, cell: usize, rng: &mut R) -> bool {
    if cell == SIZE * SIZE {
        return true;
    }
    let (row, col) = (cell / SIZE, cell % SIZE);
    if board.get(row, col) != 0 {
        return fill_from(board, cell + 1, rng);
    }

    let mut candidates: Vec<u8> = (1..=9).collect();
    candidates.shuffle(rng);

    for num in candidates {
        if is_safe(board, row, col, num) {
            board.set(row, col, num);
            if fill_from(board, cell + 1, rng) {
                return true;
            }
            board.set(row, col, 0);
        }
    }
    false
}

/// Counts solutions of a puzzle, stopping at `max`.
///
/// Each found solution is excluded by a blocking clause that negates the
/// values it gives to the puzzle's empty cells, and the solver runs again
/// on the grown formula. A puzzle with no empty cells has exactly its own
/// solution or none.
#[must_use]
pub fn count_solutions<L: Literal>(board: &Board, max: usize) -> usize {
    let mut cnf = to_cnf::<L>(board);
    let empty: Vec<(usize, usize)> = board.empty_cells().collect();
    let mut count = 0;

    while count < max {
        let outcome = solve(&cnf, Mode::Serial);
        if outcome.verdict == Verdict::Unsat {
            break;
        }
        count += 1;

        let Some(model) = outcome.model else { break };
        let mut blocking: Vec<i32> = Vec::with_capacity(empty.len());
        for &(row, col) in &empty {
            for num in 1..=SIZE {
                let var = var_index(row, col, num);
                if model.value(var.unsigned_abs()) {
                    blocking.push(-var);
                    break;
                }
            }
        }

        if blocking.is_empty() {
            // Nothing left to vary: the solution is unique.
            break;
        }
        cnf.add_clause(Clause::from(blocking));
    }

    count
}

/// Generates a puzzle with roughly `clues` givens: fill a grid, then dig
/// holes while the solution stays unique. Returns the puzzle and its full
/// solution.
pub fn generate_puzzle<L: Literal, R: Rng>(clues: usize, rng: &mut R) -> (Board, Board) {
    let mut full = Board::empty();
    // An empty grid always completes.
    fill_grid(&mut full, rng);

    let mut puzzle = full;
    let mut positions: Vec<(usize, usize)> = (0..SIZE)
        .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
        .collect();
    positions.shuffle(rng);

    let to_remove = (SIZE * SIZE).saturating_sub(clues);
    let mut removed = 0;

    for (row, col) in positions {
        if removed == to_remove {
            break;
        }
        let backup = puzzle.get(row, col);
        puzzle.set(row, col, 0);

        if count_solutions::<L>(&puzzle, 2) == 1 {
            removed += 1;
            log::debug!("dug ({row}, {col}), {removed}/{to_remove} holes");
        } else {
            puzzle.set(row, col, backup);
        }
    }

    (puzzle, full)
}
