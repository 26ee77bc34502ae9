#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Percent-Sudoku to CNF.
//!
//! Variable `var(r, c, n)` is true iff the cell at row `r`, column `c`
//! holds the number `n` (`r`, `c` 0-based, `n` in `1..=9`), encoded as
//! `81r + 9c + n`, so the formula spans variables `1..=729`.
//!
//! Constraints: every cell holds at least and at most one number; every
//! row, column and box holds each number at most once (and at least once,
//! which speeds propagation); each diagonal and each window holds each
//! number at most once; givens become unit clauses. With all cells forced
//! non-empty, at-most-one per region already makes every region a
//! permutation.

use crate::sat::assignment::Model;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sudoku::{Board, BOX, SIZE};
use itertools::Itertools;

/// Number of SAT variables in the encoding.
pub const NUM_VARS: usize = SIZE * SIZE * SIZE;

/// The SAT variable for "cell (row, col) holds num", as a positive DIMACS
/// literal in `1..=729`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const fn var_index(row: usize, col: usize, num: usize) -> i32 {
    (row * SIZE * SIZE + col * SIZE + num) as i32
}

/// Cells of the two windows of the `%` glyph.
fn window_cells(top: usize) -> Vec<(usize, usize)> {
    (top..top + BOX)
        .flat_map(|r| (top..top + BOX).map(move |c| (r, c)))
        .collect()
}

/// All cell groups that must not repeat a number: rows, columns, boxes,
/// both diagonals and the two windows.
fn regions() -> Vec<Vec<(usize, usize)>> {
    let mut regions = Vec::new();

    for r in 0..SIZE {
        regions.push((0..SIZE).map(|c| (r, c)).collect());
    }
    for c in 0..SIZE {
        regions.push((0..SIZE).map(|r| (r, c)).collect());
    }
    for box_row in 0..BOX {
        for box_col in 0..BOX {
            regions.push(
                (0..BOX)
                    .flat_map(|i| (0..BOX).map(move |j| (box_row * BOX + i, box_col * BOX + j)))
                    .collect(),
            );
        }
    }
    regions.push((0..SIZE).map(|i| (i, i)).collect());
    regions.push((0..SIZE).map(|i| (i, SIZE - 1 - i)).collect());
    regions.push(window_cells(1));
    regions.push(window_cells(5));

    regions
}

/// Encodes a puzzle into CNF. Givens are unit clauses; everything else is
/// the rule set above.
#[must_use]
pub fn to_cnf<L: Literal>(board: &Board) -> Cnf<L> {
    let mut clauses: Vec<Vec<i32>> = Vec::new();

    // Each cell holds at least one number, and no two.
    for row in 0..SIZE {
        for col in 0..SIZE {
            clauses.push((1..=SIZE).map(|n| var_index(row, col, n)).collect());
            for (n1, n2) in (1..=SIZE).tuple_combinations() {
                clauses.push(vec![-var_index(row, col, n1), -var_index(row, col, n2)]);
            }
        }
    }

    // Region rules. Rows, columns and boxes additionally assert that each
    // number appears somewhere; the distinctness pairs carry the variant
    // regions.
    let region_list = regions();
    for (idx, region) in region_list.iter().enumerate() {
        let with_at_least = idx < 3 * SIZE;
        for n in 1..=SIZE {
            if with_at_least {
                clauses.push(region.iter().map(|&(r, c)| var_index(r, c, n)).collect());
            }
            for (&(r1, c1), &(r2, c2)) in region.iter().tuple_combinations() {
                clauses.push(vec![-var_index(r1, c1, n), -var_index(r2, c2, n)]);
            }
        }
    }

    // Givens.
    for row in 0..SIZE {
        for col in 0..SIZE {
            let given = board.get(row, col);
            if given != 0 {
                clauses.push(vec![var_index(row, col, given as usize)]);
            }
        }
    }

    Cnf::new(NUM_VARS, clauses)
}

/// Reads a solved grid out of a model.
#[must_use]
pub fn decode(model: &Model) -> Board {
    let mut board = Board::empty();
    for row in 0..SIZE {
        for col in 0..SIZE {
            for num in 1..=SIZE {
                if model.value(var_index(row, col, num).unsigned_abs()) {
                    #[allow(clippy::cast_possible_truncation)]
                    board.set(row, col, num as u8);
                    break;
                }
            }
        }
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;
    use crate::sat::solver::{solve, Mode, Verdict};

    #[test]
    fn test_var_index_is_dense() {
        assert_eq!(var_index(0, 0, 1), 1);
        assert_eq!(var_index(0, 0, 9), 9);
        assert_eq!(var_index(0, 1, 1), 10);
        assert_eq!(var_index(8, 8, 9), 729);
    }

    #[test]
    fn test_regions_shape() {
        let regions = regions();
        // 9 rows + 9 columns + 9 boxes + 2 diagonals + 2 windows.
        assert_eq!(regions.len(), 31);
        assert!(regions.iter().all(|r| r.len() == SIZE));
        // The windows sit where the `%` circles are.
        assert!(regions[29].contains(&(1, 1)) && regions[29].contains(&(3, 3)));
        assert!(regions[30].contains(&(5, 5)) && regions[30].contains(&(7, 7)));
    }

    #[test]
    fn test_empty_board_is_satisfiable() {
        let cnf: Cnf<PackedLiteral> = to_cnf(&Board::empty());
        assert_eq!(cnf.num_vars, NUM_VARS);
        let outcome = solve(&cnf, Mode::Serial);
        assert_eq!(outcome.verdict, Verdict::Sat);

        let solved = decode(&outcome.model.unwrap());
        assert_eq!(solved.clue_count(), 81, "every cell filled");
    }

    #[test]
    fn test_contradictory_givens_unsat() {
        let mut board = Board::empty();
        board.set(0, 0, 5);
        board.set(0, 8, 5);
        let cnf: Cnf<PackedLiteral> = to_cnf(&board);
        assert_eq!(solve(&cnf, Mode::Serial).verdict, Verdict::Unsat);
    }

    #[test]
    fn test_window_constraint_enforced() {
        // Same number twice inside the upper window, but in different
        // rows, columns, boxes and off both diagonals: only the window
        // rule forbids it.
        let mut board = Board::empty();
        board.set(1, 2, 7);
        board.set(3, 1, 7);
        assert_eq!(
            solve(&to_cnf::<PackedLiteral>(&board), Mode::Serial).verdict,
            Verdict::Unsat
        );
    }

    #[test]
    fn test_diagonal_constraint_enforced() {
        let mut board = Board::empty();
        board.set(0, 0, 4);
        board.set(4, 4, 4);
        assert_eq!(
            solve(&to_cnf::<PackedLiteral>(&board), Mode::Serial).verdict,
            Verdict::Unsat
        );
    }

    #[test]
    fn test_solution_respects_givens() {
        let mut board = Board::empty();
        board.set(0, 1, 3);
        board.set(8, 8, 9);
        let outcome = solve(&to_cnf::<PackedLiteral>(&board), Mode::Serial);
        assert_eq!(outcome.verdict, Verdict::Sat);

        let solved = decode(&outcome.model.unwrap());
        assert_eq!(solved.get(0, 1), 3);
        assert_eq!(solved.get(8, 8), 9);
    }
}
