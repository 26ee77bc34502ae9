//! A DPLL solver for Boolean satisfiability problems in DIMACS CNF format,
//! with two-watched-literal propagation, hybrid MOM / activity branching,
//! an optional dual-worker race mode, and percent-Sudoku tooling built on
//! top of the solver.

/// The `sat` module implements the SAT solver core: clause database, watched
/// literal propagation, branching heuristics, the search driver, and the
/// DIMACS / result-file interfaces around them.
pub mod sat;

/// The `sudoku` module implements the percent-Sudoku encoder, generator and
/// solution counter, which reduce the puzzle to CNF and drive the solver.
pub mod sudoku;
