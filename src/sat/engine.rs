#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The DPLL search driver.
//!
//! One engine owns one complete solver state: the clause database, the
//! assignment vector, the trail, the watch index and the branching
//! heuristic. `solve` runs the classic loop (propagate, check terminal
//! states, branch) with chronological backtracking: on conflict the most
//! recent decision that still has an untried polarity is flipped, and the
//! formula is unsatisfiable only once every decision has been flipped.
//!
//! Root setup asserts size-one clauses, reports UNSAT on an immediate
//! contradiction, runs one pure-literal pass, and propagates to quiescence
//! before the first decision. After that, propagation is driven exclusively
//! by assignments; there is no full-scan fallback pass.
//!
//! Engines are plain values: cloning one yields an independent copy of the
//! whole solver state, which is how the dual race obtains its two disjoint
//! workers. The only shared state an engine can observe is an optional
//! cancellation flag polled between propagation rounds.

use crate::sat::assignment::{Model, VecAssignment};
use crate::sat::cnf::Cnf;
use crate::sat::heuristic::{pure_literals, Heuristic};
use crate::sat::literal::{Literal, PackedLiteral};
use crate::sat::propagation::Propagator;
use crate::sat::trail::{Reason, Trail};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A satisfying assignment was found; read it with [`Engine::model`].
    Sat,
    /// The search space (below any assumed decisions) is exhausted.
    Unsat,
    /// The cancellation flag was observed set; the state is abandoned.
    Cancelled,
}

/// Search effort counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    pub decisions: usize,
    pub propagations: usize,
    pub conflicts: usize,
}

/// A branching decision and whether its other polarity has been tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Decision<L: Literal> {
    lit: L,
    flipped: bool,
}

/// A complete serial DPLL solver instance.
#[derive(Debug, Clone)]
pub struct Engine<L: Literal = PackedLiteral> {
    cnf: Cnf<L>,
    assignment: VecAssignment,
    trail: Trail<L>,
    propagator: Propagator,
    heuristic: Heuristic,
    decisions: Vec<Decision<L>>,
    num_decisions: usize,
    num_conflicts: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl<L: Literal> Engine<L> {
    #[must_use]
    pub fn new(cnf: Cnf<L>) -> Self {
        let propagator = Propagator::new(&cnf);
        let assignment = VecAssignment::new(cnf.num_vars);
        let trail = Trail::new(cnf.num_vars);
        let heuristic = Heuristic::new(cnf.num_vars);

        Self {
            cnf,
            assignment,
            trail,
            propagator,
            heuristic,
            decisions: Vec::new(),
            num_decisions: 0,
            num_conflicts: 0,
            cancel: None,
        }
    }

    /// Installs a shared cancellation flag, polled between propagation
    /// rounds and decisions.
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel = Some(flag);
    }

    #[must_use]
    pub fn decision_level(&self) -> usize {
        self.decisions.len()
    }

    #[must_use]
    pub fn stats(&self) -> SearchStats {
        SearchStats {
            decisions: self.num_decisions,
            propagations: self.propagator.num_propagations(),
            conflicts: self.num_conflicts,
        }
    }

    /// The current assignment as a total witness; meaningful after `Sat`.
    #[must_use]
    pub fn model(&self) -> Model {
        self.assignment.model()
    }

    #[must_use]
    pub fn assignment(&self) -> &VecAssignment {
        &self.assignment
    }

    #[must_use]
    pub fn cnf(&self) -> &Cnf<L> {
        &self.cnf
    }

    /// Runs the full search from scratch: root setup, then the main loop.
    pub fn solve(&mut self) -> SearchOutcome {
        match self.prepare_root() {
            Some(outcome) => outcome,
            None => self.search(),
        }
    }

    /// Root-level setup: assert unit clauses, propagate, assign pure
    /// literals, propagate again. Returns a verdict if the formula is
    /// decided without any branching.
    pub fn prepare_root(&mut self) -> Option<SearchOutcome> {
        if self.cnf.is_empty() {
            return Some(SearchOutcome::Sat);
        }
        if self.cnf.has_empty_clause() {
            return Some(SearchOutcome::Unsat);
        }

        for idx in 0..self.cnf.len() {
            if !self.cnf[idx].is_unit() {
                continue;
            }
            let lit = self.cnf[idx][0];
            match self.assignment.literal_value(lit) {
                Some(true) => {}
                Some(false) => return Some(SearchOutcome::Unsat),
                None => self.assign(lit, Reason::Unit(idx)),
            }
        }
        if self.propagate().is_some() {
            return Some(SearchOutcome::Unsat);
        }

        for lit in pure_literals(&self.cnf, &self.assignment) {
            self.assign(lit, Reason::Pure);
        }
        if self.propagate().is_some() {
            return Some(SearchOutcome::Unsat);
        }

        None
    }

    /// The main loop, continuing from the current state. Used directly by
    /// race workers after [`Engine::assume`].
    pub fn search(&mut self) -> SearchOutcome {
        loop {
            if self.is_cancelled() {
                return SearchOutcome::Cancelled;
            }

            if let Some(conflict) = self.propagate() {
                self.num_conflicts += 1;
                self.heuristic.on_conflict(&self.cnf[conflict]);
                if !self.flip_most_recent_decision() {
                    return SearchOutcome::Unsat;
                }
            } else if self.trail.len() == self.cnf.num_vars {
                return SearchOutcome::Sat;
            } else if let Some(lit) =
                self.heuristic
                    .pick(&self.cnf, &self.assignment, self.num_decisions)
            {
                self.num_decisions += 1;
                self.decisions.push(Decision { lit, flipped: false });
                self.assign(lit, Reason::Decision);
            } else if self.formula_satisfied() {
                return SearchOutcome::Sat;
            } else {
                return SearchOutcome::Unsat;
            }
        }
    }

    /// Pushes a decision whose other polarity must never be tried here.
    /// Race workers use this to pin their half of the split.
    pub fn assume(&mut self, lit: L) {
        self.decisions.push(Decision { lit, flipped: true });
        self.assign(lit, Reason::Decision);
    }

    /// Unassigned variables that still occur in some unsatisfied clause.
    /// Feeds the split-variable choice of the race mode.
    #[must_use]
    pub fn live_occurrences(&self) -> Vec<(u32, usize, usize)> {
        let mut pos = vec![0_usize; self.cnf.num_vars + 1];
        let mut neg = vec![0_usize; self.cnf.num_vars + 1];

        for clause in self.cnf.iter() {
            if clause
                .iter()
                .any(|&l| self.assignment.literal_value(l) == Some(true))
            {
                continue;
            }
            for &lit in clause {
                if self.assignment.literal_value(lit).is_none() {
                    let var = lit.variable() as usize;
                    if lit.polarity() {
                        pos[var] += 1;
                    } else {
                        neg[var] += 1;
                    }
                }
            }
        }

        (1..=self.cnf.num_vars)
            .filter(|&v| pos[v] + neg[v] > 0)
            .map(|v| {
                #[allow(clippy::cast_possible_truncation)]
                let var = v as u32;
                (var, pos[v], neg[v])
            })
            .collect()
    }

    fn assign(&mut self, lit: L, reason: Reason) {
        self.trail
            .push(lit, self.decisions.len(), reason, &mut self.assignment);
    }

    fn propagate(&mut self) -> Option<usize> {
        self.propagator.propagate(
            &mut self.trail,
            &mut self.assignment,
            &mut self.cnf,
            self.decisions.len(),
        )
    }

    /// Backtracks to the most recent decision with an untried polarity and
    /// takes it. Returns `false` when no decision is left to flip, i.e. the
    /// search space is exhausted.
    fn flip_most_recent_decision(&mut self) -> bool {
        while let Some(decision) = self.decisions.pop() {
            self.trail
                .backtrack_to(self.decisions.len(), &mut self.assignment);
            if !decision.flipped {
                let lit = decision.lit.negated();
                self.decisions.push(Decision { lit, flipped: true });
                self.assign(lit, Reason::Decision);
                return true;
            }
        }
        false
    }

    fn formula_satisfied(&self) -> bool {
        self.cnf.iter().all(|clause| {
            clause
                .iter()
                .any(|&l| self.assignment.literal_value(l) == Some(true))
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    type TestEngine = Engine<PackedLiteral>;
    type TestCnf = Cnf<PackedLiteral>;

    fn solve(num_vars: usize, clauses: Vec<Vec<i32>>) -> (SearchOutcome, TestEngine) {
        let mut engine = TestEngine::new(TestCnf::new(num_vars, clauses));
        let outcome = engine.solve();
        (outcome, engine)
    }

    #[test]
    fn test_trivial_sat() {
        let (outcome, engine) = solve(1, vec![vec![1]]);
        assert_eq!(outcome, SearchOutcome::Sat);
        assert_eq!(engine.model().literals(), &[1]);
    }

    #[test]
    fn test_trivial_unsat() {
        let (outcome, _) = solve(1, vec![vec![1], vec![-1]]);
        assert_eq!(outcome, SearchOutcome::Unsat);
    }

    #[test]
    fn test_unit_propagation_cascade() {
        let (outcome, engine) = solve(3, vec![vec![1], vec![-1, 2], vec![-2, 3]]);
        assert_eq!(outcome, SearchOutcome::Sat);
        assert_eq!(engine.model().literals(), &[1, 2, 3]);
        assert_eq!(engine.stats().decisions, 0, "solved by propagation alone");
    }

    #[test]
    fn test_pure_literal_sets_variable() {
        let (outcome, engine) = solve(3, vec![vec![1, 2], vec![1, -3]]);
        assert_eq!(outcome, SearchOutcome::Sat);
        assert!(engine.model().value(1), "variable 1 occurs only positively");
        assert!(engine.cnf().is_satisfied_by(&engine.model()));
    }

    #[test]
    fn test_chronological_backtrack_unsat() {
        let (outcome, engine) = solve(
            3,
            vec![vec![1, 2], vec![1, -2], vec![-1, 3], vec![-1, -3]],
        );
        assert_eq!(outcome, SearchOutcome::Unsat);
        assert!(engine.stats().conflicts >= 2, "both polarities must fail");
    }

    #[test]
    fn test_empty_formula_is_sat_all_true() {
        let (outcome, engine) = solve(3, vec![]);
        assert_eq!(outcome, SearchOutcome::Sat);
        assert_eq!(engine.model().literals(), &[1, 2, 3]);
    }

    #[test]
    fn test_empty_clause_is_unsat() {
        let (outcome, _) = solve(2, vec![vec![1, 2], vec![]]);
        assert_eq!(outcome, SearchOutcome::Unsat);
    }

    #[test]
    fn test_unreferenced_variable_defaults_true() {
        let (outcome, engine) = solve(3, vec![vec![1, 2]]);
        assert_eq!(outcome, SearchOutcome::Sat);
        assert!(engine.model().value(3));
    }

    #[test]
    fn test_sat_model_verifies() {
        let clauses = vec![
            vec![1, 2, -3],
            vec![-1, 3],
            vec![-2, -3],
            vec![2, 3, 4],
            vec![-4, 1],
        ];
        let (outcome, engine) = solve(4, clauses);
        assert_eq!(outcome, SearchOutcome::Sat);
        assert!(engine.cnf().is_satisfied_by(&engine.model()));
    }

    #[test]
    fn test_no_clause_falsified_at_quiescence() {
        // Force a couple of decisions, then confirm the search invariant
        // on the accepting state: nothing is falsified.
        let (outcome, engine) = solve(4, vec![vec![1, 2], vec![-1, 3], vec![-3, -2, 4]]);
        assert_eq!(outcome, SearchOutcome::Sat);
        for clause in engine.cnf().iter() {
            assert!(clause
                .iter()
                .any(|&l| engine.assignment().literal_value(l) != Some(false)));
        }
    }

    #[test]
    fn test_assume_pins_half_of_the_space() {
        // Satisfiable only with 1 = true, so the 1 = false half exhausts.
        let cnf = TestCnf::new(3, vec![vec![1, 2], vec![1, -2], vec![-1, 3]]);
        let mut engine = TestEngine::new(cnf);
        assert!(engine.prepare_root().is_none());
        engine.assume(PackedLiteral::from_i32(-1));
        assert_eq!(engine.search(), SearchOutcome::Unsat);
    }

    #[test]
    fn test_cancellation_observed() {
        let cnf = TestCnf::new(2, vec![vec![1, 2]]);
        let mut engine = TestEngine::new(cnf);
        let flag = Arc::new(AtomicBool::new(true));
        engine.set_cancel_flag(flag);
        assert_eq!(engine.search(), SearchOutcome::Cancelled);
    }

    #[test]
    fn test_live_occurrences_skips_satisfied() {
        let cnf = TestCnf::new(3, vec![vec![1, 2], vec![2, -3]]);
        let mut engine = TestEngine::new(cnf);
        engine.assume(PackedLiteral::from_i32(1));
        // (1 2) is satisfied through 1; only (2 -3) still counts.
        let live = engine.live_occurrences();
        assert_eq!(live, vec![(2, 1, 0), (3, 0, 1)]);
    }
}
