#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Two-watched-literal Boolean Constraint Propagation.
//!
//! Given a literal that has just become falsified, every clause watching it
//! must restore the watch invariant: either the clause is already satisfied
//! through its other watch, or a new non-falsified literal takes over the
//! watch, or the clause is unit and its other watch is forced, or the other
//! watch is falsified too and the clause is the conflict.
//!
//! The propagation queue is the trail suffix past [`Trail::queue_head`],
//! drained in FIFO order. Watcher lists are visited in stored order over a
//! snapshot, since watch moves edit the lists mid-traversal. A conflict
//! clears nothing and recurses nowhere: it is returned to the search driver
//! as a clause index, and backtracking truncates the queue along with the
//! trail.

use crate::sat::assignment::VecAssignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::trail::{Reason, Trail};
use crate::sat::watch::WatchLists;
use smallvec::SmallVec;

/// The watched-literal propagator: watch index plus a propagation counter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Propagator {
    watches: WatchLists,
    num_propagations: usize,
}

impl Propagator {
    #[must_use]
    pub fn new<L: Literal>(cnf: &Cnf<L>) -> Self {
        Self {
            watches: WatchLists::new(cnf),
            num_propagations: 0,
        }
    }

    #[must_use]
    pub fn num_propagations(&self) -> usize {
        self.num_propagations
    }

    /// Drains the propagation queue.
    ///
    /// Returns `Some(clause_idx)` on conflict, where the clause at that
    /// index is falsified by the current partial assignment, or `None` once
    /// the queue is empty and the watch invariant holds everywhere. Calling
    /// again without new assignments is a no-op.
    pub fn propagate<L: Literal>(
        &mut self,
        trail: &mut Trail<L>,
        assignment: &mut VecAssignment,
        cnf: &mut Cnf<L>,
        level: usize,
    ) -> Option<usize> {
        while let Some(lit) = trail.next_queued() {
            self.num_propagations += 1;
            let falsified = lit.negated();

            // Snapshot: watch moves below edit this list while we walk it.
            let watchers: SmallVec<[usize; 6]> = self.watches[falsified.index()].clone();
            for &idx in &watchers {
                if let Some(conflict) = self.process_clause(idx, trail, assignment, cnf, level) {
                    return Some(conflict);
                }
            }
        }
        None
    }

    /// Restores the watch invariant for one clause after one of its watched
    /// literals was falsified.
    fn process_clause<L: Literal>(
        &mut self,
        clause_idx: usize,
        trail: &mut Trail<L>,
        assignment: &mut VecAssignment,
        cnf: &mut Cnf<L>,
        level: usize,
    ) -> Option<usize> {
        let clause = &cnf[clause_idx];
        let first = clause[0];
        let second = clause[1];

        let first_value = assignment.literal_value(first);
        if first_value == Some(true) {
            return None;
        }
        let second_value = assignment.literal_value(second);

        match (first_value, second_value) {
            (Some(false), Some(false)) => {
                debug_assert!(
                    cnf[clause_idx]
                        .iter()
                        .all(|&l| assignment.literal_value(l) == Some(false)),
                    "conflict clause {clause_idx} has a non-falsified literal"
                );
                Some(clause_idx)
            }
            (None, Some(false)) => {
                self.replace_or_propagate(first, clause_idx, trail, assignment, cnf, level);
                None
            }
            (Some(false), None) => {
                cnf[clause_idx].swap(0, 1);
                self.replace_or_propagate(second, clause_idx, trail, assignment, cnf, level);
                None
            }
            (_, Some(true)) => {
                // Keep the satisfying literal first so the early-out above
                // skips this clause for the rest of the branch.
                cnf[clause_idx].swap(0, 1);
                None
            }
            (Some(true), _) | (None, None) => None,
        }
    }

    /// The falsified watch sits at position 1, the free `other` watch at 0.
    /// Either a non-falsified literal past position 1 takes over the watch,
    /// or the clause is unit and `other` is forced with this clause as its
    /// reason.
    fn replace_or_propagate<L: Literal>(
        &mut self,
        other: L,
        clause_idx: usize,
        trail: &mut Trail<L>,
        assignment: &mut VecAssignment,
        cnf: &mut Cnf<L>,
        level: usize,
    ) {
        let replacement = cnf[clause_idx]
            .iter()
            .enumerate()
            .skip(2)
            .find(|&(_, &l)| assignment.literal_value(l) != Some(false))
            .map(|(i, _)| i);

        if let Some(new_idx) = replacement {
            let clause = &mut cnf[clause_idx];
            let new_lit = clause[new_idx];
            let prev = clause[1];
            clause.swap(1, new_idx);
            self.watches.move_watch(clause_idx, prev, new_lit);
        } else {
            debug_assert!(
                assignment.literal_value(other).is_none(),
                "unit propagation on an assigned watch in clause {clause_idx}"
            );
            trail.push(other, level, Reason::Clause(clause_idx), assignment);
        }
    }
}
