#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The chronological assignment trail.
//!
//! Every assignment the solver ever makes goes through [`Trail::push`],
//! which records the literal, the decision level it was made at and the
//! reason it was forced (or that it was a free decision). Backtracking pops
//! entries in LIFO order, restoring the assignment vector as it goes.
//!
//! The trail doubles as the propagation queue: `queue_head` marks the
//! boundary between literals whose consequences have been propagated and
//! literals that are assigned but not yet processed. Propagation drains the
//! suffix in FIFO order.

use crate::sat::assignment::VecAssignment;
use crate::sat::literal::{Literal, PackedLiteral};
use std::ops::Index;

/// Why an assignment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reason {
    /// A free branching decision.
    #[default]
    Decision,
    /// Forced by the unit clause with this index at load time.
    Unit(usize),
    /// Forced by unit propagation on the clause with this index.
    Clause(usize),
    /// Forced by the pure-literal pass at the root.
    Pure,
}

/// One trail entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<L: Literal> {
    pub lit: L,
    pub decision_level: usize,
    pub reason: Reason,
}

/// The assignment log, in assignment order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail<L: Literal = PackedLiteral> {
    steps: Vec<Step<L>>,
    /// Index of the first entry not yet propagated.
    pub queue_head: usize,
}

impl<L: Literal> Trail<L> {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            steps: Vec::with_capacity(num_vars),
            queue_head: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Records an assignment and applies it to the assignment vector.
    ///
    /// Precondition: the literal's variable is unassigned. Assigning at
    /// push time (rather than when the queue entry is drained) means a
    /// variable can never sit in the queue twice with opposite polarities.
    pub fn push(&mut self, lit: L, decision_level: usize, reason: Reason, a: &mut VecAssignment) {
        debug_assert!(
            !a.is_assigned(lit.variable()),
            "variable {} pushed while already assigned",
            lit.variable()
        );
        a.assign(lit);
        self.steps.push(Step {
            lit,
            decision_level,
            reason,
        });
    }

    /// Pops the next literal awaiting propagation, advancing the queue.
    pub fn next_queued(&mut self) -> Option<L> {
        if self.queue_head < self.steps.len() {
            let lit = self.steps[self.queue_head].lit;
            self.queue_head += 1;
            Some(lit)
        } else {
            None
        }
    }

    /// Undoes every entry above `level`, unassigning each variable in LIFO
    /// order, and resets the propagation queue to the trail end.
    pub fn backtrack_to(&mut self, level: usize, a: &mut VecAssignment) {
        while let Some(step) = self.steps.last() {
            if step.decision_level <= level {
                break;
            }
            a.unassign(step.lit.variable());
            self.steps.pop();
        }
        self.queue_head = self.steps.len();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step<L>> {
        self.steps.iter()
    }
}

impl<L: Literal> Index<usize> for Trail<L> {
    type Output = Step<L>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}
