#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Branching heuristics: hybrid MOM / activity variable order with a
//! Jeroslow-Wang tiebreak, plus the pure-literal pass.
//!
//! Early in the search (fewer than `N/4` decisions) variables are ranked by
//! MOM (maximum occurrences in clauses of minimum size), which needs no
//! conflict history. Once the search has produced conflicts, activity
//! scores take over: a variable's activity is bumped whenever it appears in
//! a conflict clause and all activities decay geometrically between
//! conflicts. No clauses are learned; the conflict clause is only mined for
//! its variables.

use crate::sat::assignment::VecAssignment;
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use ordered_float::OrderedFloat;

const DECAY_FACTOR: f64 = 0.95;
const RESCALE_THRESHOLD: f64 = 1e100;
const RESCALE_FACTOR: f64 = 1e-100;

/// Variable ranking state: per-variable activity plus per-decision scratch
/// tallies of live literal occurrences.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Heuristic {
    activity: Vec<f64>,
    activity_inc: f64,
    pos: Vec<u32>,
    neg: Vec<u32>,
    jw: Vec<f64>,
}

impl Heuristic {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            activity: vec![0.0; num_vars + 1],
            activity_inc: 1.0,
            pos: vec![0; num_vars + 1],
            neg: vec![0; num_vars + 1],
            jw: vec![0.0; num_vars + 1],
        }
    }

    /// Bumps every variable of the conflict clause and steepens future
    /// bumps by `1/DECAY_FACTOR`, which is equivalent to decaying all
    /// existing activities.
    pub fn on_conflict<L: Literal>(&mut self, conflict: &Clause<L>) {
        for &lit in conflict {
            let var = lit.variable() as usize;
            self.activity[var] += self.activity_inc;
            if self.activity[var] > RESCALE_THRESHOLD {
                self.rescale();
            }
        }
        self.activity_inc /= DECAY_FACTOR;
    }

    /// Scales everything down in place; relative order is preserved.
    fn rescale(&mut self) {
        for a in &mut self.activity {
            *a *= RESCALE_FACTOR;
        }
        self.activity_inc *= RESCALE_FACTOR;
    }

    #[must_use]
    pub fn activity_of(&self, var: usize) -> f64 {
        self.activity[var]
    }

    /// Chooses the next decision literal, or `None` when no unassigned
    /// variable occurs in an unsatisfied clause.
    ///
    /// The polarity is the one with more live occurrences, TRUE on ties.
    pub fn pick<L: Literal>(
        &mut self,
        cnf: &Cnf<L>,
        assignment: &VecAssignment,
        decisions_made: usize,
    ) -> Option<L> {
        let min_width = self.tally(cnf, assignment)?;

        let num_vars = cnf.num_vars;
        let (pos, neg, jw, activity) = (&self.pos, &self.neg, &self.jw, &self.activity);

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let scale = 2f64.powi(min_width as i32);
        let mom = |v: usize| {
            f64::from(pos[v] * neg[v]).mul_add(scale, f64::from(pos[v] + neg[v]))
        };

        let candidates = (1..=num_vars).filter(|&v| pos[v] + neg[v] > 0);

        let best = if decisions_made * 4 < num_vars {
            candidates.max_by_key(|&v| (OrderedFloat(mom(v)), OrderedFloat(jw[v])))
        } else {
            candidates.max_by_key(|&v| (OrderedFloat(activity[v]), OrderedFloat(mom(v))))
        }?;

        #[allow(clippy::cast_possible_truncation)]
        Some(L::new(best as u32, pos[best] >= neg[best]))
    }

    /// One pass over the unsatisfied clauses: per-variable positive and
    /// negative occurrence counts, Jeroslow-Wang weights `Σ 2^{-width}`,
    /// and the smallest live clause width. Returns `None` if every clause
    /// is satisfied.
    fn tally<L: Literal>(&mut self, cnf: &Cnf<L>, assignment: &VecAssignment) -> Option<usize> {
        self.pos.fill(0);
        self.neg.fill(0);
        self.jw.fill(0.0);

        let mut min_width = usize::MAX;
        for clause in cnf.iter() {
            let mut width = 0_usize;
            let mut satisfied = false;
            for &lit in clause {
                match assignment.literal_value(lit) {
                    Some(true) => {
                        satisfied = true;
                        break;
                    }
                    None => width += 1,
                    Some(false) => {}
                }
            }
            if satisfied || width == 0 {
                continue;
            }

            min_width = min_width.min(width);
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let weight = 2f64.powi(-(width as i32));
            for &lit in clause {
                if assignment.literal_value(lit).is_none() {
                    let var = lit.variable() as usize;
                    if lit.polarity() {
                        self.pos[var] += 1;
                    } else {
                        self.neg[var] += 1;
                    }
                    self.jw[var] += weight;
                }
            }
        }

        (min_width != usize::MAX).then_some(min_width)
    }
}

/// Finds every pure literal: an unassigned variable all of whose live
/// occurrences (in clauses not yet satisfied) have one polarity. Assigning
/// that polarity is always safe, since no remaining clause can want the
/// opposite one. Run once at the root, after root units have propagated.
#[must_use]
pub fn pure_literals<L: Literal>(cnf: &Cnf<L>, assignment: &VecAssignment) -> Vec<L> {
    let num_vars = cnf.num_vars;
    let mut pos = vec![false; num_vars + 1];
    let mut neg = vec![false; num_vars + 1];

    for clause in cnf.iter() {
        if clause
            .iter()
            .any(|&l| assignment.literal_value(l) == Some(true))
        {
            continue;
        }
        for &lit in clause {
            if assignment.literal_value(lit).is_none() {
                let var = lit.variable() as usize;
                if lit.polarity() {
                    pos[var] = true;
                } else {
                    neg[var] = true;
                }
            }
        }
    }

    (1..=num_vars)
        .filter_map(|v| {
            #[allow(clippy::cast_possible_truncation)]
            let var = v as u32;
            match (pos[v], neg[v]) {
                (true, false) => Some(L::new(var, true)),
                (false, true) => Some(L::new(var, false)),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    type TestCnf = Cnf<PackedLiteral>;

    fn lit(v: i32) -> PackedLiteral {
        PackedLiteral::from_i32(v)
    }

    #[test]
    fn test_mom_prefers_balanced_frequent_variable() {
        // Variable 1 occurs twice per polarity, variables 2 and 3 once.
        let cnf = TestCnf::new(3, vec![vec![1, 2], vec![1, -2], vec![-1, 3], vec![-1, -3]]);
        let assignment = VecAssignment::new(cnf.num_vars);
        let mut h = Heuristic::new(cnf.num_vars);

        let picked = h.pick(&cnf, &assignment, 0).unwrap();
        assert_eq!(picked.variable(), 1);
        assert!(picked.polarity(), "TRUE on a polarity tie");
    }

    #[test]
    fn test_polarity_follows_occurrences() {
        let cnf = TestCnf::new(2, vec![vec![-1, 2], vec![-1, -2], vec![-1, 2]]);
        let assignment = VecAssignment::new(cnf.num_vars);
        let mut h = Heuristic::new(cnf.num_vars);

        let picked = h.pick(&cnf, &assignment, 0).unwrap();
        assert_eq!(picked.variable(), 1);
        assert!(!picked.polarity(), "variable 1 only occurs negatively");
    }

    #[test]
    fn test_activity_takes_over_after_warmup() {
        let cnf = TestCnf::new(8, vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8]]);
        let assignment = VecAssignment::new(cnf.num_vars);
        let mut h = Heuristic::new(cnf.num_vars);

        h.on_conflict(&Clause::<PackedLiteral>::from(vec![7, -8]));
        // decisions_made = 2 >= 8/4, so the activity ranking applies.
        let picked = h.pick(&cnf, &assignment, 2).unwrap();
        assert!(picked.variable() == 7 || picked.variable() == 8);
    }

    #[test]
    fn test_pick_ignores_satisfied_clauses() {
        let cnf = TestCnf::new(3, vec![vec![1, 2], vec![3]]);
        let mut assignment = VecAssignment::new(cnf.num_vars);
        assignment.assign(lit(1));
        assignment.assign(lit(3));

        let mut h = Heuristic::new(cnf.num_vars);
        assert!(
            h.pick::<PackedLiteral>(&cnf, &assignment, 0).is_none(),
            "every clause satisfied, nothing to branch on"
        );
    }

    #[test]
    fn test_rescale_preserves_order() {
        let mut h = Heuristic::new(2);
        h.activity_inc = RESCALE_THRESHOLD;
        h.on_conflict(&Clause::<PackedLiteral>::from(vec![1]));
        h.on_conflict(&Clause::<PackedLiteral>::from(vec![1]));
        h.on_conflict(&Clause::<PackedLiteral>::from(vec![2]));
        assert!(h.activity_of(1) > h.activity_of(2));
        assert!(h.activity_of(1).is_finite());
    }

    #[test]
    fn test_pure_literals_found() {
        // 1 is purely positive, 3 purely negative, 2 is mixed.
        let cnf = TestCnf::new(3, vec![vec![1, 2], vec![1, -3], vec![-2, -3]]);
        let assignment = VecAssignment::new(cnf.num_vars);
        let pures = pure_literals::<PackedLiteral>(&cnf, &assignment);

        assert!(pures.contains(&lit(1)));
        assert!(pures.contains(&lit(-3)));
        assert!(!pures.iter().any(|l| l.variable() == 2));
    }

    #[test]
    fn test_pure_ignores_satisfied_clauses() {
        let cnf = TestCnf::new(2, vec![vec![2, -1], vec![1, 2]]);
        let mut assignment = VecAssignment::new(cnf.num_vars);
        assignment.assign(lit(2));
        let pures = pure_literals::<PackedLiteral>(&cnf, &assignment);
        assert!(pures.is_empty(), "all clauses satisfied, no live occurrences");
    }
}
