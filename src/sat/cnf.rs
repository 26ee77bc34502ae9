#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The clause database: a CNF formula as an indexed vector of clauses.
//!
//! A CNF formula is a conjunction (AND) of clauses, each a disjunction (OR)
//! of literals. The formula is satisfied if and only if every clause is.
//! This module owns the immutable part of the solver state: clause indices
//! handed out here are the clause references used by the watch lists, the
//! trail reasons and conflict reporting.
//!
//! Construction drops tautological clauses and deduplicates literals within
//! a clause, but keeps explicitly empty clauses: a formula containing the
//! empty clause is unsatisfiable and the search driver reports that before
//! touching anything else.

use crate::sat::assignment::Model;
use crate::sat::clause::Clause;
use crate::sat::literal::{Literal, PackedLiteral};
use std::fmt::Display;
use std::ops::{Index, IndexMut};

/// A boolean formula in Conjunctive Normal Form.
///
/// `num_vars` is the declared variable count `N`; variables are `1..=N`.
/// Clauses may mention fewer variables than declared; the extra ones are
/// unconstrained and default to TRUE in any extracted witness.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf<L: Literal = PackedLiteral> {
    pub clauses: Vec<Clause<L>>,
    pub num_vars: usize,
}

impl<L: Literal> Cnf<L> {
    /// Builds a formula from DIMACS-style signed integer clauses, declaring
    /// `num_vars` variables. Tautologies are dropped, duplicate literals
    /// removed, empty clauses kept.
    #[must_use]
    pub fn new<J, I>(num_vars: usize, clauses: I) -> Self
    where
        J: IntoIterator<Item = i32>,
        I: IntoIterator<Item = J>,
    {
        let kept: Vec<Clause<L>> = clauses
            .into_iter()
            .map(|c| c.into_iter().collect::<Vec<_>>().into())
            .filter(|c: &Clause<L>| !c.is_tautology())
            .collect();

        let max_var = kept.iter().map(Clause::max_variable).max().unwrap_or(0) as usize;

        Self {
            clauses: kept,
            num_vars: num_vars.max(max_var),
        }
    }

    /// Appends a clause, growing `num_vars` if the clause mentions a larger
    /// variable. Used by the solution-counting driver for blocking clauses.
    pub fn add_clause(&mut self, clause: Clause<L>) {
        if clause.is_tautology() {
            return;
        }
        self.num_vars = self.num_vars.max(clause.max_variable() as usize);
        self.clauses.push(clause);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause<L>> {
        self.clauses.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// `true` if some clause has no literals at all; such a formula is
    /// unsatisfiable under every assignment.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.iter().any(Clause::is_empty)
    }

    /// Checks a total assignment against every clause.
    #[must_use]
    pub fn is_satisfied_by(&self, model: &Model) -> bool {
        self.iter()
            .all(|clause| clause.iter().any(|&lit| model.satisfies(lit)))
    }
}

impl<L: Literal> Index<usize> for Cnf<L> {
    type Output = Clause<L>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

impl<L: Literal> IndexMut<usize> for Cnf<L> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.clauses[index]
    }
}

impl<L: Literal> From<Vec<Vec<i32>>> for Cnf<L> {
    /// Builds a formula inferring `num_vars` from the clauses themselves.
    fn from(clauses: Vec<Vec<i32>>) -> Self {
        Self::new(0, clauses)
    }
}

impl<L: Literal> Display for Cnf<L> {
    /// Formats the formula in DIMACS CNF, e.g.
    ///
    /// ```text
    /// p cnf 3 2
    /// 1 -2 0
    /// 2 3 0
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.len())?;
        for clause in self.iter() {
            for &lit in clause.iter() {
                write!(f, "{} ", lit.to_i32())?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    type TestCnf = Cnf<PackedLiteral>;

    #[test]
    fn test_new_from_dimacs() {
        let cnf = TestCnf::new(3, vec![vec![1, -2], vec![-1, 2, 3]]);
        assert_eq!(cnf.len(), 2);
        assert_eq!(cnf.num_vars, 3);
        assert!(!cnf.has_empty_clause());
    }

    #[test]
    fn test_num_vars_grows_to_literals() {
        let cnf = TestCnf::new(2, vec![vec![1, -5]]);
        assert_eq!(cnf.num_vars, 5);
    }

    #[test]
    fn test_tautologies_dropped_empty_kept() {
        let cnf = TestCnf::new(2, vec![vec![1, -1], vec![], vec![2]]);
        assert_eq!(cnf.len(), 2);
        assert!(cnf.has_empty_clause());
    }

    #[test]
    fn test_add_clause_blocking() {
        let mut cnf = TestCnf::new(2, vec![vec![1, 2]]);
        cnf.add_clause(Clause::from(vec![-1, -2]));
        assert_eq!(cnf.len(), 2);
        cnf.add_clause(Clause::from(vec![3, -3]));
        assert_eq!(cnf.len(), 2, "tautological blocking clause is a no-op");
    }

    #[test]
    fn test_display_dimacs() {
        let cnf = TestCnf::new(3, vec![vec![1, -2], vec![2, 3]]);
        let text = format!("{cnf}");
        assert!(text.starts_with("p cnf 3 2\n"));
        assert!(text.contains("1 -2 0"));
        assert!(text.contains("2 3 0"));
    }

    #[test]
    fn test_is_satisfied_by() {
        let cnf = TestCnf::new(3, vec![vec![1, -2], vec![-1, 2, 3]]);
        assert!(cnf.is_satisfied_by(&Model::from_values(&[true, false, true])));
        assert!(!cnf.is_satisfied_by(&Model::from_values(&[false, true, false])));
    }
}
