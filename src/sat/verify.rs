#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Independent verification of a candidate assignment against a formula.
//!
//! The verifier shares nothing with the search: it re-evaluates every
//! clause directly under the given total assignment, so a bug in the watch
//! machinery cannot hide a bogus witness. Failures are reported per clause
//! with a literal-by-literal evaluation.

use crate::sat::assignment::Model;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use std::fmt::Display;

/// One clause the assignment fails to satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseFailure {
    /// Index of the clause in the formula.
    pub clause: usize,
    /// Each literal of the clause with its truth value under the model.
    pub literals: Vec<(i32, bool)>,
}

impl Display for ClauseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "clause {}:", self.clause)?;
        for (lit, value) in &self.literals {
            write!(f, " {lit}({})", u8::from(*value))?;
        }
        Ok(())
    }
}

/// Outcome of checking every clause.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerifyReport {
    /// Number of satisfied clauses.
    pub satisfied: usize,
    /// Every failing clause, in formula order.
    pub failures: Vec<ClauseFailure>,
}

impl VerifyReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Evaluates every clause under the model.
#[must_use]
pub fn check<L: Literal>(cnf: &Cnf<L>, model: &Model) -> VerifyReport {
    let mut report = VerifyReport::default();

    for (idx, clause) in cnf.iter().enumerate() {
        if clause.iter().any(|&lit| model.satisfies(lit)) {
            report.satisfied += 1;
        } else {
            report.failures.push(ClauseFailure {
                clause: idx,
                literals: clause
                    .iter()
                    .map(|&lit| (lit.to_i32(), model.satisfies(lit)))
                    .collect(),
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    type TestCnf = Cnf<PackedLiteral>;

    #[test]
    fn test_valid_model() {
        let cnf = TestCnf::new(3, vec![vec![1, -2], vec![-1, 2, 3]]);
        let report = check(&cnf, &Model::new(vec![1, -2, 3]));
        assert!(report.is_valid());
        assert_eq!(report.satisfied, 2);
    }

    #[test]
    fn test_failure_reports_clause_and_literals() {
        let cnf = TestCnf::new(2, vec![vec![1, 2], vec![-1, -2]]);
        let report = check(&cnf, &Model::new(vec![-1, -2]));
        assert!(!report.is_valid());
        assert_eq!(report.satisfied, 1);

        let failure = &report.failures[0];
        assert_eq!(failure.clause, 0);
        assert_eq!(failure.literals, vec![(1, false), (2, false)]);
        assert_eq!(format!("{failure}"), "clause 0: 1(0) 2(0)");
    }

    #[test]
    fn test_empty_clause_always_fails() {
        let cnf = TestCnf::new(1, vec![vec![]]);
        let report = check(&cnf, &Model::new(vec![1]));
        assert!(!report.is_valid());
        assert!(report.failures[0].literals.is_empty());
    }
}
