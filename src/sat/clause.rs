#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A clause is a disjunction of literals (e.g. `x1 OR !x2 OR x3`). Clauses
//! here are plain literal arrays: the first two positions of any clause of
//! width two or more are its watched literals, kept there by `swap` during
//! propagation.

use crate::sat::literal::{Literal, PackedLiteral};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// A clause over literals of type `L`.
///
/// Duplicate literals are removed on construction. A clause containing both
/// a literal and its negation is a tautology; `Cnf` drops those at load
/// time. The literal order is stable per instance apart from watch swaps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause<L: Literal = PackedLiteral> {
    literals: SmallVec<[L; 8]>,
}

impl<L: Literal> Clause<L> {
    #[must_use]
    pub fn new(literals: &[L]) -> Self {
        literals.iter().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// A unit clause has exactly one literal; it forces an assignment at
    /// load time and is never watched.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// `true` if the clause contains some literal together with its
    /// negation and is therefore always satisfied.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        let mut seen = FxHashSet::with_capacity_and_hasher(self.len(), rustc_hash::FxBuildHasher);
        for &lit in self.iter() {
            if seen.contains(&lit.negated()) {
                return true;
            }
            seen.insert(lit);
        }
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, L> {
        self.literals.iter()
    }

    /// Swaps two literal positions; used to keep watched literals at
    /// positions 0 and 1.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.literals.swap(i, j);
    }

    /// The maximum variable mentioned by the clause, or 0 when empty.
    #[must_use]
    pub fn max_variable(&self) -> u32 {
        self.iter().map(|l| l.variable()).max().unwrap_or(0)
    }
}

impl<L: Literal> FromIterator<L> for Clause<L> {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        Self {
            literals: iter.into_iter().unique().collect(),
        }
    }
}

impl<L: Literal> From<&[i32]> for Clause<L> {
    fn from(dimacs: &[i32]) -> Self {
        dimacs.iter().map(|&l| L::from_i32(l)).collect()
    }
}

impl<L: Literal> From<Vec<i32>> for Clause<L> {
    fn from(dimacs: Vec<i32>) -> Self {
        Self::from(dimacs.as_slice())
    }
}

impl<L: Literal> Index<usize> for Clause<L> {
    type Output = L;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl<L: Literal> IndexMut<usize> for Clause<L> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.literals[index]
    }
}

impl<'a, L: Literal> IntoIterator for &'a Clause<L> {
    type Item = &'a L;
    type IntoIter = std::slice::Iter<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}
