#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// Watcher lists, one per literal, indexed by [`Literal::index`].
///
/// Every clause of width ≥ 2 is watched by the literals at its positions 0
/// and 1. Unit clauses are asserted once at the root and never watched;
/// empty clauses make the formula trivially unsatisfiable before the watch
/// index is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchLists(Vec<SmallVec<[usize; 6]>>);

impl WatchLists {
    #[must_use]
    pub fn new<L: Literal>(cnf: &Cnf<L>) -> Self {
        let mut lists = vec![SmallVec::new(); (cnf.num_vars + 1) * 2];

        for (idx, clause) in cnf.iter().enumerate().filter(|(_, c)| c.len() >= 2) {
            let a = clause[0];
            let b = clause[1];
            debug_assert_ne!(a, b, "clause {idx} watches a duplicate literal");

            lists[a.index()].push(idx);
            lists[b.index()].push(idx);
        }

        Self(lists)
    }

    /// Moves clause `idx` from `from`'s watcher list to `to`'s.
    pub fn move_watch<L: Literal>(&mut self, idx: usize, from: L, to: L) {
        self[to.index()].push(idx);
        let list = &mut self[from.index()];
        if let Some(pos) = list.iter().position(|&i| i == idx) {
            list.swap_remove(pos);
        }
    }
}

impl Index<usize> for WatchLists {
    type Output = SmallVec<[usize; 6]>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for WatchLists {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}
