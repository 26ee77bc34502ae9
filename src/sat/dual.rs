#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The dual-worker race.
//!
//! After root setup, a split variable is chosen and two workers race: one
//! solves the formula under `split = true`, the other under `split = false`.
//! Each worker owns a full clone of the solver state, so the only shared
//! data is a `solution_found` flag and a mutex-guarded witness slot. The
//! two branches together exhaust the split variable's domain, so the race
//! is sound: either worker reporting SAT settles the formula, and both
//! reporting UNSAT settles it the other way.
//!
//! The first SAT worker writes the witness while holding the mutex and only
//! then sets the flag (release store), so any thread that observes the flag
//! also observes the witness. The losing worker polls the flag between
//! propagation rounds and bows out at the next check; it is never killed,
//! and both workers are always joined.

use crate::sat::assignment::Model;
use crate::sat::cnf::Cnf;
use crate::sat::engine::{Engine, SearchOutcome};
use crate::sat::literal::Literal;
use ordered_float::OrderedFloat;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

/// Picks the unassigned variable with the best balance score
/// `total · (1 − |pos − neg| / total)`: frequent, and as evenly split
/// between polarities as possible, so neither branch gets a lopsided share
/// of the work.
#[must_use]
pub fn pick_split_variable(occurrences: &[(u32, usize, usize)]) -> Option<u32> {
    occurrences
        .iter()
        .max_by_key(|&&(_, pos, neg)| {
            #[allow(clippy::cast_precision_loss)]
            let (pos, neg) = (pos as f64, neg as f64);
            let total = pos + neg;
            OrderedFloat(total * (1.0 - (pos - neg).abs() / total))
        })
        .map(|&(var, _, _)| var)
}

/// Solves the formula with two racing workers. Returns the verdict and, on
/// SAT, the witness published by whichever worker got there first.
#[must_use]
pub fn solve_dual<L: Literal>(cnf: Cnf<L>) -> (SearchOutcome, Option<Model>) {
    let mut root = Engine::new(cnf);
    match root.prepare_root() {
        Some(SearchOutcome::Unsat) => return (SearchOutcome::Unsat, None),
        Some(_) => return (SearchOutcome::Sat, Some(root.model())),
        None => {}
    }

    let Some(split) = pick_split_variable(&root.live_occurrences()) else {
        // No live variable left: root propagation already satisfied
        // everything.
        return (SearchOutcome::Sat, Some(root.model()));
    };
    log::debug!("racing two workers on split variable {split}");

    let found = Arc::new(AtomicBool::new(false));
    let witness: Arc<Mutex<Option<Model>>> = Arc::new(Mutex::new(None));

    let handles: Vec<_> = [true, false]
        .into_iter()
        .map(|polarity| {
            let worker = root.clone();
            let assumption = L::new(split, polarity);
            let found = Arc::clone(&found);
            let witness = Arc::clone(&witness);
            thread::spawn(move || run_worker(worker, assumption, &found, &witness))
        })
        .collect();

    let mut any_sat = false;
    for handle in handles {
        match handle.join() {
            Ok(outcome) => any_sat |= outcome == SearchOutcome::Sat,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    if any_sat {
        let mut slot = witness.lock().unwrap_or_else(PoisonError::into_inner);
        (SearchOutcome::Sat, slot.take())
    } else {
        (SearchOutcome::Unsat, None)
    }
}

/// One branch of the race: pin the split polarity, search, and on SAT
/// publish the witness exactly once.
fn run_worker<L: Literal>(
    mut engine: Engine<L>,
    assumption: L,
    found: &Arc<AtomicBool>,
    witness: &Arc<Mutex<Option<Model>>>,
) -> SearchOutcome {
    engine.set_cancel_flag(Arc::clone(found));
    engine.assume(assumption);

    let outcome = engine.search();
    if outcome == SearchOutcome::Sat {
        let mut slot = witness.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(engine.model());
            found.store(true, Ordering::Release);
        }
    }
    outcome
}
