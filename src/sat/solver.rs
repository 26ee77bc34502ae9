#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The in-process solve API: one entry point wrapping the serial engine and
//! the dual-worker race behind a mode switch, with wall-clock timing.

use crate::sat::assignment::Model;
use crate::sat::cnf::Cnf;
use crate::sat::dual::solve_dual;
use crate::sat::engine::{Engine, SearchOutcome, SearchStats};
use crate::sat::literal::Literal;
use std::fmt::Display;
use std::time::{Duration, Instant};

/// Which driver to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Single-threaded DPLL.
    #[default]
    Serial,
    /// Two workers racing on the two polarities of a split variable.
    Dual,
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serial => write!(f, "serial"),
            Self::Dual => write!(f, "dual"),
        }
    }
}

/// The answer to a satisfiability question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Sat,
    Unsat,
}

impl Verdict {
    #[must_use]
    pub const fn is_sat(self) -> bool {
        matches!(self, Self::Sat)
    }
}

/// Everything a solve call produces.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub verdict: Verdict,
    /// Present iff SAT; total over `1..=num_vars`.
    pub model: Option<Model>,
    pub elapsed: Duration,
    /// Effort counters; zeroed for the dual mode, where the losing
    /// worker's effort has no single meaningful total.
    pub stats: SearchStats,
}

impl SolveOutcome {
    /// Wall time in milliseconds, as written to the `t` line.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Decides the formula and, when satisfiable, produces a witness.
#[must_use]
pub fn solve<L: Literal>(cnf: &Cnf<L>, mode: Mode) -> SolveOutcome {
    let start = Instant::now();
    let (outcome, model, stats) = match mode {
        Mode::Serial => {
            let mut engine = Engine::new(cnf.clone());
            let outcome = engine.solve();
            let model = (outcome == SearchOutcome::Sat).then(|| engine.model());
            (outcome, model, engine.stats())
        }
        Mode::Dual => {
            let (outcome, model) = solve_dual(cnf.clone());
            (outcome, model, SearchStats::default())
        }
    };
    let elapsed = start.elapsed();

    let verdict = match outcome {
        SearchOutcome::Sat => Verdict::Sat,
        SearchOutcome::Unsat => Verdict::Unsat,
        SearchOutcome::Cancelled => {
            // No cancellation flag is installed on these paths.
            unreachable!("top-level solve cannot be cancelled")
        }
    };

    log::debug!(
        "{mode} solve: {verdict:?} in {:.3} ms ({} decisions, {} propagations, {} conflicts)",
        elapsed.as_secs_f64() * 1000.0,
        stats.decisions,
        stats.propagations,
        stats.conflicts,
    );

    SolveOutcome {
        verdict,
        model,
        elapsed,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    type TestCnf = Cnf<PackedLiteral>;

    /// Pigeonhole principle PHP(pigeons, holes): every pigeon gets a hole,
    /// no two pigeons share one. UNSAT whenever pigeons > holes.
    fn pigeonhole(pigeons: usize, holes: usize) -> TestCnf {
        let var = |p: usize, h: usize| (p * holes + h + 1) as i32;
        let mut clauses = Vec::new();
        for p in 0..pigeons {
            clauses.push((0..holes).map(|h| var(p, h)).collect());
        }
        for h in 0..holes {
            for p1 in 0..pigeons {
                for p2 in (p1 + 1)..pigeons {
                    clauses.push(vec![-var(p1, h), -var(p2, h)]);
                }
            }
        }
        TestCnf::new(pigeons * holes, clauses)
    }

    /// Random 3-SAT with a planted solution: every clause is forced to
    /// contain at least one literal the planted assignment satisfies, so
    /// the instance is SAT by construction.
    fn planted_3sat(num_vars: usize, num_clauses: usize, seed: u64) -> TestCnf {
        let mut rng = StdRng::seed_from_u64(seed);
        let plant: Vec<bool> = (0..num_vars).map(|_| rng.gen()).collect();

        let clauses = (0..num_clauses)
            .map(|_| {
                let mut vars = Vec::with_capacity(3);
                while vars.len() < 3 {
                    let v = rng.gen_range(1..=num_vars);
                    if !vars.contains(&v) {
                        vars.push(v);
                    }
                }
                let satisfied_slot = rng.gen_range(0..3);
                vars.iter()
                    .enumerate()
                    .map(|(i, &v)| {
                        let polarity = if i == satisfied_slot {
                            plant[v - 1]
                        } else {
                            rng.gen()
                        };
                        #[allow(clippy::cast_possible_wrap)]
                        let lit = v as i32;
                        if polarity {
                            lit
                        } else {
                            -lit
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        TestCnf::new(num_vars, clauses)
    }

    #[test]
    fn test_trivial_sat_both_modes() {
        let cnf = TestCnf::new(1, vec![vec![1]]);
        for mode in [Mode::Serial, Mode::Dual] {
            let outcome = solve(&cnf, mode);
            assert_eq!(outcome.verdict, Verdict::Sat);
            assert_eq!(outcome.model.unwrap().literals(), &[1]);
        }
    }

    #[test]
    fn test_trivial_unsat_both_modes() {
        let cnf = TestCnf::new(1, vec![vec![1], vec![-1]]);
        for mode in [Mode::Serial, Mode::Dual] {
            let outcome = solve(&cnf, mode);
            assert_eq!(outcome.verdict, Verdict::Unsat);
            assert!(outcome.model.is_none());
        }
    }

    #[test]
    fn test_pigeonhole_unsat_serial_and_dual_agree() {
        let cnf = pigeonhole(4, 3);
        assert_eq!(cnf.len(), 22);
        assert_eq!(solve(&cnf, Mode::Serial).verdict, Verdict::Unsat);
        assert_eq!(solve(&cnf, Mode::Dual).verdict, Verdict::Unsat);
    }

    #[test]
    fn test_planted_3sat_both_modes_verify() {
        let cnf = planted_3sat(90, 270, 0xD1A7);
        for mode in [Mode::Serial, Mode::Dual] {
            let outcome = solve(&cnf, mode);
            assert_eq!(outcome.verdict, Verdict::Sat, "{mode} mode");
            let model = outcome.model.expect("SAT carries a witness");
            assert!(cnf.is_satisfied_by(&model), "{mode} witness must satisfy");
        }
    }

    #[test]
    fn test_elapsed_is_measured() {
        let cnf = TestCnf::new(1, vec![vec![1]]);
        let outcome = solve(&cnf, Mode::Serial);
        assert!(outcome.elapsed_ms() >= 0.0);
    }
}
