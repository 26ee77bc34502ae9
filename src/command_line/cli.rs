#![allow(clippy::struct_excessive_bools)]

//! Command-line interface for the solver and the Sudoku tooling.
//!
//! Uses `clap` for parsing. Exit codes follow the solve contract: a
//! produced verdict is success regardless of SAT/UNSAT; parse and I/O
//! failures (and a witness that fails verification) are the only
//! failures.

use clap::{Args, Parser, Subcommand};
use dpll_sat::sat::cnf::Cnf;
use dpll_sat::sat::dimacs::{parse_dimacs_text, parse_file, ParseError};
use dpll_sat::sat::literal::PackedLiteral;
use dpll_sat::sat::resfile::{parse_res_file, write_res_file};
use dpll_sat::sat::solver::{solve, Mode, SolveOutcome, Verdict};
use dpll_sat::sat::verify;
use dpll_sat::sudoku::encode::{decode, to_cnf};
use dpll_sat::sudoku::generate::{count_solutions, generate_puzzle};
use dpll_sat::sudoku::{Board, BoardParseError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

type Lit = PackedLiteral;

/// The solver's command line.
#[derive(Parser, Debug)]
#[command(name = "dpll_sat", version, about = "A DPLL SAT solver for DIMACS CNF formulas")]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve a DIMACS .cnf file and write the result beside it.
    Solve {
        /// Path to the DIMACS .cnf file.
        path: PathBuf,

        /// Skip writing the .res file.
        #[arg(long)]
        no_write: bool,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula provided as plain text (e.g. "1 -2 0 2 3 0").
    Text {
        /// DIMACS clause text, with or without a problem line.
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Check a .res result file against the formula it answers.
    Verify {
        /// Path to the DIMACS .cnf file.
        cnf: PathBuf,

        /// Path to the .res file.
        result: PathBuf,
    },

    /// Percent-Sudoku: solve, generate or count solutions.
    Sudoku {
        #[clap(subcommand)]
        command: SudokuCommands,
    },
}

#[derive(Subcommand, Debug)]
enum SudokuCommands {
    /// Solve a puzzle file (81 cells, `0` or `.` for empty).
    Solve {
        path: PathBuf,

        /// Also write the puzzle's CNF encoding next to the input.
        #[arg(short, long)]
        export_dimacs: bool,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate a puzzle with a unique solution.
    Generate {
        /// Number of givens to keep.
        #[arg(long, default_value_t = 35)]
        clues: usize,

        /// Seed for reproducible puzzles.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Count the solutions of a puzzle file, up to a cap.
    Count {
        path: PathBuf,

        /// Stop counting at this many solutions.
        #[arg(long, default_value_t = 2)]
        max: usize,
    },
}

/// Options shared by the solving subcommands.
#[derive(Args, Debug, Default, Clone)]
struct CommonOptions {
    /// Race two workers on the first decision instead of solving serially.
    #[arg(long)]
    dual: bool,

    /// Print the satisfying assignment.
    #[arg(short, long)]
    print_model: bool,

    /// Print search statistics after solving.
    #[arg(short, long)]
    stats: bool,

    /// Re-check the witness against the formula before reporting SAT.
    #[arg(long, default_value_t = true)]
    check: bool,
}

impl CommonOptions {
    const fn mode(&self) -> Mode {
        if self.dual {
            Mode::Dual
        } else {
            Mode::Serial
        }
    }
}

/// Everything the CLI can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid board: {0}")]
    Board(#[from] BoardParseError),

    #[error("witness fails {failing} clause(s)")]
    InvalidWitness { failing: usize },

    #[error("no solution recorded in {0}")]
    NoWitness(PathBuf),
}

/// Dispatches a parsed command line.
///
/// # Errors
///
/// Returns a [`CliError`] on parse or I/O failure, or when a verification
/// step finds an invalid witness.
pub fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Solve {
            path,
            no_write,
            common,
        } => solve_cnf_file(&path, no_write, &common),
        Commands::Text { input, common } => {
            let cnf: Cnf<Lit> = parse_dimacs_text(&ensure_header(&input))?;
            let outcome = solve(&cnf, common.mode());
            report(&cnf, &outcome, &common)
        }
        Commands::Verify { cnf, result } => verify_res_file(&cnf, &result),
        Commands::Sudoku { command } => match command {
            SudokuCommands::Solve {
                path,
                export_dimacs,
                common,
            } => solve_sudoku_file(&path, export_dimacs, &common),
            SudokuCommands::Generate { clues, seed } => generate_sudoku(clues, seed),
            SudokuCommands::Count { path, max } => {
                let board = Board::parse(&std::fs::read_to_string(&path)?)?;
                let count = count_solutions::<Lit>(&board, max);
                if count >= max {
                    println!("at least {count} solutions (stopped at the cap)");
                } else {
                    println!("{count} solution(s)");
                }
                Ok(())
            }
        },
    }
}

/// Inline text is allowed to omit the problem line; synthesize one from
/// the literals so the parser's range check has something to check.
fn ensure_header(input: &str) -> String {
    if input.split_whitespace().next() == Some("p") || input.trim_start().starts_with('c') {
        return input.to_string();
    }
    let max_var = input
        .split_whitespace()
        .filter_map(|t| t.parse::<i32>().ok())
        .map(i32::unsigned_abs)
        .max()
        .unwrap_or(0);
    let clauses = input.split_whitespace().filter(|&t| t == "0").count();
    format!("p cnf {max_var} {clauses}\n{input}")
}

fn solve_cnf_file(path: &Path, no_write: bool, common: &CommonOptions) -> Result<(), CliError> {
    let cnf: Cnf<Lit> = parse_file(path)?;
    log::info!(
        "loaded {}: {} variables, {} clauses",
        path.display(),
        cnf.num_vars,
        cnf.len()
    );

    let outcome = solve(&cnf, common.mode());
    report(&cnf, &outcome, common)?;

    if !no_write {
        let written = write_res_file(path, &outcome)?;
        println!("result written to {}", written.display());
    }
    Ok(())
}

/// Prints a solve outcome and optionally self-checks the witness.
fn report(cnf: &Cnf<Lit>, outcome: &SolveOutcome, common: &CommonOptions) -> Result<(), CliError> {
    match outcome.verdict {
        Verdict::Sat => println!("s SATISFIABLE ({:.3} ms)", outcome.elapsed_ms()),
        Verdict::Unsat => println!("s UNSATISFIABLE ({:.3} ms)", outcome.elapsed_ms()),
    }

    if let Some(model) = &outcome.model {
        if common.check {
            let report = verify::check(cnf, model);
            if !report.is_valid() {
                return Err(CliError::InvalidWitness {
                    failing: report.failures.len(),
                });
            }
        }
        if common.print_model {
            let lits = model
                .literals()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            println!("v {lits}");
        }
    }

    if common.stats {
        let stats = outcome.stats;
        println!(
            "c {} decisions, {} propagations, {} conflicts",
            stats.decisions, stats.propagations, stats.conflicts
        );
    }
    Ok(())
}

fn verify_res_file(cnf_path: &Path, res_path: &Path) -> Result<(), CliError> {
    let cnf: Cnf<Lit> = parse_file(cnf_path)?;
    let res = parse_res_file(res_path)?;

    println!(
        "result: {} ({} ms)",
        if res.satisfiable { "SAT" } else { "UNSAT" },
        res.elapsed_ms
    );
    if !res.satisfiable {
        println!("nothing to verify for an UNSAT result");
        return Ok(());
    }
    if res.assignment.is_empty() {
        return Err(CliError::NoWitness(res_path.to_path_buf()));
    }

    let report = verify::check(&cnf, &res.model());
    println!("satisfied clauses: {}/{}", report.satisfied, cnf.len());
    if report.is_valid() {
        println!("witness is correct");
        Ok(())
    } else {
        for failure in report.failures.iter().take(10) {
            println!("unsatisfied {failure}");
        }
        if report.failures.len() > 10 {
            println!("... and {} more", report.failures.len() - 10);
        }
        Err(CliError::InvalidWitness {
            failing: report.failures.len(),
        })
    }
}

fn solve_sudoku_file(
    path: &Path,
    export_dimacs: bool,
    common: &CommonOptions,
) -> Result<(), CliError> {
    let board = Board::parse(&std::fs::read_to_string(path)?)?;
    println!("{board}");

    let cnf = to_cnf::<Lit>(&board);
    if export_dimacs {
        let dimacs_path = path.with_extension("cnf");
        std::fs::write(&dimacs_path, format!("{cnf}"))?;
        println!("encoding written to {}", dimacs_path.display());
    }

    let outcome = solve(&cnf, common.mode());
    report(&cnf, &outcome, common)?;

    if let Some(model) = &outcome.model {
        println!("{}", decode(model));
    }
    Ok(())
}

fn generate_sudoku(clues: usize, seed: Option<u64>) -> Result<(), CliError> {
    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let (puzzle, solution) = generate_puzzle::<Lit, _>(clues, &mut rng);

    println!("puzzle ({} clues):", puzzle.clue_count());
    println!("{puzzle}");
    println!("solution:");
    println!("{solution}");
    Ok(())
}
